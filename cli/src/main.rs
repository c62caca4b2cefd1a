use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use modelgen::{Generator, Options};

mod outline;

/// Infers ORM models and relationships from a database schema
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the model graph for a schema JSON file
    Generate(GenerateArgs),
    /// Print the default options as TOML
    DefaultOptions,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// The full model graph as JSON
    Json,
    /// A short listing of models and relationships
    Outline,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Path to the schema JSON file
    #[arg(short, long)]
    schema: String,
    /// Path to a TOML options file. Defaults are used for anything it omits.
    #[arg(short, long)]
    options: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write the output here instead of stdout
    #[arg(short = 'o', long)]
    outfile: Option<String>,
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Cannot read `{path}`: {e}"))
}

fn generate(args: GenerateArgs) -> Result<(), String> {
    let schema_json = read_file(&args.schema)?;
    let options = match &args.options {
        Some(path) => Options::from_toml_str(&read_file(path)?).map_err(|e| e.to_string())?,
        None => Options::default(),
    };
    let mut generator = Generator::new(&schema_json, options).map_err(|e| e.to_string())?;
    let graph = generator.generate().map_err(|e| e.to_string())?;
    info!(
        "Generated {} models and {} relationships",
        graph.models.len(),
        graph.relationships.len()
    );
    let output = match args.format {
        Format::Json => serde_json::to_string_pretty(&graph).map_err(|e| e.to_string())?,
        Format::Outline => outline::render_outline(&graph),
    };
    match args.outfile {
        Some(path) => std::fs::write(&path, output)
            .map_err(|e| format!("Cannot write `{path}`: {e}")),
        None => {
            println!("{output}");
            Ok(())
        }
    }
}

fn default_options() -> Result<(), String> {
    let toml = Options::default()
        .to_toml_string()
        .map_err(|e| e.to_string())?;
    print!("{toml}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();
    let result = match args.command {
        Command::Generate(args) => generate(args),
        Command::DefaultOptions => default_options(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
