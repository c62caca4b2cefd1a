use modelgen::{Generator, Options};
use wasm_bindgen::prelude::*;

/// Generate the model graph for `schema_json` and return it as JSON.
///
/// `options_json` may be empty, in which case the defaults are used.
#[wasm_bindgen]
pub fn generate(schema_json: &str, options_json: &str) -> Result<String, String> {
    let options = if options_json.trim().is_empty() {
        Options::default()
    } else {
        Options::from_json_str(options_json).map_err(|e| e.to_string())?
    };
    let mut generator = Generator::new(schema_json, options).map_err(|e| e.to_string())?;
    let graph = generator.generate().map_err(|e| e.to_string())?;
    serde_json::to_string(&graph).map_err(|e| e.to_string())
}

/// The default options as JSON.
#[wasm_bindgen]
pub fn default_options() -> Result<String, String> {
    serde_json::to_string(&Options::default()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    const SCHEMA: &str = r#"{"tables": [
        {"name": "users", "columns": [
            {"name": "id", "type": {"kind": "integer"}, "primary_key": true}
        ]}
    ]}"#;

    #[wasm_bindgen_test]
    fn test_generate() {
        let output = generate(SCHEMA, "").unwrap();
        assert!(output.contains(r#""name":"User""#));
        let output = generate(SCHEMA, r#"{"tables_only": true}"#).unwrap();
        assert!(output.contains(r#""variable_name":"t_users""#));
    }

    #[wasm_bindgen_test]
    fn test_errors_are_strings() {
        assert!(generate("{}", "").unwrap_err().contains("Schema input is not valid"));
        assert!(generate(SCHEMA, "not json").unwrap_err().contains("Options are not valid"));
    }
}
