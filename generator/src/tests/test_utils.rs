use crate::{ClassModel, Generator, ModelGraph, Options, Relationship};

pub fn get_test_resource(name: &str) -> String {
    let mut d = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("resources/test");
    d.push(name);
    // We unwrap here because we only ever expect this fn to run within a unit test
    std::fs::read_to_string(d).unwrap()
}

pub fn generate_from_json(schema_json: &str, options: Options) -> ModelGraph {
    Generator::new(schema_json, options)
        .unwrap()
        .generate()
        .unwrap()
}

pub fn generate_from_value(schema: serde_json::Value, options: Options) -> ModelGraph {
    generate_from_json(&schema.to_string(), options)
}

pub fn generate_library(options: Options) -> ModelGraph {
    generate_from_json(&get_test_resource("library_schema.json"), options)
}

pub fn class<'g>(graph: &'g ModelGraph, table_name: &str) -> &'g ClassModel {
    graph
        .get_class_by_table_name(table_name)
        .unwrap_or_else(|| panic!("no class for table `{table_name}`"))
}

/// The relationship a class declares under `name`.
pub fn relationship<'g>(graph: &'g ModelGraph, table_name: &str, name: &str) -> &'g Relationship {
    graph
        .relationships_of(class(graph, table_name))
        .into_iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no relationship `{name}` on `{table_name}`"))
}

/// Attribute names of a class, in order.
pub fn attribute_names(graph: &ModelGraph, table_name: &str) -> Vec<String> {
    class(graph, table_name)
        .attributes
        .iter()
        .map(|a| a.name.clone())
        .collect()
}
