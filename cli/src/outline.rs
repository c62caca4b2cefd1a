use std::fmt;

use modelgen::{AttributeValue, ClassModel, Model, ModelGraph, RelationshipKind};

const INDENT: &str = "    ";

fn kind_label(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::ManyToOne => "many-to-one",
        RelationshipKind::OneToMany => "one-to-many",
        RelationshipKind::OneToOne => "one-to-one",
        RelationshipKind::ManyToMany => "many-to-many",
    }
}

/// A short human readable listing of the models, their attributes and the enums.
pub struct Outline<'a>(pub &'a ModelGraph);

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        for model in &graph.models {
            write_model(f, graph, model)?;
        }
        for definition in &graph.enums {
            writeln!(f, "enum {}: {}", definition.name, definition.values.join(", "))?;
        }
        Ok(())
    }
}

pub fn render_outline(graph: &ModelGraph) -> String {
    Outline(graph).to_string()
}

fn write_model(f: &mut fmt::Formatter<'_>, graph: &ModelGraph, model: &Model) -> fmt::Result {
    let declaration = model.declaration();
    let table_name = match &declaration.schema {
        Some(schema) => format!("{schema}.{}", declaration.table_name),
        None => declaration.table_name.clone(),
    };
    match model {
        Model::Table(table) => {
            writeln!(f, "table {} ({table_name})", table.variable_name)?;
            for column in &declaration.columns {
                writeln!(f, "{INDENT}{}", column.name)?;
            }
            Ok(())
        }
        Model::Class(class) => {
            match class.parent {
                Some(parent) => writeln!(
                    f,
                    "class {}({}) ({table_name})",
                    class.name,
                    graph.model(parent).name()
                )?,
                None => writeln!(f, "class {} ({table_name})", class.name)?,
            }
            write_attributes(f, graph, class)
        }
    }
}

fn write_attributes(
    f: &mut fmt::Formatter<'_>,
    graph: &ModelGraph,
    class: &ClassModel,
) -> fmt::Result {
    for attribute in &class.attributes {
        match &attribute.value {
            AttributeValue::Column {
                column,
                explicit_name: true,
            } => writeln!(f, "{INDENT}{} = column {column}", attribute.name)?,
            AttributeValue::Column { .. } => writeln!(f, "{INDENT}{}", attribute.name)?,
            AttributeValue::Relationship { relationship } => {
                let relationship = graph.relationship(*relationship);
                write!(
                    f,
                    "{INDENT}{} -> {} ({})",
                    attribute.name,
                    graph.model(relationship.target).name(),
                    kind_label(relationship.kind)
                )?;
                if let Some(secondary) = &relationship.secondary {
                    write!(f, " via {}", secondary.name)?;
                }
                if let Some(back) = relationship.back_populates {
                    write!(f, " <-> {}", graph.relationship(back).name)?;
                }
                writeln!(f)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use modelgen::{Generator, Options};

    use super::*;

    #[test]
    fn test_outline() {
        let schema_json = r#"{"tables": [
            {"name": "authors", "columns": [
                {"name": "id", "type": {"kind": "integer"}, "primary_key": true}
            ]},
            {"name": "books", "columns": [
                {"name": "id", "type": {"kind": "integer"}, "primary_key": true},
                {"name": "author_id", "type": {"kind": "integer"}},
                {"name": "def", "type": {"kind": "text"}}
            ], "constraints": [{
                "type": "foreign_key",
                "columns": ["author_id"],
                "referred_table": "authors",
                "referred_columns": ["id"]
            }]},
            {"name": "audit_log", "columns": [{"name": "event", "type": {"kind": "text"}}]}
        ]}"#;
        let graph = Generator::new(schema_json, Options::default())
            .unwrap()
            .generate()
            .unwrap();
        let expected = "\
table t_audit_log (audit_log)
    event
class Author (authors)
    id
    books -> Book (one-to-many) <-> author
class Book (books)
    id
    author_id
    _def = column def
    author -> Author (many-to-one) <-> books
";
        assert_eq!(render_outline(&graph), expected);
    }

    #[test]
    fn test_outline_secondary_and_enums() {
        let schema_json = r#"{"tables": [
            {"name": "posts", "columns": [
                {"name": "id", "type": {"kind": "integer"}, "primary_key": true},
                {"name": "state", "type": {"kind": "enum", "name": "post_state", "values": ["draft", "live"]}}
            ]},
            {"name": "tags", "columns": [
                {"name": "id", "type": {"kind": "integer"}, "primary_key": true}
            ]},
            {"name": "post_tags", "columns": [
                {"name": "post_id", "type": {"kind": "integer"}},
                {"name": "tag_id", "type": {"kind": "integer"}}
            ], "constraints": [
                {"type": "foreign_key", "columns": ["post_id"], "referred_table": "posts", "referred_columns": ["id"]},
                {"type": "foreign_key", "columns": ["tag_id"], "referred_table": "tags", "referred_columns": ["id"]}
            ]}
        ]}"#;
        let graph = Generator::new(schema_json, Options::default())
            .unwrap()
            .generate()
            .unwrap();
        let outline = Outline(&graph).to_string();
        assert!(outline.contains("    tag -> Tag (many-to-many) via post_tags <-> post\n"));
        assert!(outline.ends_with("enum PostState: draft, live\n"));
    }
}
