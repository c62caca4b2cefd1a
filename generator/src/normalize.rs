//! In-place adjustments that run on every table before models are built.
//!
//! Every pass is idempotent: normalizing a normalized table changes nothing.

use std::collections::BTreeSet;

use log::{debug, warn};
use modelgen_parser::parse_in_list;

use crate::{
    errors::msg,
    schema::{ColumnType, ConstraintKind, EnumType, Schema, Sequence, Table},
    sql::Dialect,
    Options,
};

pub fn normalize_schema(schema: &mut Schema, options: &Options, dialect: &dyn Dialect) {
    for table in schema.tables.iter_mut() {
        if !options.is_ignored(&table.name) {
            normalize_table(table, options, dialect);
        }
    }
}

pub fn normalize_table(table: &mut Table, options: &Options, dialect: &dyn Dialect) {
    prune(table, options);
    infer_types_from_check_constraints(table, dialect);
    adapt_column_types(table, dialect);
    detect_sequences(table, dialect);
}

fn prune(table: &mut Table, options: &Options) {
    if options.suppress_indexes {
        table.indexes.clear();
    }
    if options.suppress_constraints {
        table.constraints.retain(|c| c.is_primary_key());
    }
    if options.suppress_comments {
        table.comment = None;
        for column in table.columns.iter_mut() {
            column.comment = None;
        }
    }
}

/// Turn `col IN (0, 1)` checks into boolean columns and `col IN ('a', 'b')` checks on textual
/// columns into enums, dropping the consumed constraints.
fn infer_types_from_check_constraints(table: &mut Table, dialect: &dyn Dialect) {
    let table_name = table.qualified_name();
    let mut consumed = BTreeSet::new();
    for i in 0..table.constraints.len() {
        let ConstraintKind::Check { sqltext } = &table.constraints[i].kind else {
            continue;
        };
        let in_list = match parse_in_list(sqltext) {
            Ok(in_list) => in_list,
            Err(_) => {
                debug!("{}", msg::unparsed_check_constraint(&table_name, sqltext));
                continue;
            }
        };
        let column_name = in_list.column_name().to_string();
        let Some(column) = table.get_column_mut(&column_name) else {
            warn!(
                "{}",
                msg::check_constraint_unknown_column(&table_name, &column_name)
            );
            continue;
        };
        if in_list.is_boolean() {
            debug!("Column `{table_name}.{column_name}` is a boolean");
            column.column_type = ColumnType::Boolean;
            consumed.insert(i);
        } else if let Some(values) = in_list.enum_values() {
            if dialect.is_textual(&column.column_type) {
                if !matches!(column.column_type, ColumnType::Enum(_)) {
                    debug!("Column `{table_name}.{column_name}` is an enum of {values:?}");
                    column.column_type = ColumnType::Enum(EnumType { name: None, values });
                }
                consumed.insert(i);
            }
        }
    }
    let mut position = 0;
    table.constraints.retain(|_| {
        let keep = !consumed.contains(&position);
        position += 1;
        keep
    });
}

fn adapt_column_types(table: &mut Table, dialect: &dyn Dialect) {
    let table_name = table.qualified_name();
    for column in table.columns.iter_mut() {
        let adapted = adapt_type(dialect, &column.column_type);
        if adapted == column.column_type {
            if let ColumnType::Native { name, .. } = &column.column_type {
                debug!(
                    "{}",
                    msg::type_adaptation_abandoned(&table_name, &column.name, name)
                );
            }
        } else {
            column.column_type = adapted;
        }
    }
}

/// Replace a native type with the most generic type that renders identically.
///
/// Candidates are tried in order. The walk stops at the first candidate that renders
/// differently (floats excepted) or cannot be rendered, and after the first generic type.
pub fn adapt_type(dialect: &dyn Dialect, column_type: &ColumnType) -> ColumnType {
    match column_type {
        ColumnType::Array { item, dimensions } => ColumnType::Array {
            item: Box::new(adapt_type(dialect, item)),
            dimensions: *dimensions,
        },
        ColumnType::Native { name, args } => {
            let Some(compiled) = dialect.compile_type(column_type) else {
                return column_type.clone();
            };
            let mut adapted = column_type.clone();
            for candidate in dialect.adaptation_candidates(name, args) {
                match dialect.compile_type(&candidate) {
                    Some(text) if text == compiled => {}
                    Some(_) if candidate.is_float_like() => {}
                    _ => break,
                }
                let is_generic = !candidate.is_native();
                adapted = candidate;
                if is_generic {
                    break;
                }
            }
            adapted
        }
        other => other.clone(),
    }
}

/// Drop `nextval(...)` defaults, keeping the sequence explicitly when its name is not the one
/// the database would have picked.
fn detect_sequences(table: &mut Table, dialect: &dyn Dialect) {
    for column in table.columns.iter_mut() {
        let Some(server_default) = &column.server_default else {
            continue;
        };
        let Some(sequence) = dialect.decode_sequence(server_default) else {
            continue;
        };
        if sequence.name != format!("{}_{}_seq", table.name, column.name) {
            column.sequence = Some(Sequence {
                name: sequence.name,
                schema: sequence.schema,
            });
        }
        column.server_default = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        schema::primitive_schema::PrimitiveSchema,
        sql::{Postgres, Sqlite},
    };

    use super::*;

    fn table_from(value: serde_json::Value) -> Table {
        let primitive_schema: PrimitiveSchema =
            serde_json::from_value(json!({ "tables": [value] })).unwrap();
        Schema::try_from(primitive_schema).unwrap().tables.remove(0)
    }

    fn check(sqltext: &str) -> serde_json::Value {
        json!({"type": "check", "sqltext": sqltext})
    }

    fn normalized(table: serde_json::Value) -> Table {
        let mut table = table_from(table);
        normalize_table(&mut table, &Options::default(), &Postgres());
        table
    }

    #[test]
    fn test_boolean_inference() {
        let table = normalized(json!({
            "name": "simple_items",
            "columns": [
                {"name": "flag", "type": {"kind": "native", "name": "INTEGER"}},
                {"name": "level", "type": {"kind": "native", "name": "INTEGER"}}
            ],
            "constraints": [
                check("simple_items.flag IN (0, 1)"),
                check("level IN (0, 1, 2)")
            ]
        }));
        assert_eq!(table.get_column("flag").unwrap().column_type, ColumnType::Boolean);
        assert_eq!(table.get_column("level").unwrap().column_type, ColumnType::Integer);
        assert_eq!(table.constraints.len(), 1);
        assert!(matches!(
            &table.constraints[0].kind,
            ConstraintKind::Check { sqltext } if sqltext == "level IN (0, 1, 2)"
        ));
    }

    #[test]
    fn test_enum_inference() {
        let table = normalized(json!({
            "name": "simple_items",
            "columns": [
                {"name": "enum", "type": {"kind": "native", "name": "VARCHAR", "args": ["255"]}},
                {"name": "number", "type": {"kind": "native", "name": "INTEGER"}}
            ],
            "constraints": [
                check(r"simple_items.enum IN ('A', '\'B', 'C')"),
                check("number IN ('1', '2')")
            ]
        }));
        assert_eq!(
            table.get_column("enum").unwrap().column_type,
            ColumnType::Enum(EnumType {
                name: None,
                values: vec!["A".to_string(), "'B".to_string(), "C".to_string()],
            })
        );
        // Not textual, so the check stays
        assert_eq!(table.get_column("number").unwrap().column_type, ColumnType::Integer);
        assert_eq!(table.constraints.len(), 1);
    }

    #[test]
    fn test_enum_inference_without_spaces() {
        let table = normalized(json!({
            "name": "simple_items",
            "columns": [
                {"name": "status", "type": {"kind": "native", "name": "VARCHAR", "args": ["20"]}},
                {"name": "flag", "type": {"kind": "native", "name": "INTEGER"}}
            ],
            "constraints": [
                check("simple_items.status IN ('active','inactive')"),
                check("flag IN (0,1)")
            ]
        }));
        assert_eq!(
            table.get_column("status").unwrap().column_type,
            ColumnType::Enum(EnumType {
                name: None,
                values: vec!["active".to_string(), "inactive".to_string()],
            })
        );
        // Only the literal `(0, 1)` form marks a boolean
        assert_eq!(table.get_column("flag").unwrap().column_type, ColumnType::Integer);
        assert_eq!(table.constraints.len(), 1);
    }

    #[test]
    fn test_existing_enum_keeps_its_type() {
        let existing = ColumnType::Enum(EnumType {
            name: Some("mood".to_string()),
            values: vec!["happy".to_string(), "sad".to_string()],
        });
        let table = normalized(json!({
            "name": "people",
            "columns": [{"name": "mood", "type": existing}],
            "constraints": [check("mood IN ('happy', 'sad', 'ok')")]
        }));
        assert_eq!(table.get_column("mood").unwrap().column_type, existing);
        assert!(table.constraints.is_empty());
    }

    #[test]
    fn test_check_on_unknown_column_is_kept() {
        let table = normalized(json!({
            "name": "things",
            "columns": [{"name": "a", "type": {"kind": "integer"}}],
            "constraints": [check("b IN (0, 1)"), check("a > 0")]
        }));
        assert_eq!(table.constraints.len(), 2);
    }

    #[test]
    fn test_type_adaptation() {
        let pg = Postgres();
        assert_eq!(
            adapt_type(&pg, &ColumnType::native("INT4", &[])),
            ColumnType::Integer
        );
        assert_eq!(
            adapt_type(&pg, &ColumnType::native("DOUBLE PRECISION", &[])),
            ColumnType::Float { precision: None }
        );
        assert_eq!(
            adapt_type(&pg, &ColumnType::native("VARCHAR", &["30"])),
            ColumnType::String { length: Some(30) }
        );
        assert_eq!(
            adapt_type(&pg, &ColumnType::native("JSONB", &[])),
            ColumnType::native("JSONB", &[])
        );
        assert_eq!(
            adapt_type(&pg, &ColumnType::native("CITEXT", &[])),
            ColumnType::native("CITEXT", &[])
        );
        assert_eq!(
            adapt_type(
                &pg,
                &ColumnType::Array {
                    item: Box::new(ColumnType::native("INT4", &[])),
                    dimensions: Some(1),
                }
            ),
            ColumnType::Array {
                item: Box::new(ColumnType::Integer),
                dimensions: Some(1),
            }
        );
        assert_eq!(
            adapt_type(&Sqlite(), &ColumnType::native("DATETIME", &[])),
            ColumnType::DateTime { timezone: false }
        );
    }

    #[test]
    fn test_sequence_detection() {
        let table = normalized(json!({
            "name": "simple_items",
            "columns": [
                {
                    "name": "id",
                    "type": {"kind": "integer"},
                    "server_default": "nextval('simple_items_id_seq'::regclass)"
                },
                {
                    "name": "other_id",
                    "type": {"kind": "integer"},
                    "server_default": "nextval('myschema.test_seq'::regclass)"
                },
                {"name": "created", "type": {"kind": "date"}, "server_default": "now()"}
            ]
        }));
        let id = table.get_column("id").unwrap();
        assert_eq!(id.server_default, None);
        assert_eq!(id.sequence, None);
        let other = table.get_column("other_id").unwrap();
        assert_eq!(other.server_default, None);
        assert_eq!(
            other.sequence,
            Some(Sequence {
                name: "test_seq".to_string(),
                schema: Some("myschema".to_string()),
            })
        );
        assert_eq!(
            table.get_column("created").unwrap().server_default,
            Some("now()".to_string())
        );
    }

    #[test]
    fn test_sequences_are_postgres_only() {
        let mut table = table_from(json!({
            "name": "simple_items",
            "columns": [{
                "name": "id",
                "type": {"kind": "integer"},
                "server_default": "nextval('test_seq'::regclass)"
            }]
        }));
        normalize_table(&mut table, &Options::default(), &Sqlite());
        assert!(table.get_column("id").unwrap().server_default.is_some());
    }

    #[test]
    fn test_suppression() {
        let options = Options {
            suppress_indexes: true,
            suppress_constraints: true,
            suppress_comments: true,
            ..Options::default()
        };
        let mut table = table_from(json!({
            "name": "things",
            "comment": "all the things",
            "columns": [
                {"name": "id", "type": {"kind": "integer"}, "primary_key": true},
                {"name": "code", "type": {"kind": "text"}, "comment": "a code"}
            ],
            "constraints": [{"type": "unique", "columns": ["code"]}],
            "indexes": [{"name": "ix_code", "columns": ["code"]}]
        }));
        normalize_table(&mut table, &options, &Postgres());
        assert_eq!(table.comment, None);
        assert_eq!(table.get_column("code").unwrap().comment, None);
        assert!(table.indexes.is_empty());
        assert_eq!(table.constraints.len(), 1);
        assert!(table.constraints[0].is_primary_key());
    }

    #[test]
    fn test_idempotence() {
        let mut table = table_from(json!({
            "name": "simple_items",
            "columns": [
                {"name": "id", "type": {"kind": "native", "name": "INT4"}, "primary_key": true,
                 "server_default": "nextval('custom_seq'::regclass)"},
                {"name": "flag", "type": {"kind": "native", "name": "INTEGER"}},
                {"name": "kind", "type": {"kind": "native", "name": "VARCHAR", "args": ["10"]}},
                {"name": "score", "type": {"kind": "native", "name": "FLOAT8"}},
                {"name": "data", "type": {"kind": "native", "name": "JSONB"}}
            ],
            "constraints": [
                check("flag IN (0, 1)"),
                check("kind IN ('a', 'b')"),
                check("score > 0")
            ]
        }));
        let options = Options::default();
        normalize_table(&mut table, &options, &Postgres());
        let once = table.clone();
        normalize_table(&mut table, &options, &Postgres());
        assert_eq!(table, once);
    }
}
