use modelgen_parser::{ast::SequenceRef, parse_sequence_default};

use crate::schema::ColumnType;

use super::dialect::{parse_arg, with_args, with_optional_args, Dialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Postgres();

/// Spellings PostgreSQL's catalog uses for its built-in types, keyed by alias.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("INT", "INTEGER"),
    ("INT4", "INTEGER"),
    ("SERIAL", "INTEGER"),
    ("INT2", "SMALLINT"),
    ("SMALLSERIAL", "SMALLINT"),
    ("INT8", "BIGINT"),
    ("BIGSERIAL", "BIGINT"),
    ("FLOAT4", "REAL"),
    ("FLOAT8", "DOUBLE PRECISION"),
    ("BOOL", "BOOLEAN"),
    ("DECIMAL", "NUMERIC"),
    ("CHARACTER VARYING", "VARCHAR"),
    ("CHARACTER", "CHAR"),
    ("TIMESTAMP WITHOUT TIME ZONE", "TIMESTAMP"),
    ("TIMESTAMPTZ", "TIMESTAMP WITH TIME ZONE"),
    ("TIME WITHOUT TIME ZONE", "TIME"),
    ("TIMETZ", "TIME WITH TIME ZONE"),
];

fn canonical_name(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    CANONICAL_NAMES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(upper)
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn compile_type(&self, column_type: &ColumnType) -> Option<String> {
        let compiled = match column_type {
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::SmallInteger => "SMALLINT".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Float { precision } => with_optional_args("FLOAT", &[*precision]),
            ColumnType::Numeric { precision, scale } => {
                with_optional_args("NUMERIC", &[*precision, *scale])
            }
            ColumnType::String { length } => with_optional_args("VARCHAR", &[*length]),
            ColumnType::Text { .. } => "TEXT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time { timezone: false } => "TIME WITHOUT TIME ZONE".to_string(),
            ColumnType::Time { timezone: true } => "TIME WITH TIME ZONE".to_string(),
            ColumnType::DateTime { timezone: false } => "TIMESTAMP WITHOUT TIME ZONE".to_string(),
            ColumnType::DateTime { timezone: true } => "TIMESTAMP WITH TIME ZONE".to_string(),
            ColumnType::Interval => "INTERVAL".to_string(),
            ColumnType::LargeBinary => "BYTEA".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::Enum(enum_type) => enum_type.name.clone()?,
            ColumnType::Array { item, .. } => format!("{}[]", self.compile_type(item)?),
            ColumnType::Native { name, args } => {
                let canonical = canonical_name(name);
                match canonical.as_str() {
                    "TIMESTAMP" => "TIMESTAMP WITHOUT TIME ZONE".to_string(),
                    "TIME" => "TIME WITHOUT TIME ZONE".to_string(),
                    _ => with_args(&canonical, args),
                }
            }
            ColumnType::Null => return None,
        };
        Some(compiled)
    }

    fn adaptation_candidates(&self, name: &str, args: &[String]) -> Vec<ColumnType> {
        let canonical = canonical_name(name);
        let alias = ColumnType::Native {
            name: canonical.clone(),
            args: args.to_vec(),
        };
        let generic = match canonical.as_str() {
            "INTEGER" => ColumnType::Integer,
            "SMALLINT" => ColumnType::SmallInteger,
            "BIGINT" => ColumnType::BigInteger,
            "REAL" | "DOUBLE PRECISION" | "FLOAT" => ColumnType::Float {
                precision: parse_arg(args, 0),
            },
            "NUMERIC" => ColumnType::Numeric {
                precision: parse_arg(args, 0),
                scale: parse_arg(args, 1),
            },
            "BOOLEAN" => ColumnType::Boolean,
            "VARCHAR" => ColumnType::String {
                length: parse_arg(args, 0),
            },
            "TEXT" => ColumnType::Text { length: None },
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time { timezone: false },
            "TIME WITH TIME ZONE" => ColumnType::Time { timezone: true },
            "TIMESTAMP" => ColumnType::DateTime { timezone: false },
            "TIMESTAMP WITH TIME ZONE" => ColumnType::DateTime { timezone: true },
            "INTERVAL" => ColumnType::Interval,
            "BYTEA" => ColumnType::LargeBinary,
            "JSON" | "JSONB" => ColumnType::Json,
            "UUID" => ColumnType::Uuid,
            _ => return vec![],
        };
        if canonical == name {
            vec![generic]
        } else {
            vec![alias, generic]
        }
    }

    fn is_textual(&self, column_type: &ColumnType) -> bool {
        match column_type {
            ColumnType::Native { name, .. } => matches!(
                canonical_name(name).as_str(),
                "VARCHAR" | "CHAR" | "TEXT" | "CITEXT" | "NAME"
            ),
            other => other.is_textual(),
        }
    }

    fn decode_sequence(&self, server_default: &str) -> Option<SequenceRef> {
        parse_sequence_default(server_default).ok()
    }
}
