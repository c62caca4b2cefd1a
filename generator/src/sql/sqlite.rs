use crate::schema::ColumnType;

use super::dialect::{parse_arg, with_args, with_optional_args, Dialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sqlite();

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
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
            ColumnType::Time { .. } => "TIME".to_string(),
            ColumnType::DateTime { .. } => "DATETIME".to_string(),
            ColumnType::LargeBinary => "BLOB".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Uuid => "CHAR(32)".to_string(),
            ColumnType::Enum(enum_type) => {
                let longest = enum_type.values.iter().map(|v| v.chars().count()).max();
                with_optional_args("VARCHAR", &[longest.map(|l| l as u32)])
            }
            ColumnType::Native { name, args } => with_args(&name.trim().to_uppercase(), args),
            ColumnType::Interval | ColumnType::Array { .. } | ColumnType::Null => return None,
        };
        Some(compiled)
    }

    fn adaptation_candidates(&self, name: &str, args: &[String]) -> Vec<ColumnType> {
        let generic = match name.trim().to_uppercase().as_str() {
            "INTEGER" | "INT" => ColumnType::Integer,
            "SMALLINT" => ColumnType::SmallInteger,
            "BIGINT" => ColumnType::BigInteger,
            "REAL" | "FLOAT" | "DOUBLE" => ColumnType::Float {
                precision: parse_arg(args, 0),
            },
            "NUMERIC" | "DECIMAL" => ColumnType::Numeric {
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
            "DATETIME" | "TIMESTAMP" => ColumnType::DateTime { timezone: false },
            "BLOB" => ColumnType::LargeBinary,
            "JSON" => ColumnType::Json,
            _ => return vec![],
        };
        vec![generic]
    }

    fn is_textual(&self, column_type: &ColumnType) -> bool {
        match column_type {
            ColumnType::Native { name, .. } => matches!(
                name.trim().to_uppercase().as_str(),
                "VARCHAR" | "CHAR" | "TEXT" | "NVARCHAR" | "CLOB"
            ),
            other => other.is_textual(),
        }
    }
}
