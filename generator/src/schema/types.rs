use serde::{Deserialize, Serialize};

/// The semantic type of a column.
///
/// Every variant except `Native` is dialect independent. `Native` carries a vendor type as
/// reflected, which normalization tries to replace with one of the generic variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Integer,
    SmallInteger,
    BigInteger,
    Float {
        precision: Option<u32>,
    },
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    String {
        length: Option<u32>,
    },
    Text {
        length: Option<u32>,
    },
    Date,
    Time {
        #[serde(default)]
        timezone: bool,
    },
    DateTime {
        #[serde(default)]
        timezone: bool,
    },
    Interval,
    LargeBinary,
    Json,
    Uuid,
    Enum(EnumType),
    Array {
        item: Box<ColumnType>,
        dimensions: Option<u32>,
    },
    Native {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
    #[default]
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Option<String>,
    pub values: Vec<String>,
}

impl ColumnType {
    pub fn native(name: &str, args: &[&str]) -> Self {
        ColumnType::Native {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Generic string-like types. Enums count because they are stored as strings.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            ColumnType::String { .. } | ColumnType::Text { .. } | ColumnType::Enum(_)
        )
    }

    pub fn is_native(&self) -> bool {
        matches!(self, ColumnType::Native { .. })
    }

    /// Floats and arrays of floats may render differently from the type they replace.
    pub fn is_float_like(&self) -> bool {
        match self {
            ColumnType::Float { .. } => true,
            ColumnType::Array { item, .. } => matches!(**item, ColumnType::Float { .. }),
            _ => false,
        }
    }

    /// The symbols a rendered declaration of this type would import.
    pub fn symbol_names(&self) -> Vec<String> {
        let name = match self {
            ColumnType::Boolean => "Boolean",
            ColumnType::Integer => "Integer",
            ColumnType::SmallInteger => "SmallInteger",
            ColumnType::BigInteger => "BigInteger",
            ColumnType::Float { .. } => "Float",
            ColumnType::Numeric { .. } => "Numeric",
            ColumnType::String { .. } => "String",
            ColumnType::Text { .. } => "Text",
            ColumnType::Date => "Date",
            ColumnType::Time { .. } => "Time",
            ColumnType::DateTime { .. } => "DateTime",
            ColumnType::Interval => "Interval",
            ColumnType::LargeBinary => "LargeBinary",
            ColumnType::Json => "JSON",
            ColumnType::Uuid => "Uuid",
            ColumnType::Enum(_) => "Enum",
            ColumnType::Array { item, .. } => {
                let mut names = vec!["ARRAY".to_string()];
                names.extend(item.symbol_names());
                return names;
            }
            ColumnType::Native { name, .. } => {
                return vec![name.to_uppercase().replace(' ', "_")];
            }
            ColumnType::Null => "NullType",
        };
        vec![name.to_string()]
    }
}
