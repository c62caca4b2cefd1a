use serde::Deserialize;

use super::types::ColumnType;

/// The schema graph as handed over by a reflection tool, before validation.
#[derive(Debug, Deserialize)]
pub struct PrimitiveSchema {
    pub tables: Vec<PrimitiveTable>,
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveTable {
    pub name: String,
    pub schema: Option<String>,
    pub comment: Option<String>,
    pub columns: Vec<PrimitiveColumn>,
    #[serde(default)]
    pub constraints: Vec<PrimitiveConstraint>,
    #[serde(default)]
    pub indexes: Vec<PrimitiveIndex>,
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    pub autoincrement: Option<bool>,
    pub server_default: Option<String>,
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// A constraint of any kind. `kind` is validated while building the `Schema`.
#[derive(Debug, Deserialize)]
pub struct PrimitiveConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    pub referred_schema: Option<String>,
    pub referred_table: Option<String>,
    #[serde(default)]
    pub referred_columns: Vec<String>,
    pub sqltext: Option<String>,
    pub ondelete: Option<String>,
    pub onupdate: Option<String>,
    pub deferrable: Option<bool>,
    pub initially: Option<String>,
    #[serde(rename = "match")]
    pub match_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveIndex {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}
