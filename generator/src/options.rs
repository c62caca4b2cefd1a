use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, ErrorKind, Result},
    naming::{EnglishInflector, FeebleInflector, Inflector, NoInflection},
    sql::{Dialect, Postgres, Sqlite},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectName {
    #[default]
    Postgresql,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inflection {
    /// Suffix stripping only
    #[default]
    Feeble,
    /// Rule based, aware of irregular and uncountable words
    English,
    Disabled,
}

/// Generation settings.
///
/// Every field has a default, so a configuration file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub dialect: DialectName,
    pub inflection: Inflection,
    /// Keep class names plural instead of singularizing the table name
    pub keep_plural_class_names: bool,
    /// Singularize or pluralize relationship names according to their cardinality
    pub inflect_relationship_names: bool,
    pub detect_joined_inheritance: bool,
    pub bidirectional_relationships: bool,
    pub suppress_indexes: bool,
    pub suppress_constraints: bool,
    pub suppress_comments: bool,
    /// Only produce table models
    pub tables_only: bool,
    /// Stripped from table names before deriving class names
    pub table_name_prefix: String,
    pub ignored_table_names: BTreeSet<String>,
    /// Column suffixes that mark a foreign key column, e.g. `author_id`
    pub foreign_key_suffixes: Vec<String>,
    /// Symbols the rendered module imports, which no generated name may shadow
    pub reserved_names: BTreeSet<String>,
    /// Templates for default constraint and index names, keyed by `ix`, `uq`, `ck`, `fk`, `pk`
    pub naming_convention: BTreeMap<String, String>,
}

const DEFAULT_RESERVED_NAMES: &[&str] = &[
    "Base",
    "CheckConstraint",
    "Column",
    "Computed",
    "ForeignKey",
    "ForeignKeyConstraint",
    "Identity",
    "Index",
    "MetaData",
    "PrimaryKeyConstraint",
    "Sequence",
    "Table",
    "UniqueConstraint",
    "declarative_base",
    "relationship",
    "text",
];

impl Default for Options {
    fn default() -> Self {
        Options {
            dialect: DialectName::default(),
            inflection: Inflection::default(),
            keep_plural_class_names: false,
            inflect_relationship_names: false,
            detect_joined_inheritance: true,
            bidirectional_relationships: true,
            suppress_indexes: false,
            suppress_constraints: false,
            suppress_comments: false,
            tables_only: false,
            table_name_prefix: String::new(),
            ignored_table_names: ["alembic_version", "migrate_version"]
                .into_iter()
                .map(String::from)
                .collect(),
            foreign_key_suffixes: vec!["_id".to_string()],
            reserved_names: DEFAULT_RESERVED_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            naming_convention: BTreeMap::from([(
                "ix".to_string(),
                "ix_%(column_0_label)s".to_string(),
            )]),
        }
    }
}

impl Options {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::new(ErrorKind::InvalidOptions(e.to_string())))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::new(ErrorKind::InvalidOptions(e.to_string())))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::new(ErrorKind::InvalidOptions(e.to_string())))
    }

    pub fn get_dialect(&self) -> Box<dyn Dialect> {
        match self.dialect {
            DialectName::Postgresql => Box::new(Postgres()),
            DialectName::Sqlite => Box::new(Sqlite()),
        }
    }

    pub fn get_inflector(&self) -> Box<dyn Inflector> {
        match self.inflection {
            Inflection::Feeble => Box::new(FeebleInflector),
            Inflection::English => Box::new(EnglishInflector),
            Inflection::Disabled => Box::new(NoInflection),
        }
    }

    pub fn is_ignored(&self, table_name: &str) -> bool {
        self.ignored_table_names.contains(table_name)
    }
}
