mod classify;
mod errors;
mod generator;
mod model;
mod naming;
mod normalize;
mod options;
mod schema;
mod sql;
mod tests;

pub use errors::{Error, ErrorKind, Result};
pub use generator::Generator;
pub use model::*;
pub use options::{DialectName, Inflection, Options};
pub use schema::{
    Column, ColumnType, Constraint, ConstraintKind, EnumType, ForeignKey, ForeignKeyOptions, Index,
    Schema, Sequence, Table,
};
pub use schema::primitive_schema::PrimitiveSchema;
pub use sql::{Dialect, Postgres, Sqlite};
