mod dialect;
mod postgres;
mod sqlite;

pub use dialect::*;
pub use postgres::*;
pub use sqlite::*;
