mod constraints;
mod schema;
mod types;

pub mod primitive_schema;

pub use constraints::*;
pub use schema::*;
pub use types::*;
