mod builder;
mod declaration;
mod model;
mod relationships;

pub use builder::ModelBuilder;
pub use model::*;
