mod identifiers;
mod inflect;
mod keywords;
mod registry;

pub use identifiers::*;
pub use inflect::*;
pub use keywords::is_keyword;
pub use registry::*;
