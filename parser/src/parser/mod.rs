mod check;
mod sequence;
mod utils;

pub use check::in_list;
pub use sequence::sequence_default;
