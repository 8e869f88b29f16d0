pub mod normalize;
pub mod scanner;

pub use scanner::{Scanner, DEFAULT_BARS_BACK};
