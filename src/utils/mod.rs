pub mod distance;
pub mod lanes;
pub mod loader;
pub mod parse;
