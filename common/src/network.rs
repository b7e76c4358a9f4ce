pub mod range;
pub mod subnet;
pub mod target;
