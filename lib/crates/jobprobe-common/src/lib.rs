pub mod api;
pub mod types;

pub use api::{headers, paths, pointers, validate_path_segment};
pub use types::*;
