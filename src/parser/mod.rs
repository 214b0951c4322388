//! Source text preprocessing ahead of pattern matching.

pub mod lua;

pub use lua::{normalize, split_lines};
