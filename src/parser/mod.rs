//! Parsing of `%…%` templates and placeholder argument suffixes

mod arguments;
pub mod lexer;
mod scan;

pub use arguments::tokenize_arguments;
pub use scan::{find_placeholders, has_placeholders, replace_spans, scan, Segment};
