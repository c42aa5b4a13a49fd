//! Command line splitting and quoting.

mod encoder;
mod tokenizer;

pub use encoder::{command_line, quote};
pub use tokenizer::{ParseError, ParsedCommand, split, tokenize};
