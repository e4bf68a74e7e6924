//! Command language - tokenizing and parsing agent tool commands

mod parser;
mod tokenizer;

pub use parser::{Invocation, Parser};
pub use tokenizer::tokenize;
