//! Command line processing
//!
//! Turns a raw input line into the word list that is dispatched to a
//! builtin or an external program: [`tokenizer`] splits and unquotes,
//! [`alias`] expands the leading word.

pub mod alias;
pub mod tokenizer;

pub use alias::resolve;
pub use tokenizer::{join, quote, tokenize, ParseError};
