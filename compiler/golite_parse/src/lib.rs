//! Parser for golite source text.
//!
//! The source is read as the body of an implicit zero-argument function:
//! a statement list where a top-level `return` is allowed. The output is a
//! [`ParsedBody`] holding a flat arena AST and the module's interner.

mod parser;

pub use parser::Parser;

use golite_ir::{ParsedBody, Span};
use golite_lexer::LexError;
use std::fmt;

/// A syntax error. Parsing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.message, err.span)
    }
}

/// Tokenize and parse `source`.
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse_body(source: &str) -> Result<ParsedBody, ParseError> {
    let tokens = golite_lexer::lex(source)?;
    tracing::trace!(tokens = tokens.len(), "lexed");
    Parser::new(source, tokens).parse_body()
}
