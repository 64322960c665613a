//! Tokenizer for the golite statement language.
//!
//! Produces a flat [`TokenList`]; literal values are left as source text
//! and decoded later.

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, TokenList};

use golite_ir::Span;
use std::fmt;

/// A character sequence that starts no token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub(crate) fn unexpected(text: &str, span: Span) -> Self {
        let message = match text.chars().next() {
            Some('"') => "string literal not terminated".to_string(),
            Some('`') => "raw string literal not terminated".to_string(),
            Some('\'') => "rune literal not terminated".to_string(),
            Some('/') => "comment not terminated".to_string(),
            _ => format!("unexpected character `{text}`"),
        };
        LexError { message, span }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source`.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    Lexer::new(source).lex_all()
}
