//! Top-level error for an evaluation call.

use golite_ir::Span;
use golite_parse::ParseError;
use golite_value::{EvalError, EvalErrorKind};
use thiserror::Error;

/// Failure of [`Environment::eval`](crate::Environment::eval): the source
/// did not parse, or evaluating it failed.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Parse(err) => Some(err.span),
            Error::Eval(err) => err.span,
        }
    }

    /// The evaluation error kind, if evaluation was reached.
    pub fn eval_kind(&self) -> Option<&EvalErrorKind> {
        match self {
            Error::Parse(_) => None,
            Error::Eval(err) => Some(&err.kind),
        }
    }

    /// The message prefixed with `line:col` in `source` when a span is
    /// known.
    ///
    /// ```text
    /// env.eval("a := 1\nb := a + c").unwrap_err().render(src)
    /// // "2:10: undefined: c"
    /// ```
    pub fn render(&self, source: &str) -> String {
        match self.span() {
            Some(span) => {
                let (line, col) = span.line_col(source);
                format!("{line}:{col}: {self}")
            }
            None => self.to_string(),
        }
    }

    /// Move spans `by` bytes towards the start, for errors in source that
    /// was wrapped in a prefix before parsing.
    #[must_use]
    pub(crate) fn shifted(self, by: usize) -> Self {
        let by = u32::try_from(by).unwrap_or(u32::MAX);
        let shift = |span: Span| Span::new(span.start.saturating_sub(by), span.end.saturating_sub(by));
        match self {
            Error::Parse(mut err) => {
                err.span = shift(err.span);
                Error::Parse(err)
            }
            Error::Eval(mut err) => {
                err.span = err.span.map(shift);
                Error::Eval(err)
            }
        }
    }
}
