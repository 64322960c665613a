//! Error types for evaluation.
//!
//! `EvalErrorKind` is the typed category; factory functions below are the
//! public way to build errors and keep message wording in one place.

use crate::value::Value;
use golite_ir::Span;
use std::fmt;

/// Result of evaluating an expression or calling a host function.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names
    Undefined {
        name: String,
    },
    UndefinedVariable {
        name: String,
    },
    NoSuchMember {
        member: String,
        type_name: String,
    },

    // Calls
    NotCallable {
        type_name: String,
    },
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    ArgumentType {
        name: String,
        position: usize,
        expected: String,
        got: String,
    },
    UnsupportedResultArity {
        name: String,
        results: usize,
    },
    /// Error returned by a host function, message kept verbatim.
    Host {
        message: String,
    },

    // Types and operators
    Type {
        message: String,
    },
    OperatorType {
        op: &'static str,
        left: String,
        right: String,
    },
    Conversion {
        from: String,
        to: String,
    },
    AppendType {
        elem: String,
        slice: String,
    },
    NonBooleanCondition {
        type_name: String,
    },
    DivisionByZero,

    // Containers
    IndexOutOfRange {
        index: i64,
        len: usize,
    },
    UnsupportedMake {
        type_name: String,
    },
    UnsupportedRange {
        type_name: String,
    },

    // Statements
    AssignmentCount {
        left: usize,
        right: usize,
    },
    LiteralParse {
        literal: String,
        reason: String,
    },
    UnsupportedImport {
        path: String,
    },
    UnsupportedSyntax {
        construct: String,
    },

    // Limits
    StepBudgetExceeded {
        limit: u64,
    },
    AllocationLimit {
        requested: u64,
        limit: usize,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined { name } => write!(f, "undefined: {name}"),
            Self::UndefinedVariable { name } => write!(f, "variable {name} is not defined"),
            Self::NoSuchMember { member, type_name } => {
                write!(f, "{type_name} has no field or method {member}")
            }

            Self::NotCallable { type_name } => {
                write!(f, "cannot call non-function (type {type_name})")
            }
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "wrong number of arguments in call to {name}: want {expected}, have {got}"
            ),
            Self::ArgumentType {
                name,
                position,
                expected,
                got,
            } => write!(
                f,
                "cannot use {got} as {expected} value in argument {position} to {name}"
            ),
            Self::UnsupportedResultArity { name, results } => write!(
                f,
                "function {name} returns {results} results; at most 2 are supported"
            ),
            Self::Host { message } => f.write_str(message),

            Self::Type { message } => f.write_str(message),
            Self::OperatorType { op, left, right } => write!(
                f,
                "invalid operation: operator {op} not defined on {left} and {right}"
            ),
            Self::Conversion { from, to } => write!(f, "cannot convert {from} to type {to}"),
            Self::AppendType { elem, slice } => write!(f, "{elem} cannot append to {slice}"),
            Self::NonBooleanCondition { type_name } => {
                write!(f, "non-boolean condition ({type_name}) in if or for statement")
            }
            Self::DivisionByZero => f.write_str("integer divide by zero"),

            Self::IndexOutOfRange { index, len } => {
                write!(f, "index out of range [{index}] with length {len}")
            }
            Self::UnsupportedMake { type_name } => write!(f, "make unsupported type {type_name}"),
            Self::UnsupportedRange { type_name } => {
                write!(f, "ranging on {type_name} is unsupported")
            }

            Self::AssignmentCount { left, right } => {
                write!(f, "assignment count mismatch: {left} != {right}")
            }
            Self::LiteralParse { literal, reason } => {
                write!(f, "malformed literal {literal}: {reason}")
            }
            Self::UnsupportedImport { path } => write!(f, "import {path} is not supported"),
            Self::UnsupportedSyntax { construct } => write!(f, "{construct} is not supported"),

            Self::StepBudgetExceeded { limit } => {
                write!(f, "evaluation exceeded its budget of {limit} steps")
            }
            Self::AllocationLimit { requested, limit } => {
                write!(f, "cannot allocate {requested} elements (limit {limit})")
            }
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Source location, attached by the evaluator where known.
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach a span unless one is already present.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for EvalError {}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

// Names

#[cold]
pub fn undefined(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Undefined {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn no_such_member(member: &str, type_name: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::NoSuchMember {
        member: member.to_string(),
        type_name: type_name.to_string(),
    })
}

// Calls

#[cold]
pub fn not_callable(type_name: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: impl fmt::Display, got: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    })
}

#[cold]
pub fn argument_type(
    name: &str,
    position: usize,
    expected: impl fmt::Display,
    got: impl fmt::Display,
) -> EvalError {
    EvalError::new(EvalErrorKind::ArgumentType {
        name: name.to_string(),
        position,
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn unsupported_result_arity(name: &str, results: usize) -> EvalError {
    EvalError::new(EvalErrorKind::UnsupportedResultArity {
        name: name.to_string(),
        results,
    })
}

#[cold]
pub fn host_error(message: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::Host {
        message: message.to_string(),
    })
}

// Types and operators

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Type {
        message: message.into(),
    })
}

#[cold]
pub fn operator_type(
    op: &'static str,
    left: impl fmt::Display,
    right: impl fmt::Display,
) -> EvalError {
    EvalError::new(EvalErrorKind::OperatorType {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn conversion(from: impl fmt::Display, to: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::Conversion {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cold]
pub fn append_type(elem: impl fmt::Display, slice: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::AppendType {
        elem: elem.to_string(),
        slice: slice.to_string(),
    })
}

#[cold]
pub fn non_boolean_condition(type_name: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::NonBooleanCondition {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

// Containers

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfRange { index, len })
}

#[cold]
pub fn unsupported_make(type_name: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::UnsupportedMake {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn unsupported_range(type_name: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::UnsupportedRange {
        type_name: type_name.to_string(),
    })
}

// Statements

#[cold]
pub fn assignment_count(left: usize, right: usize) -> EvalError {
    EvalError::new(EvalErrorKind::AssignmentCount { left, right })
}

#[cold]
pub fn literal_parse(literal: &str, reason: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::LiteralParse {
        literal: literal.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn unsupported_import(path: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UnsupportedImport {
        path: path.to_string(),
    })
}

#[cold]
pub fn unsupported_syntax(construct: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::UnsupportedSyntax {
        construct: construct.into(),
    })
}

// Limits

#[cold]
pub fn step_budget_exceeded(limit: u64) -> EvalError {
    EvalError::new(EvalErrorKind::StepBudgetExceeded { limit })
}

#[cold]
pub fn allocation_limit(requested: u64, limit: usize) -> EvalError {
    EvalError::new(EvalErrorKind::AllocationLimit { requested, limit })
}

#[cfg(test)]
mod tests;
