#![allow(
    clippy::result_large_err,
    reason = "EvalError carries its span inline and is returned on every path"
)]
//! Golite Eval - tree-walking evaluator for golite.
//!
//! This crate provides:
//! - Host-visible scopes (`Environment`)
//! - The entry points `Environment::eval`, `eval_with`, `to_json`, `assemble`
//! - Binary and unary operator semantics (`evaluate_binary`, `evaluate_unary`)
//! - The builtin registry (`append`, `make`, `len`, `nil`, `true`, `false`)
//! - Evaluation settings (`EvalConfig`)
//!
//! Values, types and the host call bridge live in `golite_value` and are
//! re-exported here.

mod builtins;
mod config;
mod environment;
mod error;
mod interpreter;
mod literals;
mod operators;
mod scope_stack;
mod unary_operators;

pub use config::EvalConfig;
pub use environment::Environment;
pub use error::Error;
pub use operators::{evaluate_binary, evaluate_constant_shift, values_equal};
pub use unary_operators::evaluate_unary;

pub use golite_parse::ParseError;
pub use golite_value::{
    Arity, EvalError, EvalErrorKind, EvalResult, HostFunction, HostType, StructField, StructType,
    Type, Value,
};
