//! Golite - an embeddable evaluator for a subset of Go.
//!
//! The host creates an [`Environment`], binds values, host functions and
//! struct types into it, then evaluates source text against it:
//!
//! ```text
//! let env = Environment::new();
//! env.register("Add", HostFunction::binary("Add", |a: i64, b: i64| a + b));
//! env.eval("x := Add(1, 2)")?;
//! env.to_json("x")                              // "3"
//! env.assemble(r#"{"next": x + 1}"#)?          // {"next":4}
//! ```
//!
//! Source is read as the body of a function: statements run in order, a
//! top-level `return` ends evaluation, and the value of the last statement
//! is the result otherwise. A top-level `:=` binds in the environment it
//! was evaluated in.
//!
//! # Crates
//!
//! - `golite_value` - values, types, errors and the host call bridge
//! - `golite_eval` - scopes, operators, builtins and the evaluator
//! - `golite_parse` / `golite_lexer` / `golite_ir` - the front-end

use std::sync::Once;

pub use golite_eval::{
    evaluate_binary, evaluate_unary, values_equal, Environment, Error, EvalConfig, ParseError,
};
pub use golite_value::{
    assign_exact, assign_to, builtin_type, convert, from_json, to_json, Arity, ComplexKind,
    EvalError, EvalErrorKind, EvalResult, FloatKind, HostFunction, HostType, IntKind, MapKey,
    StructField, StructType, Type, UintKind, Value,
};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for debug output.
///
/// Only takes effect when `RUST_LOG` is set, e.g.
/// `RUST_LOG=golite_eval=trace`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
            if installed.is_err() {
                tracing::debug!("a global subscriber is already installed");
            }
        }
    });
}
