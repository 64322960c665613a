//! Tree-walking interpreter for golite.
//!
//! # Architecture
//!
//! The source is the body of an implicit zero-argument function. `run`
//! executes its statement list against a [`ScopeStack`] whose bottom frame
//! is the host's [`Environment`]; a top-level `:=` therefore binds in the
//! host environment, where the embedding program can read it afterwards.
//!
//! - `expr` - identifiers, operators, selectors, indexing, calls, types
//! - `composite` - composite literals, including elided inner types
//! - `assign` - assignment targets, destructuring, `++`/`--`
//! - `stmt` - blocks, `if`, `for`, `range`, declarations, `return`
//!
//! # Control Flow
//!
//! `return`, `break` and `continue` travel up the Rust stack as
//! [`ControlAction`] values in the error position of [`Flow`], next to real
//! evaluation errors. Loops consume `Break`/`Continue`; `run` turns a
//! `Return` into the result.
//!
//! # Arena Borrowing
//!
//! The interpreter borrows the `ParsedBody` for `'a`, so node references
//! obtained through `expr`/`stmt` outlive any `&mut self` borrow and can be
//! held across recursive calls.

mod assign;
mod composite;
mod expr;
mod scope_guard;
mod stmt;

use crate::config::{EvalConfig, ModeState};
use crate::scope_stack::ScopeStack;
use crate::{Environment, Error};
use golite_ir::{Expr, ExprId, Name, ParsedBody, Span, Stmt, StmtId};
use golite_value::{type_error, unsupported_syntax, EvalError, EvalResult, Value};

/// Non-local exits, carried in the error position of [`Flow`].
#[derive(Debug)]
pub(crate) enum ControlAction {
    Error(EvalError),
    Return(Value),
    Break,
    Continue,
}

impl ControlAction {
    /// Attach a span to an error that has none; control signals pass
    /// through.
    #[inline]
    #[must_use]
    pub(crate) fn with_span_if_error(self, span: Span) -> Self {
        match self {
            ControlAction::Error(err) => ControlAction::Error(err.with_span(span)),
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(err)
    }
}

/// Result of evaluating a node.
pub(crate) type Flow<T = Value> = Result<T, ControlAction>;

/// Evaluation state for one parsed body.
pub(crate) struct Interpreter<'a> {
    body: &'a ParsedBody,
    scopes: ScopeStack,
    mode: ModeState,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(body: &'a ParsedBody, root: Environment, config: &EvalConfig) -> Self {
        Interpreter {
            body,
            scopes: ScopeStack::new(root),
            mode: ModeState::new(config),
        }
    }

    /// Execute the whole body.
    ///
    /// The result is the value of `return`, or else the value of the last
    /// executed statement.
    pub(crate) fn run(&mut self) -> EvalResult {
        match self.exec_list(self.body.body) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => Err(err),
            Err(ControlAction::Break) => Err(unsupported_syntax("break outside a loop")),
            Err(ControlAction::Continue) => Err(unsupported_syntax("continue outside a loop")),
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.mode.steps()
    }

    #[inline]
    fn text(&self, name: Name) -> &'a str {
        self.body.name(name)
    }

    #[inline]
    fn expr(&self, id: ExprId) -> &'a Expr {
        self.body.arena.expr(id)
    }

    #[inline]
    fn stmt(&self, id: StmtId) -> &'a Stmt {
        self.body.arena.stmt(id)
    }
}

// Entry points

impl Environment {
    /// Parse and evaluate `source` in this scope with default settings.
    ///
    /// ```text
    /// let env = Environment::new();
    /// env.set("x", Value::int(5));
    /// env.eval("x * 2")  // Ok(10)
    /// ```
    pub fn eval(&self, source: &str) -> Result<Value, Error> {
        self.eval_with(source, &EvalConfig::default())
    }

    /// Parse and evaluate `source` in this scope.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn eval_with(&self, source: &str, config: &EvalConfig) -> Result<Value, Error> {
        let body = golite_parse::parse_body(source)?;
        let mut interpreter = Interpreter::new(&body, self.clone(), config);
        let result = interpreter.run();
        tracing::debug!(steps = interpreter.steps(), ok = result.is_ok(), "evaluated");
        Ok(result?)
    }

    /// JSON text of the binding `name`, or `null` when it is unbound or
    /// cannot be encoded.
    pub fn to_json(&self, name: &str) -> String {
        self.get(name)
            .and_then(|value| golite_value::to_json(&value))
            .unwrap_or_else(|| "null".to_string())
    }

    /// Evaluate a JSON-shaped template whose values are expressions, such
    /// as `{"sum": Add(1, 2), "next": x + 1}`, and return the JSON text.
    ///
    /// The template is read as a `map[string]interface{}` literal; error
    /// spans point into `template`.
    pub fn assemble(&self, template: &str) -> Result<String, Error> {
        const PREFIX: &str = "return map[string]interface{}";
        let source = format!("{PREFIX}{template}");
        let value = self
            .eval(&source)
            .map_err(|err| err.shifted(PREFIX.len()))?;
        golite_value::to_json(&value).ok_or_else(|| {
            Error::Eval(type_error(format!(
                "cannot encode {} as JSON",
                value.type_of()
            )))
        })
    }
}

#[cfg(test)]
mod tests;
