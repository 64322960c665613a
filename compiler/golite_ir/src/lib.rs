//! golite IR - syntax tree types shared by the front-end and the evaluator.
//!
//! This crate contains:
//! - Spans for source locations
//! - Names for interned identifiers and literal texts
//! - The flat AST (`Expr`, `Stmt`) stored in an `ExprArena`
//! - Operator enums
//!
//! # Design
//!
//! - **Flatten everything**: children are `ExprId`/`StmtId` indices, lists are
//!   ranges into side tables of the arena. No `Box<Expr>`.
//! - **Intern identifiers**: every identifier and literal text becomes a
//!   `Name(u32)` in the module's `StringInterner`.
//! - **Keep literals raw**: numeric and string literals keep their source text.
//!   Turning `0x_ff` into a value is the evaluator's job, so a malformed
//!   literal surfaces as an evaluation error.

mod arena;
mod ast;
mod ids;
mod interner;
mod name;
mod operators;
mod span;

pub use arena::ExprArena;
pub use ast::{
    AssignOp, Element, Expr, ExprKind, FieldDecl, LitKind, ParsedBody, RangeClause, Stmt,
    StmtKind, ValueSpec,
};
pub use ids::{ElementRange, ExprId, ExprRange, FieldRange, NameRange, StmtId, StmtRange};
pub use interner::StringInterner;
pub use name::Name;
pub use operators::{BinaryOp, UnaryOp};
pub use span::Span;
