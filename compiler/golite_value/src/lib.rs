#![allow(
    clippy::result_large_err,
    reason = "EvalError carries its span inline and is returned on every path"
)]
//! Golite Value - runtime model for the golite interpreter.
//!
//! This crate provides:
//! - Runtime values (`Value`, `Heap`, slice/map/struct payloads)
//! - Type descriptors and the builtin type-name registry (`Type`, `builtin_type`)
//! - Evaluation errors (`EvalError`, `EvalErrorKind`, `EvalResult`)
//! - The host call bridge (`HostFunction`, `HostType`)
//! - Conversions and assignability (`convert`, `assign_to`)
//! - JSON interchange (`to_json`, `from_json`)
//!
//! # Value Types
//!
//! All heap allocations go through `Value::` factory methods; the `Heap<T>`
//! constructor is private to this crate. Shared storage is reference
//! counted with `Arc` and guarded by `parking_lot` locks.

mod convert;
mod errors;
mod function;
mod json;
mod types;
mod value;

pub use convert::{assign_exact, assign_to, convert};
pub use errors::*;
pub use function::{Arity, HostFunction, HostType};
pub use json::{from_json, to_json};
pub use types::{
    builtin_type, ComplexKind, FloatKind, IntKind, StructField, StructType, Type, UintKind,
};
pub use value::{
    check_elements, format_float, rune_indices, ChanValue, Complex, Heap, MapKey, MapValue,
    SliceValue, StructRef, StructValue, Value, MAX_ELEMENTS,
};
