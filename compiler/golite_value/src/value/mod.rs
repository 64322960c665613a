//! Runtime values for the golite interpreter.
//!
//! `Value` is a closed tagged union. Heap-backed variants hold `Heap<T>`
//! handles whose constructor is private to this crate, so values are built
//! through the factory methods on `Value`.
//!
//! # Thread Safety
//!
//! Shared storage (slices, maps, struct references, channels) sits behind
//! `parking_lot` locks, so `Value` is `Send + Sync` and can be read by
//! concurrent evaluations.

mod composite;
mod display;
mod heap;
mod map_key;
mod runes;

use crate::errors::{allocation_limit, EvalError};
use crate::function::HostFunction;
use crate::types::{ComplexKind, FloatKind, IntKind, StructType, Type, UintKind};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

pub use composite::{ChanValue, Complex, MapValue, SliceValue, StructRef, StructValue};
pub use display::format_float;
pub use heap::Heap;
pub use map_key::MapKey;
pub use runes::rune_indices;

/// Most elements a single slice, array or channel buffer may hold.
pub const MAX_ELEMENTS: usize = 1 << 24;

/// Reject a request for `len` elements past [`MAX_ELEMENTS`].
pub fn check_elements(len: u64) -> Result<usize, EvalError> {
    match usize::try_from(len) {
        Ok(n) if n <= MAX_ELEMENTS => Ok(n),
        _ => Err(allocation_limit(len, MAX_ELEMENTS)),
    }
}

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// Untyped `nil`; also the zero value of pointers, functions,
    /// interfaces and channels.
    Nil,
    Bool(bool),
    Int(i64, IntKind),
    Uint(u64, UintKind),
    Float(f64, FloatKind),
    Complex(Complex, ComplexKind),
    /// Byte string; need not be valid UTF-8.
    Str(Heap<Vec<u8>>),
    Slice(SliceValue),
    Map(MapValue),
    Struct(StructValue),
    /// Reference to a struct, produced by `&T{...}` or `&x`.
    Ref(StructRef),
    Func(HostFunction),
    Chan(ChanValue),
    /// A type used as a value: conversion callee, `make` argument.
    Type(Type),
    /// Several results from `return a, b` or a multi-result call.
    Tuple(Heap<Vec<Value>>),
}

// Factory Methods

impl Value {
    /// `int` value.
    #[inline]
    pub fn int(v: i64) -> Self {
        Value::Int(v, IntKind::Int)
    }

    /// `float64` value.
    #[inline]
    pub fn float(v: f64) -> Self {
        Value::Float(v, FloatKind::F64)
    }

    /// `rune` (`int32`) value.
    #[inline]
    pub fn rune(c: char) -> Self {
        Value::Int(i64::from(u32::from(c)), IntKind::Int32)
    }

    /// `byte` (`uint8`) value.
    #[inline]
    pub fn byte(b: u8) -> Self {
        Value::Uint(u64::from(b), UintKind::Uint8)
    }

    /// `complex128` value.
    #[inline]
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex::new(re, im), ComplexKind::C128)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into().into_bytes()))
    }

    /// String value from raw bytes, kept as they are.
    #[inline]
    pub fn byte_string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Str(Heap::new(bytes.into()))
    }

    /// Slice of `elem` holding `items`.
    pub fn slice(elem: Type, items: Vec<Value>) -> Self {
        Value::Slice(SliceValue::new(elem, items))
    }

    /// Slice of `len` zero values of `elem`.
    pub fn zero_slice(elem: Type, len: usize) -> Result<Self, EvalError> {
        let len = check_elements(len as u64)?;
        let mut items = Vec::new();
        items
            .try_reserve_exact(len)
            .map_err(|_| allocation_limit(len as u64, MAX_ELEMENTS))?;
        items.extend((0..len).map(|_| Value::zero(&elem)));
        Ok(Value::slice(elem, items))
    }

    /// Map from `key` to `elem` holding `entries`.
    pub fn map(key: Type, elem: Type, entries: FxHashMap<MapKey, Value>) -> Self {
        Value::Map(MapValue::new(key, elem, entries))
    }

    /// Struct value; `fields` follow the type's field order.
    pub fn struct_value(ty: Arc<StructType>, fields: Vec<Value>) -> Self {
        Value::Struct(StructValue::new(ty, fields))
    }

    /// Reference to a fresh struct.
    pub fn struct_ref(ty: Arc<StructType>, fields: Vec<Value>) -> Self {
        Value::Ref(StructRef::new(ty, fields))
    }

    /// Reference to a copy of an existing struct value.
    pub fn reference_to(value: &StructValue) -> Self {
        Value::Ref(StructRef::new(
            Arc::clone(value.struct_type()),
            value.fields().to_vec(),
        ))
    }

    pub fn chan(elem: Type, cap: usize) -> Self {
        Value::Chan(ChanValue::new(elem, cap))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    #[inline]
    pub fn func(f: HostFunction) -> Self {
        Value::Func(f)
    }

    #[inline]
    pub fn typ(ty: Type) -> Self {
        Value::Type(ty)
    }

    /// Zero value of `ty`.
    pub fn zero(ty: &Type) -> Self {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Int(k) => Value::Int(0, *k),
            Type::Uint(k) => Value::Uint(0, *k),
            Type::Float(k) => Value::Float(0.0, *k),
            Type::Complex(k) => Value::Complex(Complex::default(), *k),
            Type::String => Value::string(""),
            Type::Slice(elem) => Value::slice((**elem).clone(), Vec::new()),
            Type::Map(key, elem) => {
                Value::map((**key).clone(), (**elem).clone(), FxHashMap::default())
            }
            Type::Struct(st) => {
                let fields = st.fields().iter().map(|f| Value::zero(&f.ty)).collect();
                Value::struct_value(Arc::clone(st), fields)
            }
            Type::Any
            | Type::Nil
            | Type::Error
            | Type::Chan(_)
            | Type::Pointer(_)
            | Type::Func
            | Type::Type
            | Type::Tuple => Value::Nil,
        }
    }
}

// Value Methods

impl Value {
    /// Runtime type of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Bool(_) => Type::Bool,
            Value::Int(_, k) => Type::Int(*k),
            Value::Uint(_, k) => Type::Uint(*k),
            Value::Float(_, k) => Type::Float(*k),
            Value::Complex(_, k) => Type::Complex(*k),
            Value::Str(_) => Type::String,
            Value::Slice(s) => s.slice_type(),
            Value::Map(m) => m.map_type(),
            Value::Struct(s) => Type::Struct(Arc::clone(s.struct_type())),
            Value::Ref(r) => Type::pointer(Type::Struct(Arc::clone(r.struct_type()))),
            Value::Func(_) => Type::Func,
            Value::Chan(c) => Type::chan(c.elem().clone()),
            Value::Type(_) => Type::Type,
            Value::Tuple(_) => Type::Tuple,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Ref(_) => "ptr",
            other => other.type_of().kind_name(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer kind as `i64`; `None` for non-integers and for unsigned
    /// values beyond `i64::MAX`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v, _) => Some(*v),
            Value::Uint(v, _) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(..) | Value::Uint(..))
    }

    /// The string's text; `None` for non-strings and for strings that are
    /// not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => std::str::from_utf8(s).ok(),
            _ => None,
        }
    }

    /// The string's bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&SliceValue> {
        match self {
            Value::Slice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Items of a tuple result.
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Deep structural equality, used by tests and host code.
    ///
    /// Unlike the `==` operator this also compares slices and maps by
    /// content.
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a, ka), Value::Int(b, kb)) => a == b && ka == kb,
            (Value::Uint(a, ka), Value::Uint(b, kb)) => a == b && ka == kb,
            (Value::Float(a, ka), Value::Float(b, kb)) => a == b && ka == kb,
            (Value::Complex(a, ka), Value::Complex(b, kb)) => a == b && ka == kb,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) => {
                a.ptr_eq(b)
                    || (a.elem() == b.elem()
                        && a.with_items(|x| {
                            b.with_items(|y| {
                                x.len() == y.len() && x.iter().zip(y).all(|(p, q)| p.deep_eq(q))
                            })
                        }))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.ptr_eq(b)
                    || (a.map_type() == b.map_type()
                        && a.len() == b.len()
                        && a.entries()
                            .iter()
                            .all(|(k, v)| b.get(k).is_some_and(|w| v.deep_eq(&w))))
            }
            (Value::Struct(a), Value::Struct(b)) => {
                a.struct_type() == b.struct_type()
                    && a
                        .fields()
                        .iter()
                        .zip(b.fields())
                        .all(|(p, q)| p.deep_eq(q))
            }
            (Value::Ref(a), Value::Ref(b)) => {
                a.ptr_eq(b) || Value::Struct(a.load()).deep_eq(&Value::Struct(b.load()))
            }
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            (Value::Chan(a), Value::Chan(b)) => a.ptr_eq(b),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(p, q)| p.deep_eq(q))
            }
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Value::Nil => f.write_str("nil"),
            Value::Type(t) => write!(f, "type {t}"),
            other => write!(f, "{}({other})", other.type_of()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}
