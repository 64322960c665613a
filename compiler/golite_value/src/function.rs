//! Host call bridge.
//!
//! Host functions are erased once, at registration, into a uniform
//! `Fn(&[Value]) -> EvalResult`. The typed adapters (`unary`, `binary`,
//! `fallible_unary`...) convert arguments through [`HostType`] and record
//! the parameter count and result arity for call-time checks.

use crate::errors::{
    argument_type, arity_mismatch, host_error, unsupported_result_arity, EvalError, EvalResult,
};
use crate::types::{FloatKind, IntKind, Type, UintKind};
use crate::value::{MapKey, Value};
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type NativeFn = dyn Fn(&[Value]) -> EvalResult + Send + Sync;

/// Accepted argument count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// At least `min` arguments.
    Variadic { min: usize },
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n,
            Arity::Variadic { min } => count >= min,
        }
    }

    /// The arity after binding a leading receiver argument.
    #[must_use]
    fn without_receiver(self) -> Arity {
        match self {
            Arity::Fixed(n) => Arity::Fixed(n.saturating_sub(1)),
            Arity::Variadic { min } => Arity::Variadic {
                min: min.saturating_sub(1),
            },
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Variadic { min } => write!(f, "at least {min}"),
        }
    }
}

/// A callable registered by the host (or a builtin).
#[derive(Clone)]
pub struct HostFunction {
    name: Arc<str>,
    arity: Arity,
    results: usize,
    func: Arc<NativeFn>,
}

impl HostFunction {
    /// Register an already-erased function.
    ///
    /// `results` is the declared result count; more than two is rejected.
    pub fn new<F>(
        name: impl Into<Arc<str>>,
        arity: Arity,
        results: usize,
        func: F,
    ) -> Result<Self, EvalError>
    where
        F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    {
        let name = name.into();
        if results > 2 {
            return Err(unsupported_result_arity(&name, results));
        }
        Ok(HostFunction {
            name,
            arity,
            results,
            func: Arc::new(func),
        })
    }

    fn erased<F>(name: &str, arity: Arity, results: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    {
        HostFunction {
            name: Arc::from(name),
            arity,
            results,
            func: Arc::new(func),
        }
    }

    /// A single-result function over raw values, for builtins and hosts
    /// that do their own argument checking.
    pub fn raw<F>(name: &str, arity: Arity, func: F) -> Self
    where
        F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    {
        Self::erased(name, arity, 1, func)
    }

    pub fn nullary<R, F>(name: &str, f: F) -> Self
    where
        R: HostType,
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::erased(name, Arity::Fixed(0), R::RESULTS, move |_| {
            Ok(f().into_value())
        })
    }

    pub fn unary<A, R, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        R: HostType,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(1), R::RESULTS, move |args| {
            let a = arg(&fname, args, 0)?;
            Ok(f(a).into_value())
        })
    }

    pub fn binary<A, B, R, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        B: HostType,
        R: HostType,
        F: Fn(A, B) -> R + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(2), R::RESULTS, move |args| {
            let a = arg(&fname, args, 0)?;
            let b = arg(&fname, args, 1)?;
            Ok(f(a, b).into_value())
        })
    }

    pub fn ternary<A, B, C, R, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        B: HostType,
        C: HostType,
        R: HostType,
        F: Fn(A, B, C) -> R + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(3), R::RESULTS, move |args| {
            let a = arg(&fname, args, 0)?;
            let b = arg(&fname, args, 1)?;
            let c = arg(&fname, args, 2)?;
            Ok(f(a, b, c).into_value())
        })
    }

    /// Any number of arguments of one type.
    pub fn variadic<A, R, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        R: HostType,
        F: Fn(Vec<A>) -> R + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Variadic { min: 0 }, R::RESULTS, move |args| {
            let items = all_args(&fname, args)?;
            Ok(f(items).into_value())
        })
    }

    /// A `(value, error)` function: `Err` surfaces as a host error.
    pub fn fallible_nullary<R, E, F>(name: &str, f: F) -> Self
    where
        R: HostType,
        E: fmt::Display,
        F: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        Self::erased(name, Arity::Fixed(0), 2, move |_| lift(f()))
    }

    pub fn fallible_unary<A, R, E, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        R: HostType,
        E: fmt::Display,
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(1), 2, move |args| {
            let a = arg(&fname, args, 0)?;
            lift(f(a))
        })
    }

    pub fn fallible_binary<A, B, R, E, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        B: HostType,
        R: HostType,
        E: fmt::Display,
        F: Fn(A, B) -> Result<R, E> + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(2), 2, move |args| {
            let a = arg(&fname, args, 0)?;
            let b = arg(&fname, args, 1)?;
            lift(f(a, b))
        })
    }

    pub fn fallible_ternary<A, B, C, R, E, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        B: HostType,
        C: HostType,
        R: HostType,
        E: fmt::Display,
        F: Fn(A, B, C) -> Result<R, E> + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Fixed(3), 2, move |args| {
            let a = arg(&fname, args, 0)?;
            let b = arg(&fname, args, 1)?;
            let c = arg(&fname, args, 2)?;
            lift(f(a, b, c))
        })
    }

    pub fn fallible_variadic<A, R, E, F>(name: &str, f: F) -> Self
    where
        A: HostType,
        R: HostType,
        E: fmt::Display,
        F: Fn(Vec<A>) -> Result<R, E> + Send + Sync + 'static,
    {
        let fname = name.to_string();
        Self::erased(name, Arity::Variadic { min: 0 }, 2, move |args| {
            let items = all_args(&fname, args)?;
            lift(f(items))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Declared result count: 0, 1, or 2 for `(value, error)`.
    pub fn results(&self) -> usize {
        self.results
    }

    /// Invoke with positional arguments after checking the count.
    #[tracing::instrument(level = "trace", skip_all, fields(name = %self.name, args = args.len()))]
    pub fn call(&self, args: &[Value]) -> EvalResult {
        if !self.arity.accepts(args.len()) {
            return Err(arity_mismatch(&self.name, self.arity, args.len()));
        }
        let value = (self.func)(args)?;
        Ok(if self.results == 0 { Value::Nil } else { value })
    }

    /// A method bound to `receiver`, which is passed as the first argument.
    #[must_use]
    pub fn bind(&self, receiver: Value) -> HostFunction {
        let inner = self.clone();
        HostFunction {
            name: Arc::clone(&self.name),
            arity: self.arity.without_receiver(),
            results: self.results,
            func: Arc::new(move |args: &[Value]| {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(receiver.clone());
                full.extend_from_slice(args);
                (inner.func)(&full)
            }),
        }
    }

    pub fn ptr_eq(&self, other: &HostFunction) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

fn arg<A: HostType>(name: &str, args: &[Value], index: usize) -> Result<A, EvalError> {
    let Some(value) = args.get(index) else {
        return Err(arity_mismatch(name, index + 1, args.len()));
    };
    A::from_value(value)
        .ok_or_else(|| argument_type(name, index + 1, A::host_type(), value.type_of()))
}

fn all_args<A: HostType>(name: &str, args: &[Value]) -> Result<Vec<A>, EvalError> {
    (0..args.len()).map(|i| arg(name, args, i)).collect()
}

fn lift<R: HostType, E: fmt::Display>(result: Result<R, E>) -> EvalResult {
    result.map(HostType::into_value).map_err(host_error)
}

/// A Rust type that crosses the host boundary.
///
/// Conversions are exact: an `i64` parameter accepts only `int` values.
pub trait HostType: Sized {
    /// Result count this type contributes as a return value.
    const RESULTS: usize = 1;

    /// The golite type this Rust type corresponds to.
    fn host_type() -> Type;

    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

impl HostType for () {
    const RESULTS: usize = 0;

    fn host_type() -> Type {
        Type::Nil
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.is_nil().then_some(())
    }

    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl HostType for Value {
    fn host_type() -> Type {
        Type::Any
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn into_value(self) -> Value {
        self
    }
}

impl HostType for bool {
    fn host_type() -> Type {
        Type::Bool
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl HostType for String {
    fn host_type() -> Type {
        Type::String
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_bytes()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn into_value(self) -> Value {
        Value::string(self)
    }
}

macro_rules! signed_host_type {
    ($($ty:ty => $kind:expr),* $(,)?) => {$(
        impl HostType for $ty {
            fn host_type() -> Type {
                Type::Int($kind)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(v, k) if *k == $kind => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::Int(i64::from(self), $kind)
            }
        }
    )*};
}

signed_host_type! {
    i64 => IntKind::Int,
    i32 => IntKind::Int32,
    i16 => IntKind::Int16,
    i8 => IntKind::Int8,
}

macro_rules! unsigned_host_type {
    ($($ty:ty => $kind:expr),* $(,)?) => {$(
        impl HostType for $ty {
            fn host_type() -> Type {
                Type::Uint($kind)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Uint(v, k) if *k == $kind => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::Uint(self as u64, $kind)
            }
        }
    )*};
}

unsigned_host_type! {
    usize => UintKind::Uint,
    u64 => UintKind::Uint64,
    u32 => UintKind::Uint32,
    u16 => UintKind::Uint16,
    u8 => UintKind::Uint8,
}

impl HostType for f64 {
    fn host_type() -> Type {
        Type::FLOAT64
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v, FloatKind::F64) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::float(self)
    }
}

impl HostType for f32 {
    fn host_type() -> Type {
        Type::Float(FloatKind::F32)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v, FloatKind::F32) => Some(*v as f32),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float(f64::from(self), FloatKind::F32)
    }
}

impl<T: HostType> HostType for Vec<T> {
    fn host_type() -> Type {
        Type::slice(T::host_type())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let slice = value.as_slice()?;
        let elem = T::host_type();
        if elem != Type::Any && *slice.elem() != elem {
            return None;
        }
        slice.with_items(|items| items.iter().map(T::from_value).collect())
    }

    fn into_value(self) -> Value {
        Value::slice(
            T::host_type(),
            self.into_iter().map(HostType::into_value).collect(),
        )
    }
}

impl<T: HostType> HostType for HashMap<String, T> {
    fn host_type() -> Type {
        Type::map(Type::String, T::host_type())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_map()?;
        let elem = T::host_type();
        if *map.key_type() != Type::String || (elem != Type::Any && *map.elem() != elem) {
            return None;
        }
        map.entries()
            .into_iter()
            .map(|(k, v)| Some((k.as_str()?.to_string(), T::from_value(&v)?)))
            .collect()
    }

    fn into_value(self) -> Value {
        let entries: FxHashMap<MapKey, Value> = self
            .into_iter()
            .map(|(k, v)| (MapKey::from_string(k), v.into_value()))
            .collect();
        Value::map(Type::String, T::host_type(), entries)
    }
}

#[cfg(test)]
mod tests;
