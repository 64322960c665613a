//! Conversions `T(x)` and assignability.
//!
//! Literals evaluate to their default types (`int`, `float64`, `rune`,
//! `complex128`). Assigning such a value to another numeric type converts it
//! when the value is representable there, which stands in for untyped
//! constants.

use crate::errors::{conversion, type_error, EvalError};
use crate::types::{ComplexKind, FloatKind, IntKind, Type};
use crate::value::{rune_indices, Complex, StructValue, Value};
use std::sync::Arc;

/// Numeric payload widened for conversion.
#[derive(Copy, Clone, Debug)]
enum Num {
    Int(i128),
    Float(f64),
    Complex(Complex),
}

fn numeric(value: &Value) -> Option<Num> {
    match value {
        Value::Int(v, _) => Some(Num::Int(i128::from(*v))),
        Value::Uint(v, _) => Some(Num::Int(i128::from(*v))),
        Value::Float(v, _) => Some(Num::Float(*v)),
        Value::Complex(c, _) => Some(Num::Complex(*c)),
        _ => None,
    }
}

/// Whether `value` has one of the default types literals produce.
fn is_default_typed(value: &Value) -> bool {
    matches!(
        value,
        Value::Int(_, IntKind::Int | IntKind::Int32)
            | Value::Float(_, FloatKind::F64)
            | Value::Complex(_, ComplexKind::C128)
    )
}

/// Explicit conversion `to(value)`.
pub fn convert(value: &Value, to: &Type) -> Result<Value, EvalError> {
    if *to == Type::Any || value.type_of() == *to {
        return Ok(value.clone());
    }

    match (value, to) {
        (_, Type::Int(_) | Type::Uint(_) | Type::Float(_) | Type::Complex(_)) => {
            if let Some(num) = numeric(value) {
                if let Some(converted) = convert_numeric(num, to) {
                    return Ok(converted);
                }
            }
        }
        (Value::Int(..) | Value::Uint(..), Type::String) => {
            let code = value.as_i64().and_then(|c| u32::try_from(c).ok());
            let ch = code.and_then(char::from_u32).unwrap_or('\u{FFFD}');
            return Ok(Value::string(ch.to_string()));
        }
        (Value::Str(s), Type::Slice(elem)) if **elem == Type::BYTE => {
            let bytes = s.iter().copied().map(Value::byte).collect();
            return Ok(Value::slice(Type::BYTE, bytes));
        }
        (Value::Str(s), Type::Slice(elem)) if **elem == Type::RUNE => {
            let runes = rune_indices(s)
                .into_iter()
                .map(|(_, c)| Value::rune(c))
                .collect();
            return Ok(Value::slice(Type::RUNE, runes));
        }
        (Value::Slice(s), Type::String) if *s.elem() == Type::BYTE => {
            let bytes: Vec<u8> = s.with_items(|items| {
                items
                    .iter()
                    .filter_map(|b| match b {
                        Value::Uint(v, _) => u8::try_from(*v).ok(),
                        _ => None,
                    })
                    .collect()
            });
            return Ok(Value::byte_string(bytes));
        }
        (Value::Slice(s), Type::String) if *s.elem() == Type::RUNE => {
            let text: String = s.with_items(|items| {
                items
                    .iter()
                    .filter_map(Value::as_i64)
                    .map(|c| {
                        u32::try_from(c)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or('\u{FFFD}')
                    })
                    .collect()
            });
            return Ok(Value::string(text));
        }
        (Value::Struct(s), Type::Struct(target)) if s.struct_type().fields() == target.fields() => {
            return Ok(Value::Struct(StructValue::new(
                Arc::clone(target),
                s.fields().to_vec(),
            )));
        }
        (Value::Nil, _) if accepts_nil(to) => return Ok(Value::zero(to)),
        _ => {}
    }

    Err(conversion(value.type_of(), to))
}

/// Numeric conversion with truncation and wrapping, as `T(x)` does.
fn convert_numeric(num: Num, to: &Type) -> Option<Value> {
    let value = match (num, to) {
        (Num::Int(v), Type::Int(k)) => Value::Int(k.wrap(v as i64), *k),
        (Num::Int(v), Type::Uint(k)) => Value::Uint(k.wrap(v as u64), *k),
        (Num::Int(v), Type::Float(k)) => Value::Float(k.round(v as f64), *k),
        (Num::Float(f), Type::Int(k)) => Value::Int(k.wrap(f as i64), *k),
        (Num::Float(f), Type::Uint(k)) => {
            let raw = if f < 0.0 { f as i64 as u64 } else { f as u64 };
            Value::Uint(k.wrap(raw), *k)
        }
        (Num::Float(f), Type::Float(k)) => Value::Float(k.round(f), *k),
        (Num::Int(v), Type::Complex(k)) => complex_of(Complex::new(v as f64, 0.0), *k),
        (Num::Float(f), Type::Complex(k)) => complex_of(Complex::new(f, 0.0), *k),
        (Num::Complex(c), Type::Complex(k)) => complex_of(c, *k),
        _ => return None,
    };
    Some(value)
}

fn complex_of(c: Complex, kind: ComplexKind) -> Value {
    let part = kind.part();
    Value::Complex(Complex::new(part.round(c.re), part.round(c.im)), kind)
}

/// Types whose zero value is (or behaves as) `nil`.
fn accepts_nil(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Any
            | Type::Nil
            | Type::Error
            | Type::Slice(_)
            | Type::Map(..)
            | Type::Chan(_)
            | Type::Pointer(_)
            | Type::Func
    )
}

/// Check that `value` may be stored in a slot of type `to`, converting
/// default-typed numeric values that are representable in the target kind.
///
/// Use this for values that came from constant expressions; typed values
/// go through [`assign_exact`].
pub fn assign_to(value: Value, to: &Type) -> Result<Value, EvalError> {
    if is_default_typed(&value) && to.is_numeric() && value.type_of() != *to {
        if let Some(converted) = numeric(&value).and_then(|n| represent(n, to)) {
            return Ok(converted);
        }
        return Err(type_error(format!(
            "cannot use {value} (untyped {} constant) as {to} value (overflows or truncated)",
            value.type_of()
        )));
    }
    assign_exact(value, to)
}

/// Check that a typed `value` may be stored in a slot of type `to` without
/// any numeric conversion. `nil` becomes the zero value of nil-able types.
pub fn assign_exact(value: Value, to: &Type) -> Result<Value, EvalError> {
    if *to == Type::Any || value.type_of() == *to {
        return Ok(value);
    }
    if value.is_nil() && accepts_nil(to) {
        return Ok(Value::zero(to));
    }
    if *to == Type::Error && matches!(value, Value::Str(_)) {
        return Ok(value);
    }
    Err(type_error(format!(
        "cannot use {value} (value of type {}) as {to} value",
        value.type_of()
    )))
}

/// Exact conversion: `None` when the value would overflow or lose its
/// fractional part.
fn represent(num: Num, to: &Type) -> Option<Value> {
    match (num, to) {
        (Num::Int(v), Type::Int(k)) => k.fits(v).then(|| Value::Int(v as i64, *k)),
        (Num::Int(v), Type::Uint(k)) => k.fits(v).then(|| Value::Uint(v as u64, *k)),
        (Num::Float(f), Type::Int(_) | Type::Uint(_)) => {
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > 1.9e19 {
                return None;
            }
            represent(Num::Int(f as i128), to)
        }
        (Num::Complex(c), Type::Int(_) | Type::Uint(_) | Type::Float(_)) => {
            if c.im != 0.0 {
                return None;
            }
            represent(Num::Float(c.re), to)
        }
        (num, _) => convert_numeric(num, to),
    }
}

#[cfg(test)]
mod tests;
