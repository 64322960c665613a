//! Binary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch: both operands must have the same kind, so
//! each arm handles one kind pair. Integer arithmetic wraps at the kind's
//! width; `float32` results are rounded to `f32` precision.

use golite_ir::BinaryOp;
use golite_value::{
    division_by_zero, operator_type, type_error, Complex, ComplexKind, EvalError, EvalResult,
    FloatKind, IntKind, StructValue, UintKind, Value,
};

/// Evaluate `left op right`.
///
/// `&&` and `||` short-circuit in the evaluator; here they only combine two
/// booleans.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    if op.is_shift() {
        return eval_shift(left, right, op);
    }
    match op {
        BinaryOp::Eq => return values_equal(left, right, op).map(Value::Bool),
        BinaryOp::NotEq => return values_equal(left, right, op).map(|eq| Value::Bool(!eq)),
        _ => {}
    }

    match (left, right) {
        (Value::Int(a, ka), Value::Int(b, kb)) if ka == kb => eval_int(*a, *b, *ka, op, left, right),
        (Value::Uint(a, ka), Value::Uint(b, kb)) if ka == kb => {
            eval_uint(*a, *b, *ka, op, left, right)
        }
        (Value::Float(a, ka), Value::Float(b, kb)) if ka == kb => {
            eval_float(*a, *b, *ka, op, left, right)
        }
        (Value::Complex(a, ka), Value::Complex(b, kb)) if ka == kb => {
            eval_complex(*a, *b, *ka, op, left, right)
        }
        (Value::Str(a), Value::Str(b)) => eval_string(a, b, op, left, right),
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinaryOp::And => Ok(Value::Bool(*a && *b)),
            BinaryOp::Or => Ok(Value::Bool(*a || *b)),
            _ => Err(mismatch(op, left, right)),
        },
        _ => Err(mismatch(op, left, right)),
    }
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    operator_type(op.as_symbol(), left.type_of(), right.type_of())
}

#[inline]
fn ordering(op: BinaryOp, ord: std::cmp::Ordering) -> Option<bool> {
    match op {
        BinaryOp::Lt => Some(ord.is_lt()),
        BinaryOp::LtEq => Some(ord.is_le()),
        BinaryOp::Gt => Some(ord.is_gt()),
        BinaryOp::GtEq => Some(ord.is_ge()),
        _ => None,
    }
}

fn eval_int(a: i64, b: i64, kind: IntKind, op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
    if let Some(result) = ordering(op, a.cmp(&b)) {
        return Ok(Value::Bool(result));
    }
    let raw = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.wrapping_div(b)
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.wrapping_rem(b)
        }
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::AndNot => a & !b,
        _ => return Err(mismatch(op, l, r)),
    };
    Ok(Value::Int(kind.wrap(raw), kind))
}

fn eval_uint(a: u64, b: u64, kind: UintKind, op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
    if let Some(result) = ordering(op, a.cmp(&b)) {
        return Ok(Value::Bool(result));
    }
    let raw = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.checked_div(b).ok_or_else(division_by_zero)?,
        BinaryOp::Rem => a.checked_rem(b).ok_or_else(division_by_zero)?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::AndNot => a & !b,
        _ => return Err(mismatch(op, l, r)),
    };
    Ok(Value::Uint(kind.wrap(raw), kind))
}

fn eval_float(a: f64, b: f64, kind: FloatKind, op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
    let compared = match op {
        BinaryOp::Lt => Some(a < b),
        BinaryOp::LtEq => Some(a <= b),
        BinaryOp::Gt => Some(a > b),
        BinaryOp::GtEq => Some(a >= b),
        _ => None,
    };
    if let Some(result) = compared {
        return Ok(Value::Bool(result));
    }
    let raw = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => return Err(mismatch(op, l, r)),
    };
    Ok(Value::Float(kind.round(raw), kind))
}

fn eval_complex(
    a: Complex,
    b: Complex,
    kind: ComplexKind,
    op: BinaryOp,
    l: &Value,
    r: &Value,
) -> EvalResult {
    let raw = match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div => a.div(b),
        _ => return Err(mismatch(op, l, r)),
    };
    let part = kind.part();
    Ok(Value::Complex(
        Complex::new(part.round(raw.re), part.round(raw.im)),
        kind,
    ))
}

/// Strings compare and concatenate bytewise.
fn eval_string(a: &[u8], b: &[u8], op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
    if let Some(result) = ordering(op, a.cmp(b)) {
        return Ok(Value::Bool(result));
    }
    match op {
        BinaryOp::Add => {
            let mut joined = Vec::with_capacity(a.len() + b.len());
            joined.extend_from_slice(a);
            joined.extend_from_slice(b);
            Ok(Value::byte_string(joined))
        }
        _ => Err(mismatch(op, l, r)),
    }
}

/// `x << n` / `x >> n`: any integer left operand, a non-negative integer
/// count.
fn eval_shift(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let count = match right {
        Value::Int(n, _) if *n < 0 => {
            return Err(type_error(format!("invalid shift count {n} (negative)")))
        }
        Value::Int(n, _) => n.unsigned_abs(),
        Value::Uint(n, _) => *n,
        _ => return Err(mismatch(op, left, right)),
    };
    let shift = u32::try_from(count).unwrap_or(u32::MAX);

    match (left, op) {
        (Value::Int(v, k), BinaryOp::Shl) => {
            Ok(Value::Int(k.wrap(v.checked_shl(shift).unwrap_or(0)), *k))
        }
        (Value::Int(v, k), _) => {
            let fill = if *v < 0 { -1 } else { 0 };
            Ok(Value::Int(v.checked_shr(shift).unwrap_or(fill), *k))
        }
        (Value::Uint(v, k), BinaryOp::Shl) => {
            Ok(Value::Uint(k.wrap(v.checked_shl(shift).unwrap_or(0)), *k))
        }
        (Value::Uint(v, k), _) => Ok(Value::Uint(v.checked_shr(shift).unwrap_or(0), *k)),
        _ => Err(mismatch(op, left, right)),
    }
}

/// `x << n` where both operands are constants. A result that does not fit
/// the left operand's type is an error instead of wrapping.
pub fn evaluate_constant_shift(left: &Value, right: &Value) -> EvalResult {
    if let (Value::Int(v, k), Some(n)) = (left, right.as_i64()) {
        if *v != 0 && n >= 0 {
            let fits = u32::try_from(n)
                .ok()
                .filter(|&s| s < i64::BITS)
                .is_some_and(|s| {
                    let shifted = v << s;
                    shifted >> s == *v && k.wrap(shifted) == shifted
                });
            if !fits {
                return Err(type_error(format!(
                    "constant {v} << {n} overflows {}",
                    left.type_of()
                )));
            }
        }
    }
    eval_shift(left, right, BinaryOp::Shl)
}

/// `==` over comparable values of the same type.
///
/// Slices, maps and functions compare only against `nil`, and a live value
/// of those kinds is never `nil`. This includes zero values: `var s []int`
/// and `var m map[string]int` hold empty but usable containers, so `s == nil`
/// and `m == nil` are `false`. Only an uninitialized pointer, function,
/// interface or channel equals `nil`.
pub fn values_equal(left: &Value, right: &Value, op: BinaryOp) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Nil, Value::Nil) => Ok(true),
        (
            Value::Nil,
            Value::Slice(_) | Value::Map(_) | Value::Func(_) | Value::Ref(_) | Value::Chan(_),
        )
        | (
            Value::Slice(_) | Value::Map(_) | Value::Func(_) | Value::Ref(_) | Value::Chan(_),
            Value::Nil,
        ) => Ok(false),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(a, ka), Value::Int(b, kb)) if ka == kb => Ok(a == b),
        (Value::Uint(a, ka), Value::Uint(b, kb)) if ka == kb => Ok(a == b),
        (Value::Float(a, ka), Value::Float(b, kb)) if ka == kb => Ok(a == b),
        (Value::Complex(a, ka), Value::Complex(b, kb)) if ka == kb => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a.as_slice() == b.as_slice()),
        (Value::Struct(a), Value::Struct(b)) if a.struct_type() == b.struct_type() => {
            structs_equal(a, b, op)
        }
        (Value::Ref(a), Value::Ref(b)) if a.struct_type() == b.struct_type() => Ok(a.ptr_eq(b)),
        (Value::Chan(a), Value::Chan(b)) if a.elem() == b.elem() => Ok(a.ptr_eq(b)),
        (Value::Type(a), Value::Type(b)) => Ok(a == b),
        (Value::Slice(_) | Value::Map(_) | Value::Func(_), _) => Err(type_error(format!(
            "invalid operation: {} can only be compared to nil",
            left.kind_name()
        ))),
        _ => Err(mismatch(op, left, right)),
    }
}

fn structs_equal(a: &StructValue, b: &StructValue, op: BinaryOp) -> Result<bool, EvalError> {
    for (x, y) in a.fields().iter().zip(b.fields()) {
        if !values_equal(x, y, op)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests;
