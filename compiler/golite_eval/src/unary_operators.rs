//! Unary operator implementations for the evaluator.

use golite_ir::UnaryOp;
use golite_value::{type_error, EvalResult, Type, Value};

/// Evaluate `op operand`.
///
/// `&` on a struct value makes a reference to a copy of it, `*` on a
/// reference loads the struct, and `*` on a type value builds a pointer
/// type.
pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Plus, Value::Int(..) | Value::Uint(..) | Value::Float(..) | Value::Complex(..)) => {
            Ok(operand.clone())
        }
        (UnaryOp::Neg, Value::Int(v, k)) => Ok(Value::Int(k.wrap(v.wrapping_neg()), *k)),
        (UnaryOp::Neg, Value::Uint(v, k)) => Ok(Value::Uint(k.wrap(v.wrapping_neg()), *k)),
        (UnaryOp::Neg, Value::Float(v, k)) => Ok(Value::Float(-v, *k)),
        (UnaryOp::Neg, Value::Complex(c, k)) => Ok(Value::Complex(c.neg(), *k)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::BitNot, Value::Int(v, k)) => Ok(Value::Int(k.wrap(!v), *k)),
        (UnaryOp::BitNot, Value::Uint(v, k)) => Ok(Value::Uint(k.wrap(!v), *k)),
        (UnaryOp::Addr, Value::Struct(s)) => Ok(Value::reference_to(s)),
        (UnaryOp::Deref, Value::Ref(r)) => Ok(Value::Struct(r.load())),
        (UnaryOp::Deref, Value::Type(t)) => Ok(Value::Type(Type::pointer(t.clone()))),
        (UnaryOp::Deref, Value::Nil) => Err(type_error(
            "invalid memory address or nil pointer dereference",
        )),
        (UnaryOp::Addr, other) => Err(type_error(format!(
            "invalid operation: cannot take address of {other} (value of type {})",
            other.type_of()
        ))),
        (UnaryOp::Deref, other) => Err(type_error(format!(
            "invalid operation: cannot indirect {other} (value of type {})",
            other.type_of()
        ))),
        (_, other) => Err(type_error(format!(
            "invalid operation: operator {} not defined on {other} (value of type {})",
            op.as_symbol(),
            other.type_of()
        ))),
    }
}
