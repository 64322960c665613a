use super::*;
use golite_value::{EvalErrorKind, StructField, StructType, Type};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

fn bin(l: Value, op: BinaryOp, r: Value) -> EvalResult {
    evaluate_binary(&l, &r, op)
}

fn kind(result: EvalResult) -> Option<EvalErrorKind> {
    result.err().map(|e| e.kind)
}

#[test]
fn integer_arithmetic() {
    assert_eq!(bin(Value::int(7), BinaryOp::Add, Value::int(5)), Ok(Value::int(12)));
    assert_eq!(bin(Value::int(7), BinaryOp::Sub, Value::int(5)), Ok(Value::int(2)));
    assert_eq!(bin(Value::int(7), BinaryOp::Mul, Value::int(5)), Ok(Value::int(35)));
    assert_eq!(bin(Value::int(-7), BinaryOp::Div, Value::int(2)), Ok(Value::int(-3)));
    assert_eq!(bin(Value::int(-7), BinaryOp::Rem, Value::int(2)), Ok(Value::int(-1)));
    assert_eq!(bin(Value::int(6), BinaryOp::AndNot, Value::int(3)), Ok(Value::int(4)));
}

#[test]
fn narrow_kinds_wrap() {
    let i8v = |v| Value::Int(v, IntKind::Int8);
    assert_eq!(bin(i8v(127), BinaryOp::Add, i8v(1)), Ok(i8v(-128)));
    assert_eq!(
        bin(Value::byte(250), BinaryOp::Add, Value::byte(10)),
        Ok(Value::byte(4))
    );
    assert_eq!(
        bin(Value::int(i64::MAX), BinaryOp::Add, Value::int(1)),
        Ok(Value::int(i64::MIN))
    );
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(
        kind(bin(Value::int(1), BinaryOp::Div, Value::int(0))),
        Some(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        kind(bin(Value::byte(1), BinaryOp::Rem, Value::byte(0))),
        Some(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        bin(Value::float(1.0), BinaryOp::Div, Value::float(0.0)),
        Ok(Value::float(f64::INFINITY))
    );
}

#[test]
fn kinds_must_match() {
    assert_eq!(
        kind(bin(Value::int(1), BinaryOp::Add, Value::float(1.0))),
        Some(EvalErrorKind::OperatorType {
            op: "+",
            left: "int".into(),
            right: "float64".into(),
        })
    );
    assert!(bin(Value::int(1), BinaryOp::Eq, Value::Int(1, IntKind::Int64)).is_err());
    assert!(bin(Value::float(1.0), BinaryOp::Rem, Value::float(1.0)).is_err());
    assert!(bin(Value::Bool(true), BinaryOp::Lt, Value::Bool(false)).is_err());
}

#[test]
fn strings_concatenate_and_compare() {
    assert_eq!(
        bin(Value::string("1"), BinaryOp::Add, Value::string("2")),
        Ok(Value::string("12"))
    );
    assert_eq!(
        bin(Value::string("a"), BinaryOp::Lt, Value::string("b")),
        Ok(Value::Bool(true))
    );
    assert!(bin(Value::string("a"), BinaryOp::Sub, Value::string("b")).is_err());
}

#[test]
fn float32_rounds() {
    let f = |v| Value::Float(v, FloatKind::F32);
    assert_eq!(
        bin(f(f64::from(0.1f32)), BinaryOp::Add, f(f64::from(0.2f32))),
        Ok(f(f64::from(0.1f32 + 0.2f32)))
    );
}

#[test]
fn complex_arithmetic() {
    assert_eq!(
        bin(Value::complex(1.0, 2.0), BinaryOp::Mul, Value::complex(3.0, -1.0)),
        Ok(Value::complex(5.0, 5.0))
    );
    assert!(bin(Value::complex(1.0, 0.0), BinaryOp::Lt, Value::complex(2.0, 0.0)).is_err());
}

#[test]
fn shifts() {
    assert_eq!(bin(Value::int(1), BinaryOp::Shl, Value::int(4)), Ok(Value::int(16)));
    assert_eq!(bin(Value::int(-16), BinaryOp::Shr, Value::byte(2)), Ok(Value::int(-4)));
    assert_eq!(bin(Value::int(1), BinaryOp::Shl, Value::int(64)), Ok(Value::int(0)));
    assert_eq!(bin(Value::int(-1), BinaryOp::Shr, Value::int(100)), Ok(Value::int(-1)));
    assert_eq!(bin(Value::byte(1), BinaryOp::Shl, Value::int(8)), Ok(Value::byte(0)));
    assert!(bin(Value::int(1), BinaryOp::Shl, Value::int(-1)).is_err());
    assert!(bin(Value::float(1.0), BinaryOp::Shl, Value::int(1)).is_err());
}

#[test]
fn constant_shifts_reject_overflow() {
    assert_eq!(
        evaluate_constant_shift(&Value::int(1), &Value::int(62)),
        Ok(Value::int(1 << 62))
    );
    assert_eq!(
        evaluate_constant_shift(&Value::int(-1), &Value::int(63)),
        Ok(Value::int(i64::MIN))
    );
    assert_eq!(
        evaluate_constant_shift(&Value::int(0), &Value::int(200)),
        Ok(Value::int(0))
    );
    assert!(matches!(
        kind(evaluate_constant_shift(&Value::int(1), &Value::int(70))),
        Some(EvalErrorKind::Type { .. })
    ));
    assert!(evaluate_constant_shift(&Value::int(1), &Value::int(63)).is_err());
    assert!(evaluate_constant_shift(&Value::rune('a'), &Value::int(30)).is_err());
}

#[test]
fn equality_rules() {
    assert_eq!(bin(Value::Nil, BinaryOp::Eq, Value::Nil), Ok(Value::Bool(true)));
    let slice = Value::slice(Type::INT, vec![]);
    assert_eq!(bin(slice.clone(), BinaryOp::Eq, Value::Nil), Ok(Value::Bool(false)));
    assert!(bin(slice.clone(), BinaryOp::Eq, slice).is_err());

    let st = Arc::new(StructType::named(
        "P",
        vec![StructField {
            name: "X".into(),
            ty: Type::INT,
        }],
    ));
    let a = Value::struct_value(Arc::clone(&st), vec![Value::int(1)]);
    let b = Value::struct_value(Arc::clone(&st), vec![Value::int(1)]);
    assert_eq!(bin(a, BinaryOp::Eq, b), Ok(Value::Bool(true)));

    let r1 = Value::struct_ref(Arc::clone(&st), vec![Value::int(1)]);
    let r2 = Value::struct_ref(st, vec![Value::int(1)]);
    assert_eq!(bin(r1.clone(), BinaryOp::Eq, r1.clone()), Ok(Value::Bool(true)));
    assert_eq!(bin(r1, BinaryOp::NotEq, r2), Ok(Value::Bool(true)));
}

#[test]
fn logical_on_booleans() {
    assert_eq!(
        bin(Value::Bool(true), BinaryOp::And, Value::Bool(false)),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        bin(Value::Bool(false), BinaryOp::Or, Value::Bool(true)),
        Ok(Value::Bool(true))
    );
    assert!(bin(Value::int(1), BinaryOp::And, Value::Bool(true)).is_err());
}

#[test]
fn zero_containers_are_not_nil() {
    let slice = Value::zero(&Type::slice(Type::INT));
    let map = Value::zero(&Type::map(Type::String, Type::INT));
    assert_eq!(values_equal(&slice, &Value::Nil, BinaryOp::Eq), Ok(false));
    assert_eq!(values_equal(&Value::Nil, &map, BinaryOp::Eq), Ok(false));
    let pointer = Value::zero(&Type::pointer(Type::INT));
    assert_eq!(values_equal(&pointer, &Value::Nil, BinaryOp::Eq), Ok(true));
}

proptest! {
    #[test]
    fn int_add_matches_wrapping(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(
            bin(Value::int(a), BinaryOp::Add, Value::int(b)),
            Ok(Value::int(a.wrapping_add(b)))
        );
    }

    #[test]
    fn comparisons_agree_with_ord(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(
            bin(Value::int(a), BinaryOp::Lt, Value::int(b)),
            Ok(Value::Bool(a < b))
        );
        prop_assert_eq!(
            bin(Value::int(a), BinaryOp::Eq, Value::int(b)),
            Ok(Value::Bool(a == b))
        );
    }

    #[test]
    fn int8_results_stay_in_range(a in any::<i8>(), b in any::<i8>()) {
        let r = bin(
            Value::Int(i64::from(a), IntKind::Int8),
            BinaryOp::Mul,
            Value::Int(i64::from(b), IntKind::Int8),
        );
        prop_assert_eq!(r, Ok(Value::Int(i64::from(a.wrapping_mul(b)), IntKind::Int8)));
    }
}
