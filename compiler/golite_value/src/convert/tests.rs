use super::*;
use crate::errors::EvalErrorKind;
use crate::types::{StructField, StructType, UintKind};
use crate::value::SliceValue;
use pretty_assertions::assert_eq;

#[test]
fn numeric_conversions_truncate_and_wrap() {
    assert_eq!(convert(&Value::float(3.9), &Type::INT), Ok(Value::int(3)));
    assert_eq!(convert(&Value::float(-3.9), &Type::INT), Ok(Value::int(-3)));
    assert_eq!(
        convert(&Value::int(300), &Type::BYTE),
        Ok(Value::Uint(44, UintKind::Uint8))
    );
    assert_eq!(
        convert(&Value::int(-1), &Type::Int(IntKind::Int8)),
        Ok(Value::Int(-1, IntKind::Int8))
    );
    assert_eq!(convert(&Value::int(2), &Type::FLOAT64), Ok(Value::float(2.0)));
}

#[test]
fn integer_to_string_is_a_rune() {
    assert_eq!(convert(&Value::int(65), &Type::String), Ok(Value::string("A")));
    assert_eq!(
        convert(&Value::int(-1), &Type::String),
        Ok(Value::string("\u{FFFD}"))
    );
}

#[test]
fn strings_and_byte_slices() {
    let bytes = convert(&Value::string("hi"), &Type::slice(Type::BYTE));
    assert_eq!(
        bytes,
        Ok(Value::slice(Type::BYTE, vec![Value::byte(b'h'), Value::byte(b'i')]))
    );
    let back = bytes.and_then(|b| convert(&b, &Type::String));
    assert_eq!(back, Ok(Value::string("hi")));

    let runes = convert(&Value::string("hé"), &Type::slice(Type::RUNE));
    assert_eq!(
        runes.as_ref().ok().and_then(Value::as_slice).map(SliceValue::len),
        Some(2)
    );
}

#[test]
fn incompatible_conversion_fails() {
    assert_eq!(
        convert(&Value::string("1"), &Type::INT).map_err(|e| e.kind),
        Err(EvalErrorKind::Conversion {
            from: "string".into(),
            to: "int".into(),
        })
    );
}

#[test]
fn struct_conversion_between_identical_layouts() {
    let fields = vec![StructField {
        name: "X".into(),
        ty: Type::INT,
    }];
    let a = Arc::new(StructType::named("A", fields.clone()));
    let b = Arc::new(StructType::named("B", fields));
    let value = Value::struct_value(a, vec![Value::int(1)]);
    let converted = convert(&value, &Type::Struct(Arc::clone(&b)));
    assert_eq!(converted, Ok(Value::struct_value(b, vec![Value::int(1)])));
}

#[test]
fn default_typed_literals_narrow_when_representable() {
    assert_eq!(
        assign_to(Value::int(7), &Type::BYTE),
        Ok(Value::Uint(7, UintKind::Uint8))
    );
    assert_eq!(assign_to(Value::int(7), &Type::FLOAT64), Ok(Value::float(7.0)));
    assert_eq!(assign_to(Value::float(2.0), &Type::INT), Ok(Value::int(2)));
    assert!(assign_to(Value::int(256), &Type::BYTE).is_err());
    assert!(assign_to(Value::float(2.5), &Type::INT).is_err());
}

#[test]
fn assignability_is_otherwise_exact() {
    assert_eq!(
        assign_to(Value::string("x"), &Type::Any),
        Ok(Value::string("x"))
    );
    assert!(assign_to(Value::string("x"), &Type::INT).is_err());
    assert!(assign_to(Value::Int(1, IntKind::Int64), &Type::INT).is_err());
    assert_eq!(
        assign_to(Value::Nil, &Type::pointer(Type::INT)),
        Ok(Value::Nil)
    );
}

#[test]
fn typed_values_never_narrow() {
    assert!(assign_exact(Value::int(5), &Type::Int(IntKind::Int8)).is_err());
    assert!(assign_exact(Value::int(2), &Type::FLOAT64).is_err());
    assert_eq!(assign_exact(Value::int(5), &Type::INT), Ok(Value::int(5)));
    assert_eq!(assign_exact(Value::int(5), &Type::Any), Ok(Value::int(5)));
    assert_eq!(
        assign_exact(Value::Nil, &Type::slice(Type::INT)),
        Ok(Value::slice(Type::INT, Vec::new()))
    );
}
