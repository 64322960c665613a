use super::*;
use golite_value::{EvalErrorKind, IntKind, MapKey, UintKind, MAX_ELEMENTS};
use pretty_assertions::assert_eq;

fn ints(items: &[i64]) -> Value {
    Value::slice(Type::INT, items.iter().copied().map(Value::int).collect())
}

fn call(name: &str, args: &[Value]) -> EvalResult {
    match lookup(name) {
        Some(Value::Func(f)) => f.call(args),
        other => panic!("{name} is not a builtin function: {other:?}"),
    }
}

#[test]
fn constants_are_registered() {
    assert_eq!(lookup("nil"), Some(&Value::Nil));
    assert_eq!(lookup("true"), Some(&Value::Bool(true)));
    assert_eq!(lookup("false"), Some(&Value::Bool(false)));
    assert_eq!(lookup("cap"), None);
}

#[test]
fn append_returns_a_new_slice() {
    let base = ints(&[1, 2, 3]);
    assert_eq!(call("append", &[base.clone(), Value::int(6)]), Ok(ints(&[1, 2, 3, 6])));
    assert_eq!(base, ints(&[1, 2, 3]));
}

#[test]
fn append_with_no_elements_copies() {
    assert_eq!(call("append", &[ints(&[])]), Ok(ints(&[])));
}

#[test]
fn append_rejects_mismatched_elements() {
    assert_eq!(
        call("append", &[ints(&[1]), Value::string("a")]).map_err(|e| e.kind),
        Err(EvalErrorKind::AppendType {
            elem: "string".into(),
            slice: "[]int".into(),
        })
    );
}

#[test]
fn append_never_converts_typed_elements() {
    let small = Value::slice(Type::Int(IntKind::Int8), vec![Value::Int(1, IntKind::Int8)]);
    assert_eq!(
        call("append", &[small, Value::int(5)]).map_err(|e| e.kind),
        Err(EvalErrorKind::AppendType {
            elem: "int".into(),
            slice: "[]int8".into(),
        })
    );
    let floats = Value::slice(Type::FLOAT64, vec![Value::float(1.5)]);
    assert!(call("append", &[floats, Value::int(2)]).is_err());
}

#[test]
fn append_nil_to_a_slice_of_slices() {
    let nested = Value::slice(Type::slice(Type::INT), vec![]);
    assert_eq!(
        call("append", &[nested, Value::Nil]),
        Ok(Value::slice(Type::slice(Type::INT), vec![ints(&[])]))
    );
}

#[test]
fn append_to_interface_slice_accepts_anything() {
    let any = Value::slice(Type::Any, vec![]);
    let result = call("append", &[any, Value::int(1), Value::string("x")]);
    assert_eq!(
        result,
        Ok(Value::slice(Type::Any, vec![Value::int(1), Value::string("x")]))
    );
}

#[test]
fn append_requires_a_slice() {
    assert!(matches!(
        call("append", &[Value::int(1), Value::int(2)]).map_err(|e| e.kind),
        Err(EvalErrorKind::ArgumentType { position: 1, .. })
    ));
}

#[test]
fn make_slice_with_length_and_capacity() {
    let ty = Value::Type(Type::slice(Type::INT));
    assert_eq!(call("make", &[ty.clone(), Value::int(3)]), Ok(ints(&[0, 0, 0])));
    assert_eq!(
        call("make", &[ty.clone(), Value::int(1), Value::int(10)]),
        Ok(ints(&[0]))
    );
    assert!(call("make", &[ty.clone(), Value::int(5), Value::int(1)]).is_err());
    assert!(matches!(
        call("make", &[ty]).map_err(|e| e.kind),
        Err(EvalErrorKind::ArityMismatch { .. })
    ));
}

#[test]
fn make_map_is_writable() {
    let ty = Value::Type(Type::map(Type::String, Type::INT));
    let made = call("make", &[ty, Value::int(0)]);
    let Ok(Value::Map(m)) = made else {
        panic!("expected a map, got {made:?}");
    };
    m.insert(MapKey::from_string("a"), Value::int(1));
    m.insert(MapKey::from_string("b"), Value::int(2));
    assert_eq!(call("len", &[Value::Map(m)]), Ok(Value::int(2)));
}

#[test]
fn make_channel() {
    let ty = Value::Type(Type::chan(Type::String));
    let Ok(Value::Chan(c)) = call("make", &[ty, Value::Uint(4, UintKind::Uint)]) else {
        panic!("expected a channel");
    };
    assert_eq!(c.cap(), 4);
    assert_eq!(call("len", &[Value::Chan(c)]), Ok(Value::int(0)));
}

#[test]
fn make_refuses_oversized_requests() {
    let slice = Value::Type(Type::slice(Type::INT));
    assert_eq!(
        call("make", &[slice.clone(), Value::int(1 << 61)]).map_err(|e| e.kind),
        Err(EvalErrorKind::AllocationLimit {
            requested: 1 << 61,
            limit: MAX_ELEMENTS,
        })
    );
    assert!(matches!(
        call("make", &[slice, Value::int(0), Value::int(i64::MAX)]).map_err(|e| e.kind),
        Err(EvalErrorKind::AllocationLimit { .. })
    ));
    let chan = Value::Type(Type::chan(Type::INT));
    assert!(matches!(
        call("make", &[chan, Value::int(1 << 40)]).map_err(|e| e.kind),
        Err(EvalErrorKind::AllocationLimit { .. })
    ));
}

#[test]
fn make_rejects_bad_arguments() {
    assert_eq!(
        call("make", &[Value::Type(Type::INT)]).map_err(|e| e.kind),
        Err(EvalErrorKind::UnsupportedMake {
            type_name: "int".into()
        })
    );
    assert!(matches!(
        call("make", &[Value::Type(Type::slice(Type::INT)), Value::string("3")])
            .map_err(|e| e.kind),
        Err(EvalErrorKind::ArgumentType { position: 2, .. })
    ));
    assert!(call("make", &[Value::int(1)]).is_err());
    assert!(call("make", &[Value::Type(Type::slice(Type::INT)), Value::int(-1)]).is_err());
}

#[test]
fn len_counts_bytes_of_strings() {
    assert_eq!(call("len", &[Value::string("héllo")]), Ok(Value::int(6)));
    assert_eq!(call("len", &[ints(&[1, 2])]), Ok(Value::int(2)));
    assert!(matches!(
        call("len", &[Value::int(3)]).map_err(|e| e.kind),
        Err(EvalErrorKind::Type { .. })
    ));
}
