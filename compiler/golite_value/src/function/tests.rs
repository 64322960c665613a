use super::*;
use crate::errors::EvalErrorKind;
use pretty_assertions::assert_eq;

fn kind(result: EvalResult) -> Option<EvalErrorKind> {
    result.err().map(|e| e.kind)
}

#[test]
fn binary_adapter_converts_arguments() {
    let add = HostFunction::binary("Add", |a: i64, b: i64| a + b);
    assert_eq!(add.arity(), Arity::Fixed(2));
    assert_eq!(add.results(), 1);
    assert_eq!(add.call(&[Value::int(2), Value::int(3)]), Ok(Value::int(5)));
}

#[test]
fn arity_is_checked() {
    let add = HostFunction::binary("Add", |a: i64, b: i64| a + b);
    assert_eq!(
        kind(add.call(&[Value::int(1)])),
        Some(EvalErrorKind::ArityMismatch {
            name: "Add".into(),
            expected: "2".into(),
            got: 1,
        })
    );
}

#[test]
fn no_implicit_conversion() {
    let add = HostFunction::binary("Add", |a: i64, b: i64| a + b);
    assert_eq!(
        kind(add.call(&[Value::int(1), Value::float(2.0)])),
        Some(EvalErrorKind::ArgumentType {
            name: "Add".into(),
            position: 2,
            expected: "int".into(),
            got: "float64".into(),
        })
    );
}

#[test]
fn unit_result_is_nil() {
    let log = HostFunction::unary("Log", |_: String| ());
    assert_eq!(log.results(), 0);
    assert_eq!(log.call(&[Value::string("hi")]), Ok(Value::Nil));
}

#[test]
fn fallible_error_surfaces_verbatim() {
    let div = HostFunction::fallible_binary("Div", |a: f64, b: f64| {
        if b == 0.0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    });
    assert_eq!(div.results(), 2);
    assert_eq!(
        div.call(&[Value::float(1.0), Value::float(4.0)]),
        Ok(Value::float(0.25))
    );
    assert_eq!(
        kind(div.call(&[Value::float(1.0), Value::float(0.0)])),
        Some(EvalErrorKind::Host {
            message: "division by zero".into()
        })
    );
}

#[test]
fn variadic_accepts_any_count() {
    let sum = HostFunction::variadic("Sum", |xs: Vec<i64>| xs.iter().sum::<i64>());
    assert_eq!(sum.call(&[]), Ok(Value::int(0)));
    assert_eq!(
        sum.call(&[Value::int(1), Value::int(2), Value::int(3)]),
        Ok(Value::int(6))
    );
}

#[test]
fn three_results_are_rejected() {
    let err = HostFunction::new("Triple", Arity::Fixed(0), 3, |_| Ok(Value::Nil)).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::UnsupportedResultArity {
            name: "Triple".into(),
            results: 3,
        })
    );
}

#[test]
fn bind_prepends_receiver() {
    let greet = HostFunction::binary("Greet", |who: String, greeting: String| {
        format!("{greeting}, {who}")
    });
    let bound = greet.bind(Value::string("Ann"));
    assert_eq!(bound.arity(), Arity::Fixed(1));
    assert_eq!(
        bound.call(&[Value::string("Hello")]),
        Ok(Value::string("Hello, Ann"))
    );
}

#[test]
fn collections_cross_the_boundary() {
    let total = HostFunction::unary("Total", |m: HashMap<String, i64>| m.values().sum::<i64>());
    let mut entries = FxHashMap::default();
    entries.insert(MapKey::from_string("a"), Value::int(2));
    entries.insert(MapKey::from_string("b"), Value::int(3));
    let map = Value::map(Type::String, Type::INT, entries);
    assert_eq!(total.call(&[map]), Ok(Value::int(5)));

    let split = HostFunction::unary("Split", |s: String| {
        s.split(',').map(str::to_string).collect::<Vec<_>>()
    });
    assert_eq!(
        split.call(&[Value::string("a,b")]),
        Ok(Value::slice(
            Type::String,
            vec![Value::string("a"), Value::string("b")]
        ))
    );
}

#[test]
fn exact_integer_kinds() {
    let double = HostFunction::unary("Double", |b: u8| b.wrapping_mul(2));
    assert_eq!(double.call(&[Value::byte(4)]), Ok(Value::byte(8)));
    assert!(double.call(&[Value::int(4)]).is_err());
}
