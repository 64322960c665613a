use super::coerce_untyped;
use crate::Environment;
use golite_value::{EvalErrorKind, IntKind, Type, UintKind, Value};
use pretty_assertions::assert_eq;

fn eval_in(env: &Environment, source: &str) -> Value {
    match env.eval(source) {
        Ok(value) => value,
        Err(err) => panic!("{source}: {}", err.render(source)),
    }
}

#[test]
fn coerce_untyped_converts_to_numeric_targets() {
    assert!(matches!(
        coerce_untyped(Value::int(7), &Type::Uint(UintKind::Uint16)),
        Ok(Value::Uint(7, UintKind::Uint16))
    ));
    assert!(matches!(
        coerce_untyped(Value::int(7), &Type::String),
        Ok(Value::Int(7, IntKind::Int))
    ));
    assert!(coerce_untyped(Value::int(300), &Type::Int(IntKind::Int8)).is_err());
}

#[test]
fn builtin_names_come_before_bindings() {
    let env = Environment::new();
    env.set("len", Value::int(3));
    env.set("int", Value::int(4));
    assert_eq!(eval_in(&env, "len([]int{1, 2})"), Value::int(2));
    assert_eq!(eval_in(&env, "int(2.0)"), Value::int(2));
}

#[test]
fn constant_expressions_stay_untyped() {
    assert_eq!(
        eval_in(&Environment::new(), "var x int8 = 100; x + (1 + 2) * 9"),
        Value::Int(127, IntKind::Int8)
    );
    assert!(matches!(
        Environment::new()
            .eval("var x int8 = 1; x + 300")
            .map_err(|err| err.eval_kind().cloned()),
        Err(Some(EvalErrorKind::Type { .. }))
    ));
}

#[test]
fn logical_operators_short_circuit() {
    let env = Environment::new();
    assert_eq!(eval_in(&env, "false && undefinedName"), Value::Bool(false));
    assert_eq!(eval_in(&env, "true || undefinedName"), Value::Bool(true));
    assert!(env.eval("1 && true").is_err());
}

#[test]
fn map_keys_are_converted_to_the_key_type() {
    let env = Environment::new();
    assert_eq!(
        eval_in(&env, "m := map[float64]string{1: \"one\"}; m[1]"),
        Value::string("one")
    );
}

#[test]
fn type_expressions_evaluate_to_types() {
    let env = Environment::new();
    assert_eq!(
        eval_in(&env, "map[string][]int"),
        Value::Type(Type::map(Type::String, Type::slice(Type::INT)))
    );
    assert_eq!(
        eval_in(&env, "*int"),
        Value::Type(Type::pointer(Type::INT))
    );
    assert_eq!(eval_in(&env, "interface{}"), Value::Type(Type::Any));
}

#[test]
fn selecting_a_missing_member() {
    let result = Environment::new().eval("type P struct { X int }; P{}.Y");
    assert!(matches!(
        result.map_err(|err| err.eval_kind().cloned()),
        Err(Some(EvalErrorKind::NoSuchMember { .. }))
    ));
}
