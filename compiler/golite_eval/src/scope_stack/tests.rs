use super::*;
use pretty_assertions::assert_eq;

const X: Name = Name::from_raw(1);
const Y: Name = Name::from_raw(2);

#[test]
fn bottom_frame_is_the_host_environment() {
    let env = Environment::new();
    let mut scopes = ScopeStack::new(env.clone());
    scopes.define(X, "x", Value::int(1));
    assert_eq!(env.get("x"), Some(Value::int(1)));
    assert_eq!(scopes.lookup(X, "x"), Some(Value::int(1)));
}

#[test]
fn frames_shadow_and_vanish() {
    let env = Environment::new();
    env.set("x", Value::int(1));
    let mut scopes = ScopeStack::new(env.clone());
    scopes.push();
    scopes.define(X, "x", Value::int(2));
    assert_eq!(scopes.lookup(X, "x"), Some(Value::int(2)));
    assert_eq!(scopes.depth(), 1);
    scopes.pop();
    assert_eq!(scopes.lookup(X, "x"), Some(Value::int(1)));
    assert_eq!(env.get("x"), Some(Value::int(1)));
}

#[test]
fn assign_reaches_the_innermost_binding() {
    let env = Environment::new();
    env.set("x", Value::int(1));
    let mut scopes = ScopeStack::new(env.clone());
    scopes.push();
    scopes.define(Y, "y", Value::int(0));
    scopes.push();
    assert!(scopes.assign(X, "x", Value::int(5)));
    assert!(scopes.assign(Y, "y", Value::int(6)));
    assert!(!scopes.assign(Name::from_raw(9), "z", Value::int(7)));
    scopes.pop();
    assert_eq!(scopes.lookup(Y, "y"), Some(Value::int(6)));
    scopes.pop();
    assert_eq!(env.get("x"), Some(Value::int(5)));
    assert_eq!(env.get("z"), None);
}
