use super::*;
use golite_ir::Span;
use pretty_assertions::assert_eq;

#[test]
fn messages_read_like_the_language() {
    assert_eq!(undefined("foo").to_string(), "undefined: foo");
    assert_eq!(
        index_out_of_range(5, 3).to_string(),
        "index out of range [5] with length 3"
    );
    assert_eq!(division_by_zero().to_string(), "integer divide by zero");
    assert_eq!(
        assignment_count(1, 2).to_string(),
        "assignment count mismatch: 1 != 2"
    );
    assert_eq!(
        operator_type("+", "int", "string").to_string(),
        "invalid operation: operator + not defined on int and string"
    );
    assert_eq!(
        append_type("string", "[]int").to_string(),
        "string cannot append to []int"
    );
    assert_eq!(
        allocation_limit(1 << 30, 1 << 24).to_string(),
        "cannot allocate 1073741824 elements (limit 16777216)"
    );
}

#[test]
fn host_errors_are_verbatim() {
    let err = host_error("disk on fire");
    assert_eq!(err.to_string(), "disk on fire");
    assert_eq!(
        err.kind,
        EvalErrorKind::Host {
            message: "disk on fire".into()
        }
    );
}

#[test]
fn first_span_wins() {
    let inner = Span::new(4, 9);
    let outer = Span::new(0, 20);
    let err = undefined("x").with_span(inner).with_span(outer);
    assert_eq!(err.span, Some(inner));
}

#[test]
fn kind_converts_into_error() {
    let err: EvalError = EvalErrorKind::DivisionByZero.into();
    assert_eq!(err.span, None);
    assert_eq!(err, division_by_zero());
}
