use crate::{Environment, Error, EvalConfig};
use golite_value::{
    Arity, EvalErrorKind, FloatKind, HostFunction, IntKind, StructField, StructType, Type, Value,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn eval(source: &str) -> Value {
    eval_in(&Environment::new(), source)
}

fn eval_in(env: &Environment, source: &str) -> Value {
    match env.eval(source) {
        Ok(value) => value,
        Err(err) => panic!("{source}: {}", err.render(source)),
    }
}

fn eval_err(source: &str) -> EvalErrorKind {
    match Environment::new().eval(source) {
        Err(Error::Eval(err)) => err.kind,
        other => panic!("{source}: expected an evaluation error, got {other:?}"),
    }
}

fn ints(items: &[i64]) -> Value {
    Value::slice(Type::INT, items.iter().copied().map(Value::int).collect())
}

// Blocks and control flow

#[test]
fn for_loop_accumulates() {
    let src = "a := 0; for i := 0; i < 100; i = i + 1 { a = a + i }; a";
    assert_eq!(eval(src), Value::int(4950));
}

#[test]
fn return_inside_if_ends_evaluation() {
    let src = r#"a := 3; if a > 0 { return "positive" } else { return "negative" }; "unreachable""#;
    assert_eq!(eval(src), Value::string("positive"));
}

#[test]
fn result_is_last_statement_value() {
    assert_eq!(eval("x := 2\nx * 21"), Value::int(42));
    assert_eq!(eval(""), Value::Nil);
}

#[test]
fn if_without_else_yields_nil() {
    assert_eq!(eval("x := 1; if x > 5 { x = 2 }"), Value::Nil);
}

#[test]
fn if_init_is_scoped_to_the_statement() {
    assert_eq!(eval("if y := 2; y > 1 { y * 10 }"), Value::int(20));
    assert_eq!(
        eval_err("if y := 2; y > 1 { }; y"),
        EvalErrorKind::Undefined { name: "y".into() }
    );
}

#[test]
fn loop_variables_do_not_leak() {
    assert_eq!(
        eval_err("for i := 0; i < 3; i++ { }; i"),
        EvalErrorKind::Undefined { name: "i".into() }
    );
}

#[test]
fn bare_block_shares_the_enclosing_scope() {
    assert_eq!(eval("{ z := 5 }; z"), Value::int(5));
}

#[test]
fn break_and_continue() {
    let src = "n := 0
for i := 0; i < 10; i++ {
    if i == 3 { continue }
    if i == 6 { break }
    n += i
}
n";
    assert_eq!(eval(src), Value::int(12));
    assert_eq!(
        eval("i := 0; for { i++; if i == 4 { break } }; i"),
        Value::int(4)
    );
}

#[test]
fn break_outside_a_loop_is_rejected() {
    assert!(matches!(
        eval_err("break"),
        EvalErrorKind::UnsupportedSyntax { .. }
    ));
}

#[test]
fn multiple_return_values_form_a_tuple() {
    assert_eq!(
        eval("return 1, \"a\""),
        Value::tuple(vec![Value::int(1), Value::string("a")])
    );
}

#[test]
fn non_boolean_condition() {
    assert_eq!(
        eval_err("if 1 { }"),
        EvalErrorKind::NonBooleanCondition {
            type_name: "int".into()
        }
    );
}

// Range

#[test]
fn range_over_slice() {
    let src = "s := []int{10, 20, 30}; sum := 0; for i, v := range s { sum += i * v }; sum";
    assert_eq!(eval(src), Value::int(80));
}

#[test]
fn range_over_map_is_ordered_by_key() {
    let src = r#"m := map[string]int{"b": 2, "a": 1, "c": 3}
keys := ""
for k := range m { keys += k }
keys"#;
    assert_eq!(eval(src), Value::string("abc"));
}

#[test]
fn range_over_string_yields_byte_offsets_and_runes() {
    assert_eq!(
        eval(r#"last := 0; for i := range "héllo" { last = i }; last"#),
        Value::int(5)
    );
    assert_eq!(
        eval(r#"n := 0; for _, r := range "héllo" { if r == 'é' { n++ } }; n"#),
        Value::int(1)
    );
}

#[test]
fn range_over_integer() {
    assert_eq!(
        eval("total := 0; for i := range 5 { total += i }; total"),
        Value::int(10)
    );
}

#[test]
fn range_assigns_existing_variables() {
    assert_eq!(
        eval("k := -1; for k = range []int{7, 8} { }; k"),
        Value::int(1)
    );
}

#[test]
fn range_over_float_is_unsupported() {
    assert!(matches!(
        eval_err("for x := range 1.5 { }"),
        EvalErrorKind::UnsupportedRange { .. }
    ));
}

// Assignment and declarations

#[test]
fn top_level_define_binds_in_the_host_environment() {
    let env = Environment::new();
    eval_in(&env, "x := 41; x++");
    assert_eq!(env.get("x"), Some(Value::int(42)));
}

#[test]
fn assignment_requires_an_existing_binding() {
    assert_eq!(
        eval_err("y = 1"),
        EvalErrorKind::UndefinedVariable { name: "y".into() }
    );
}

#[test]
fn untyped_constants_adopt_the_other_operand_type() {
    assert_eq!(eval("var b byte = 200; b + 100"), Value::byte(44));
    assert_eq!(eval("x := 1.5; x * 2"), Value::float(3.0));
    assert_eq!(eval("var f float32 = 1; f"), Value::Float(1.0, FloatKind::F32));
    assert_eq!(eval("var y int8 = 5; y"), Value::Int(5, IntKind::Int8));
}

#[test]
fn typed_values_keep_their_type_on_assignment() {
    assert!(matches!(
        eval_err("x := 5; var y int8 = x"),
        EvalErrorKind::Type { .. }
    ));
    assert!(matches!(
        eval_err("x := 5; []int8{x}"),
        EvalErrorKind::Type { .. }
    ));
    assert!(matches!(
        eval_err("x := 2; s := []float64{0}; s[0] = x"),
        EvalErrorKind::Type { .. }
    ));
    assert_eq!(
        eval("s := []float64{0}; s[0] = 2; s[0]"),
        Value::float(2.0)
    );
}

#[test]
fn overflowing_constant_shift_is_an_error() {
    assert!(matches!(
        eval_err("i := 1 << 70; i"),
        EvalErrorKind::Type { .. }
    ));
    assert_eq!(eval("i := 1 << 62; i"), Value::int(1 << 62));
    assert_eq!(eval("n := 70; 1 << n"), Value::int(0));
}

#[test]
fn min_int_literal() {
    assert_eq!(eval("-9223372036854775808"), Value::int(i64::MIN));
    assert_eq!(eval("x := -9223372036854775808; x + 1"), Value::int(i64::MIN + 1));
    assert!(matches!(
        eval_err("-9223372036854775809"),
        EvalErrorKind::LiteralParse { .. }
    ));
}

#[test]
fn var_declarations() {
    assert_eq!(eval("var x int; x"), Value::int(0));
    assert_eq!(eval(r#"var a, b = 1, "s"; b"#), Value::string("s"));
    assert_eq!(eval("var a, b, c int = 1, 2; c"), Value::int(0));
    assert_eq!(
        eval("var a, b int = 1; return a, b"),
        Value::tuple(vec![Value::int(1), Value::int(0)])
    );
    assert_eq!(eval("var a, b []int = []int{1, 2}; len(a) + len(b)"), Value::int(2));
    assert_eq!(eval("var s []int; len(s)"), Value::int(0));
    assert_eq!(eval("var arr [3]int; arr"), ints(&[0, 0, 0]));
    assert_eq!(
        eval("var (\n\tp = 2\n\tq float64 = 3\n)\nq"),
        Value::float(3.0)
    );
}

#[test]
fn const_declarations() {
    assert_eq!(eval("const k = 10; k + 1"), Value::int(11));
}

#[test]
fn destructuring_tuples_and_slices() {
    let env = Environment::new();
    env.register(
        "pair",
        HostFunction::raw("pair", Arity::Fixed(0), |_| {
            Ok(Value::tuple(vec![Value::int(1), Value::string("x")]))
        }),
    );
    assert_eq!(eval_in(&env, "a, b := pair(); b"), Value::string("x"));
    assert_eq!(eval("a, b := []int{1, 2}; a + b"), Value::int(3));
    assert_eq!(
        eval_err("a, b := 1, 2, 3"),
        EvalErrorKind::AssignmentCount { left: 2, right: 3 }
    );
}

#[test]
fn blank_identifier_discards() {
    assert_eq!(eval("_, b := []int{1, 2}; _ = b; b"), Value::int(2));
}

#[test]
fn slices_share_storage() {
    assert_eq!(eval("s := []int{1, 2}; t := s; t[0] = 9; s[0]"), Value::int(9));
}

// Containers

#[test]
fn map_index_miss_is_the_zero_value() {
    assert_eq!(eval(r#"m := map[string]int{"a": 1}; m["b"]"#), Value::int(0));
}

#[test]
fn slice_index_out_of_range() {
    assert_eq!(
        eval_err("a := []int{1, 2, 3}; a[5]"),
        EvalErrorKind::IndexOutOfRange { index: 5, len: 3 }
    );
}

#[test]
fn append_and_make() {
    assert_eq!(
        eval("append([]int{1, 2, 3}, []int{4, 5}...)"),
        ints(&[1, 2, 3, 4, 5])
    );
    assert_eq!(
        eval(r#"m := make(map[string]int, 0); m["a"] = 1; m["b"] = 2; len(m)"#),
        Value::int(2)
    );
    assert!(matches!(
        eval_err(r#"append([]int{1}, "a")"#),
        EvalErrorKind::AppendType { .. }
    ));
}

#[test]
fn append_matches_element_types_exactly() {
    assert_eq!(
        eval_err("x := 5; append([]int8{1}, x)"),
        EvalErrorKind::AppendType {
            elem: "int".into(),
            slice: "[]int8".into(),
        }
    );
    assert!(matches!(
        eval_err("y := 2; append([]float64{1.5}, y)"),
        EvalErrorKind::AppendType { .. }
    ));
    assert_eq!(
        eval("append([]int8{1}, 5)"),
        Value::slice(
            Type::Int(IntKind::Int8),
            vec![Value::Int(1, IntKind::Int8), Value::Int(5, IntKind::Int8)]
        )
    );
    assert_eq!(
        eval("append([]float64{1.5}, 2)"),
        Value::slice(Type::FLOAT64, vec![Value::float(1.5), Value::float(2.0)])
    );
}

#[test]
fn oversized_allocations_are_errors() {
    for src in [
        "make([]int, 1<<61)",
        "[]int{1<<62: 1}",
        "[1<<62]int{}",
        "var a [1<<62]int",
    ] {
        assert!(
            matches!(eval_err(src), EvalErrorKind::AllocationLimit { .. }),
            "{src}"
        );
    }
}

#[test]
fn zero_slices_and_maps_are_not_nil() {
    assert_eq!(eval("var s []int; s == nil"), Value::Bool(false));
    assert_eq!(eval("var m map[string]int; m == nil"), Value::Bool(false));
}

#[test]
fn slicing_slices_and_strings() {
    assert_eq!(eval("s := []int{1, 2, 3, 4}; s[1:3]"), ints(&[2, 3]));
    assert_eq!(eval(r#""hello"[1:3]"#), Value::string("el"));
    assert_eq!(eval(r#""hi"[1]"#), Value::byte(b'i'));
    assert!(matches!(
        eval_err("s := []int{1}; s[0:4]"),
        EvalErrorKind::IndexOutOfRange { .. }
    ));
}

#[test]
fn strings_are_byte_sequences() {
    assert_eq!(eval(r#"s := "héllo"; len(s[1:2])"#), Value::int(1));
    assert_eq!(
        eval(r#"s := "héllo"; s[1:2] + s[2:3] == "é""#),
        Value::Bool(true)
    );
    assert_eq!(eval(r#"len("\xff")"#), Value::int(1));
    assert_eq!(eval("len(string([]byte{0xc3}))"), Value::int(1));
    assert_eq!(eval(r#"[]byte("\xff")[0]"#), Value::byte(0xff));
    assert_eq!(eval(r#"s := "é"; string([]byte{s[0], s[1]}) == s"#), Value::Bool(true));
}

#[test]
fn range_over_invalid_utf8_yields_replacement_runes() {
    let src = r#"n := 0; for _, r := range "a\xffb" { if r == '\uFFFD' { n = n + 1 } }; n"#;
    assert_eq!(eval(src), Value::int(1));
}

#[test]
fn array_literals() {
    assert_eq!(eval("[...]int{1, 2, 3}"), ints(&[1, 2, 3]));
    assert_eq!(eval("[5]int{1, 2}"), ints(&[1, 2, 0, 0, 0]));
    assert_eq!(eval("[]int{2: 7}"), ints(&[0, 0, 7]));
    assert_eq!(
        eval("[][]int{{1}, {2, 3}}"),
        Value::slice(Type::slice(Type::INT), vec![ints(&[1]), ints(&[2, 3])])
    );
}

// Structs and methods

#[test]
fn declared_struct_types_are_named() {
    let src = r#"type Animal struct { Name string; Legs int }
a := Animal{Name: "Rex", Legs: 4}
a"#;
    let Value::Struct(animal) = eval(src) else {
        panic!("expected a struct");
    };
    assert_eq!(animal.struct_type().name(), Some("Animal"));
    assert_eq!(animal.field("Name"), Some(&Value::string("Rex")));
    assert_eq!(animal.field("Legs"), Some(&Value::int(4)));
}

#[test]
fn struct_literal_errors() {
    assert!(matches!(
        eval_err("type P struct { X, Y int }; P{1}"),
        EvalErrorKind::Type { .. }
    ));
    assert!(matches!(
        eval_err("type P struct { X, Y int }; P{X: 1, 2}"),
        EvalErrorKind::Type { .. }
    ));
    assert!(matches!(
        eval_err("type P struct { X int }; P{Z: 1}"),
        EvalErrorKind::NoSuchMember { .. }
    ));
}

#[test]
fn field_assignment_writes_back_through_nested_structs() {
    let src = "type In struct { V int }
type Out struct { I In }
o := Out{I: In{V: 1}}
o.I.V = 5
o.I.V";
    assert_eq!(eval(src), Value::int(5));
}

#[test]
fn references_share_fields() {
    let src = "type P struct { X int }; p := &P{X: 1}; q := p; q.X = 7; p.X";
    assert_eq!(eval(src), Value::int(7));
    let src = "type P struct { X int }; p := &P{X: 1}; *p = P{X: 3}; p.X";
    assert_eq!(eval(src), Value::int(3));
}

#[test]
fn host_methods_receive_the_receiver() {
    let dog = StructType::named(
        "Dog",
        vec![StructField {
            name: "Name".into(),
            ty: Type::String,
        }],
    )
    .with_method(
        "Speak",
        HostFunction::unary("Speak", |this: Value| match this {
            Value::Struct(s) => format!(
                "{} says woof",
                s.field("Name").and_then(Value::as_str).unwrap_or_default()
            ),
            _ => String::new(),
        }),
    );
    let env = Environment::new();
    env.register_type("Dog", dog.into_type());
    assert_eq!(
        eval_in(&env, r#"d := Dog{Name: "Rex"}; d.Speak()"#),
        Value::string("Rex says woof")
    );
}

// Calls

#[test]
fn host_functions_are_called_with_positional_arguments() {
    let env = Environment::new();
    env.register("Add", HostFunction::binary("Add", |a: i64, b: i64| a + b));
    assert_eq!(eval_in(&env, "Add(1, 2) * 2"), Value::int(6));
    assert!(matches!(
        env.eval("Add(1)"),
        Err(Error::Eval(err)) if matches!(err.kind, EvalErrorKind::ArityMismatch { .. })
    ));
}

#[test]
fn conversions_use_type_values() {
    assert_eq!(eval("float64(3) / 2"), Value::float(1.5));
    assert!(matches!(
        eval_err("int(1, 2)"),
        EvalErrorKind::Conversion { .. }
    ));
}

#[test]
fn calling_a_non_function() {
    assert_eq!(
        eval_err("x := 1; x()"),
        EvalErrorKind::NotCallable {
            type_name: "int".into()
        }
    );
    assert_eq!(
        eval_err("x := 1; x(missing)"),
        EvalErrorKind::NotCallable {
            type_name: "int".into()
        }
    );
}

#[test]
fn non_functions_are_rejected_before_arguments_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let env = Environment::new();
    let counter = Arc::clone(&calls);
    env.register(
        "tick",
        HostFunction::raw("tick", Arity::Fixed(0), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::int(0))
        }),
    );
    assert!(env.eval("x := 1; x(tick())").is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(eval_in(&env, "tick()"), Value::int(0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// Errors and limits

#[test]
fn import_is_rejected() {
    assert_eq!(
        eval_err(r#"import "fmt""#),
        EvalErrorKind::UnsupportedImport { path: "fmt".into() }
    );
}

#[test]
fn errors_point_at_the_failing_expression() {
    let src = "a := 1\nb := a + c";
    let Err(err) = Environment::new().eval(src) else {
        panic!("expected an error");
    };
    assert_eq!(err.render(src), "2:10: undefined: c");
}

#[test]
fn syntax_errors_are_parse_errors() {
    assert!(matches!(Environment::new().eval("a := "), Err(Error::Parse(_))));
}

#[test]
fn step_budget_stops_runaway_loops() {
    let config = EvalConfig::default().max_steps(100);
    let result = Environment::new().eval_with("for { }", &config);
    assert_eq!(
        result.map_err(|err| err.eval_kind().cloned()),
        Err(Some(EvalErrorKind::StepBudgetExceeded { limit: 100 }))
    );
}

#[test]
fn errors_leave_earlier_effects_in_place() {
    let env = Environment::new();
    assert!(env.eval("x := 1; x = 2; y").is_err());
    assert_eq!(env.get("x"), Some(Value::int(2)));
}

// JSON

#[test]
fn to_json_encodes_bindings() {
    let env = Environment::new();
    eval_in(&env, r#"m := map[string]int{"b": 2, "a": 1}; c := make(chan int)"#);
    assert_eq!(env.to_json("m"), r#"{"a":1,"b":2}"#);
    assert_eq!(env.to_json("c"), "null");
    assert_eq!(env.to_json("missing"), "null");
}

#[test]
fn assemble_evaluates_template_values() {
    let env = Environment::new();
    env.register("Add", HostFunction::binary("Add", |a: i64, b: i64| a + b));
    env.set("x", Value::int(3));
    assert_eq!(
        env.assemble(r#"{"sum": Add(1, 2), "next": x + 1, "name": "golite"}"#),
        Ok(r#"{"name":"golite","next":4,"sum":3}"#.to_string())
    );
}

#[test]
fn assemble_errors_point_into_the_template() {
    let template = r#"{"a": missing}"#;
    let Err(err) = Environment::new().assemble(template) else {
        panic!("expected an error");
    };
    assert_eq!(err.render(template), "1:7: undefined: missing");
}
