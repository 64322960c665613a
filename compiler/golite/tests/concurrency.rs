//! Evaluations on several threads sharing one root environment.

use golite::{Environment, HostFunction, Value};
use pretty_assertions::assert_eq;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn public_types_are_thread_safe() {
    assert_send_sync::<Environment>();
    assert_send_sync::<Value>();
    assert_send_sync::<HostFunction>();
}

#[test]
fn children_of_a_shared_root_evaluate_in_parallel() {
    let root = Environment::new();
    root.set("base", Value::int(100));
    root.register("Square", HostFunction::unary("Square", |x: i64| x * x));

    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let child = root.new_child();
            thread::spawn(move || {
                child.set("i", Value::int(i));
                child.eval("total := 0; for k := 0; k < 50; k++ { total += Square(i) }; base + total")
            })
        })
        .collect();

    for (i, handle) in (0..8i64).zip(handles) {
        let result = handle.join().map_err(|_| "thread panicked");
        assert_eq!(result.map(Result::ok), Ok(Some(Value::int(100 + 50 * i * i))));
    }
    assert_eq!(root.get("total"), None);
}

#[test]
fn shared_slices_see_each_others_writes() {
    let root = Environment::new();
    assert!(root.eval("cells := make([]int, 4)").is_ok());

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let env = root.new_child();
            thread::spawn(move || env.eval(&format!("cells[{i}] = {i} * 10")).is_ok())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().ok(), Some(true));
    }

    assert_eq!(root.to_json("cells"), "[0,10,20,30]");
}
