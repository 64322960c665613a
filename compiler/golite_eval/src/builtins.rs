//! Builtin functions and constants: `nil`, `true`, `false`, `append`,
//! `make`, `len`.
//!
//! The registry is built once and shared read-only by every evaluation.
//! Identifier resolution consults it after builtin type names and before
//! the environment.

use golite_value::{
    append_type, argument_type, arity_mismatch, assign_exact, check_elements, type_error,
    unsupported_make, Arity, EvalError, EvalResult, HostFunction, Type, Value,
};
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

static BUILTINS: LazyLock<FxHashMap<&'static str, Value>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    map.insert("nil", Value::Nil);
    map.insert("true", Value::Bool(true));
    map.insert("false", Value::Bool(false));
    map.insert(
        "append",
        Value::Func(HostFunction::raw("append", Arity::Variadic { min: 1 }, append)),
    );
    map.insert(
        "make",
        Value::Func(HostFunction::raw("make", Arity::Variadic { min: 1 }, make)),
    );
    map.insert("len", Value::Func(HostFunction::raw("len", Arity::Fixed(1), len)));
    map
});

/// Look up a builtin function or constant.
pub fn lookup(name: &str) -> Option<&'static Value> {
    BUILTINS.get(name)
}

/// Whether `f` is the builtin `append`.
pub fn is_append(f: &HostFunction) -> bool {
    matches!(lookup("append"), Some(Value::Func(builtin)) if builtin.ptr_eq(f))
}

/// `append(seq, elems...)`: a new slice; `seq` is left untouched. Each
/// element must already have the slice's element type.
fn append(args: &[Value]) -> EvalResult {
    let Some((first, elems)) = args.split_first() else {
        return Err(arity_mismatch("append", Arity::Variadic { min: 1 }, 0));
    };
    let Value::Slice(seq) = first else {
        return Err(argument_type("append", 1, "slice", first.type_of()));
    };
    let elem = seq.elem();
    let mut items = seq.to_vec();
    items.reserve(elems.len());
    for value in elems {
        let converted = assign_exact(value.clone(), elem)
            .map_err(|_| append_type(value.type_of(), seq.slice_type()))?;
        items.push(converted);
    }
    Ok(Value::slice(elem.clone(), items))
}

/// `make(T, sizes...)` for slices, maps and channels.
fn make(args: &[Value]) -> EvalResult {
    let Some((first, sizes)) = args.split_first() else {
        return Err(arity_mismatch("make", Arity::Variadic { min: 1 }, 0));
    };
    let Value::Type(ty) = first else {
        return Err(type_error(format!("{first} is not a type")));
    };

    let sizes = sizes
        .iter()
        .enumerate()
        .map(|(i, v)| size_arg(v, i + 2))
        .collect::<Result<Vec<_>, _>>()?;

    match ty {
        Type::Slice(elem) => {
            let (len, cap) = match sizes.as_slice() {
                [len] => (*len, *len),
                [len, cap] => (*len, *cap),
                _ => return Err(arity_mismatch("make", "2 or 3", args.len())),
            };
            if len > cap {
                return Err(type_error(format!(
                    "invalid argument: length and capacity swapped ({len} > {cap})"
                )));
            }
            check_elements(cap as u64)?;
            Value::zero_slice((**elem).clone(), len)
        }
        Type::Map(..) => {
            if sizes.len() > 1 {
                return Err(arity_mismatch("make", "1 or 2", args.len()));
            }
            Ok(Value::zero(ty))
        }
        Type::Chan(elem) => match sizes.as_slice() {
            [] => Ok(Value::chan((**elem).clone(), 0)),
            [cap] => Ok(Value::chan((**elem).clone(), check_elements(*cap as u64)?)),
            _ => Err(arity_mismatch("make", "1 or 2", args.len())),
        },
        other => Err(unsupported_make(other)),
    }
}

/// A non-negative integer size argument at 1-based `position`.
fn size_arg(value: &Value, position: usize) -> Result<usize, EvalError> {
    let n = match value {
        Value::Int(v, _) => *v,
        Value::Uint(v, _) => i64::try_from(*v).unwrap_or(i64::MAX),
        other => return Err(argument_type("make", position, "int", other.type_of())),
    };
    usize::try_from(n).map_err(|_| {
        type_error(format!(
            "invalid argument: index {n} (constant of type int) must not be negative"
        ))
    })
}

/// `len(x)` for slices, maps, strings (in bytes) and channels.
fn len(args: &[Value]) -> EvalResult {
    let [value] = args else {
        return Err(arity_mismatch("len", 1, args.len()));
    };
    let n = match value {
        Value::Slice(s) => s.len(),
        Value::Map(m) => m.len(),
        Value::Str(s) => s.len(),
        Value::Chan(c) => c.len(),
        other => {
            return Err(type_error(format!(
                "invalid argument: {other} (variable of type {}) for built-in len",
                other.type_of()
            )))
        }
    };
    Ok(Value::int(i64::try_from(n).unwrap_or(i64::MAX)))
}

#[cfg(test)]
mod tests;
