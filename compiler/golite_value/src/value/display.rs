//! Default text form of values, matching the source language's `%v` verb.

use super::{Complex, MapKey, Value};
use crate::types::FloatKind;
use std::fmt::{self, Write};

/// Format a float the way `%v` does: shortest digits that round-trip,
/// exponent form when the decimal exponent is below -4 or at least 6.
pub fn format_float(v: f64, kind: FloatKind) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let (digits, exp) = shortest_digits(v.abs(), kind);
    let mut out = String::new();
    if v.is_sign_negative() {
        out.push('-');
    }

    if exp < -4 || exp >= 6 {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exp.unsigned_abs());
    } else if exp >= 0 {
        let int_len = usize::try_from(exp).unwrap_or(0) + 1;
        if digits.len() <= int_len {
            out.push_str(&digits);
            out.extend(std::iter::repeat_n('0', int_len - digits.len()));
        } else {
            let (int_part, frac) = digits.split_at(int_len);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac);
        }
    } else {
        out.push_str("0.");
        let zeros = usize::try_from(-exp - 1).unwrap_or(0);
        out.extend(std::iter::repeat_n('0', zeros));
        out.push_str(&digits);
    }
    out
}

/// Significant digits and decimal exponent of the shortest round-trip form.
fn shortest_digits(v: f64, kind: FloatKind) -> (String, i32) {
    let sci = match kind {
        FloatKind::F32 => format!("{:e}", v as f32),
        FloatKind::F64 => format!("{v:e}"),
    };
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exp.parse().unwrap_or(0))
}

fn write_complex(f: &mut fmt::Formatter<'_>, c: Complex, kind: FloatKind) -> fmt::Result {
    let im = format_float(c.im, kind);
    let sign = if im.starts_with(['-', '+']) { "" } else { "+" };
    write!(f, "({}{sign}{im}i)", format_float(c.re, kind))
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &MapKey) -> fmt::Result {
    write_nested(f, &key.to_value())
}

/// Values inside containers: references print as addresses.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Ref(r) => write!(f, "{:#x}", r.addr()),
        other => write_value(f, other),
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Value]) -> fmt::Result {
    f.write_str("{")?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write_nested(f, field)?;
    }
    f.write_str("}")
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Nil => f.write_str("<nil>"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(v, _) => write!(f, "{v}"),
        Value::Uint(v, _) => write!(f, "{v}"),
        Value::Float(v, kind) => f.write_str(&format_float(*v, *kind)),
        Value::Complex(c, kind) => write_complex(f, *c, kind.part()),
        Value::Str(s) => f.write_str(&String::from_utf8_lossy(s)),
        Value::Slice(s) => s.with_items(|items| {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write_nested(f, item)?;
            }
            f.write_str("]")
        }),
        Value::Map(m) => {
            f.write_str("map[")?;
            for (i, (k, v)) in m.sorted_entries().iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write_key(f, k)?;
                f.write_str(":")?;
                write_nested(f, v)?;
            }
            f.write_str("]")
        }
        Value::Struct(s) => write_fields(f, s.fields()),
        Value::Ref(r) => {
            f.write_str("&")?;
            write_fields(f, r.load().fields())
        }
        Value::Func(func) => write!(f, "{:#x}", func.addr()),
        Value::Chan(c) => write!(f, "{:#x}", c.addr()),
        Value::Type(t) => write!(f, "{t}"),
        Value::Tuple(items) => {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_nested(f, item)?;
            }
            f.write_str(")")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}
