//! JSON interchange.
//!
//! Encoding follows the source language's `encoding/json`: integral floats
//! print without a fraction, map keys are sorted strings, only exported
//! (capitalised) struct fields are written, and `<`, `>`, `&` are escaped.
//! Non-finite floats, complex numbers, functions, channels and type values
//! cannot be encoded.

use crate::types::Type;
use crate::value::{MapKey, Value};
use rustc_hash::FxHashMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Largest magnitude at which an integral float is written as an integer.
const EXACT_INTEGER_LIMIT: f64 = 1e15;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v, _) => serializer.serialize_i64(*v),
            Value::Uint(v, _) => serializer.serialize_u64(*v),
            Value::Float(v, kind) => {
                if !v.is_finite() {
                    return Err(S::Error::custom(format!(
                        "json: unsupported value: {}",
                        crate::value::format_float(*v, *kind)
                    )));
                }
                if v.fract() == 0.0 && v.abs() < EXACT_INTEGER_LIMIT {
                    return serializer.serialize_i64(*v as i64);
                }
                serializer.serialize_f64(*v)
            }
            Value::Str(s) => serializer.serialize_str(&String::from_utf8_lossy(s)),
            Value::Slice(s) => s.with_items(|items| {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }),
            Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut entries = Vec::with_capacity(m.len());
                for (key, value) in m.entries() {
                    entries.push((key_string(&key).map_err(S::Error::custom)?, value));
                }
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Struct(s) => serialize_fields(serializer, s.struct_type().fields(), s.fields()),
            Value::Ref(r) => {
                let loaded = r.load();
                serialize_fields(serializer, loaded.struct_type().fields(), loaded.fields())
            }
            other @ (Value::Complex(..) | Value::Func(_) | Value::Chan(_) | Value::Type(_)) => Err(
                S::Error::custom(format!("json: unsupported type: {}", other.type_of())),
            ),
        }
    }
}

fn key_string(key: &MapKey) -> Result<String, String> {
    match key {
        MapKey::Str(s) => Ok(String::from_utf8_lossy(s).into_owned()),
        MapKey::Int(v, _) => Ok(v.to_string()),
        MapKey::Uint(v, _) => Ok(v.to_string()),
        other => Err(format!(
            "json: unsupported map key type: {}",
            other.to_value().type_of()
        )),
    }
}

fn serialize_fields<S: Serializer>(
    serializer: S,
    fields: &[crate::types::StructField],
    values: &[Value],
) -> Result<S::Ok, S::Error> {
    let exported: Vec<_> = fields
        .iter()
        .zip(values)
        .filter(|(f, _)| f.name.starts_with(|c: char| c.is_uppercase()))
        .collect();
    let mut map = serializer.serialize_map(Some(exported.len()))?;
    for (field, value) in exported {
        map.serialize_entry(&field.name, value)?;
    }
    map.end()
}

/// Encode `value` as compact JSON, or `None` when it cannot be encoded.
pub fn to_json(value: &Value) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(text) => Some(escape_html(&text)),
        Err(err) => {
            tracing::debug!(%err, "value is not representable as JSON");
            None
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

/// Decode JSON into the shapes `encoding/json` produces for an
/// `interface{}` target: `float64` numbers, `[]interface{}` arrays and
/// `map[string]interface{}` objects.
pub fn from_json(text: &str) -> Result<Value, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json_value(parsed))
}

fn from_json_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::float(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => Value::slice(
            Type::Any,
            items.into_iter().map(from_json_value).collect(),
        ),
        serde_json::Value::Object(fields) => {
            let entries: FxHashMap<MapKey, Value> = fields
                .into_iter()
                .map(|(k, v)| (MapKey::from_string(k), from_json_value(v)))
                .collect();
            Value::map(Type::String, Type::Any, entries)
        }
    }
}
