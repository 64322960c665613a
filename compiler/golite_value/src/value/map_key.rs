//! Hashable form of comparable values, used as map keys.

use super::{ChanValue, Complex, Heap, StructRef, StructValue, Value};
use crate::errors::{type_error, EvalError};
use crate::types::{ComplexKind, FloatKind, IntKind, StructType, UintKind};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A comparable value in hashable form.
///
/// Floats are stored by bit pattern with `-0.0` folded into `0.0`; every
/// key converts back to the value it came from.
#[derive(Clone, Debug)]
pub enum MapKey {
    Nil,
    Bool(bool),
    Int(i64, IntKind),
    Uint(u64, UintKind),
    Float(u64, FloatKind),
    Complex(u64, u64, ComplexKind),
    Str(Heap<Vec<u8>>),
    Struct(Arc<StructType>, Vec<MapKey>),
    Ref(StructRef),
    Chan(ChanValue),
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl MapKey {
    /// Convert a comparable value; slices, maps and functions are rejected.
    pub fn from_value(value: &Value) -> Result<MapKey, EvalError> {
        let key = match value {
            Value::Nil => MapKey::Nil,
            Value::Bool(b) => MapKey::Bool(*b),
            Value::Int(v, k) => MapKey::Int(*v, *k),
            Value::Uint(v, k) => MapKey::Uint(*v, *k),
            Value::Float(v, k) => MapKey::Float(float_bits(*v), *k),
            Value::Complex(c, k) => MapKey::Complex(float_bits(c.re), float_bits(c.im), *k),
            Value::Str(s) => MapKey::Str(s.clone()),
            Value::Struct(s) => {
                let fields = s
                    .fields()
                    .iter()
                    .map(MapKey::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                MapKey::Struct(Arc::clone(s.struct_type()), fields)
            }
            Value::Ref(r) => MapKey::Ref(r.clone()),
            Value::Chan(c) => MapKey::Chan(c.clone()),
            other => {
                return Err(type_error(format!(
                    "invalid map key type {}",
                    other.type_of()
                )))
            }
        };
        Ok(key)
    }

    /// String key.
    pub fn from_string(s: impl Into<String>) -> MapKey {
        MapKey::Str(Heap::new(s.into().into_bytes()))
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Nil => Value::Nil,
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(v, k) => Value::Int(*v, *k),
            MapKey::Uint(v, k) => Value::Uint(*v, *k),
            MapKey::Float(bits, k) => Value::Float(f64::from_bits(*bits), *k),
            MapKey::Complex(re, im, k) => Value::Complex(
                Complex::new(f64::from_bits(*re), f64::from_bits(*im)),
                *k,
            ),
            MapKey::Str(s) => Value::Str(s.clone()),
            MapKey::Struct(ty, fields) => Value::Struct(StructValue::new(
                Arc::clone(ty),
                fields.iter().map(MapKey::to_value).collect(),
            )),
            MapKey::Ref(r) => Value::Ref(r.clone()),
            MapKey::Chan(c) => Value::Chan(c.clone()),
        }
    }

    /// The key as text, when it is a valid UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::Str(s) => std::str::from_utf8(s).ok(),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            MapKey::Nil => 0,
            MapKey::Bool(_) => 1,
            MapKey::Int(..) => 2,
            MapKey::Uint(..) => 3,
            MapKey::Float(..) => 4,
            MapKey::Complex(..) => 5,
            MapKey::Str(_) => 6,
            MapKey::Struct(..) => 7,
            MapKey::Ref(_) => 8,
            MapKey::Chan(_) => 9,
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapKey::Nil, MapKey::Nil) => true,
            (MapKey::Bool(a), MapKey::Bool(b)) => a == b,
            (MapKey::Int(a, ka), MapKey::Int(b, kb)) => a == b && ka == kb,
            (MapKey::Uint(a, ka), MapKey::Uint(b, kb)) => a == b && ka == kb,
            (MapKey::Float(a, ka), MapKey::Float(b, kb)) => a == b && ka == kb,
            (MapKey::Complex(ar, ai, ka), MapKey::Complex(br, bi, kb)) => {
                ar == br && ai == bi && ka == kb
            }
            (MapKey::Str(a), MapKey::Str(b)) => a == b,
            (MapKey::Struct(ta, fa), MapKey::Struct(tb, fb)) => ta == tb && fa == fb,
            (MapKey::Ref(a), MapKey::Ref(b)) => a.ptr_eq(b),
            (MapKey::Chan(a), MapKey::Chan(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for MapKey {}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            MapKey::Nil => {}
            MapKey::Bool(b) => b.hash(state),
            MapKey::Int(v, k) => {
                v.hash(state);
                k.hash(state);
            }
            MapKey::Uint(v, k) => {
                v.hash(state);
                k.hash(state);
            }
            MapKey::Float(bits, k) => {
                bits.hash(state);
                k.hash(state);
            }
            MapKey::Complex(re, im, k) => {
                re.hash(state);
                im.hash(state);
                k.hash(state);
            }
            MapKey::Str(s) => s.as_slice().hash(state),
            MapKey::Struct(ty, fields) => {
                ty.name().hash(state);
                fields.hash(state);
            }
            MapKey::Ref(r) => r.addr().hash(state),
            MapKey::Chan(c) => c.addr().hash(state),
        }
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MapKey::Bool(a), MapKey::Bool(b)) => a.cmp(b),
            (MapKey::Int(a, ka), MapKey::Int(b, kb)) => a.cmp(b).then(ka.cmp(kb)),
            (MapKey::Uint(a, ka), MapKey::Uint(b, kb)) => a.cmp(b).then(ka.cmp(kb)),
            (MapKey::Float(a, ka), MapKey::Float(b, kb)) => f64::from_bits(*a)
                .total_cmp(&f64::from_bits(*b))
                .then(ka.cmp(kb)),
            (MapKey::Complex(ar, ai, ka), MapKey::Complex(br, bi, kb)) => f64::from_bits(*ar)
                .total_cmp(&f64::from_bits(*br))
                .then(f64::from_bits(*ai).total_cmp(&f64::from_bits(*bi)))
                .then(ka.cmp(kb)),
            (MapKey::Str(a), MapKey::Str(b)) => a.as_slice().cmp(b.as_slice()),
            (MapKey::Struct(ta, fa), MapKey::Struct(tb, fb)) => {
                ta.name().cmp(&tb.name()).then_with(|| fa.cmp(fb))
            }
            (MapKey::Ref(a), MapKey::Ref(b)) => a.addr().cmp(&b.addr()),
            (MapKey::Chan(a), MapKey::Chan(b)) => a.addr().cmp(&b.addr()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
