//! Composite value payloads: complex numbers, slices, maps, structs,
//! struct references and channels.
//!
//! Slices, maps, references and channels share their storage between
//! copies, as the source language does. Struct values are plain values:
//! writing a field produces a new struct.

use super::{Heap, MapKey, Value};
use crate::types::{StructType, Type};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Complex number with `f64` components (rounded to `f32` for `complex64`).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    #[must_use]
    pub fn add(self, o: Complex) -> Complex {
        Complex::new(self.re + o.re, self.im + o.im)
    }

    #[must_use]
    pub fn sub(self, o: Complex) -> Complex {
        Complex::new(self.re - o.re, self.im - o.im)
    }

    #[must_use]
    pub fn mul(self, o: Complex) -> Complex {
        Complex::new(
            self.re * o.re - self.im * o.im,
            self.re * o.im + self.im * o.re,
        )
    }

    #[must_use]
    pub fn div(self, o: Complex) -> Complex {
        let denom = o.re * o.re + o.im * o.im;
        Complex::new(
            (self.re * o.re + self.im * o.im) / denom,
            (self.im * o.re - self.re * o.im) / denom,
        )
    }

    #[must_use]
    pub fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

/// Slice: element type plus shared, growable storage.
#[derive(Clone, Debug)]
pub struct SliceValue {
    elem: Type,
    items: Heap<RwLock<Vec<Value>>>,
}

impl SliceValue {
    pub(crate) fn new(elem: Type, items: Vec<Value>) -> Self {
        SliceValue {
            elem,
            items: Heap::new(RwLock::new(items)),
        }
    }

    pub fn elem(&self) -> &Type {
        &self.elem
    }

    pub fn slice_type(&self) -> Type {
        Type::slice(self.elem.clone())
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Overwrite an element in place; `false` when out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.items.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    /// Run `f` over the elements under a read lock.
    pub fn with_items<R>(&self, f: impl FnOnce(&[Value]) -> R) -> R {
        f(&self.items.read())
    }

    pub fn ptr_eq(&self, other: &SliceValue) -> bool {
        self.items.ptr_eq(&other.items)
    }
}

/// Map: key and element types plus shared storage.
#[derive(Clone, Debug)]
pub struct MapValue {
    key: Type,
    elem: Type,
    entries: Heap<RwLock<FxHashMap<MapKey, Value>>>,
}

impl MapValue {
    pub(crate) fn new(key: Type, elem: Type, entries: FxHashMap<MapKey, Value>) -> Self {
        MapValue {
            key,
            elem,
            entries: Heap::new(RwLock::new(entries)),
        }
    }

    pub fn key_type(&self) -> &Type {
        &self.key
    }

    pub fn elem(&self) -> &Type {
        &self.elem
    }

    pub fn map_type(&self) -> Type {
        Type::map(self.key.clone(), self.elem.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn get(&self, key: &MapKey) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: MapKey, value: Value) {
        self.entries.write().insert(key, value);
    }

    /// Entries sorted by key, the order used for printing and JSON.
    pub fn sorted_entries(&self) -> Vec<(MapKey, Value)> {
        let mut entries: Vec<(MapKey, Value)> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Snapshot of the entries in storage order.
    pub fn entries(&self) -> Vec<(MapKey, Value)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &MapValue) -> bool {
        self.entries.ptr_eq(&other.entries)
    }
}

/// Struct value with value semantics.
#[derive(Clone, Debug)]
pub struct StructValue {
    ty: Arc<StructType>,
    fields: Heap<Vec<Value>>,
}

impl StructValue {
    pub(crate) fn new(ty: Arc<StructType>, fields: Vec<Value>) -> Self {
        StructValue {
            ty,
            fields: Heap::new(fields),
        }
    }

    pub fn struct_type(&self) -> &Arc<StructType> {
        &self.ty
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.ty.field_index(name).and_then(|i| self.fields.get(i))
    }

    /// A copy with one field replaced.
    #[must_use]
    pub fn with_field(&self, index: usize, value: Value) -> StructValue {
        let mut fields: Vec<Value> = self.fields.to_vec();
        if let Some(slot) = fields.get_mut(index) {
            *slot = value;
        }
        StructValue::new(Arc::clone(&self.ty), fields)
    }
}

/// Reference to a struct (`&T{...}`); copies alias the same fields.
#[derive(Clone, Debug)]
pub struct StructRef {
    ty: Arc<StructType>,
    fields: Heap<RwLock<Vec<Value>>>,
}

impl StructRef {
    pub(crate) fn new(ty: Arc<StructType>, fields: Vec<Value>) -> Self {
        StructRef {
            ty,
            fields: Heap::new(RwLock::new(fields)),
        }
    }

    pub fn struct_type(&self) -> &Arc<StructType> {
        &self.ty
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        let index = self.ty.field_index(name)?;
        self.fields.read().get(index).cloned()
    }

    /// Overwrite a field in place; `false` for an unknown index.
    pub fn set_field(&self, index: usize, value: Value) -> bool {
        match self.fields.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the referenced struct.
    pub fn load(&self) -> StructValue {
        StructValue::new(Arc::clone(&self.ty), self.fields.read().clone())
    }

    pub fn ptr_eq(&self, other: &StructRef) -> bool {
        self.fields.ptr_eq(&other.fields)
    }

    pub fn addr(&self) -> usize {
        self.fields.addr()
    }
}

/// Channel handle. Only creation, `len` and `cap` are supported.
#[derive(Clone, Debug)]
pub struct ChanValue {
    elem: Type,
    cap: usize,
    buffer: Heap<Mutex<VecDeque<Value>>>,
}

impl ChanValue {
    pub(crate) fn new(elem: Type, cap: usize) -> Self {
        ChanValue {
            elem,
            cap,
            buffer: Heap::new(Mutex::new(VecDeque::with_capacity(cap))),
        }
    }

    pub fn elem(&self) -> &Type {
        &self.elem
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Number of buffered elements.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn ptr_eq(&self, other: &ChanValue) -> bool {
        self.buffer.ptr_eq(&other.buffer)
    }

    pub fn addr(&self) -> usize {
        self.buffer.addr()
    }
}
