//! Type descriptors and the builtin type-name registry.
//!
//! Types are immutable and cheap to clone: composite types share their
//! component types through `Arc`. Structural types compare by shape; named
//! struct types compare by name and shape.

use crate::function::HostFunction;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Signed integer kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntKind {
    Int,
    Int8,
    Int16,
    /// Also spelled `rune`.
    Int32,
    Int64,
}

impl IntKind {
    pub const fn name(self) -> &'static str {
        match self {
            IntKind::Int => "int",
            IntKind::Int8 => "int8",
            IntKind::Int16 => "int16",
            IntKind::Int32 => "int32",
            IntKind::Int64 => "int64",
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            IntKind::Int8 => 8,
            IntKind::Int16 => 16,
            IntKind::Int32 => 32,
            IntKind::Int | IntKind::Int64 => 64,
        }
    }

    /// Truncate to the kind's width, two's complement.
    pub const fn wrap(self, v: i64) -> i64 {
        match self {
            IntKind::Int8 => v as i8 as i64,
            IntKind::Int16 => v as i16 as i64,
            IntKind::Int32 => v as i32 as i64,
            IntKind::Int | IntKind::Int64 => v,
        }
    }

    /// Whether `v` is representable without truncation.
    pub fn fits(self, v: i128) -> bool {
        let bits = self.bits();
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        (min..=max).contains(&v)
    }
}

/// Unsigned integer kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UintKind {
    Uint,
    /// Also spelled `byte`.
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
}

impl UintKind {
    pub const fn name(self) -> &'static str {
        match self {
            UintKind::Uint => "uint",
            UintKind::Uint8 => "uint8",
            UintKind::Uint16 => "uint16",
            UintKind::Uint32 => "uint32",
            UintKind::Uint64 => "uint64",
            UintKind::Uintptr => "uintptr",
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            UintKind::Uint8 => 8,
            UintKind::Uint16 => 16,
            UintKind::Uint32 => 32,
            UintKind::Uint | UintKind::Uint64 | UintKind::Uintptr => 64,
        }
    }

    pub const fn wrap(self, v: u64) -> u64 {
        match self {
            UintKind::Uint8 => v as u8 as u64,
            UintKind::Uint16 => v as u16 as u64,
            UintKind::Uint32 => v as u32 as u64,
            UintKind::Uint | UintKind::Uint64 | UintKind::Uintptr => v,
        }
    }

    pub fn fits(self, v: i128) -> bool {
        let max = (1i128 << self.bits()) - 1;
        (0..=max).contains(&v)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub const fn name(self) -> &'static str {
        match self {
            FloatKind::F32 => "float32",
            FloatKind::F64 => "float64",
        }
    }

    /// Round to the kind's precision.
    pub fn round(self, v: f64) -> f64 {
        match self {
            FloatKind::F32 => f64::from(v as f32),
            FloatKind::F64 => v,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplexKind {
    C64,
    C128,
}

impl ComplexKind {
    pub const fn name(self) -> &'static str {
        match self {
            ComplexKind::C64 => "complex64",
            ComplexKind::C128 => "complex128",
        }
    }

    /// Float kind of each component.
    pub const fn part(self) -> FloatKind {
        match self {
            ComplexKind::C64 => FloatKind::F32,
            ComplexKind::C128 => FloatKind::F64,
        }
    }
}

/// A named struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
}

/// Struct layout plus an optional name and method table.
///
/// Methods are attached while building the type and never change after it
/// is shared.
#[derive(Clone)]
pub struct StructType {
    name: Option<String>,
    fields: Vec<StructField>,
    methods: FxHashMap<String, HostFunction>,
}

impl StructType {
    /// An ad-hoc (anonymous) struct type.
    pub fn new(fields: Vec<StructField>) -> Self {
        StructType {
            name: None,
            fields,
            methods: FxHashMap::default(),
        }
    }

    /// A named struct type.
    pub fn named(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        StructType {
            name: Some(name.into()),
            fields,
            methods: FxHashMap::default(),
        }
    }

    /// Attach a method. The function receives the receiver as its first
    /// argument.
    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, method: HostFunction) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    /// The same layout under a new name, keeping the methods.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        StructType {
            name: Some(name.into()),
            fields: self.fields.clone(),
            methods: self.methods.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&HostFunction> {
        self.methods.get(name)
    }

    /// Wrap into a shared `Type`.
    pub fn into_type(self) -> Type {
        Type::Struct(Arc::new(self))
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for StructType {}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Runtime type descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int(IntKind),
    Uint(UintKind),
    Float(FloatKind),
    Complex(ComplexKind),
    String,
    /// `interface{}` / `any`: accepts every value.
    Any,
    /// Type of the bare `nil` literal.
    Nil,
    /// The builtin `error` interface.
    Error,
    Slice(Arc<Type>),
    Map(Arc<Type>, Arc<Type>),
    Chan(Arc<Type>),
    Struct(Arc<StructType>),
    Pointer(Arc<Type>),
    /// Host functions and bound methods.
    Func,
    /// Type of a type value (`int`, `[]string` used as an expression).
    Type,
    /// Multi-result tuple returned by `return a, b`.
    Tuple,
}

impl Type {
    pub fn slice(elem: Type) -> Type {
        Type::Slice(Arc::new(elem))
    }

    pub fn map(key: Type, elem: Type) -> Type {
        Type::Map(Arc::new(key), Arc::new(elem))
    }

    pub fn chan(elem: Type) -> Type {
        Type::Chan(Arc::new(elem))
    }

    pub fn pointer(pointee: Type) -> Type {
        Type::Pointer(Arc::new(pointee))
    }

    /// `int`, the default type of untyped integer constants.
    pub const INT: Type = Type::Int(IntKind::Int);
    /// `float64`, the default type of untyped float constants.
    pub const FLOAT64: Type = Type::Float(FloatKind::F64);
    /// `uint8` / `byte`.
    pub const BYTE: Type = Type::Uint(UintKind::Uint8);
    /// `int32` / `rune`.
    pub const RUNE: Type = Type::Int(IntKind::Int32);

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Uint(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Int(_) | Type::Uint(_) | Type::Float(_) | Type::Complex(_)
        )
    }

    /// Element type of a slice, map or channel.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Slice(elem) | Type::Chan(elem) | Type::Map(_, elem) | Type::Pointer(elem) => {
                Some(elem.as_ref())
            }
            _ => None,
        }
    }

    /// Struct layout of a struct or pointer-to-struct type.
    pub fn struct_type(&self) -> Option<&Arc<StructType>> {
        match self {
            Type::Struct(st) => Some(st),
            Type::Pointer(inner) => match &**inner {
                Type::Struct(st) => Some(st),
                _ => None,
            },
            _ => None,
        }
    }

    /// Short kind name used in diagnostics (`slice`, `map`, `struct`...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::Int(k) => k.name(),
            Type::Uint(k) => k.name(),
            Type::Float(k) => k.name(),
            Type::Complex(k) => k.name(),
            Type::String => "string",
            Type::Any => "interface",
            Type::Nil => "nil",
            Type::Error => "error",
            Type::Slice(_) => "slice",
            Type::Map(..) => "map",
            Type::Chan(_) => "chan",
            Type::Struct(_) => "struct",
            Type::Pointer(_) => "ptr",
            Type::Func => "func",
            Type::Type => "type",
            Type::Tuple => "tuple",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Slice(elem) => write!(f, "[]{elem}"),
            Type::Map(key, elem) => write!(f, "map[{key}]{elem}"),
            Type::Chan(elem) => write!(f, "chan {elem}"),
            Type::Pointer(inner) => write!(f, "*{inner}"),
            Type::Any => f.write_str("interface {}"),
            Type::Struct(st) => match st.name() {
                Some(name) => f.write_str(name),
                None => {
                    f.write_str("struct {")?;
                    for (i, field) in st.fields().iter().enumerate() {
                        let sep = if i == 0 { " " } else { "; " };
                        write!(f, "{sep}{} {}", field.name, field.ty)?;
                    }
                    if !st.fields().is_empty() {
                        f.write_str(" ")?;
                    }
                    f.write_str("}")
                }
            },
            other => f.write_str(other.kind_name()),
        }
    }
}

static BUILTIN_TYPES: LazyLock<FxHashMap<&'static str, Type>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    map.insert("bool", Type::Bool);
    map.insert("byte", Type::BYTE);
    map.insert("rune", Type::RUNE);
    map.insert("string", Type::String);
    map.insert("int", Type::INT);
    map.insert("int8", Type::Int(IntKind::Int8));
    map.insert("int16", Type::Int(IntKind::Int16));
    map.insert("int32", Type::Int(IntKind::Int32));
    map.insert("int64", Type::Int(IntKind::Int64));
    map.insert("uint", Type::Uint(UintKind::Uint));
    map.insert("uint8", Type::Uint(UintKind::Uint8));
    map.insert("uint16", Type::Uint(UintKind::Uint16));
    map.insert("uint32", Type::Uint(UintKind::Uint32));
    map.insert("uint64", Type::Uint(UintKind::Uint64));
    map.insert("uintptr", Type::Uint(UintKind::Uintptr));
    map.insert("float32", Type::Float(FloatKind::F32));
    map.insert("float64", Type::FLOAT64);
    map.insert("complex64", Type::Complex(ComplexKind::C64));
    map.insert("complex128", Type::Complex(ComplexKind::C128));
    map.insert("error", Type::Error);
    map.insert("any", Type::Any);
    map
});

/// Look up a predeclared type name.
pub fn builtin_type(name: &str) -> Option<&'static Type> {
    BUILTIN_TYPES.get(name)
}

#[cfg(test)]
mod tests;
