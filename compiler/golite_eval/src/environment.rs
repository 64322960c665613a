//! Host-visible variable scopes.
//!
//! An `Environment` is a handle to one scope: a name-to-value mapping plus
//! an owning link to at most one parent. Children never copy their parent's
//! bindings, and parents never reference their children, so the chain has
//! no cycles.
//!
//! # Thread Safety
//!
//! Each scope's mapping sits behind a `parking_lot::RwLock` taken per
//! operation. Concurrent evaluations sharing a root are memory-safe; a
//! read-modify-write spanning two statements is not atomic.

use golite_value::{HostFunction, Type, Value};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

struct ScopeData {
    bindings: RwLock<FxHashMap<String, Value>>,
    parent: Option<Environment>,
}

/// A scope in the binding chain. Cloning shares the scope.
#[derive(Clone)]
pub struct Environment {
    data: Arc<ScopeData>,
}

impl Environment {
    /// A fresh root scope. Builtins come from the shared registry and are
    /// not stored here.
    pub fn new() -> Self {
        Environment {
            data: Arc::new(ScopeData {
                bindings: RwLock::new(FxHashMap::default()),
                parent: None,
            }),
        }
    }

    /// A child scope whose lookups fall back to `self`.
    #[must_use]
    pub fn new_child(&self) -> Self {
        Environment {
            data: Arc::new(ScopeData {
                bindings: RwLock::new(FxHashMap::default()),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn parent(&self) -> Option<&Environment> {
        self.data.parent.as_ref()
    }

    /// Look `name` up in this scope, then its ancestors.
    ///
    /// `None` means unbound; a bound `nil` is `Some(Value::Nil)`.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(value) = env.data.bindings.read().get(name) {
                return Some(value.clone());
            }
            scope = env.parent();
        }
        None
    }

    /// Overwrite `name` in the nearest scope that binds it, or bind it here
    /// when no scope in the chain does.
    pub fn set(&self, name: &str, value: Value) {
        if let Err(value) = self.assign(name, value) {
            self.define(name, value);
        }
    }

    /// Bind `name` in this scope, shadowing any ancestor binding.
    pub fn define(&self, name: &str, value: Value) {
        self.data.bindings.write().insert(name.to_string(), value);
    }

    /// Overwrite an existing binding in the chain. Hands the value back
    /// when no scope binds `name`.
    pub(crate) fn assign(&self, name: &str, value: Value) -> Result<(), Value> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(slot) = env.data.bindings.write().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            scope = env.parent();
        }
        Err(value)
    }

    /// Whether `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if env.data.bindings.read().contains_key(name) {
                return true;
            }
            scope = env.parent();
        }
        false
    }

    /// Every visible name, deduplicated, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        let mut scope = Some(self);
        while let Some(env) = scope {
            for name in env.data.bindings.read().keys() {
                if seen.insert(name.clone()) {
                    keys.push(name.clone());
                }
            }
            scope = env.parent();
        }
        keys
    }

    /// Bind a host function under `name` in this scope.
    pub fn register(&self, name: &str, function: HostFunction) {
        self.define(name, Value::Func(function));
    }

    /// Bind a type under `name` in this scope, for conversions, composite
    /// literals and `make`.
    pub fn register_type(&self, name: &str, ty: Type) {
        self.define(name, Value::Type(ty));
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.data.bindings.read();
        let mut names: Vec<&String> = bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("parent", &self.data.parent)
            .finish()
    }
}
