//! Evaluation-internal scopes.
//!
//! Blocks introduced by `for`, `range` and `if` live on an index-addressed
//! stack of frames owned by the running evaluation. Frames are keyed by
//! interned `Name`; the bottom of the stack chains to the host
//! `Environment`, which is keyed by text.

use crate::Environment;
use golite_ir::Name;
use golite_value::Value;
use rustc_hash::FxHashMap;

pub(crate) struct ScopeStack {
    root: Environment,
    frames: Vec<FxHashMap<Name, Value>>,
}

impl ScopeStack {
    pub(crate) fn new(root: Environment) -> Self {
        ScopeStack {
            root,
            frames: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(FxHashMap::default());
        tracing::trace!(depth = self.depth(), "push scope");
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost binding of `name`; `text` is its spelling for the host
    /// environment.
    pub(crate) fn lookup(&self, name: Name, text: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).cloned())
            .or_else(|| self.root.get(text))
    }

    /// Bind in the innermost scope.
    pub(crate) fn define(&mut self, name: Name, text: &str, value: Value) {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.insert(name, value);
            }
            None => self.root.define(text, value),
        }
    }

    /// Overwrite the innermost existing binding. `false` when nothing in the
    /// chain binds `name`.
    pub(crate) fn assign(&mut self, name: Name, text: &str, value: Value) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(&name) {
                *slot = value;
                return true;
            }
        }
        self.root.assign(text, value).is_ok()
    }
}

#[cfg(test)]
mod tests;
