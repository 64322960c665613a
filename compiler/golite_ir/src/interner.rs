//! Per-module string interner.
//!
//! Every parse builds its own interner, so hot-reloaded rules never grow a
//! process-wide table. The interner is frozen once parsing finishes and is
//! then only read by the evaluator.

use super::Name;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StringInterner {
    map: FxHashMap<Arc<str>, Name>,
    strings: Vec<Arc<str>>,
}

impl StringInterner {
    /// Create an interner holding only the empty string.
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), Name::EMPTY);
        StringInterner {
            map,
            strings: vec![empty],
        }
    }

    /// Intern a string, returning its Name.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let name = Name::from_raw(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(Arc::clone(&owned));
        self.map.insert(owned, name);
        name
    }

    /// Look up the string for a Name. Unknown names resolve to `""`.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.index()).map_or("", |s| s)
    }

    /// Shared handle to the interned text, for values that outlive the parse.
    pub fn lookup_shared(&self, name: Name) -> Arc<str> {
        self.strings
            .get(name.index())
            .map_or_else(|| Arc::from(""), Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = StringInterner::new();
        let a = interner.intern("count");
        let b = interner.intern("total");
        assert_eq!(interner.intern("count"), a);
        assert_ne!(a, b);
        assert_eq!(interner.lookup(a), "count");
        assert_eq!(interner.lookup(b), "total");
    }

    #[test]
    fn empty_string_is_preinterned() {
        let mut interner = StringInterner::new();
        assert!(interner.is_empty());
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::from_raw(99)), "");
    }
}
