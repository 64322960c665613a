//! RAII scope guard for evaluation-internal scopes.
//!
//! [`ScopedInterpreter`] holds `&mut Interpreter` and pops the frame it
//! pushed when dropped, so an early `?` return or a `break` leaving a loop
//! body cannot leak a frame onto the scope stack.
//!
//! ```text
//! self.with_scope(|scoped| {
//!     scoped.exec(init)?;
//!     scoped.exec(body)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Guard that pops one scope frame on drop. Derefs to the interpreter.
pub(crate) struct ScopedInterpreter<'guard, 'a> {
    interpreter: &'guard mut Interpreter<'a>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.scopes.pop();
    }
}

impl<'a> Deref for ScopedInterpreter<'_, 'a> {
    type Target = Interpreter<'a>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a frame; it is popped when the guard drops.
    pub(crate) fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.scopes.push();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh frame.
    pub(crate) fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}
