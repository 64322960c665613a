//! Stack growth for deeply nested golite sources.
//!
//! Both the parser and the evaluator are plain recursive descent, so a rule
//! like `((((((1))))))` nested a few thousand levels deep would exhaust a
//! thread's stack. Wrapping each recursive step in [`ensure_sufficient_stack`]
//! grows the stack on demand instead.
//!
//! On `wasm32` the guard is a passthrough.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
