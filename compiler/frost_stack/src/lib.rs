//! Stack growth for deep recursion.
//!
//! Encoding a value and rendering its expression both recurse once per
//! nesting level. Syntax trees from generated sources nest far deeper than a
//! thread stack allows, so each recursive step goes through
//! [`ensure_sufficient_stack`]. Recursion inside third-party code, such as
//! a JSON parser, cannot check the stack at each step and runs under
//! [`with_deep_stack`] instead.
//!
//! On native targets the stack is grown on demand with `stacker`; on WASM
//! this is a passthrough.

/// Grow when less than this much stack remains.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Size of the stack [`with_deep_stack`] runs on. Pages are only committed
/// as they are touched.
#[cfg(not(target_arch = "wasm32"))]
const DEEP_STACK: usize = 256 * 1024 * 1024;

/// Run `f` on a fresh stack large enough for recursion that never calls
/// back into [`ensure_sufficient_stack`].
#[cfg(not(target_arch = "wasm32"))]
pub fn with_deep_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::grow(DEEP_STACK, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_deep_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
