//! Stack growth for deep recursion.
//!
//! The grammar recurses once per nested block, closure, unary operator or
//! parenthesised expression, and the resolver walks the same shapes. Editor
//! input can nest arbitrarily, so both wrap their recursive entry points in
//! [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown with `stacker` once less than
//! 100KB remain, 1MB at a time. On wasm the closure is called directly.

const RED_ZONE: usize = 100 * 1024;

const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
