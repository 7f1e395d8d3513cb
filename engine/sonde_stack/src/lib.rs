//! Stack growth for recursive value walks.
//!
//! Validating, rendering and defaulting all recurse once per level of the
//! value being processed. A value decoded from a canister reply can nest far
//! deeper than the default thread stack allows (a 100k-element linked list
//! encoded as `opt record { head; tail }` is a realistic reply), so every
//! recursive step goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets** grow the stack on demand with `stacker`.
//! - **WASM targets** call straight through.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn render(&self, ty: Idx, value: &Value) -> Rendered {
///     ensure_sufficient_stack(|| match self.pool.tag(ty) {
///         Tag::Vec => /* recurses into elements */,
///         ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM: the host manages the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
