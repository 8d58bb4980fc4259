//! Stack growth for deep recursion.
//!
//! Parsing nested enclosed clauses, comparing recursive modes and checking
//! deeply nested units all recurse on the shape of the program. Wrapping
//! those recursions in [`ensure_sufficient_stack`] grows the stack on demand
//! instead of overflowing.
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: plain call; the runtime manages its own stack.

/// Grow the stack when less than this remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the
/// red zone.
///
/// ```text
/// fn check_unit(&mut self, node: NodeId, expected: Soid) -> Result<MoidId, Fatal> {
///     ensure_sufficient_stack(|| self.check_unit_inner(node, expected))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
