//! Stack growth for the recursive stages.
//!
//! The parser, resolver and evaluator all recurse once per level of syntactic
//! nesting (and the evaluator once more per Lox call).  Their entry points go
//! through [`ensure_sufficient_stack`], so how deep a program may nest is set
//! by the explicit limits in those stages and not by the size of the thread's
//! stack.

/// Runs `f`, first moving to a fresh stack segment when less than the red
/// zone is left on the current one.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
