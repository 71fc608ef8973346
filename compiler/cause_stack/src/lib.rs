//! Stack growth for deeply nested Cause programs.
//!
//! Lowering, resolution and evaluation all recurse over the expression tree.
//! Nested blocks, long suffix chains and recursive Cause functions can exceed
//! the default thread stack, so every recursive entry point runs through
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough.

/// Grow when less than this much stack remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, allocating a fresh stack segment first if the current one is
/// close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_block_depth() {
        fn nest(depth: u64) -> u64 {
            ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
        }

        assert_eq!(nest(100_000), 100_000);
    }

    #[test]
    fn test_propagates_result() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("unbound"));
        assert_eq!(result, Err("unbound"));
    }
}
