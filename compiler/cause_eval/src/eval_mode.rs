//! Evaluation modes and the per-run configuration derived from them.

/// Evaluation policy, dispatched by `match`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard run: runaway loops are cut off, recursion is bounded only by
    /// memory on native targets.
    #[default]
    Interpret,
    /// No loop or recursion limits.
    Unbounded,
    /// Tests: bounded recursion and loops.
    TestRun,
}

impl EvalMode {
    /// Maximum call depth, or `None` for unlimited (stacker fallback).
    #[inline]
    pub fn max_recursion_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::Unbounded => None,
            Self::TestRun => Some(500),
        }
    }

    /// Iterations after which a `loop` that never breaks is a fault.
    #[inline]
    pub fn runaway_loop_threshold(&self) -> Option<usize> {
        match self {
            Self::Interpret | Self::TestRun => Some(EvalConfig::DEFAULT_RUNAWAY_LOOP_THRESHOLD),
            Self::Unbounded => None,
        }
    }
}

/// Limits for one interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub runaway_loop_threshold: Option<usize>,
    pub max_recursion_depth: Option<usize>,
}

impl EvalConfig {
    pub const DEFAULT_RUNAWAY_LOOP_THRESHOLD: usize = 5000;

    pub fn for_mode(mode: &EvalMode) -> Self {
        EvalConfig {
            runaway_loop_threshold: mode.runaway_loop_threshold(),
            max_recursion_depth: mode.max_recursion_depth(),
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::for_mode(&EvalMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_interpret() {
        assert_eq!(EvalMode::default(), EvalMode::Interpret);
    }

    #[test]
    fn interpret_cuts_off_runaway_loops() {
        assert_eq!(EvalMode::Interpret.runaway_loop_threshold(), Some(5000));
        assert_eq!(EvalConfig::default().runaway_loop_threshold, Some(5000));
    }

    #[test]
    fn unbounded_has_no_limits() {
        let config = EvalConfig::for_mode(&EvalMode::Unbounded);
        assert_eq!(config.runaway_loop_threshold, None);
        assert_eq!(config.max_recursion_depth, None);
    }

    #[test]
    fn test_run_recursion_depth_500() {
        assert_eq!(EvalMode::TestRun.max_recursion_depth(), Some(500));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn interpret_native_unlimited_depth() {
        assert_eq!(EvalMode::Interpret.max_recursion_depth(), None);
    }
}
