//! Result types of [`run_file`](crate::run_file).

use cause_diagnostic::Diagnostic;

/// Which phase stopped the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Malformed literal tokens.
    Build,
    /// Type resolution errors.
    Resolve,
    /// Evaluation faults.
    Runtime,
}

/// Result of running a file.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// Whether the entry function returned normally.
    pub success: bool,
    /// Rendered result of the entry function.
    pub value: Option<String>,
    /// Values of unhandled `Debug` causes, in order.
    pub debug_output: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub error_phase: Option<ErrorPhase>,
}

impl RunOutput {
    pub(crate) fn failed(
        phase: ErrorPhase,
        diagnostics: Vec<Diagnostic>,
        debug_output: Vec<String>,
    ) -> Self {
        RunOutput {
            success: false,
            value: None,
            debug_output,
            diagnostics,
            error_phase: Some(phase),
        }
    }
}
