//! Diagnostics shared by the builder, the resolver and the evaluator.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;

use cause_ir::BuildError;

/// Diagnostic for a malformed literal token.
pub fn build_error(error: &BuildError) -> Diagnostic {
    let code = match error {
        BuildError::InvalidStringLiteral { .. } => ErrorCode::E1001,
        BuildError::InvalidNumberLiteral { .. } => ErrorCode::E1002,
    };
    Diagnostic::error(code)
        .with_message(error.to_string())
        .with_label(error.span(), "malformed literal")
}
