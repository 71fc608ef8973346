//! Evaluation error to diagnostic conversion (E6xxx).

use cause_diagnostic::{Diagnostic, ErrorCode};

use super::{EvalError, EvalErrorKind};

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnboundName { .. } => ErrorCode::E6001,
            Self::NoSuchField { .. } => ErrorCode::E6002,
            Self::UnhandledSignal { .. } => ErrorCode::E6003,
            Self::TypeMismatch { .. } => ErrorCode::E6004,
            Self::NotCallable { .. } => ErrorCode::E6005,
            Self::NotCausable { .. } => ErrorCode::E6006,
            Self::ArityMismatch { .. } => ErrorCode::E6007,
            Self::ImmutableBinding { .. } => ErrorCode::E6008,
            Self::RunawayLoop { .. } => ErrorCode::E6009,
            Self::StackOverflow { .. } => ErrorCode::E6010,
            Self::EscapedControlFlow => ErrorCode::E6011,
            Self::Custom { .. } => ErrorCode::E9001,
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnboundName { .. } => "not bound here",
            Self::NoSuchField { .. } => "field access here",
            Self::UnhandledSignal { .. } => "no handler for this cause",
            Self::TypeMismatch { .. } => "value of the wrong type",
            Self::NotCallable { .. } | Self::ArityMismatch { .. } => "in this call",
            Self::NotCausable { .. } => "caused here",
            Self::ImmutableBinding { .. } => "assignment here",
            Self::RunawayLoop { .. } => "this loop",
            Self::StackOverflow { .. } => "recursion limit reached here",
            Self::EscapedControlFlow => "no enclosing target",
            Self::Custom { .. } => "here",
        }
    }
}

impl EvalError {
    /// Diagnostic with the error span as primary label, the notes, and the
    /// backtrace as a trailing note.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.error_code()).with_message(&self.message);

        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }

        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }

        if let Some(bt) = &self.backtrace {
            if !bt.is_empty() {
                diag = diag.with_note(format!("call stack:\n{bt}"));
            }
        }

        diag
    }
}
