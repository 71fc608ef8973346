//! Evaluation errors and control-flow unwinds.
//!
//! `EvalErrorKind` is the typed category used for diagnostic conversion.
//! Factory functions (e.g. `unbound_name()`) are the public way to build
//! errors; they fill in both `kind` and `message`.
//!
//! `Return` and `Break` are not errors. They travel on the same `Err` path
//! as [`ControlAction`] variants tagged with the frame they unwind to, so
//! no handler frame or unrelated loop can intercept them.

mod diagnostics;

use std::fmt;

use cause_ir::Span;

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, ControlAction>;

/// Identity of a loop or function activation, the target of an unwind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u32);

impl FrameId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FrameId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Everything that can unwind out of an expression.
#[derive(Clone, Debug)]
pub enum ControlAction {
    /// Fatal evaluation fault.
    Error(Box<EvalError>),
    /// `break [with value]` heading for the loop activation `target`.
    Break { target: FrameId, value: Value },
    /// `return [value]` heading for the function activation `target`.
    Return { target: FrameId, value: Value },
}

impl ControlAction {
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    /// Turn a stray unwind into an error. Used at boundaries no `break` or
    /// `return` may cross.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            ControlAction::Error(e) => *e,
            ControlAction::Break { .. } | ControlAction::Return { .. } => escaped_control_flow(),
        }
    }

    /// Attach `span` to an error that has none yet.
    #[must_use]
    pub fn with_span_if_error(self, span: Span) -> Self {
        match self {
            ControlAction::Error(mut e) if e.span.is_none() => {
                e.span = Some(span);
                ControlAction::Error(e)
            }
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(e: EvalError) -> Self {
        ControlAction::Error(Box::new(e))
    }
}

/// Typed error category for structured diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Access
    UnboundName {
        name: String,
    },
    NoSuchField {
        field: String,
        type_name: String,
    },
    ImmutableBinding {
        name: String,
    },

    // Effects
    UnhandledSignal {
        signal: String,
    },
    NotCausable {
        type_name: String,
    },

    // Types
    TypeMismatch {
        expected: String,
        got: String,
    },

    // Calls
    NotCallable {
        type_name: String,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    StackOverflow {
        depth: usize,
    },

    // Loops
    RunawayLoop {
        iterations: usize,
    },

    /// `break` or `return` reached a boundary it cannot cross.
    EscapedControlFlow,

    /// Errors raised by native functions or hosts.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundName { name } => write!(f, "unbound name: {name}"),
            Self::NoSuchField { field, type_name } => {
                write!(f, "no field `{field}` on {type_name}")
            }
            Self::ImmutableBinding { name } => {
                write!(f, "cannot set immutable binding: {name}")
            }
            Self::UnhandledSignal { signal } => write!(f, "unhandled signal: {signal}"),
            Self::NotCausable { type_name } => {
                write!(f, "{type_name} is not a signal and cannot be caused")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                if name.is_empty() {
                    write!(f, "expected {expected} {arg_word}, got {got}")
                } else {
                    write!(f, "{name} expects {expected} {arg_word}, got {got}")
                }
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }
            Self::RunawayLoop { iterations } => {
                write!(f, "loop did not break after {iterations} iterations")
            }
            Self::EscapedControlFlow => write!(f, "`break` or `return` escaped its target"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Secondary information attached to an error.
#[derive(Clone, Debug)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// One call in the chain at the point an error occurred.
#[derive(Clone, Debug)]
pub struct BacktraceFrame {
    pub name: String,
    /// Call site.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site, innermost call first.
#[derive(Clone, Debug, Default)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation fault.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Expression that produced the error.
    pub span: Option<Span>,
    pub backtrace: Option<EvalBacktrace>,
    pub notes: Vec<EvalNote>,
    /// The signal value of an `UnhandledSignal`.
    pub signal: Option<Value>,
}

impl EvalError {
    /// Error with a free-form message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
            notes: Vec::new(),
            signal: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Access

#[cold]
pub fn unbound_name(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnboundName {
        name: name.to_owned(),
    })
}

#[cold]
pub fn no_such_field(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchField {
        field: field.to_owned(),
        type_name: type_name.to_owned(),
    })
}

#[cold]
pub fn immutable_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_owned(),
    })
}

// Effects

/// No handler matched `signal`. The value is kept for the host.
#[cold]
pub fn unhandled_signal(signal_name: &str, signal: Value) -> EvalError {
    let mut error = EvalError::from_kind(EvalErrorKind::UnhandledSignal {
        signal: signal_name.to_owned(),
    });
    error.signal = Some(signal);
    error
}

#[cold]
pub fn not_causable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCausable {
        type_name: type_name.to_owned(),
    })
}

// Types

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        got: got.to_owned(),
    })
}

// Calls

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_owned(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    })
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

// Loops and unwinds

#[cold]
pub fn runaway_loop(iterations: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RunawayLoop { iterations })
}

#[cold]
pub fn escaped_control_flow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::EscapedControlFlow)
}
