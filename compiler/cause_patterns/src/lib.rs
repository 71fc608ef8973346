#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing it would spread through every signature"
)]
//! Runtime side of the Cause type model.
//!
//! This crate provides:
//! - Runtime values (`Value`, `Heap`, `Instance`, `FunctionValue`, `NativeFunction`)
//! - Shared-cell scopes captured by closures (`LocalScope`, `Scope`)
//! - Evaluation errors and control-flow unwinds (`EvalError`, `ControlAction`)
//! - The pattern matcher (`match_pattern`, `value_matches`)
//!
//! The matcher is shared by `is` arms, effect handler selection, runtime
//! parameter checks and signal resume-value checks.

mod errors;
mod matcher;
mod scope;
mod value;

pub use errors::{
    arity_mismatch, escaped_control_flow, immutable_binding, no_such_field, not_callable,
    not_causable, recursion_limit_exceeded, runaway_loop, type_mismatch, unbound_name,
    unhandled_signal, BacktraceFrame, ControlAction, EvalBacktrace, EvalError, EvalErrorKind,
    EvalNote, EvalResult, FrameId,
};
pub use matcher::{match_pattern, value_matches, Bindings};
pub use scope::{AssignError, LocalScope, Mutability, Scope};
pub use value::{format_number, FunctionValue, Heap, Instance, NativeFn, NativeFunction, Value};
