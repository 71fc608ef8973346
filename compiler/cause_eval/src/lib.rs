#![allow(
    clippy::result_large_err,
    reason = "EvalError carries its backtrace and notes inline"
)]
//! Cause Eval - evaluator and effect engine for the Cause language.
//!
//! # Architecture
//!
//! - `Interpreter`: tree-walking evaluation over the arena AST
//! - `Environment`: stack of shared scopes; closures capture by reference
//! - `HandlerStack`: installed `effect for` frames, innermost last
//! - `CallStack`: call frames for recursion limits and backtraces
//! - `CoreLibrary`: native functions behind `import` and the prelude
//!
//! # Re-exports
//!
//! Value and error types come from `cause_patterns` and are re-exported:
//! `Value`, `EvalError`, `EvalErrorKind`, `EvalResult`, `ControlAction`.

pub mod diagnostics;
pub mod effects;
mod environment;
pub mod eval_mode;
mod host_handler;
pub mod interpreter;
mod library;

pub use cause_patterns::{
    ControlAction, EvalBacktrace, EvalError, EvalErrorKind, EvalResult, FunctionValue, Heap,
    Instance, Mutability, NativeFunction, Value,
};

pub use diagnostics::{CallFrame, CallStack};
pub use effects::{HandlerFrame, HandlerStack};
pub use environment::Environment;
pub use eval_mode::{EvalConfig, EvalMode};
pub use host_handler::{
    buffer_handler, responding_handler, silent_handler, stdout_handler, BufferHostHandler,
    HostHandlerImpl, HostSignal, Responder, RespondingHostHandler, SharedHostHandler,
    StdoutHostHandler,
};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use library::CoreLibrary;

#[cfg(test)]
mod tests;
