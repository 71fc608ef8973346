//! Host handlers: the outermost effect frame, supplied by the embedder.
//!
//! A host handler is consulted only after every installed `effect for`
//! frame declined a cause. The printing handlers answer `Debug` signals and
//! decline everything else. A [`RespondingHostHandler`] lets the embedder
//! answer any signal with a resume value.
//!
//! Every answer from the host counts as a tick: it resets the iteration
//! counts of the loops that are running.
//!
//! Uses enum dispatch instead of trait objects.

use std::fmt;
use std::sync::Arc;

use cause_patterns::Value;
use parking_lot::Mutex;

/// A cause that no `effect for` frame matched.
pub struct HostSignal<'a> {
    /// Declared name of the signal type.
    pub name: &'a str,
    /// The signal instance.
    pub value: &'a Value,
}

impl HostSignal<'_> {
    /// Field values in declaration order.
    pub fn field_values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.value
            .instance()
            .into_iter()
            .flat_map(|inst| inst.fields.iter().map(|(_, value)| value))
    }
}

/// Embedder callback. `None` declines the signal.
pub type Responder = Box<dyn Fn(&HostSignal<'_>) -> Option<Value>>;

/// Writes each `Debug` value to stdout.
#[derive(Default)]
pub struct StdoutHostHandler;

impl StdoutHostHandler {
    pub fn debug(&self, line: &str) {
        println!("{line}");
    }
}

/// Collects `Debug` values, for tests and embedders that render output
/// themselves.
#[derive(Default)]
pub struct BufferHostHandler {
    lines: Mutex<Vec<String>>,
}

impl BufferHostHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }

    pub fn output(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

/// Answers signals through an embedder callback. `Debug` causes the
/// callback declines are collected like [`BufferHostHandler`] does.
pub struct RespondingHostHandler {
    respond: Responder,
    buffer: BufferHostHandler,
}

impl RespondingHostHandler {
    pub fn new(respond: Responder) -> Self {
        Self {
            respond,
            buffer: BufferHostHandler::new(),
        }
    }

    pub fn answer(&self, signal: &HostSignal<'_>) -> Option<Value> {
        (self.respond)(signal)
    }
}

pub enum HostHandlerImpl {
    Stdout(StdoutHostHandler),
    Buffer(BufferHostHandler),
    Responding(RespondingHostHandler),
    /// Answers `Debug` and discards the value.
    Silent,
}

impl fmt::Debug for HostHandlerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Stdout(_) => "Stdout",
            Self::Buffer(_) => "Buffer",
            Self::Responding(_) => "Responding",
            Self::Silent => "Silent",
        };
        f.debug_tuple("HostHandlerImpl").field(&kind).finish()
    }
}

impl HostHandlerImpl {
    /// Resume value for `signal`, if this handler answers it. Consulted
    /// before the `Debug` fallback.
    pub fn answer(&self, signal: &HostSignal<'_>) -> Option<Value> {
        match self {
            Self::Responding(h) => h.answer(signal),
            Self::Stdout(_) | Self::Buffer(_) | Self::Silent => None,
        }
    }

    /// Answer a `Debug` cause with its rendered value.
    pub fn debug(&self, line: &str) {
        match self {
            Self::Stdout(h) => h.debug(line),
            Self::Buffer(h) => h.debug(line),
            Self::Responding(h) => h.buffer.debug(line),
            Self::Silent => {}
        }
    }

    /// Captured lines; empty for handlers that do not capture.
    pub fn output(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.output(),
            Self::Responding(h) => h.buffer.output(),
            Self::Stdout(_) | Self::Silent => Vec::new(),
        }
    }

    pub fn clear(&self) {
        match self {
            Self::Buffer(h) => h.clear(),
            Self::Responding(h) => h.buffer.clear(),
            Self::Stdout(_) | Self::Silent => {}
        }
    }
}

pub type SharedHostHandler = Arc<HostHandlerImpl>;

pub fn stdout_handler() -> SharedHostHandler {
    Arc::new(HostHandlerImpl::Stdout(StdoutHostHandler))
}

pub fn buffer_handler() -> SharedHostHandler {
    Arc::new(HostHandlerImpl::Buffer(BufferHostHandler::new()))
}

pub fn silent_handler() -> SharedHostHandler {
    Arc::new(HostHandlerImpl::Silent)
}

/// Host handler that answers signals with `respond`.
pub fn responding_handler<F>(respond: F) -> SharedHostHandler
where
    F: Fn(&HostSignal<'_>) -> Option<Value> + 'static,
{
    Arc::new(HostHandlerImpl::Responding(RespondingHostHandler::new(
        Box::new(respond),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn buffer_collects_in_order() {
        let handler = buffer_handler();
        handler.debug("one");
        handler.debug("two");
        assert_eq!(handler.output(), vec!["one".to_owned(), "two".to_owned()]);
        handler.clear();
        assert!(handler.output().is_empty());
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let silent = silent_handler();
        silent.debug("dropped");
        assert!(silent.output().is_empty());
        assert!(stdout_handler().output().is_empty());
    }

    #[test]
    fn responding_handler_answers_and_buffers_debug() {
        let handler = responding_handler(|signal| {
            (signal.name == "Ask").then(|| Value::number(7.0))
        });
        let ask = Value::string("ignored");
        let answer = handler.answer(&HostSignal {
            name: "Ask",
            value: &ask,
        });
        assert_eq!(answer.as_ref().and_then(Value::as_number), Some(7.0));
        assert!(handler
            .answer(&HostSignal {
                name: "Other",
                value: &ask,
            })
            .is_none());
        handler.debug("line");
        assert_eq!(handler.output(), vec!["line".to_owned()]);
        assert!(buffer_handler()
            .answer(&HostSignal {
                name: "Ask",
                value: &ask,
            })
            .is_none());
    }
}
