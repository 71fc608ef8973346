use cause_ir::{Span, StringInterner};
use cause_patterns::{EvalError, EvalErrorKind};
use pretty_assertions::assert_eq;

use super::{CallFrame, CallStack};

#[test]
fn push_respects_max_depth() {
    let interner = StringInterner::new();
    let f = interner.intern("f");
    let mut stack = CallStack::new(Some(2));
    assert!(stack.push(CallFrame { name: f, call_span: None }).is_ok());
    assert!(stack.push(CallFrame { name: f, call_span: None }).is_ok());
    let err = stack
        .push(CallFrame { name: f, call_span: None })
        .err()
        .map(|e| e.kind);
    assert_eq!(err, Some(EvalErrorKind::StackOverflow { depth: 2 }));
    assert_eq!(stack.depth(), 2);
}

#[test]
fn capture_is_most_recent_first() {
    let interner = StringInterner::new();
    let mut stack = CallStack::default();
    for (name, at) in [("main", 1), ("helper", 5)] {
        let frame = CallFrame {
            name: interner.intern(name),
            call_span: Some(Span::new(at, at + 1)),
        };
        assert!(stack.push(frame).is_ok());
    }
    let bt = stack.capture(&interner);
    let names: Vec<&str> = bt.frames().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["helper", "main"]);
    stack.pop();
    assert_eq!(stack.depth(), 1);
}

#[test]
fn attach_backtrace_keeps_deeper_one() {
    let interner = StringInterner::new();
    let mut stack = CallStack::default();
    assert!(stack
        .push(CallFrame {
            name: interner.intern("outer"),
            call_span: None,
        })
        .is_ok());
    let err = stack.attach_backtrace(EvalError::new("boom"), &interner);
    assert_eq!(err.backtrace.as_ref().map(|b| b.len()), Some(1));

    assert!(stack
        .push(CallFrame {
            name: interner.intern("more"),
            call_span: None,
        })
        .is_ok());
    let err = stack.attach_backtrace(err, &interner);
    assert_eq!(err.backtrace.map(|b| b.len()), Some(1));
}
