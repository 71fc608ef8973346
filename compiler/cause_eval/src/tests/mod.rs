//! Shared harness for interpreter and effect engine tests.

use cause_ir::parse_tree::{DeclNode, ExprNode, ParsedFile, StmtNode, TypeRefNode};
use cause_ir::{lower, StringInterner};
use cause_patterns::{EvalError, EvalErrorKind};
use cause_types::resolve;

use crate::{buffer_handler, CoreLibrary, EvalMode, Interpreter, InterpreterBuilder};

/// Result of running `main` in a fresh interpreter.
pub(crate) struct Outcome {
    /// Rendered result value.
    pub value: Result<String, EvalError>,
    pub debug: Vec<String>,
    pub handler_depth: usize,
    pub call_depth: usize,
}

impl Outcome {
    #[track_caller]
    pub fn ok(&self) -> &str {
        match &self.value {
            Ok(value) => value,
            Err(e) => panic!("expected success, got: {e}"),
        }
    }

    #[track_caller]
    pub fn err(&self) -> &EvalError {
        match &self.value {
            Ok(value) => panic!("expected failure, got value {value}"),
            Err(e) => e,
        }
    }

    #[track_caller]
    pub fn kind(&self) -> &EvalErrorKind {
        &self.err().kind
    }
}

/// Run a module that must resolve without errors.
pub(crate) fn run(decls: Vec<DeclNode>) -> Outcome {
    run_with(decls, true, |b| b)
}

/// Run a module ignoring resolution errors, to reach runtime checks the
/// resolver would normally catch first.
pub(crate) fn run_unchecked(decls: Vec<DeclNode>) -> Outcome {
    run_with(decls, false, |b| b)
}

pub(crate) fn run_with(
    decls: Vec<DeclNode>,
    require_resolved: bool,
    configure: impl for<'a> FnOnce(InterpreterBuilder<'a>) -> InterpreterBuilder<'a>,
) -> Outcome {
    let interner = StringInterner::new();
    let file = ParsedFile::new("test.cau", decls);
    let module = lower(&file, &interner).unwrap_or_else(|e| panic!("lowering failed: {e:?}"));
    let (table, errors) = resolve(&module, &interner, &CoreLibrary);
    if require_resolved {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| e.message(&table, &interner))
            .collect();
        assert!(messages.is_empty(), "resolution failed: {messages:?}");
    }

    let host = buffer_handler();
    let builder = Interpreter::builder(&interner, &module.arena, &table)
        .mode(EvalMode::TestRun)
        .host_handler(host.clone());
    let mut interpreter = configure(builder).build();
    let value = interpreter
        .load_module(&module)
        .and_then(|()| interpreter.call_function("main", Vec::new()))
        .map(|v| interpreter.display(&v));

    Outcome {
        value,
        debug: host.output(),
        handler_depth: interpreter.handler_depth(),
        call_depth: interpreter.call_depth(),
    }
}

// Tree shorthands.

pub(crate) fn main_fn(body: Vec<StmtNode>) -> DeclNode {
    DeclNode::function("main", vec![], None, ExprNode::block(body))
}

pub(crate) fn id(name: &str) -> ExprNode {
    ExprNode::ident(name)
}

pub(crate) fn num(text: &str) -> ExprNode {
    ExprNode::number(text)
}

pub(crate) fn text(value: &str) -> ExprNode {
    ExprNode::string(value)
}

pub(crate) fn ty(name: &str) -> TypeRefNode {
    TypeRefNode::named(name)
}

pub(crate) fn block(stmts: Vec<StmtNode>) -> ExprNode {
    ExprNode::block(stmts)
}

pub(crate) fn expr(e: ExprNode) -> StmtNode {
    StmtNode::expr(e)
}

pub(crate) fn math() -> DeclNode {
    DeclNode::import("core/math", &[("add", None), ("subtract", None), ("at_least", None)])
}
