use std::cell::Cell;
use std::rc::Rc;

use cause_diagnostic::ErrorCode;
use cause_eval::{responding_handler, EvalConfig, EvalMode, Value};
use cause_ir::parse_tree::{
    BranchOptionNode, DeclNode, ExprNode, FieldNode, ParamNode, ParsedFile, PatternNode,
    StmtNode, TypeRefNode,
};
use pretty_assertions::assert_eq;

use crate::{run_file, ErrorPhase, RunConfig, RunOutput};

fn test_config() -> RunConfig {
    RunConfig {
        mode: EvalMode::TestRun,
        ..RunConfig::default()
    }
}

fn run(decls: Vec<DeclNode>) -> RunOutput {
    run_file(&ParsedFile::new("test.cau", decls), &test_config())
}

#[track_caller]
fn value_of(output: &RunOutput) -> &str {
    assert!(
        output.success,
        "expected success, got phase={:?}, diagnostics={:?}",
        output.error_phase, output.diagnostics
    );
    output.value.as_deref().unwrap_or_default()
}

fn main_fn(body: Vec<StmtNode>) -> DeclNode {
    DeclNode::function("main", vec![], None, ExprNode::block(body))
}

fn id(name: &str) -> ExprNode {
    ExprNode::ident(name)
}

fn num(text: &str) -> ExprNode {
    ExprNode::number(text)
}

fn ty(name: &str) -> TypeRefNode {
    TypeRefNode::named(name)
}

fn expr(e: ExprNode) -> StmtNode {
    StmtNode::expr(e)
}

fn math() -> DeclNode {
    DeclNode::import("core/math", &[("add", None)])
}

fn pets() -> Vec<DeclNode> {
    vec![
        DeclNode::object("Dog", vec![]),
        DeclNode::object("Cat", vec![]),
        DeclNode::option("Pet", vec![ty("Dog"), ty("Cat")]),
    ]
}

fn sound_of(subject: ExprNode) -> ExprNode {
    ExprNode::branch(
        Some(subject),
        vec![
            BranchOptionNode::is_arm(PatternNode::capture(ty("Dog"), "d"), ExprNode::string("woof")),
            BranchOptionNode::is_arm(PatternNode::capture(ty("Cat"), "c"), ExprNode::string("meow")),
        ],
    )
}

// Scenarios

#[test]
fn pipe_call_equals_direct_call() {
    let piped = run(vec![math(), main_fn(vec![expr(num("5").pipe(id("add"), vec![num("3")]))])]);
    let direct = run(vec![math(), main_fn(vec![expr(id("add").call(vec![num("5"), num("3")]))])]);
    assert_eq!(value_of(&piped), "8");
    assert_eq!(value_of(&piped), value_of(&direct));
}

#[test]
fn branch_picks_the_dog_arm() {
    let mut decls = pets();
    decls.push(main_fn(vec![
        StmtNode::decl(DeclNode::let_value("v", id("Dog"))),
        expr(sound_of(id("v"))),
    ]));
    assert_eq!(value_of(&run(decls)), "woof");
}

#[test]
fn arm_binding_is_out_of_scope_after_the_branch() {
    let mut decls = pets();
    decls.push(main_fn(vec![expr(sound_of(id("Dog"))), expr(id("d"))]));
    let output = run(decls);
    assert_eq!(output.error_phase, Some(ErrorPhase::Resolve));
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2005);
}

#[test]
fn loop_break_with_value() {
    let output = run(vec![main_fn(vec![expr(ExprNode::loop_of(ExprNode::block(vec![
        expr(ExprNode::break_with(Some(num("42")))),
    ])))])]);
    assert_eq!(value_of(&output), "42");
}

#[test]
fn option_member_satisfies_option_parameter() {
    let mut decls = pets();
    decls.push(DeclNode::function(
        "greet",
        vec![ParamNode::typed("pet", ty("Pet"))],
        None,
        sound_of(id("pet")),
    ));
    decls.push(main_fn(vec![expr(id("greet").call(vec![id("Cat")]))]));
    assert_eq!(value_of(&run(decls)), "meow");
}

#[test]
fn handler_answers_and_is_inactive_in_its_own_body() {
    let output = run(vec![
        math(),
        DeclNode::signal("Ask", vec![], Some(ty("Number"))),
        main_fn(vec![
            StmtNode::effect(PatternNode::type_only(ty("Ask")), num("1")),
            StmtNode::effect(
                PatternNode::type_only(ty("Ask")),
                id("add").call(vec![ExprNode::cause(id("Ask")), num("100")]),
            ),
            expr(ExprNode::cause(id("Ask"))),
        ]),
    ]);
    assert_eq!(value_of(&output), "101");
}

#[test]
fn unhandled_signal_is_a_runtime_failure() {
    let output = run(vec![
        DeclNode::signal("Missing", vec![FieldNode::new("why", ty("String"))], None),
        DeclNode::function(
            "inner",
            vec![],
            None,
            ExprNode::cause(id("Missing").call(vec![ExprNode::string("nobody listens")])),
        ),
        main_fn(vec![expr(id("inner").call(vec![]))]),
    ]);
    assert!(!output.success);
    assert_eq!(output.error_phase, Some(ErrorPhase::Runtime));
    let diag = &output.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::E6003);
    assert_eq!(diag.message, "unhandled signal: Missing");
    assert!(diag.notes.iter().any(|n| n.contains("inner")));
}

#[test]
fn debug_values_are_collected_in_order() {
    let output = run(vec![main_fn(vec![
        expr(ExprNode::cause(id("Debug").call(vec![ExprNode::string("first")]))),
        expr(ExprNode::cause(id("Debug").call(vec![num("2.5")]))),
        expr(num("0")),
    ])]);
    assert_eq!(value_of(&output), "0");
    assert_eq!(output.debug_output, vec!["first".to_owned(), "2.5".to_owned()]);
}

#[test]
fn debug_output_survives_a_later_failure() {
    let output = run(vec![main_fn(vec![
        expr(ExprNode::cause(id("Debug").call(vec![ExprNode::string("before")]))),
        expr(ExprNode::cause(
            id("AssumptionBroken").call(vec![ExprNode::string("oops")]),
        )),
    ])]);
    assert_eq!(output.error_phase, Some(ErrorPhase::Runtime));
    assert_eq!(output.debug_output, vec!["before".to_owned()]);
}

#[test]
fn closures_share_captured_variables() {
    let output = run(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_variable("greeting", ExprNode::string("hello"))),
        StmtNode::decl(DeclNode::let_value(
            "read",
            ExprNode::function(vec![], None, id("greeting")),
        )),
        StmtNode::set("greeting", ExprNode::string("goodbye")),
        expr(id("read").call(vec![])),
    ])]);
    assert_eq!(value_of(&output), "goodbye");
}

#[test]
fn runaway_loop_threshold_is_configurable() {
    let file = ParsedFile::new(
        "spin.cau",
        vec![main_fn(vec![expr(ExprNode::loop_of(ExprNode::block(vec![])))])],
    );
    let config = RunConfig {
        runaway_loop_threshold: Some(10),
        ..test_config()
    };
    let output = run_file(&file, &config);
    assert_eq!(output.error_phase, Some(ErrorPhase::Runtime));
    assert_eq!(output.diagnostics[0].code, ErrorCode::E6009);
}

// Phases

#[test]
fn malformed_literal_stops_at_build() {
    let output = run(vec![main_fn(vec![expr(num("1.2.3"))])]);
    assert_eq!(output.error_phase, Some(ErrorPhase::Build));
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1002);
}

#[test]
fn resolution_errors_are_all_reported() {
    let output = run(vec![
        DeclNode::object("Box", vec![FieldNode::new("inside", ty("Nothing"))]),
        main_fn(vec![expr(ExprNode::break_with(None))]),
    ]);
    assert_eq!(output.error_phase, Some(ErrorPhase::Resolve));
    let codes: Vec<ErrorCode> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E2008]);
}

#[test]
fn missing_entry_is_a_runtime_error() {
    let file = ParsedFile::new("lib.cau", vec![DeclNode::function("helper", vec![], None, num("1"))]);
    let output = run_file(&file, &RunConfig::default());
    assert_eq!(output.error_phase, Some(ErrorPhase::Runtime));
    assert_eq!(output.diagnostics[0].code, ErrorCode::E6001);
}

#[test]
fn custom_entry_is_called() {
    let file = ParsedFile::new("lib.cau", vec![DeclNode::function("start", vec![], None, num("7"))]);
    let config = RunConfig {
        entry: "start".to_owned(),
        ..test_config()
    };
    assert_eq!(value_of(&run_file(&file, &config)), "7");
}

#[test]
fn init_tracing_is_idempotent() {
    crate::init_tracing();
    crate::init_tracing();
}

#[test]
fn host_answers_keep_long_loops_alive() {
    // Twice the default limit, run in the default mode.
    let stop_at = EvalConfig::DEFAULT_RUNAWAY_LOOP_THRESHOLD * 2;
    let file = ParsedFile::new(
        "progress.cau",
        vec![
            DeclNode::import("core/math", &[("add", None), ("at_least", None)]),
            DeclNode::signal("Progress", vec![FieldNode::new("i", ty("Number"))], None),
            main_fn(vec![
                StmtNode::decl(DeclNode::let_variable("i", num("0"))),
                expr(ExprNode::loop_of(ExprNode::block(vec![
                    expr(ExprNode::cause(id("Progress").call(vec![id("i")]))),
                    StmtNode::set("i", id("add").call(vec![id("i"), num("1")])),
                    expr(ExprNode::branch(
                        None,
                        vec![
                            BranchOptionNode::if_arm(
                                id("at_least").call(vec![id("i"), num(&stop_at.to_string())]),
                                ExprNode::break_with(None),
                            ),
                            BranchOptionNode::else_arm(ExprNode::block(vec![])),
                        ],
                    )),
                ]))),
                expr(ExprNode::cause(id("Debug").call(vec![ExprNode::string("Done!")]))),
            ]),
        ],
    );
    let last = Rc::new(Cell::new(-1.0));
    let seen = Rc::clone(&last);
    let host = responding_handler(move |signal| {
        if signal.name != "Progress" {
            return None;
        }
        seen.set(signal.field_values().next().and_then(Value::as_number)?);
        Some(Value::Action)
    });
    let config = RunConfig {
        host: Some(host),
        ..RunConfig::default()
    };

    let output = run_file(&file, &config);
    assert_eq!(value_of(&output), "Action");
    assert_eq!(output.debug_output, vec!["Done!".to_owned()]);
    assert_eq!(last.get(), (stop_at - 1) as f64);
}

#[test]
fn debug_through_the_host_resets_the_loop_limit() {
    let file = ParsedFile::new(
        "chatty.cau",
        vec![
            DeclNode::import("core/math", &[("add", None), ("at_least", None)]),
            main_fn(vec![
                StmtNode::decl(DeclNode::let_variable("i", num("0"))),
                expr(ExprNode::loop_of(ExprNode::block(vec![
                    expr(ExprNode::cause(id("Debug").call(vec![id("i")]))),
                    StmtNode::set("i", id("add").call(vec![id("i"), num("1")])),
                    expr(ExprNode::branch(
                        None,
                        vec![
                            BranchOptionNode::if_arm(
                                id("at_least").call(vec![id("i"), num("30")]),
                                ExprNode::break_with(Some(id("i"))),
                            ),
                            BranchOptionNode::else_arm(ExprNode::block(vec![])),
                        ],
                    )),
                ]))),
            ]),
        ],
    );
    let config = RunConfig {
        runaway_loop_threshold: Some(10),
        ..test_config()
    };
    let output = run_file(&file, &config);
    assert_eq!(value_of(&output), "30");
    assert_eq!(output.debug_output.len(), 30);
}

#[test]
fn host_answer_must_match_the_signal_result() {
    let decls = vec![
        DeclNode::signal("Ask", vec![], Some(ty("Number"))),
        main_fn(vec![expr(ExprNode::cause(id("Ask")))]),
    ];
    let file = ParsedFile::new("ask.cau", decls);

    let numeric = RunConfig {
        host: Some(responding_handler(|_| Some(Value::number(12.0)))),
        ..test_config()
    };
    assert_eq!(value_of(&run_file(&file, &numeric)), "12");

    let textual = RunConfig {
        host: Some(responding_handler(|_| Some(Value::string("twelve")))),
        ..test_config()
    };
    let output = run_file(&file, &textual);
    assert_eq!(output.error_phase, Some(ErrorPhase::Runtime));
    assert_eq!(output.diagnostics[0].code, ErrorCode::E6004);
}
