use cause_ir::parse_tree::{
    BranchOptionNode, DeclNode, ExprNode, FieldNode, ParamNode, PatternNode, StmtNode,
};
use cause_ir::{lower, StringInterner};
use cause_patterns::{EvalErrorKind, Value};
use cause_types::resolve;
use pretty_assertions::assert_eq;

use crate::tests::{block, expr, id, main_fn, math, num, run, run_unchecked, run_with, text, ty};
use crate::{CoreLibrary, EvalMode, Interpreter};

fn dog_and_cat() -> Vec<DeclNode> {
    vec![DeclNode::object("Dog", vec![]), DeclNode::object("Cat", vec![])]
}

fn woof_branch(subject: ExprNode) -> ExprNode {
    ExprNode::branch(
        Some(subject),
        vec![
            BranchOptionNode::is_arm(PatternNode::capture(ty("Dog"), "d"), text("woof")),
            BranchOptionNode::is_arm(PatternNode::capture(ty("Cat"), "c"), text("meow")),
        ],
    )
}

#[test]
fn pipe_call_prepends_the_subject() {
    let piped = run(vec![
        math(),
        main_fn(vec![expr(num("5").pipe(id("subtract"), vec![num("3")]))]),
    ]);
    let direct = run(vec![
        math(),
        main_fn(vec![expr(id("subtract").call(vec![num("5"), num("3")]))]),
    ]);
    assert_eq!(piped.ok(), "2");
    assert_eq!(piped.ok(), direct.ok());
}

#[test]
fn pipe_chains_fold_left_to_right() {
    let outcome = run(vec![
        math(),
        main_fn(vec![expr(
            num("5")
                .pipe(id("add"), vec![num("3")])
                .pipe(id("subtract"), vec![num("1")]),
        )]),
    ]);
    assert_eq!(outcome.ok(), "7");
}

#[test]
fn branch_takes_the_first_matching_arm() {
    let mut decls = dog_and_cat();
    decls.push(main_fn(vec![
        StmtNode::decl(DeclNode::let_value("v", id("Dog"))),
        expr(woof_branch(id("v"))),
    ]));
    assert_eq!(run(decls).ok(), "woof");

    let mut decls = dog_and_cat();
    decls.push(main_fn(vec![expr(woof_branch(id("Cat")))]));
    assert_eq!(run(decls).ok(), "meow");
}

#[test]
fn arm_bindings_do_not_outlive_the_arm() {
    let mut decls = dog_and_cat();
    decls.push(main_fn(vec![
        expr(woof_branch(id("Dog"))),
        expr(id("d")),
    ]));
    let outcome = run_unchecked(decls);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::UnboundName {
            name: "d".to_owned()
        }
    );
}

#[test]
fn capture_binds_the_matched_value() {
    let decls = vec![
        DeclNode::object("Named", vec![FieldNode::new("label", ty("String"))]),
        main_fn(vec![expr(ExprNode::branch(
            Some(id("Named").call(vec![text("rex")])),
            vec![BranchOptionNode::is_arm(
                PatternNode::capture(ty("Named"), "n"),
                id("n").member("label"),
            )],
        ))]),
    ];
    assert_eq!(run(decls).ok(), "rex");
}

#[test]
fn branch_without_match_yields_action() {
    let mut decls = dog_and_cat();
    decls.push(main_fn(vec![expr(ExprNode::branch(
        Some(id("Cat")),
        vec![BranchOptionNode::is_arm(
            PatternNode::type_only(ty("Dog")),
            text("woof"),
        )],
    ))]));
    assert_eq!(run(decls).ok(), "Action");
}

#[test]
fn if_arms_test_binary_answers() {
    let outcome = run(vec![main_fn(vec![expr(ExprNode::branch(
        None,
        vec![
            BranchOptionNode::if_arm(id("equals").call(vec![num("1"), num("2")]), text("no")),
            BranchOptionNode::if_arm(id("equals").call(vec![num("2"), num("2")]), text("yes")),
            BranchOptionNode::else_arm(text("else")),
        ],
    ))])]);
    assert_eq!(outcome.ok(), "yes");
}

#[test]
fn else_arm_always_matches() {
    let outcome = run(vec![main_fn(vec![expr(ExprNode::branch(
        None,
        vec![
            BranchOptionNode::if_arm(id("False"), text("no")),
            BranchOptionNode::else_arm(text("fallback")),
        ],
    ))])]);
    assert_eq!(outcome.ok(), "fallback");
}

#[test]
fn if_condition_must_be_a_binary_answer() {
    let outcome = run_unchecked(vec![main_fn(vec![expr(ExprNode::branch(
        None,
        vec![BranchOptionNode::if_arm(num("1"), text("yes"))],
    ))])]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::TypeMismatch {
            expected: "BinaryAnswer".to_owned(),
            got: "Number".to_owned(),
        }
    );
}

#[test]
fn loop_yields_the_break_value() {
    let outcome = run(vec![main_fn(vec![expr(ExprNode::loop_of(block(vec![expr(
        ExprNode::break_with(Some(num("42"))),
    )])))])]);
    assert_eq!(outcome.ok(), "42");
}

#[test]
fn bare_break_yields_action() {
    let outcome = run(vec![main_fn(vec![expr(ExprNode::loop_of(block(vec![expr(
        ExprNode::break_with(None),
    )])))])]);
    assert_eq!(outcome.ok(), "Action");
}

#[test]
fn loop_counts_with_a_variable() {
    let outcome = run(vec![
        math(),
        main_fn(vec![
            StmtNode::decl(DeclNode::let_variable("i", num("0"))),
            expr(ExprNode::loop_of(block(vec![
                expr(ExprNode::branch(
                    None,
                    vec![BranchOptionNode::if_arm(
                        id("at_least").call(vec![id("i"), num("10")]),
                        ExprNode::break_with(Some(id("i"))),
                    )],
                )),
                StmtNode::set("i", id("add").call(vec![id("i"), num("1")])),
            ]))),
        ]),
    ]);
    assert_eq!(outcome.ok(), "10");
}

#[test]
fn nested_break_leaves_only_the_inner_loop() {
    let outcome = run(vec![main_fn(vec![expr(ExprNode::loop_of(block(vec![
        StmtNode::decl(DeclNode::let_value(
            "inner",
            ExprNode::loop_of(block(vec![expr(ExprNode::break_with(Some(num("1"))))])),
        )),
        expr(ExprNode::break_with(Some(id("inner")))),
    ])))])]);
    assert_eq!(outcome.ok(), "1");
}

#[test]
fn runaway_loop_is_cut_off() {
    let outcome = run_with(
        vec![main_fn(vec![expr(ExprNode::loop_of(block(vec![])))])],
        true,
        |b| b.runaway_loop_threshold(Some(25)),
    );
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::RunawayLoop { iterations: 25 }
    );
}

#[test]
fn return_leaves_the_function_from_inside_a_loop() {
    let outcome = run(vec![
        DeclNode::function(
            "first",
            vec![],
            None,
            block(vec![
                expr(ExprNode::loop_of(block(vec![expr(ExprNode::return_with(Some(
                    num("7"),
                )))]))),
                expr(num("0")),
            ]),
        ),
        main_fn(vec![expr(id("first").call(vec![]))]),
    ]);
    assert_eq!(outcome.ok(), "7");
}

#[test]
fn return_targets_the_closure_not_its_caller() {
    let outcome = run(vec![
        math(),
        main_fn(vec![
            StmtNode::decl(DeclNode::let_value(
                "early",
                ExprNode::function(vec![], None, block(vec![expr(ExprNode::return_with(Some(num("1"))))])),
            )),
            expr(id("add").call(vec![id("early").call(vec![]), num("1")])),
        ]),
    ]);
    assert_eq!(outcome.ok(), "2");
}

#[test]
fn closures_observe_later_sets() {
    let outcome = run(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_variable("count", num("0"))),
        StmtNode::decl(DeclNode::let_value(
            "read",
            ExprNode::function(vec![], None, id("count")),
        )),
        StmtNode::set("count", num("5")),
        expr(id("read").call(vec![])),
    ])]);
    assert_eq!(outcome.ok(), "5");
}

#[test]
fn closures_may_set_captured_variables() {
    let outcome = run(vec![
        math(),
        main_fn(vec![
            StmtNode::decl(DeclNode::let_variable("count", num("0"))),
            StmtNode::decl(DeclNode::let_value(
                "bump",
                ExprNode::function(
                    vec![],
                    None,
                    block(vec![StmtNode::set(
                        "count",
                        id("add").call(vec![id("count"), num("1")]),
                    )]),
                ),
            )),
            expr(id("bump").call(vec![])),
            expr(id("bump").call(vec![])),
            expr(id("count")),
        ]),
    ]);
    assert_eq!(outcome.ok(), "2");
}

#[test]
fn set_on_immutable_binding_fails() {
    let outcome = run_unchecked(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_value("fixed", num("1"))),
        StmtNode::set("fixed", num("2")),
    ])]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::ImmutableBinding {
            name: "fixed".to_owned()
        }
    );
}

#[test]
fn option_parameter_accepts_members() {
    let mut decls = dog_and_cat();
    decls.push(DeclNode::option("Pet", vec![ty("Dog"), ty("Cat")]));
    decls.push(DeclNode::function(
        "sound",
        vec![ParamNode::typed("pet", ty("Pet"))],
        Some(ty("String")),
        woof_branch(id("pet")),
    ));
    decls.push(main_fn(vec![expr(id("sound").call(vec![id("Dog")]))]));
    assert_eq!(run(decls).ok(), "woof");
}

#[test]
fn typed_parameter_rejects_other_values() {
    let outcome = run_unchecked(vec![
        DeclNode::function(
            "double",
            vec![ParamNode::typed("n", ty("Number"))],
            None,
            id("n"),
        ),
        main_fn(vec![expr(id("double").call(vec![text("two")]))]),
    ]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::TypeMismatch {
            expected: "Number".to_owned(),
            got: "String".to_owned(),
        }
    );
}

#[test]
fn declared_value_type_is_checked() {
    let outcome = run_unchecked(vec![
        math(),
        main_fn(vec![StmtNode::decl(DeclNode::named_value(
            "label",
            false,
            Some(ty("String")),
            id("add").call(vec![num("1"), num("2")]),
        ))]),
    ]);
    assert!(matches!(outcome.kind(), EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn objects_construct_and_expose_fields() {
    let outcome = run(vec![
        DeclNode::object(
            "Point",
            vec![FieldNode::new("x", ty("Number")), FieldNode::new("y", ty("Number"))],
        ),
        main_fn(vec![
            StmtNode::decl(DeclNode::let_value(
                "p",
                id("Point").call(vec![num("1"), num("2")]),
            )),
            expr(id("p").member("y")),
        ]),
    ]);
    assert_eq!(outcome.ok(), "2");
}

#[test]
fn instances_render_with_their_fields() {
    let outcome = run(vec![
        DeclNode::object("Point", vec![FieldNode::new("x", ty("Number"))]),
        main_fn(vec![expr(id("Point").call(vec![num("3")]))]),
    ]);
    assert_eq!(outcome.ok(), "Point(x: 3)");
}

#[test]
fn constructor_checks_field_types_and_count() {
    let point = || {
        DeclNode::object(
            "Point",
            vec![FieldNode::new("x", ty("Number")), FieldNode::new("y", ty("Number"))],
        )
    };
    let wrong_type = run_unchecked(vec![
        point(),
        main_fn(vec![expr(id("Point").call(vec![text("a"), num("2")]))]),
    ]);
    assert!(matches!(wrong_type.kind(), EvalErrorKind::TypeMismatch { .. }));

    let wrong_count = run_unchecked(vec![
        point(),
        main_fn(vec![expr(id("Point").call(vec![num("1")]))]),
    ]);
    assert_eq!(
        wrong_count.kind(),
        &EvalErrorKind::ArityMismatch {
            name: "Point".to_owned(),
            expected: 2,
            got: 1,
        }
    );
}

#[test]
fn fieldless_object_called_returns_itself() {
    let mut decls = dog_and_cat();
    decls.push(main_fn(vec![expr(woof_branch(id("Dog").call(vec![])))]));
    assert_eq!(run(decls).ok(), "woof");
}

#[test]
fn missing_field_is_reported() {
    let outcome = run_unchecked(vec![
        DeclNode::object("Point", vec![FieldNode::new("x", ty("Number"))]),
        main_fn(vec![expr(id("Point").call(vec![num("1")]).member("z"))]),
    ]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::NoSuchField {
            field: "z".to_owned(),
            type_name: "Point".to_owned(),
        }
    );
}

#[test]
fn calling_a_number_is_not_callable() {
    let outcome = run_unchecked(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_value("n", num("3"))),
        expr(id("n").call(vec![])),
    ])]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::NotCallable {
            type_name: "Number".to_owned()
        }
    );
}

#[test]
fn arguments_are_checked_against_arity() {
    let outcome = run_unchecked(vec![
        DeclNode::function("one", vec![ParamNode::untyped("a")], None, id("a")),
        main_fn(vec![expr(id("one").call(vec![num("1"), num("2")]))]),
    ]);
    assert_eq!(
        outcome.kind(),
        &EvalErrorKind::ArityMismatch {
            name: "one".to_owned(),
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn declarations_are_hoisted_within_blocks() {
    let outcome = run(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_value("x", id("later").call(vec![]))),
        StmtNode::decl(DeclNode::function("later", vec![], None, num("3"))),
        expr(id("x")),
    ])]);
    assert_eq!(outcome.ok(), "3");
}

#[test]
fn module_functions_see_each_other() {
    let outcome = run(vec![
        main_fn(vec![expr(id("helper").call(vec![]))]),
        DeclNode::function("helper", vec![], None, text("helped")),
    ]);
    assert_eq!(outcome.ok(), "helped");
}

#[test]
fn block_scopes_shadow_and_restore() {
    let outcome = run(vec![main_fn(vec![
        StmtNode::decl(DeclNode::let_value("x", num("1"))),
        expr(block(vec![StmtNode::decl(DeclNode::let_value("x", num("2")))])),
        expr(id("x")),
    ])]);
    assert_eq!(outcome.ok(), "1");
}

#[test]
fn recursion_limit_is_enforced() {
    let outcome = run(vec![
        DeclNode::function("forever", vec![], None, id("forever").call(vec![])),
        main_fn(vec![expr(id("forever").call(vec![]))]),
    ]);
    let limit = EvalMode::TestRun.max_recursion_depth();
    assert_eq!(
        Some(outcome.kind().clone()),
        limit.map(|depth| EvalErrorKind::StackOverflow { depth })
    );
    assert_eq!(outcome.call_depth, 0);
}

#[test]
fn errors_carry_a_backtrace_of_calls() {
    let outcome = run_unchecked(vec![
        DeclNode::function("inner", vec![], None, id("missing")),
        DeclNode::function("outer", vec![], None, id("inner").call(vec![])),
        main_fn(vec![expr(id("outer").call(vec![]))]),
    ]);
    let backtrace = outcome
        .err()
        .backtrace
        .as_ref()
        .unwrap_or_else(|| panic!("no backtrace"));
    let names: Vec<&str> = backtrace.frames().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer", "main"]);
    assert!(outcome.err().span.is_some());
}

#[test]
fn call_function_passes_arguments() {
    let interner = StringInterner::new();
    let file = cause_ir::parse_tree::ParsedFile::new(
        "args.cau",
        vec![
            math(),
            DeclNode::function(
                "sum",
                vec![ParamNode::untyped("a"), ParamNode::untyped("b")],
                None,
                id("add").call(vec![id("a"), id("b")]),
            ),
        ],
    );
    let module = lower(&file, &interner).unwrap_or_else(|e| panic!("{e:?}"));
    let (table, errors) = resolve(&module, &interner, &CoreLibrary);
    assert!(errors.is_empty());

    let mut interpreter = Interpreter::new(&interner, &module.arena, &table);
    interpreter
        .load_module(&module)
        .unwrap_or_else(|e| panic!("{e}"));
    let result = interpreter
        .call_function("sum", vec![Value::number(2.0), Value::number(40.0)])
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(result, Value::number(42.0));

    let missing = interpreter.call_function("nope", vec![]);
    assert!(matches!(
        missing.map_err(|e| e.kind),
        Err(EvalErrorKind::UnboundName { .. })
    ));
}

#[test]
fn module_values_bind_in_order() {
    let outcome = run(vec![
        math(),
        DeclNode::let_value("base", num("40")),
        DeclNode::let_value("answer", id("add").call(vec![id("base"), num("2")])),
        main_fn(vec![expr(id("answer"))]),
    ]);
    assert_eq!(outcome.ok(), "42");
}
