//! Exits, unreachable code, loops and `match`.

use hybroid::ast::{BinaryOp, Expr, LiteralKind, Stmt};
use hybroid::{AlertCode, EnvId, SessionConfig, Severity};

use crate::common::*;

/// Body of the first function declared in the first program.
fn function_body(output: &hybroid::BuildOutput) -> &[Stmt] {
    let program = output.program(EnvId::user(0)).expect("program");
    program
        .body
        .iter()
        .find_map(|stmt| match stmt {
            Stmt::Function(decl) => Some(decl.body.as_slice()),
            _ => None,
        })
        .expect("a function")
}

fn returns_number(body: Vec<Stmt>) -> Stmt {
    fn_stmt(function("f", vec![], vec![ty("number")], body))
}

// =============================================================================
// Return Paths
// =============================================================================

#[test]
fn test_missing_return() {
    let output = build(vec![returns_number(vec![])]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_if_without_else_does_not_guarantee_return() {
    let output = build(vec![returns_number(vec![if_(
        boolean(true),
        vec![ret(vec![num("1")])],
        None,
    )])]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_if_else_both_returning() {
    let output = build(vec![returns_number(vec![if_(
        boolean(true),
        vec![ret(vec![num("1")])],
        Some(vec![ret(vec![num("2")])]),
    )])]);
    assert_codes(&output, &[]);
}

#[test]
fn test_one_branch_returning() {
    let output = build(vec![returns_number(vec![if_(
        boolean(true),
        vec![ret(vec![num("1")])],
        Some(vec![]),
    )])]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_match_with_default_returning_everywhere() {
    let output = build(vec![fn_stmt(function(
        "f",
        vec![("n", ty("number"))],
        vec![ty("text")],
        vec![match_stmt(
            var("n"),
            vec![
                arm(vec![num("1")], vec![ret(vec![text("one")])]),
                else_arm(vec![ret(vec![text("many")])]),
            ],
        )],
    ))]);
    assert_codes(&output, &[]);
}

#[test]
fn test_match_without_default_can_fall_through() {
    let output = build(vec![fn_stmt(function(
        "f",
        vec![("n", ty("number"))],
        vec![ty("text")],
        vec![match_stmt(
            var("n"),
            vec![arm(vec![num("1")], vec![ret(vec![text("one")])])],
        )],
    ))]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_return_value_mismatch() {
    let output = build(vec![returns_number(vec![ret(vec![text("no")])])]);
    assert_codes(&output, &[AlertCode::TypeMismatch]);

    let output = build(vec![returns_number(vec![ret(vec![])])]);
    assert_codes(&output, &[AlertCode::TooFewValuesGiven]);
}

#[test]
fn test_exit_statements_outside_their_scope() {
    let output = build(vec![brk(), cont(), ret(vec![]), yield_(vec![])]);
    assert_codes(
        &output,
        &[
            AlertCode::InvalidUseOfExitStatement,
            AlertCode::InvalidUseOfExitStatement,
            AlertCode::InvalidUseOfExitStatement,
            AlertCode::InvalidUseOfExitStatement,
        ],
    );
}

#[test]
fn test_loop_exits_do_not_cross_functions() {
    let output = build(vec![repeat(
        num("3"),
        None,
        vec![expr(lambda(vec![], vec![], vec![brk()]))],
    )]);
    assert_codes(&output, &[AlertCode::InvalidUseOfExitStatement]);
}

// =============================================================================
// Unreachable Code
// =============================================================================

#[test]
fn test_unreachable_code_is_pruned() {
    let output = build(vec![fn_stmt(function(
        "f",
        vec![],
        vec![],
        vec![
            ret(vec![]),
            expr(call(var("ToString"), vec![num("1")])),
            expr(call(var("ToString"), vec![num("2")])),
        ],
    ))]);
    assert_codes(&output, &[AlertCode::UnreachableCode]);

    let alerts = output.alerts(EnvId::user(0)).unwrap();
    assert_eq!(alerts.iter().next().unwrap().severity(), Severity::Warning);
    assert_eq!(alerts.error_count(), 0);
    assert_eq!(function_body(&output).len(), 1);
}

#[test]
fn test_unreachable_code_kept_without_pruning() {
    let config = SessionConfig::default().with_prune_unreachable(false);
    let output = build_with(
        config,
        vec![level(vec![fn_stmt(function(
            "f",
            vec![],
            vec![],
            vec![
                ret(vec![]),
                expr(call(var("ToString"), vec![num("1")])),
                expr(call(var("ToString"), vec![num("2")])),
            ],
        ))])],
    );
    assert_codes(&output, &[AlertCode::UnreachableCode]);
    assert_eq!(function_body(&output).len(), 3);
}

#[test]
fn test_code_after_exhaustive_if_is_unreachable() {
    let output = build(vec![returns_number(vec![
        if_(
            boolean(false),
            vec![ret(vec![num("1")])],
            Some(vec![ret(vec![num("2")])]),
        ),
        ret(vec![num("3")]),
    ])]);
    assert_codes(&output, &[AlertCode::UnreachableCode]);
    assert_eq!(function_body(&output).len(), 1);
}

#[test]
fn test_code_after_break_in_loop() {
    let output = build(vec![while_(
        boolean(true),
        vec![brk(), let_(&["x"], None, vec![num("1")])],
    )]);
    assert_codes(&output, &[AlertCode::UnreachableCode]);
}

// =============================================================================
// Loops
// =============================================================================

#[test]
fn test_repeat_defaults_are_filled_in() {
    let output = build(vec![repeat(num("10"), Some("i"), vec![])]);
    assert_codes(&output, &[]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::Repeat(stmt) = &program.body[1] else {
        panic!("expected a repeat");
    };
    for part in [&stmt.start, &stmt.skip] {
        let Some(Expr::Literal(lit)) = part else {
            panic!("expected a default literal");
        };
        assert_eq!(lit.kind, LiteralKind::Number);
        assert_eq!(lit.value, "1");
    }
}

#[test]
fn test_repeat_over_fixed_uses_fixed_defaults() {
    let output = build(vec![repeat(fixed("2.5"), Some("t"), vec![])]);
    assert_codes(&output, &[]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::Repeat(stmt) = &program.body[1] else {
        panic!("expected a repeat");
    };
    let Some(Expr::Literal(lit)) = &stmt.start else {
        panic!("expected a default literal");
    };
    assert!(matches!(lit.kind, LiteralKind::Fixed(_)));
}

#[test]
fn test_repeat_needs_a_number() {
    let output = build(vec![repeat(text("ten"), None, vec![])]);
    assert_codes(&output, &[AlertCode::TypeMismatch]);
}

#[test]
fn test_while_condition_must_be_bool() {
    let output = build(vec![while_(num("1"), vec![])]);
    assert_codes(&output, &[AlertCode::TypeMismatch]);
}

#[test]
fn test_for_loop_binds_index_and_value() {
    let output = build(vec![
        let_(&["xs"], None, vec![list(vec![text("a"), text("b")])]),
        for_(
            Some("i"),
            Some("x"),
            var("xs"),
            vec![let_(
                &["s"],
                None,
                vec![bin(var("x"), BinaryOp::Concat, call(var("ToString"), vec![var("i")]))],
            )],
        ),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_for_loop_gets_a_key_name() {
    let output = build(vec![for_(
        None,
        Some("x"),
        list(vec![num("1")]),
        vec![],
    )]);
    assert_codes(&output, &[]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::For(stmt) = &program.body[1] else {
        panic!("expected a for loop");
    };
    assert!(stmt.key.as_ref().is_some_and(|k| k.name.starts_with("__key")));
}

#[test]
fn test_for_loop_over_non_container() {
    let output = build(vec![for_(None, Some("x"), num("3"), vec![])]);
    assert_codes(&output, &[AlertCode::TypeMismatch]);
}

#[test]
fn test_tick_does_not_allow_break() {
    let output = build(vec![tick(Some("t"), vec![brk()])]);
    assert_codes(&output, &[AlertCode::InvalidUseOfExitStatement]);
}

// =============================================================================
// Match
// =============================================================================

#[test]
fn test_match_expression_yields_a_value() {
    let output = build(vec![let_(
        &["name"],
        Some(ty("text")),
        vec![match_expr(
            num("2"),
            vec![
                arm(vec![num("1")], vec![yield_(vec![text("one")])]),
                else_arm(vec![yield_(vec![text("other")])]),
            ],
        )],
    )]);
    assert_codes(&output, &[]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::VariableDecl(decl) = &program.body[1] else {
        panic!("expected a declaration");
    };
    let Expr::Match(matching) = &decl.values[0] else {
        panic!("expected a match expression");
    };
    assert_eq!(matching.return_amount, 1);
}

#[test]
fn test_match_expression_arms_must_agree() {
    let output = build(vec![let_(
        &["v"],
        None,
        vec![match_expr(
            num("2"),
            vec![
                arm(vec![num("1")], vec![yield_(vec![text("one")])]),
                else_arm(vec![yield_(vec![num("2")])]),
            ],
        )],
    )]);
    assert_codes(&output, &[AlertCode::TypeMismatch]);
}

#[test]
fn test_match_expression_needs_default() {
    let output = build(vec![let_(
        &["v"],
        None,
        vec![match_expr(
            num("2"),
            vec![arm(vec![num("1")], vec![yield_(vec![text("one")])])],
        )],
    )]);
    assert_codes(&output, &[AlertCode::DefaultCaseMissing]);
}

#[test]
fn test_match_expression_arm_without_yield() {
    let output = build(vec![let_(
        &["v"],
        None,
        vec![match_expr(
            num("2"),
            vec![
                arm(vec![num("1")], vec![yield_(vec![text("one")])]),
                else_arm(vec![]),
            ],
        )],
    )]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_match_default_must_be_last() {
    let output = build(vec![match_stmt(
        num("1"),
        vec![else_arm(vec![]), arm(vec![num("1")], vec![])],
    )]);
    assert_codes(&output, &[AlertCode::InvalidDefaultCasePlacement]);
}

#[test]
fn test_match_case_type() {
    let output = build(vec![match_stmt(
        num("1"),
        vec![arm(vec![text("one")], vec![]), else_arm(vec![])],
    )]);
    assert_codes(&output, &[AlertCode::InvalidCaseType]);
}

#[test]
fn test_match_with_only_default() {
    let output = build(vec![match_stmt(num("1"), vec![else_arm(vec![])])]);
    assert_codes(&output, &[AlertCode::InsufficientCases]);
}
