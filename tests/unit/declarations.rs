//! Declarations: redeclaration, forward references, aliases, constants.

use hybroid::AlertCode;
use hybroid::ast::{Expr, LiteralKind, Stmt};
use hybroid::{EnvId, SessionConfig};

use crate::common::*;

/// The `index`-th statement after the `env` line of the first program.
fn stmt(output: &hybroid::BuildOutput, index: usize) -> &Stmt {
    &output.program(EnvId::user(0)).expect("program").body[index + 1]
}

fn first_value(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::VariableDecl(decl) => &decl.values[0],
        other => panic!("expected a declaration, got {other:?}"),
    }
}

// =============================================================================
// Redeclaration
// =============================================================================

#[test]
fn test_redeclared_variable() {
    let output = build(vec![
        let_(&["a"], None, vec![num("1")]),
        let_(&["a"], None, vec![num("2")]),
    ]);
    assert_codes(&output, &[AlertCode::Redeclaration]);

    let alert = output.alerts(EnvId::user(0)).unwrap().iter().next().unwrap();
    assert_eq!(alert.spans.len(), 2, "points at the original too");
}

#[test]
fn test_redeclared_function() {
    let output = build(vec![
        fn_stmt(function("f", vec![], vec![], vec![])),
        fn_stmt(function("f", vec![("n", ty("number"))], vec![], vec![])),
    ]);
    assert_codes(&output, &[AlertCode::Redeclaration]);
}

#[test]
fn test_type_names_share_one_namespace() {
    let output = build(vec![
        class("Thing", vec![], Some(constructor(vec![], vec![])), vec![]),
        enum_("Thing", &["A"]),
    ]);
    assert_codes(&output, &[AlertCode::Redeclaration]);
}

#[test]
fn test_shadowing_in_inner_scope_is_allowed() {
    let output = build(vec![
        let_(&["a"], None, vec![num("1")]),
        fn_stmt(function(
            "f",
            vec![],
            vec![],
            vec![let_(&["a"], None, vec![text("inner")])],
        )),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_duplicate_enum_field() {
    let output = build(vec![enum_("Color", &["Red", "Red"])]);
    assert_codes(&output, &[AlertCode::DuplicateElement]);
}

#[test]
fn test_empty_enum() {
    let output = build(vec![enum_("Nothing", &[])]);
    assert_codes(&output, &[AlertCode::EmptyEnum]);
}

// =============================================================================
// Forward References
// =============================================================================

#[test]
fn test_function_used_before_declaration() {
    let output = build(vec![
        let_(&["n"], Some(ty("number")), vec![call(var("later"), vec![])]),
        fn_stmt(function(
            "later",
            vec![],
            vec![ty("number")],
            vec![ret(vec![num("4")])],
        )),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_class_used_before_declaration() {
    let output = build(vec![
        let_(&["p"], None, vec![new_("Point", vec![num("1"), num("2")])]),
        class(
            "Point",
            vec![
                field_decl(&["x"], Some(ty("number")), vec![]),
                field_decl(&["y"], Some(ty("number")), vec![]),
            ],
            Some(constructor(
                vec![("a", ty("number")), ("b", ty("number"))],
                vec![assign(var("x"), var("a")), assign(var("y"), var("b"))],
            )),
            vec![],
        ),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_local_variable_used_before_declaration() {
    let output = build(vec![
        let_(&["a"], None, vec![var("b")]),
        let_(&["b"], None, vec![num("1")]),
    ]);
    assert_codes(&output, &[AlertCode::UndeclaredVariableAccess]);
}

#[test]
fn test_class_without_constructor() {
    let output = build(vec![class("Empty", vec![], None, vec![])]);
    assert_codes(&output, &[AlertCode::MissingConstructor]);
}

#[test]
fn test_new_without_constructor_skips_argument_checks() {
    let output = build(vec![
        class("Empty", vec![], None, vec![]),
        let_(&["e"], None, vec![new_("Empty", vec![num("1"), num("2")])]),
    ]);
    assert_codes(&output, &[AlertCode::MissingConstructor]);
}

#[test]
fn test_type_declared_in_function_body() {
    let output = build(vec![fn_stmt(function(
        "f",
        vec![],
        vec![],
        vec![enum_("Local", &["A"])],
    ))]);
    assert_codes(&output, &[AlertCode::DeclarationInLocalScope]);
}

// =============================================================================
// Aliases
// =============================================================================

#[test]
fn test_aliases_resolve_in_any_order() {
    let output = build(vec![
        alias("Row", list_of(ty("Cell"))),
        alias("Cell", ty("number")),
        let_(&["r"], Some(ty("Row")), vec![list(vec![num("1"), num("2")])]),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_alias_cycle_is_reported_once() {
    let output = build(vec![alias("A", ty("B")), alias("B", ty("A"))]);
    assert_codes(&output, &[AlertCode::InvalidType]);
}

#[test]
fn test_unknown_type_name() {
    let output = build(vec![let_(&["v"], Some(ty("Nope")), vec![])]);
    assert_codes(&output, &[AlertCode::InvalidType]);
}

// =============================================================================
// Variables and Constants
// =============================================================================

#[test]
fn test_typed_declaration_gets_default_value() {
    let output = build(vec![let_(&["n"], Some(ty("number")), vec![])]);
    assert_codes(&output, &[]);
    let Expr::Literal(lit) = first_value(stmt(&output, 0)) else {
        panic!("expected a default literal");
    };
    assert_eq!(lit.kind, LiteralKind::Number);
}

#[test]
fn test_untyped_declaration_without_value() {
    let output = build(vec![let_(&["n"], None, vec![])]);
    assert_codes(&output, &[AlertCode::ExplicitTypeRequiredInDeclaration]);
}

#[test]
fn test_explicit_type_mismatch() {
    let output = build(vec![let_(&["n"], Some(ty("number")), vec![text("no")])]);
    assert_codes(&output, &[AlertCode::ExplicitTypeMismatch]);
}

#[test]
fn test_value_count_mismatch() {
    let output = build(vec![let_(&["a", "b"], None, vec![num("1")])]);
    assert_codes(&output, &[AlertCode::TooFewValuesGiven]);

    let output = build(vec![let_(&["a"], None, vec![num("1"), num("2")])]);
    assert_codes(&output, &[AlertCode::TooManyValuesGiven]);
}

#[test]
fn test_constant_without_value() {
    let output = build(vec![const_(&["LIMIT"], vec![])]);
    assert_codes(&output, &[AlertCode::NoValueGivenForConstant]);
}

#[test]
fn test_constants_are_inlined() {
    let output = build(vec![
        const_(&["LIMIT"], vec![num("10")]),
        let_(&["x"], None, vec![var("LIMIT")]),
    ]);
    assert_codes(&output, &[]);
    let Expr::Literal(lit) = first_value(stmt(&output, 1)) else {
        panic!("expected the constant to be inlined");
    };
    assert_eq!(lit.value, "10");
}

#[test]
fn test_assigning_a_constant() {
    let output = build(vec![
        const_(&["LIMIT"], vec![num("10")]),
        assign(var("LIMIT"), num("11")),
    ]);
    assert_codes(&output, &[AlertCode::ConstAssignment]);
}

#[test]
fn test_public_declaration_in_function() {
    let output = build(vec![fn_stmt(function(
        "f",
        vec![],
        vec![],
        vec![pub_(&["x"], None, vec![num("1")])],
    ))]);
    assert_codes(&output, &[AlertCode::PublicDeclarationInLocalScope]);
}

#[test]
fn test_enum_fields_become_numbers() {
    let output = build(vec![
        enum_("Color", &["Red", "Green", "Blue"]),
        let_(&["c"], None, vec![field(var("Color"), "Blue")]),
    ]);
    assert_codes(&output, &[]);
    let Expr::Literal(lit) = first_value(stmt(&output, 1)) else {
        panic!("expected the enum field to be rewritten");
    };
    assert_eq!(lit.kind, LiteralKind::Number);
    assert_eq!(lit.value, "3");
}

#[test]
fn test_unknown_enum_field() {
    let output = build(vec![
        enum_("Color", &["Red"]),
        let_(&["c"], None, vec![field(var("Color"), "Purple")]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidField]);
}

#[test]
fn test_second_env_statement() {
    let output = build(vec![env_stmt("Again", "Level")]);
    assert_codes(&output, &[AlertCode::EnvironmentRedeclaration]);
}

#[test]
fn test_deny_warnings_fails_on_unreachable_code() {
    let body = || {
        vec![fn_stmt(function(
            "f",
            vec![],
            vec![],
            vec![ret(vec![]), expr(call(var("ToString"), vec![num("1")]))],
        ))]
    };
    let lenient = build(body());
    assert!(lenient.is_success());

    let strict = build_with(
        SessionConfig::default().with_deny_warnings(true),
        vec![level(body())],
    );
    assert!(!strict.is_success());
}
