//! Operators, containers, indexing and calls.

use hybroid::AlertCode;
use hybroid::ast::{BinaryOp, UnaryOp};

use crate::common::*;

/// `let v = expr`
fn value_of(e: hybroid::ast::Expr) -> hybroid::ast::Stmt {
    let_(&["v"], None, vec![e])
}

// =============================================================================
// Binary Operators
// =============================================================================

#[test]
fn test_arithmetic_on_matching_numbers() {
    let output = build(vec![
        value_of(bin(num("1"), BinaryOp::Add, num("2"))),
        let_(&["f"], None, vec![bin(fixed("1.5"), BinaryOp::Mul, fixed("2"))]),
        let_(&["p"], None, vec![bin(num("2"), BinaryOp::Pow, num("8"))]),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_arithmetic_type_mismatch() {
    let output = build(vec![value_of(bin(num("1"), BinaryOp::Add, text("x")))]);
    assert_codes(&output, &[AlertCode::TypesMismatch]);
}

#[test]
fn test_fixed_and_number_do_not_mix() {
    let output = build(vec![value_of(bin(fixed("1"), BinaryOp::Sub, num("1")))]);
    assert_codes(&output, &[AlertCode::TypesMismatch]);
}

#[test]
fn test_concat_needs_text() {
    let output = build(vec![
        let_(&["a"], None, vec![bin(text("n = "), BinaryOp::Concat, num("1"))]),
        let_(&["b"], None, vec![bin(num("1"), BinaryOp::Concat, num("2"))]),
    ]);
    assert_codes(&output, &[AlertCode::TypesMismatch]);
}

#[test]
fn test_comparison_of_different_types() {
    let output = build(vec![
        let_(&["a"], Some(ty("bool")), vec![bin(num("1"), BinaryOp::Less, num("2"))]),
        let_(&["b"], None, vec![bin(num("1"), BinaryOp::Equal, text("1"))]),
    ]);
    assert_codes(&output, &[AlertCode::TypesMismatch]);
}

#[test]
fn test_logical_operands_must_be_bool() {
    let output = build(vec![value_of(bin(boolean(true), BinaryOp::And, num("1")))]);
    assert_codes(&output, &[AlertCode::InvalidOperand]);
}

#[test]
fn test_bitwise_operands_must_be_numbers() {
    let output = build(vec![
        let_(&["a"], None, vec![bin(num("6"), BinaryOp::BitAnd, num("3"))]),
        let_(&["b"], None, vec![bin(fixed("1"), BinaryOp::ShiftLeft, num("2"))]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidOperand]);
}

#[test]
fn test_enum_fields_are_numbers() {
    let output = build(vec![
        enum_("Difficulty", &["Easy", "Hard"]),
        value_of(bin(field(var("Difficulty"), "Hard"), BinaryOp::Add, num("1"))),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_compound_assignment() {
    let output = build(vec![
        let_(&["n"], None, vec![num("1")]),
        compound(var("n"), BinaryOp::Add, num("2")),
        let_(&["s"], None, vec![text("a")]),
        compound(var("s"), BinaryOp::Concat, text("b")),
        compound(var("n"), BinaryOp::Add, text("c")),
    ]);
    assert_codes(&output, &[AlertCode::TypesMismatch]);
}

// =============================================================================
// Unary Operators
// =============================================================================

#[test]
fn test_unary_operators() {
    let output = build(vec![
        let_(&["a"], None, vec![unary(UnaryOp::Not, boolean(false))]),
        let_(&["b"], None, vec![unary(UnaryOp::Neg, num("3"))]),
        let_(&["c"], None, vec![unary(UnaryOp::Len, text("abc"))]),
        let_(&["d"], None, vec![unary(UnaryOp::Len, list(vec![num("1")]))]),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_unary_operand_types() {
    let output = build(vec![
        let_(&["a"], None, vec![unary(UnaryOp::Not, num("1"))]),
        let_(&["b"], None, vec![unary(UnaryOp::Neg, text("x"))]),
        let_(&["c"], None, vec![unary(UnaryOp::Len, num("5"))]),
    ]);
    assert_codes(
        &output,
        &[
            AlertCode::InvalidOperand,
            AlertCode::InvalidOperand,
            AlertCode::InvalidOperand,
        ],
    );
}

// =============================================================================
// Lists and Maps
// =============================================================================

#[test]
fn test_mixed_list_contents() {
    let output = build(vec![value_of(list(vec![num("1"), text("a")]))]);
    assert_codes(&output, &[AlertCode::MixedMapOrListContents]);
}

#[test]
fn test_empty_list_needs_a_type() {
    let output = build(vec![
        let_(&["a"], None, vec![list(vec![])]),
        let_(&["b"], Some(list_of(ty("number"))), vec![list(vec![])]),
        let_(&["c"], Some(map_of(ty("text"))), vec![map(vec![])]),
    ]);
    assert_codes(&output, &[AlertCode::UnknownListOrMapContents]);
}

#[test]
fn test_duplicate_map_key() {
    let output = build(vec![value_of(map(vec![("a", num("1")), ("a", num("2"))]))]);
    assert_codes(&output, &[AlertCode::DuplicateElement]);
}

#[test]
fn test_list_and_map_wrappers_need_one_type() {
    let mut bad = list_of(ty("number"));
    bad.wrapped.push(ty("text"));
    let output = build(vec![let_(&["xs"], Some(bad), vec![])]);
    assert_codes(&output, &[AlertCode::InvalidListOrMapWrappedType]);
}

#[test]
fn test_list_indexing() {
    let output = build(vec![
        let_(&["xs"], None, vec![list(vec![text("a"), text("b")])]),
        let_(&["a"], Some(ty("text")), vec![member(var("xs"), num("1"))]),
        let_(&["b"], None, vec![member(var("xs"), num("0"))]),
        let_(&["c"], None, vec![member(var("xs"), num("1.5"))]),
        let_(&["d"], None, vec![member(var("xs"), text("k"))]),
    ]);
    assert_codes(
        &output,
        &[
            AlertCode::ListIndexOutOfBounds,
            AlertCode::InvalidListIndex,
            AlertCode::InvalidMemberIndex,
        ],
    );
}

#[test]
fn test_map_indexing() {
    let output = build(vec![
        let_(&["m"], None, vec![map(vec![("a", num("1"))])]),
        let_(&["a"], Some(ty("number")), vec![member(var("m"), text("a"))]),
        let_(&["b"], None, vec![member(var("m"), num("1"))]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidMemberIndex]);
}

#[test]
fn test_access_on_wrong_values() {
    let output = build(vec![
        let_(&["xs"], None, vec![list(vec![num("1")])]),
        let_(&["a"], None, vec![field(var("xs"), "size")]),
        let_(&["n"], None, vec![num("1")]),
        let_(&["b"], None, vec![member(var("n"), num("1"))]),
        let_(&["c"], None, vec![field(var("n"), "x")]),
    ]);
    assert_codes(
        &output,
        &[
            AlertCode::FieldAccessOnListOrMap,
            AlertCode::MemberAccessOnNonListOrMap,
            AlertCode::InvalidAccessValue,
        ],
    );
}

// =============================================================================
// Calls and Functions
// =============================================================================

#[test]
fn test_calling_a_non_function() {
    let output = build(vec![
        let_(&["n"], None, vec![num("1")]),
        expr(call(var("n"), vec![])),
    ]);
    assert_codes(&output, &[AlertCode::InvalidCallerType]);
}

#[test]
fn test_argument_count() {
    let output = build(vec![
        expr(call(var("ToString"), vec![])),
        expr(call(var("ToString"), vec![num("1"), num("2")])),
    ]);
    assert_codes(
        &output,
        &[AlertCode::TooFewValuesGiven, AlertCode::TooManyValuesGiven],
    );
}

#[test]
fn test_variadic_arguments() {
    let output = build(vec![
        let_(
            &["s"],
            Some(ty("text")),
            vec![call(access("String", "Char"), vec![num("72"), num("105")])],
        ),
        let_(
            &["t"],
            None,
            vec![call(access("String", "Char"), vec![num("72"), text("i")])],
        ),
    ]);
    assert_codes(&output, &[AlertCode::InvalidArgumentType]);
}

#[test]
fn test_multiple_returns_spread() {
    let two = fn_stmt(function(
        "two",
        vec![],
        vec![ty("number"), ty("text")],
        vec![ret(vec![num("1"), text("a")])],
    ));
    let output = build(vec![
        two,
        let_(&["a", "b"], None, vec![call(var("two"), vec![])]),
        let_(&["c"], None, vec![call(var("two"), vec![])]),
        let_(
            &["d"],
            Some(ty("number")),
            vec![bin(call(var("two"), vec![]), BinaryOp::Add, num("1"))],
        ),
    ]);
    assert_codes(&output, &[AlertCode::TooManyValuesGiven]);
}

#[test]
fn test_call_without_values_used_as_value() {
    let output = build(vec![
        fn_stmt(function("nothing", vec![], vec![], vec![])),
        let_(&["x"], None, vec![bin(call(var("nothing"), vec![]), BinaryOp::Add, num("1"))]),
    ]);
    assert_codes(&output, &[AlertCode::TooFewValuesGiven]);
}

#[test]
fn test_anonymous_function() {
    let output = build(vec![
        let_(
            &["double"],
            None,
            vec![lambda(
                vec![("x", ty("number"))],
                vec![ty("number")],
                vec![ret(vec![bin(var("x"), BinaryOp::Mul, num("2"))])],
            )],
        ),
        let_(&["n"], Some(ty("number")), vec![call(var("double"), vec![num("4")])]),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_anonymous_function_must_return() {
    let output = build(vec![let_(
        &["f"],
        None,
        vec![lambda(vec![], vec![ty("number")], vec![])],
    )]);
    assert_codes(&output, &[AlertCode::NotAllCodePathsExit]);
}

#[test]
fn test_function_type_annotation() {
    let output = build(vec![
        let_(
            &["f"],
            Some(fn_ty(vec![ty("number")], vec![ty("text")])),
            vec![lambda(
                vec![("x", ty("number"))],
                vec![ty("text")],
                vec![ret(vec![call(var("ToString"), vec![var("x")])])],
            )],
        ),
        let_(
            &["g"],
            Some(fn_ty(vec![ty("number")], vec![ty("text")])),
            vec![lambda(vec![], vec![], vec![])],
        ),
    ]);
    assert_codes(&output, &[AlertCode::ExplicitTypeMismatch]);
}
