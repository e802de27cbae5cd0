//! Generic functions: inference, explicit arguments and unresolved generics.

use hybroid::AlertCode;

use crate::common::*;

/// `fn first<T>(xs: list<T>) -> T { return xs[1] }`
fn first() -> hybroid::ast::Stmt {
    fn_stmt(generic_function(
        "first",
        &["T"],
        vec![("xs", list_of(ty("T")))],
        vec![ty("T")],
        vec![ret(vec![member(var("xs"), num("1"))])],
    ))
}

/// `fn pick<T>(n: number) {}`
fn pick() -> hybroid::ast::Stmt {
    fn_stmt(generic_function(
        "pick",
        &["T"],
        vec![("n", ty("number"))],
        vec![],
        vec![],
    ))
}

#[test]
fn test_generic_inferred_from_list_argument() {
    let output = build(vec![
        first(),
        let_(
            &["n"],
            Some(ty("number")),
            vec![call(var("first"), vec![list(vec![num("1"), num("2")])])],
        ),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_inferred_return_type_is_checked() {
    let output = build(vec![
        first(),
        let_(
            &["s"],
            Some(ty("text")),
            vec![call(var("first"), vec![list(vec![num("1")])])],
        ),
    ]);
    assert_codes(&output, &[AlertCode::ExplicitTypeMismatch]);
}

#[test]
fn test_generic_bound_twice_must_agree() {
    let output = build(vec![
        fn_stmt(generic_function(
            "same",
            &["T"],
            vec![("a", ty("T")), ("b", ty("T"))],
            vec![],
            vec![],
        )),
        expr(call(var("same"), vec![num("1"), text("x")])),
    ]);
    assert_codes(&output, &[AlertCode::InvalidArgumentType]);
}

#[test]
fn test_unresolved_generic() {
    let output = build(vec![pick(), expr(call(var("pick"), vec![num("1")]))]);
    assert_codes(&output, &[AlertCode::UnresolvedGeneric]);
}

#[test]
fn test_explicit_generic_argument() {
    let output = build(vec![
        pick(),
        expr(call_generic(var("pick"), vec![ty("text")], vec![num("1")])),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_too_many_generic_arguments() {
    let output = build(vec![
        pick(),
        expr(call_generic(
            var("pick"),
            vec![ty("text"), ty("number")],
            vec![num("1")],
        )),
    ]);
    assert_codes(
        &output,
        &[AlertCode::TooManyValuesGiven, AlertCode::UnresolvedGeneric],
    );
}

#[test]
fn test_duplicate_generic_parameter() {
    let output = build(vec![fn_stmt(generic_function(
        "twice",
        &["T", "T"],
        vec![],
        vec![],
        vec![],
    ))]);
    assert_codes(&output, &[AlertCode::DuplicateGenericParameter]);
}

#[test]
fn test_generic_name_outside_its_function() {
    let output = build(vec![
        pick(),
        let_(&["x"], Some(ty("T")), vec![]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidType]);
}
