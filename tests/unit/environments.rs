//! Environments: declarations, linking, imports, access rules and cycles.

use hybroid::ast::{Expr, Stmt};
use hybroid::{AlertCode, AlertKind, EnvId, EnvKind};

use crate::common::*;

fn helpers(body: Vec<Stmt>) -> hybroid::Program {
    program("Helpers", "Shared", body)
}

// =============================================================================
// Environment Declarations
// =============================================================================

#[test]
fn test_missing_environment_declaration() {
    let output = build_all(vec![hybroid::Program::new(vec![let_(
        &["x"],
        None,
        vec![num("1")],
    )])]);
    assert_codes(&output, &[AlertCode::MissingEnvironmentDeclaration]);

    let env = output.environment(EnvId::user(0)).unwrap();
    assert_eq!(env.name, "file0.hyb");
    assert_eq!(env.kind, EnvKind::Level);
}

#[test]
fn test_invalid_environment_kind() {
    let output = build_all(vec![program("Main", "Spreadsheet", vec![])]);
    assert_codes(&output, &[AlertCode::InvalidEnvironmentType]);
}

#[test]
fn test_duplicate_environment_name() {
    let output = build_all(vec![level(vec![]), level(vec![])]);
    assert_codes(&output, &[]);
    assert_eq!(
        codes_of(&output, EnvId::user(1)),
        vec![AlertCode::DuplicateEnvironmentName]
    );
}

#[test]
fn test_every_program_is_walked() {
    let output = build_all(vec![
        level(vec![]),
        helpers(vec![let_(&["x"], None, vec![var("nope")])]),
    ]);
    assert_codes(&output, &[]);
    assert_eq!(
        codes_of(&output, EnvId::user(1)),
        vec![AlertCode::UndeclaredVariableAccess]
    );
    assert_eq!(output.error_count(), 1);
    assert!(!output.is_success());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_use_exposes_public_names() {
    let output = build_all(vec![
        level(vec![
            use_("Helpers"),
            let_(&["s"], Some(ty("number")), vec![var("Speed")]),
            let_(&["g"], Some(ty("text")), vec![call(var("Greet"), vec![])]),
        ]),
        helpers(vec![
            pub_(&["Speed"], Some(ty("number")), vec![num("3")]),
            public(fn_stmt(function(
                "Greet",
                vec![],
                vec![ty("text")],
                vec![ret(vec![text("hi")])],
            ))),
        ]),
    ]);
    assert_codes(&output, &[]);
    assert_eq!(output.requirements(EnvId::user(0)), &[EnvId::user(1)]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::VariableDecl(decl) = &program.body[2] else {
        panic!("expected a declaration");
    };
    let Expr::EnvAccess(access) = &decl.values[0] else {
        panic!("expected an environment access, got {:?}", decl.values[0]);
    };
    assert_eq!(access.env.name, "Helpers");
    assert_eq!(access.name.name, "Speed");
}

#[test]
fn test_private_names_of_other_environments() {
    let output = build_all(vec![
        level(vec![
            use_("Helpers"),
            let_(&["s"], None, vec![var("secret")]),
        ]),
        helpers(vec![let_(&["secret"], None, vec![num("1")])]),
    ]);
    assert_codes(&output, &[AlertCode::ForeignLocalVariableAccess]);
}

#[test]
fn test_qualified_access_walks_target_first() {
    let output = build_all(vec![
        level(vec![let_(
            &["s"],
            Some(ty("number")),
            vec![access("Helpers", "Speed")],
        )]),
        helpers(vec![pub_(&["Speed"], None, vec![num("3")])]),
    ]);
    assert_codes(&output, &[]);
    assert_eq!(output.requirements(EnvId::user(0)), &[EnvId::user(1)]);
}

#[test]
fn test_unknown_environment() {
    let output = build(vec![
        use_("Nowhere"),
        let_(&["x"], None, vec![access("Elsewhere", "x")]),
    ]);
    assert_codes(
        &output,
        &[AlertCode::InvalidEnvironment, AlertCode::InvalidEnvironment],
    );
}

#[test]
fn test_unknown_name_in_environment() {
    let output = build_all(vec![
        level(vec![let_(&["x"], None, vec![access("Helpers", "Nothing")])]),
        helpers(vec![]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidEnvironmentAccess]);
}

#[test]
fn test_public_types_of_imported_environments() {
    let output = build_all(vec![
        level(vec![
            use_("Helpers"),
            fn_stmt(function(
                "paint",
                vec![("c", ty("Color")), ("p", qualified("Helpers", "Point"))],
                vec![],
                vec![],
            )),
        ]),
        helpers(vec![
            public(enum_("Color", &["Red"])),
            public(class("Point", vec![], Some(constructor(vec![], vec![])), vec![])),
        ]),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_private_types_stay_hidden() {
    let output = build_all(vec![
        level(vec![
            use_("Helpers"),
            fn_stmt(function("paint", vec![("c", ty("Color"))], vec![], vec![])),
        ]),
        helpers(vec![enum_("Color", &["Red"])]),
    ]);
    assert_codes(&output, &[AlertCode::InvalidType]);
}

#[test]
fn test_ambiguous_imported_type() {
    let shared = |name: &str| program(name, "Shared", vec![public(enum_("Mode", &["On"]))]);
    let output = build_all(vec![
        level(vec![
            use_("First"),
            use_("Second"),
            fn_stmt(function("set", vec![("m", ty("Mode"))], vec![], vec![])),
        ]),
        shared("First"),
        shared("Second"),
    ]);
    assert_codes(&output, &[AlertCode::EnvironmentAccessAmbiguity]);
}

// =============================================================================
// Access Rules
// =============================================================================

#[test]
fn test_level_cannot_use_math() {
    let output = build(vec![
        use_("Math"),
        expr(call(access("Math", "Abs"), vec![num("1")])),
    ]);
    assert_codes(
        &output,
        &[AlertCode::UnallowedLibraryUse, AlertCode::UnallowedLibraryUse],
    );
}

#[test]
fn test_mesh_can_use_math() {
    let output = build_all(vec![program(
        "Shape",
        "Mesh",
        vec![let_(
            &["n"],
            Some(ty("number")),
            vec![call(access("Math", "Abs"), vec![num("1")])],
        )],
    )]);
    assert_codes(&output, &[]);
}

#[test]
fn test_level_uses_fmath() {
    let output = build(vec![
        use_("Fmath"),
        let_(&["r"], Some(ty("fixed")), vec![call(var("Sqrt"), vec![fixed("4")])]),
        let_(
            &["n"],
            Some(ty("number")),
            vec![call(access("Fmath", "ToNumber"), vec![var("r")])],
        ),
    ]);
    assert_codes(&output, &[]);
}

#[test]
fn test_mesh_cannot_reach_level() {
    let output = build_all(vec![
        level(vec![pub_(&["x"], None, vec![num("1")])]),
        program("Shape", "Mesh", vec![use_("Main")]),
    ]);
    assert_eq!(
        codes_of(&output, EnvId::user(1)),
        vec![AlertCode::UnallowedEnvironmentAccess]
    );
}

#[test]
fn test_level_cannot_reach_sound() {
    let output = build_all(vec![
        level(vec![let_(&["x"], None, vec![access("Boom", "volume")])]),
        program("Boom", "Sound", vec![pub_(&["volume"], None, vec![num("1")])]),
    ]);
    assert_codes(&output, &[AlertCode::UnallowedEnvironmentAccess]);
}

#[test]
fn test_builtins_are_implicit() {
    let output = build(vec![let_(
        &["s"],
        Some(ty("text")),
        vec![call(var("ToString"), vec![num("1")])],
    )]);
    assert_codes(&output, &[]);

    let program = output.program(EnvId::user(0)).unwrap();
    let Stmt::VariableDecl(decl) = &program.body[1] else {
        panic!("expected a declaration");
    };
    let Expr::Call(call) = &decl.values[0] else {
        panic!("expected a call");
    };
    assert!(matches!(call.caller, Expr::Builtin(_)));
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn test_import_cycle_reported_once() {
    let output = build_all(vec![
        program("A", "Shared", vec![use_("B")]),
        program("B", "Shared", vec![use_("A")]),
    ]);

    let cycles: Vec<_> = output
        .all_alerts()
        .filter(|(_, alert)| alert.code() == AlertCode::ImportCycle)
        .collect();
    assert_eq!(cycles.len(), 1);

    let (env, alert) = cycles[0];
    assert_eq!(env, EnvId::user(1));
    let AlertKind::ImportCycle { cycle } = &alert.kind else {
        panic!("expected an import cycle");
    };
    assert_eq!(cycle, &["B", "A", "B"]);
}

#[test]
fn test_import_cycle_with_calls_both_ways() {
    let number_fn = |name: &str, body| {
        public(fn_stmt(function(name, vec![], vec![ty("number")], body)))
    };
    let output = build_all(vec![
        program(
            "A",
            "Shared",
            vec![
                use_("B"),
                number_fn("f", vec![ret(vec![num("1")])]),
                let_(&["x"], Some(ty("number")), vec![call(access("B", "h"), vec![])]),
                let_(&["z"], Some(ty("number")), vec![call(var("h"), vec![])]),
            ],
        ),
        program(
            "B",
            "Shared",
            vec![
                use_("A"),
                number_fn("h", vec![ret(vec![call(var("f"), vec![])])]),
                let_(&["y"], Some(ty("number")), vec![call(access("A", "f"), vec![])]),
            ],
        ),
    ]);

    assert!(codes_of(&output, EnvId::user(0)).is_empty());
    assert_eq!(codes_of(&output, EnvId::user(1)), vec![AlertCode::ImportCycle]);
    let cycles = output
        .all_alerts()
        .filter(|(_, alert)| alert.code() == AlertCode::ImportCycle)
        .count();
    assert_eq!(cycles, 1);
}

#[test]
fn test_self_import_is_ignored() {
    let output = build(vec![use_("Main")]);
    assert_codes(&output, &[]);
    assert!(output.requirements(EnvId::user(0)).is_empty());
}
