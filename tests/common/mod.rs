//! Builders for syntax trees used by the integration tests.
//!
//! Every node gets its own span from a per-thread line counter so alerts
//! can be told apart and redeclarations are never mistaken for the
//! original declaration.

#![allow(dead_code)]

use std::cell::Cell;

use hybroid::ast::{
    AliasDecl, AssignOp, AssignmentStmt, BinaryExpr, BinaryOp, CallExpr, ClassDecl,
    ConstructExpr, ConstructorDecl, DestroyStmt, EntityDecl, EntityEvalExpr, EntityFunctionDecl,
    EntityFunctionKind, EnumDecl, EnvAccessExpr, EnvStmt, ExitStmt, Expr, FieldExpr, ForStmt,
    FunctionDecl, FunctionExpr, Ident, IfStmt, ListExpr, LiteralExpr, MapEntry, MapExpr, MatchArm,
    MatchExpr, MatchStmt, MemberExpr, Param, RepeatStmt, SelfExpr, Stmt, TickStmt, TypeExpr,
    UnaryExpr, UnaryOp, UseStmt, VariableDecl, WhileStmt,
};
use hybroid::core::FixedKind;
use hybroid::{AlertCode, BuildOutput, EnvId, Program, SessionConfig, Span};

thread_local! {
    static LINE: Cell<u32> = const { Cell::new(0) };
}

/// A fresh span on its own line.
pub fn sp() -> Span {
    LINE.with(|line| {
        line.set(line.get() + 1);
        Span::new(line.get(), 1, 1)
    })
}

pub fn id(name: &str) -> Ident {
    Ident::new(name, sp())
}

// =============================================================================
// Types
// =============================================================================

pub fn ty(name: &str) -> TypeExpr {
    TypeExpr::named(name, sp())
}

pub fn list_of(elem: TypeExpr) -> TypeExpr {
    TypeExpr::list(elem)
}

pub fn map_of(elem: TypeExpr) -> TypeExpr {
    TypeExpr::map(elem)
}

pub fn qualified(env: &str, name: &str) -> TypeExpr {
    TypeExpr::qualified(env, name, sp())
}

pub fn fn_ty(params: Vec<TypeExpr>, returns: Vec<TypeExpr>) -> TypeExpr {
    TypeExpr::function(params, returns, sp())
}

// =============================================================================
// Expressions
// =============================================================================

pub fn num(value: &str) -> Expr {
    Expr::Literal(LiteralExpr::number(value, sp()))
}

pub fn fixed(value: &str) -> Expr {
    Expr::Literal(LiteralExpr::fixed(FixedKind::Fixed, value, sp()))
}

pub fn degree(value: &str) -> Expr {
    Expr::Literal(LiteralExpr::fixed(FixedKind::Degree, value, sp()))
}

pub fn text(value: &str) -> Expr {
    Expr::Literal(LiteralExpr::text(format!("\"{value}\""), sp()))
}

pub fn boolean(value: bool) -> Expr {
    Expr::Literal(LiteralExpr::bool(value, sp()))
}

pub fn var(name: &str) -> Expr {
    Expr::Ident(id(name))
}

pub fn access(env: &str, name: &str) -> Expr {
    Expr::EnvAccess(EnvAccessExpr {
        env: id(env),
        name: id(name),
        span: sp(),
    })
}

pub fn bin(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary(Box::new(BinaryExpr {
        left,
        op,
        right,
        span: sp(),
    }))
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary(Box::new(UnaryExpr {
        op,
        operand,
        span: sp(),
    }))
}

pub fn list(elems: Vec<Expr>) -> Expr {
    Expr::List(ListExpr { elems, span: sp() })
}

pub fn map(entries: Vec<(&str, Expr)>) -> Expr {
    Expr::Map(MapExpr {
        entries: entries
            .into_iter()
            .map(|(key, value)| MapEntry { key: id(key), value })
            .collect(),
        span: sp(),
    })
}

pub fn call(caller: Expr, args: Vec<Expr>) -> Expr {
    call_generic(caller, vec![], args)
}

pub fn call_generic(caller: Expr, generics: Vec<TypeExpr>, args: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(CallExpr {
        caller,
        generics,
        args,
        return_amount: 0,
        span: sp(),
    }))
}

pub fn field(target: Expr, name: &str) -> Expr {
    Expr::Field(Box::new(FieldExpr {
        target,
        field: id(name),
        index: None,
        span: sp(),
    }))
}

pub fn member(target: Expr, index: Expr) -> Expr {
    Expr::Member(Box::new(MemberExpr {
        target,
        index,
        span: sp(),
    }))
}

pub fn self_ref() -> Expr {
    Expr::SelfRef(SelfExpr::new(sp()))
}

pub fn new_(class: &str, args: Vec<Expr>) -> Expr {
    Expr::New(construct(class, args))
}

pub fn spawn(entity: &str, args: Vec<Expr>) -> Expr {
    Expr::Spawn(construct(entity, args))
}

fn construct(name: &str, args: Vec<Expr>) -> ConstructExpr {
    ConstructExpr {
        ty: ty(name),
        generics: vec![],
        args,
        span: sp(),
    }
}

pub fn lambda(params: Vec<(&str, TypeExpr)>, returns: Vec<TypeExpr>, body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(FunctionExpr {
        params: params_of(params),
        returns,
        body,
        span: sp(),
    }))
}

/// `value is Entity [as binding]`
pub fn is(value: Expr, entity: &str, binding: Option<&str>) -> Expr {
    entity_eval(value, entity, binding, false)
}

/// `value isnt Entity [as binding]`
pub fn isnt(value: Expr, entity: &str, binding: Option<&str>) -> Expr {
    entity_eval(value, entity, binding, true)
}

fn entity_eval(value: Expr, entity: &str, binding: Option<&str>, negated: bool) -> Expr {
    Expr::EntityEval(Box::new(EntityEvalExpr {
        value,
        ty: ty(entity),
        binding: binding.map(id),
        negated,
        official: false,
        span: sp(),
    }))
}

pub fn match_expr(subject: Expr, arms: Vec<MatchArm>) -> Expr {
    Expr::Match(Box::new(MatchExpr {
        stmt: MatchStmt {
            subject,
            arms,
            span: sp(),
        },
        return_amount: 0,
    }))
}

pub fn arm(patterns: Vec<Expr>, body: Vec<Stmt>) -> MatchArm {
    MatchArm {
        patterns,
        is_default: false,
        body,
        span: sp(),
    }
}

pub fn else_arm(body: Vec<Stmt>) -> MatchArm {
    MatchArm {
        patterns: vec![],
        is_default: true,
        body,
        span: sp(),
    }
}

// =============================================================================
// Statements
// =============================================================================

fn variable(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> VariableDecl {
    VariableDecl {
        identifiers: names.iter().map(|n| id(n)).collect(),
        ty,
        values,
        is_pub: false,
        is_const: false,
        span: sp(),
    }
}

/// `let names [: ty] = values`
pub fn let_(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> Stmt {
    Stmt::VariableDecl(variable(names, ty, values))
}

/// `pub names [: ty] = values`
pub fn pub_(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> Stmt {
    Stmt::VariableDecl(VariableDecl {
        is_pub: true,
        ..variable(names, ty, values)
    })
}

/// `const names = values`
pub fn const_(names: &[&str], values: Vec<Expr>) -> Stmt {
    Stmt::VariableDecl(VariableDecl {
        is_const: true,
        ..variable(names, None, values)
    })
}

pub fn expr(e: Expr) -> Stmt {
    Stmt::Expr(e)
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assignment(AssignmentStmt {
        targets: vec![target],
        values: vec![value],
        op: AssignOp::Assign,
        span: sp(),
    })
}

pub fn compound(target: Expr, op: BinaryOp, value: Expr) -> Stmt {
    Stmt::Assignment(AssignmentStmt {
        targets: vec![target],
        values: vec![value],
        op: AssignOp::Compound(op),
        span: sp(),
    })
}

pub fn ret(values: Vec<Expr>) -> Stmt {
    Stmt::Return(ExitStmt { values, span: sp() })
}

pub fn yield_(values: Vec<Expr>) -> Stmt {
    Stmt::Yield(ExitStmt { values, span: sp() })
}

pub fn brk() -> Stmt {
    Stmt::Break(sp())
}

pub fn cont() -> Stmt {
    Stmt::Continue(sp())
}

pub fn if_(condition: Expr, body: Vec<Stmt>, else_body: Option<Vec<Stmt>>) -> Stmt {
    Stmt::If(IfStmt {
        condition,
        body,
        elseifs: vec![],
        else_body,
        span: sp(),
    })
}

pub fn repeat(iterator: Expr, variable: Option<&str>, body: Vec<Stmt>) -> Stmt {
    Stmt::Repeat(RepeatStmt {
        iterator,
        start: None,
        skip: None,
        variable: variable.map(id),
        body,
        span: sp(),
    })
}

pub fn while_(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While(WhileStmt {
        condition,
        body,
        span: sp(),
    })
}

pub fn for_(key: Option<&str>, value: Option<&str>, iterator: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For(ForStmt {
        key: key.map(id),
        value: value.map(id),
        iterator,
        body,
        span: sp(),
    })
}

pub fn tick(variable: Option<&str>, body: Vec<Stmt>) -> Stmt {
    Stmt::Tick(TickStmt {
        variable: variable.map(id),
        body,
        span: sp(),
    })
}

pub fn match_stmt(subject: Expr, arms: Vec<MatchArm>) -> Stmt {
    Stmt::Match(MatchStmt {
        subject,
        arms,
        span: sp(),
    })
}

pub fn destroy(target: Expr, args: Vec<Expr>) -> Stmt {
    Stmt::Destroy(DestroyStmt {
        target,
        generics: vec![],
        args,
        span: sp(),
    })
}

pub fn use_(path: &str) -> Stmt {
    Stmt::Use(UseStmt {
        path: id(path),
        span: sp(),
    })
}

// =============================================================================
// Declarations
// =============================================================================

fn params_of(params: Vec<(&str, TypeExpr)>) -> Vec<Param> {
    params
        .into_iter()
        .map(|(name, ty)| Param { name: id(name), ty })
        .collect()
}

pub fn function(
    name: &str,
    params: Vec<(&str, TypeExpr)>,
    returns: Vec<TypeExpr>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        name: id(name),
        generics: vec![],
        params: params_of(params),
        returns,
        body,
        is_pub: false,
        span: sp(),
    }
}

pub fn generic_function(
    name: &str,
    generics: &[&str],
    params: Vec<(&str, TypeExpr)>,
    returns: Vec<TypeExpr>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        generics: generics.iter().map(|g| id(g)).collect(),
        ..function(name, params, returns, body)
    }
}

pub fn fn_stmt(decl: FunctionDecl) -> Stmt {
    Stmt::Function(decl)
}

pub fn field_decl(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> VariableDecl {
    variable(names, ty, values)
}

pub fn constructor(params: Vec<(&str, TypeExpr)>, body: Vec<Stmt>) -> ConstructorDecl {
    ConstructorDecl {
        generics: vec![],
        params: params_of(params),
        body,
        span: sp(),
    }
}

pub fn class(
    name: &str,
    fields: Vec<VariableDecl>,
    ctor: Option<ConstructorDecl>,
    methods: Vec<FunctionDecl>,
) -> Stmt {
    Stmt::Class(ClassDecl {
        name: id(name),
        is_pub: false,
        fields,
        methods,
        constructor: ctor,
        span: sp(),
    })
}

pub fn entity_fn(
    kind: EntityFunctionKind,
    params: Vec<(&str, TypeExpr)>,
    returns: Vec<TypeExpr>,
    body: Vec<Stmt>,
) -> EntityFunctionDecl {
    EntityFunctionDecl {
        kind,
        generics: vec![],
        params: params_of(params),
        returns,
        body,
        span: sp(),
    }
}

/// `spawn(x: fixed, y: fixed)` with a body.
pub fn spawner(body: Vec<Stmt>) -> EntityFunctionDecl {
    entity_fn(
        EntityFunctionKind::Spawn,
        vec![("x", ty("fixed")), ("y", ty("fixed"))],
        vec![],
        body,
    )
}

/// `destroy()` with an empty body.
pub fn destroyer() -> EntityFunctionDecl {
    entity_fn(EntityFunctionKind::Destroy, vec![], vec![], vec![])
}

pub fn entity(
    name: &str,
    fields: Vec<VariableDecl>,
    functions: Vec<EntityFunctionDecl>,
    methods: Vec<FunctionDecl>,
) -> Stmt {
    Stmt::Entity(EntityDecl {
        name: id(name),
        is_pub: false,
        fields,
        methods,
        functions,
        span: sp(),
    })
}

pub fn enum_(name: &str, fields: &[&str]) -> Stmt {
    Stmt::Enum(EnumDecl {
        name: id(name),
        fields: fields.iter().map(|f| id(f)).collect(),
        is_pub: false,
        span: sp(),
    })
}

pub fn alias(name: &str, target: TypeExpr) -> Stmt {
    Stmt::Alias(AliasDecl {
        name: id(name),
        ty: target,
        is_pub: false,
        span: sp(),
    })
}

/// Mark a declaration `pub`.
pub fn public(mut stmt: Stmt) -> Stmt {
    match &mut stmt {
        Stmt::VariableDecl(decl) => decl.is_pub = true,
        Stmt::Function(decl) => decl.is_pub = true,
        Stmt::Class(decl) => decl.is_pub = true,
        Stmt::Entity(decl) => decl.is_pub = true,
        Stmt::Enum(decl) => decl.is_pub = true,
        Stmt::Alias(decl) => decl.is_pub = true,
        _ => {}
    }
    stmt
}

// =============================================================================
// Programs
// =============================================================================

pub fn env_stmt(name: &str, kind: &str) -> Stmt {
    Stmt::Env(EnvStmt {
        name: id(name),
        kind: id(kind),
        span: sp(),
    })
}

/// A program starting with `env name as kind`.
pub fn program(name: &str, kind: &str, body: Vec<Stmt>) -> Program {
    let mut stmts = vec![env_stmt(name, kind)];
    stmts.extend(body);
    Program::new(stmts)
}

/// A level program.
pub fn level(body: Vec<Stmt>) -> Program {
    program("Main", "Level", body)
}

pub fn build_all(programs: Vec<Program>) -> BuildOutput {
    build_with(SessionConfig::default(), programs)
}

pub fn build_with(config: SessionConfig, programs: Vec<Program>) -> BuildOutput {
    let named = programs
        .into_iter()
        .enumerate()
        .map(|(index, program)| (format!("file{index}.hyb"), program));
    hybroid::analyze(config, named).expect("build should not fail internally")
}

/// Build one level program.
pub fn build(body: Vec<Stmt>) -> BuildOutput {
    build_all(vec![level(body)])
}

/// Codes of the first environment's alerts, in report order.
pub fn codes(output: &BuildOutput) -> Vec<AlertCode> {
    codes_of(output, EnvId::user(0))
}

pub fn codes_of(output: &BuildOutput, env: EnvId) -> Vec<AlertCode> {
    output.alerts(env).map(|d| d.codes()).unwrap_or_default()
}

/// Assert that the first environment reported exactly `expected`, in order.
#[track_caller]
pub fn assert_codes(output: &BuildOutput, expected: &[AlertCode]) {
    let got = codes(output);
    assert_eq!(
        got, expected,
        "alerts: {}",
        output
            .alerts(EnvId::user(0))
            .map(|d| d.to_string())
            .unwrap_or_default()
    );
}
