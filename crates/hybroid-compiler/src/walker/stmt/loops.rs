//! `repeat`, `while`, `for` and `tick`.

use hybroid_ast::{Expr, ForStmt, Ident, LiteralExpr, RepeatStmt, Stmt, TickStmt, WhileStmt};
use hybroid_core::{AlertKind, Span, Type};

use super::Walker;
use crate::scope::{ScopeAttributes, ScopeTag};
use crate::values::{NumberVal, Value, VariableVal, to_value};

const LOOP_EXITS: ScopeAttributes =
    ScopeAttributes::BREAK_ALLOWING.union(ScopeAttributes::CONTINUE_ALLOWING);

impl<'s> Walker<'s> {
    /// `repeat count [from start] [by skip] [with i]`
    pub(crate) fn walk_repeat(&mut self, stmt: &mut RepeatStmt) {
        let ty = self.walk_single(&mut stmt.iterator, None).ty();
        let ty = if ty.is_numeric() || ty.is_invalid() {
            ty
        } else {
            self.report(
                AlertKind::TypeMismatch {
                    expected: Type::NUMBER,
                    got: ty,
                    context: "repeat",
                },
                stmt.iterator.span(),
            );
            Type::Invalid
        };

        for part in [&mut stmt.start, &mut stmt.skip] {
            match part {
                Some(expr) => {
                    let got = self.walk_single(expr, Some(&ty)).ty();
                    if got != ty {
                        self.report(
                            AlertKind::TypeMismatch {
                                expected: ty.clone(),
                                got,
                                context: "repeat",
                            },
                            expr.span(),
                        );
                    }
                }
                None => *part = Some(unit_literal(&ty, stmt.span)),
            }
        }

        self.scopes_mut().push(ScopeTag::Loop, LOOP_EXITS);
        if let Some(variable) = &stmt.variable {
            let value = match to_value(&ty) {
                Value::Number(_) => Value::Number(NumberVal::default()),
                other => other,
            };
            self.declare_loop_variable(variable, value);
        }
        self.walk_loop_body(&mut stmt.body);
    }

    /// `while condition`
    pub(crate) fn walk_while(&mut self, stmt: &mut WhileStmt) {
        let conversions = self.walk_condition(&mut stmt.condition);
        self.scopes_mut().push(ScopeTag::Loop, LOOP_EXITS);
        for conversion in conversions.iter().filter(|c| !c.negated) {
            self.declare_loop_variable(&conversion.name, Value::Entity(conversion.entity.clone()));
        }
        self.walk_loop_body(&mut stmt.body);
    }

    /// `for key, value in iterator`
    pub(crate) fn walk_for(&mut self, stmt: &mut ForStmt) {
        let iterated = self.walk_single(&mut stmt.iterator, None);
        let (key, value) = match iterated {
            Value::List(elem) => (Value::NUMBER, to_value(&elem)),
            Value::Map(elem) => (Value::Text, to_value(&elem)),
            Value::Invalid => (Value::Invalid, Value::Invalid),
            other => {
                self.report(
                    AlertKind::TypeMismatch {
                        expected: Type::list(Type::Object),
                        got: other.ty(),
                        context: "for loop",
                    },
                    stmt.iterator.span(),
                );
                (Value::Invalid, Value::Invalid)
            }
        };

        if stmt.key.is_none() {
            let name = self.session.synthetic_name("key");
            stmt.key = Some(Ident::new(name, stmt.span));
        }

        self.scopes_mut().push(ScopeTag::Loop, LOOP_EXITS);
        if let Some(ident) = &stmt.key {
            self.declare_loop_variable(ident, key);
        }
        if let Some(ident) = &stmt.value {
            self.declare_loop_variable(ident, value);
        }
        self.walk_loop_body(&mut stmt.body);
    }

    /// `tick [with t]`
    pub(crate) fn walk_tick(&mut self, stmt: &mut TickStmt) {
        self.scopes_mut().push(ScopeTag::Loop, ScopeAttributes::empty());
        if let Some(variable) = &stmt.variable {
            self.declare_loop_variable(variable, Value::NUMBER);
        }
        self.walk_loop_body(&mut stmt.body);
    }

    fn declare_loop_variable(&mut self, ident: &Ident, value: Value) {
        let variable = VariableVal::new(ident.as_str(), value, ident.span).initialized(true);
        self.declare(variable, "variable");
    }

    /// Walk the body of a loop scope already pushed, then close it.
    fn walk_loop_body(&mut self, body: &mut Vec<Stmt>) {
        self.walk_body(body);
        self.scopes_mut().close();
    }
}

/// The literal `1` of a repeat iterator's type.
fn unit_literal(ty: &Type, span: Span) -> Expr {
    match ty {
        Type::Fixed(kind) => Expr::Literal(LiteralExpr::fixed(
            *kind,
            format!("1{}", kind.suffix()),
            span,
        )),
        _ => Expr::Literal(LiteralExpr::number("1", span)),
    }
}
