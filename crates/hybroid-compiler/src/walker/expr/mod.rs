//! Expression walking.
//!
//! [`Walker::walk_expr`] dispatches on the node, collects the produced
//! [`Value`] and splices in any [`Rewrite`] the handler asked for.
//!
//! ## Modules
//!
//! - `literals`: literals, lists and maps
//! - `names`: identifiers, `Env::name` and `self`
//! - `access`: `value.field` and `value[index]`
//! - `calls`: calls, method calls, `new` and `spawn`
//! - `operators`: unary and binary operators
//! - `entity`: `is` / `isnt` narrowing
//! - `functions`: anonymous functions and function bodies
//! - `matching`: `match` expressions

mod access;
mod calls;
mod entity;
mod functions;
mod literals;
mod matching;
mod names;
mod operators;

use hybroid_ast::Expr;
use hybroid_core::{AlertKind, Span, Type};

use super::{Rewrite, Walker};
use crate::values::Value;

impl<'s> Walker<'s> {
    /// Walk an expression. `hint` is the type the context expects, used to
    /// type empty list and map literals.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn walk_expr(&mut self, expr: &mut Expr, hint: Option<&Type>) -> Value {
        let (value, rewrite) = match expr {
            Expr::Literal(lit) => (self.walk_literal(lit), Rewrite::Unchanged),
            Expr::Ident(ident) => self.walk_ident(ident),
            Expr::Builtin(ident) => (self.walk_builtin(ident), Rewrite::Unchanged),
            Expr::EnvAccess(access) => self.walk_env_access(access),
            Expr::Unary(unary) => (self.walk_unary(unary), Rewrite::Unchanged),
            Expr::Binary(binary) => (self.walk_binary(binary), Rewrite::Unchanged),
            Expr::Group(group) => (self.walk_expr(&mut group.inner, hint), Rewrite::Unchanged),
            Expr::List(list) => (self.walk_list(list, hint), Rewrite::Unchanged),
            Expr::Map(map) => (self.walk_map(map, hint), Rewrite::Unchanged),
            Expr::Call(call) => self.walk_call(call),
            Expr::MethodCall(call) => (self.walk_method_call(call), Rewrite::Unchanged),
            Expr::Field(field) => self.walk_field(field),
            Expr::Member(member) => (self.walk_member(member), Rewrite::Unchanged),
            Expr::SelfRef(self_expr) => (self.walk_self(self_expr), Rewrite::Unchanged),
            Expr::New(construct) => (self.walk_new(construct), Rewrite::Unchanged),
            Expr::Spawn(construct) => (self.walk_spawn(construct), Rewrite::Unchanged),
            Expr::Function(function) => (self.walk_function_expr(function), Rewrite::Unchanged),
            Expr::Match(matching) => (self.walk_match_expr(matching), Rewrite::Unchanged),
            Expr::EntityEval(eval) => (self.walk_entity_eval(eval), Rewrite::Unchanged),
            Expr::Error(_) => (Value::Invalid, Rewrite::Unchanged),
        };
        if let Rewrite::Replace(new) = rewrite {
            *expr = new;
        }
        value
    }

    /// Walk an expression that must produce exactly one value.
    pub(crate) fn walk_single(&mut self, expr: &mut Expr, hint: Option<&Type>) -> Value {
        let value = self.walk_expr(expr, hint);
        self.expect_single(value, expr.span())
    }

    /// Reduce a possibly multi-valued result to its first value.
    pub(crate) fn expect_single(&mut self, value: Value, span: Span) -> Value {
        match value {
            Value::Tuple(values) if values.is_empty() => {
                self.report(
                    AlertKind::TooFewValuesGiven {
                        expected: 1,
                        got: 0,
                        context: "expression",
                    },
                    span,
                );
                Value::Invalid
            }
            other => other.single(),
        }
    }

    /// Walk a value list where the last expression may spread several values.
    ///
    /// `hints[i]` is offered to the `i`-th expression.
    pub(crate) fn walk_values(&mut self, exprs: &mut [Expr], hints: &[Type]) -> Vec<(Value, Span)> {
        let count = exprs.len();
        let mut values = Vec::with_capacity(count);
        for (index, expr) in exprs.iter_mut().enumerate() {
            let hint = hints.get(index);
            let value = self.walk_expr(expr, hint);
            let span = expr.span();
            if index + 1 == count {
                values.extend(value.into_values().into_iter().map(|v| (v, span)));
            } else {
                let value = self.expect_single(value, span);
                values.push((value, span));
            }
        }
        values
    }

    /// Report a count mismatch between slots and values, returning whether
    /// the counts agree.
    pub(crate) fn check_value_count(
        &mut self,
        expected: usize,
        values: &[(Value, Span)],
        span: Span,
        context: &'static str,
    ) -> bool {
        let got = values.len();
        if got < expected {
            let at = values.last().map_or(span, |(_, s)| *s);
            self.report(
                AlertKind::TooFewValuesGiven {
                    expected,
                    got,
                    context,
                },
                at,
            );
            return false;
        }
        if got > expected {
            let first = values[expected].1;
            let last = values[got - 1].1;
            self.report(
                AlertKind::TooManyValuesGiven {
                    expected,
                    got,
                    context,
                },
                first.to(last),
            );
            return false;
        }
        true
    }

    /// Check values pairwise against expected types.
    pub(crate) fn check_value_types(
        &mut self,
        expected: &[Type],
        values: &[(Value, Span)],
        context: &'static str,
    ) {
        for (ty, (value, span)) in expected.iter().zip(values) {
            let got = value.ty();
            if got != *ty {
                self.report(
                    AlertKind::TypeMismatch {
                        expected: ty.clone(),
                        got,
                        context,
                    },
                    *span,
                );
            }
        }
    }
}
