//! Calls: plain calls, method calls, `new` and `spawn`.
//!
//! All four shapes end in [`Walker::check_call`], which walks the
//! arguments, binds generics and validates the argument list against the
//! callee's signature.

use hybroid_ast::{CallExpr, ConstructExpr, Expr, FieldExpr, MethodCallExpr, TypeExpr};
use hybroid_core::{AlertKind, CompileError, NamedKind, Span, Type};

use super::{Rewrite, Walker};
use crate::generics::{
    Bindings, GenericError, fill_unbound, resolve_generics, substitute, validate_arguments,
};
use crate::values::{DeclRef, FunctionVal, Value, to_value};

impl<'s> Walker<'s> {
    /// Check a call against `sig`, returning the resolved return types.
    pub(crate) fn check_call(
        &mut self,
        sig: &FunctionVal,
        explicit: &[TypeExpr],
        args: &mut [Expr],
        span: Span,
    ) -> Vec<Type> {
        let explicit: Vec<Type> = explicit.iter().map(|t| self.resolve_type(t)).collect();
        let hints: Vec<Type> = sig
            .params
            .iter()
            .map(|p| if p.has_generics() { Type::Invalid } else { p.clone() })
            .collect();
        let typed: Vec<(Type, Span)> = self
            .walk_values(args, &hints)
            .into_iter()
            .map(|(value, span)| (value.ty(), span))
            .collect();
        let arg_types: Vec<Type> = typed.iter().map(|(ty, _)| ty.clone()).collect();

        let mut bindings =
            match resolve_generics(&explicit, &sig.generics, &sig.params, &arg_types) {
                Ok(bindings) => bindings,
                Err(GenericError::TooMany { expected, got }) => {
                    self.report(
                        AlertKind::TooManyValuesGiven {
                            expected,
                            got,
                            context: "generic arguments",
                        },
                        span,
                    );
                    Bindings::default()
                }
            };
        let missing = fill_unbound(&sig.generics, &mut bindings);
        if !arg_types.iter().any(Type::is_invalid) {
            for name in missing {
                self.report(AlertKind::UnresolvedGeneric { name }, span);
            }
        }
        tracing::trace!(?bindings, "generics bound");

        let params: Vec<Type> = sig.params.iter().map(|p| substitute(p, &bindings)).collect();
        for alert in validate_arguments(&params, &typed, span) {
            self.push_alert(alert);
        }
        sig.returns
            .iter()
            .map(|r| substitute(r, &bindings))
            .collect()
    }

    /// Walk arguments of a call that cannot be checked.
    pub(crate) fn walk_unchecked_args(&mut self, args: &mut [Expr]) {
        for arg in args {
            self.walk_expr(arg, None);
        }
    }

    /// `caller(args)`, rewritten to a method call when the caller is a
    /// method reached through a field.
    pub(crate) fn walk_call(&mut self, call: &mut CallExpr) -> (Value, Rewrite<Expr>) {
        let callee = self.walk_single(&mut call.caller, None);
        let sig = match callee {
            Value::Function(sig) => sig,
            Value::Invalid => {
                self.walk_unchecked_args(&mut call.args);
                return (Value::Invalid, Rewrite::Unchanged);
            }
            other => {
                self.report(
                    AlertKind::InvalidCallerType { ty: other.ty() },
                    call.caller.span(),
                );
                self.walk_unchecked_args(&mut call.args);
                return (Value::Invalid, Rewrite::Unchanged);
            }
        };

        let returns = self.check_call(&sig, &call.generics, &mut call.args, call.span);
        call.return_amount = returns.len();
        let value = Value::from_values(returns.iter().map(to_value).collect());

        let Some(owner) = sig.owner else {
            return (value, Rewrite::Unchanged);
        };
        if !matches!(call.caller, Expr::Field(_)) {
            return (value, Rewrite::Unchanged);
        }
        let caller = std::mem::replace(&mut call.caller, Expr::placeholder(call.span));
        let Expr::Field(field) = caller else {
            return (value, Rewrite::Unchanged);
        };
        let FieldExpr {
            target, field: method, ..
        } = *field;
        let method_call = MethodCallExpr {
            receiver: target,
            owner_env: owner.ty.env,
            owner: owner.ty.name,
            owner_kind: owner.kind,
            method,
            generics: std::mem::take(&mut call.generics),
            args: std::mem::take(&mut call.args),
            return_amount: call.return_amount,
            span: call.span,
        };
        (value, Rewrite::Replace(Expr::MethodCall(Box::new(method_call))))
    }

    /// A method call produced by an earlier rewrite.
    pub(crate) fn walk_method_call(&mut self, call: &mut MethodCallExpr) -> Value {
        self.walk_single(&mut call.receiver, None);
        let owner = DeclRef::new(call.owner_env, call.owner.clone());
        let method = match call.owner_kind {
            NamedKind::Class => self.class(&owner).map(|c| c.members.method(call.method.as_str())),
            NamedKind::Entity => self
                .entity(&owner)
                .map(|e| e.members.method(call.method.as_str())),
        };
        let sig = match method {
            Some(Some(sig)) => sig.clone(),
            Some(None) => {
                self.report(
                    AlertKind::InvalidField {
                        owner: call.owner.clone(),
                        field: call.method.name.clone(),
                    },
                    call.method.span,
                );
                self.walk_unchecked_args(&mut call.args);
                return Value::Invalid;
            }
            None => {
                self.fail(CompileError::UnregisteredContainer {
                    container: call.owner.clone(),
                    member: call.method.name.clone(),
                });
                return Value::Invalid;
            }
        };

        let returns = self.check_call(&sig, &call.generics, &mut call.args, call.span);
        call.return_amount = returns.len();
        Value::from_values(returns.iter().map(to_value).collect())
    }

    /// `new Class(args)`
    ///
    /// Arguments of a class without a constructor are walked unchecked;
    /// the missing constructor was reported with the class.
    pub(crate) fn walk_new(&mut self, construct: &mut ConstructExpr) -> Value {
        match self.resolve_type(&construct.ty) {
            Type::Named {
                env,
                name,
                kind: NamedKind::Class,
            } => {
                let r = DeclRef::new(env, name);
                match self.class(&r).and_then(|c| c.constructor.clone()) {
                    Some(sig) => {
                        self.check_call(
                            &sig,
                            &construct.generics,
                            &mut construct.args,
                            construct.span,
                        );
                    }
                    None => self.walk_unchecked_args(&mut construct.args),
                }
                Value::Class(r)
            }
            other => self.not_constructible(construct, other, "new"),
        }
    }

    /// `spawn Entity(args)`
    pub(crate) fn walk_spawn(&mut self, construct: &mut ConstructExpr) -> Value {
        match self.resolve_type(&construct.ty) {
            Type::Named {
                env,
                name,
                kind: NamedKind::Entity,
            } => {
                let r = DeclRef::new(env, name);
                match self.entity(&r).and_then(|e| e.spawner.clone()) {
                    Some(sig) => {
                        self.check_call(
                            &sig,
                            &construct.generics,
                            &mut construct.args,
                            construct.span,
                        );
                    }
                    None => self.walk_unchecked_args(&mut construct.args),
                }
                Value::Entity(r)
            }
            other => self.not_constructible(construct, other, "spawn"),
        }
    }

    fn not_constructible(
        &mut self,
        construct: &mut ConstructExpr,
        ty: Type,
        keyword: &'static str,
    ) -> Value {
        if !ty.is_invalid() {
            self.report(
                AlertKind::NotConstructible {
                    name: ty.to_string(),
                    keyword,
                },
                construct.ty.span,
            );
        }
        self.walk_unchecked_args(&mut construct.args);
        Value::Invalid
    }
}
