//! Name resolution: identifiers, `Env::name` and `self`.
//!
//! Identifiers are looked up through the scope chain, then the built-in
//! library, then each `use` target in order, then enums. Whatever the
//! lookup lands on decides the rewrite:
//!
//! ```text
//! class/entity scope      ->  self.name
//! const with literal      ->  copy of the literal
//! Builtin library         ->  Builtin(name)
//! imported env or library ->  Env::name
//! ```

use hybroid_ast::{EnvAccessExpr, Expr, FieldExpr, Ident, LiteralExpr, SelfExpr};
use hybroid_core::{AlertKind, EnvId, Library, NamedKind, Span};

use super::{Rewrite, Walker};
use crate::scope::{ScopeAttributes, ScopeTag};
use crate::values::{DeclRef, Value, VariableVal};

/// A name found outside the current environment's scopes.
struct Foreign {
    env: EnvId,
    value: Value,
    constant: Option<LiteralExpr>,
}

impl<'s> Walker<'s> {
    /// A bare identifier.
    pub(crate) fn walk_ident(&mut self, ident: &Ident) -> (Value, Rewrite<Expr>) {
        let name = ident.as_str();

        if let Some(scope_id) = self.scopes().resolve(name) {
            let tag = self.scopes().get(scope_id).map(|s| s.tag.clone());
            let Some(variable) = self.scopes_mut().variable_mut(scope_id, name) else {
                return (Value::Invalid, Rewrite::Unchanged);
            };
            variable.is_used = true;
            let value = variable.value.clone();
            let constant = variable.constant.clone();

            if let Some(lit) = constant {
                return (value, Rewrite::Replace(inline_literal(lit, ident.span)));
            }
            return match tag {
                Some(ScopeTag::Class(owner)) => {
                    self.self_field(ident, owner, NamedKind::Class, value)
                }
                Some(ScopeTag::Entity(owner)) => {
                    self.self_field(ident, owner, NamedKind::Entity, value)
                }
                _ => (value, Rewrite::Unchanged),
            };
        }

        if let Some(variable) = self.libraries().get(Library::Builtin).variable(name) {
            return (
                variable.value.clone(),
                Rewrite::Replace(Expr::Builtin(ident.clone())),
            );
        }

        if let Some(found) = self.resolve_imported(ident) {
            let rewrite = match found.constant {
                Some(lit) => inline_literal(lit, ident.span),
                None => Expr::EnvAccess(EnvAccessExpr {
                    env: Ident::new(self.env_name(found.env), ident.span),
                    name: ident.clone(),
                    span: ident.span,
                }),
            };
            return (found.value, Rewrite::Replace(rewrite));
        }

        if let Some((env, value)) = self.resolve_enum(name) {
            if env == self.env {
                return (value, Rewrite::Unchanged);
            }
            let access = Expr::EnvAccess(EnvAccessExpr {
                env: Ident::new(self.env_name(env), ident.span),
                name: ident.clone(),
                span: ident.span,
            });
            return (value, Rewrite::Replace(access));
        }

        self.report(
            AlertKind::UndeclaredVariableAccess {
                name: name.to_string(),
            },
            ident.span,
        );
        (Value::Invalid, Rewrite::Unchanged)
    }

    /// A member of the enclosing class or entity used without `self.`.
    fn self_field(
        &mut self,
        ident: &Ident,
        owner: DeclRef,
        kind: NamedKind,
        value: Value,
    ) -> (Value, Rewrite<Expr>) {
        if !self.scopes().allows(ScopeAttributes::SELF_ALLOWING) {
            self.report(AlertKind::InvalidUseOfSelf, ident.span);
            return (Value::Invalid, Rewrite::Unchanged);
        }
        let members = match kind {
            NamedKind::Class => self.class(&owner).map(|c| &c.members),
            NamedKind::Entity => self.entity(&owner).map(|e| &e.members),
        };
        let index = members.and_then(|m| m.field(ident.as_str())).map(|(i, _)| i);
        let is_method = members.is_some_and(|m| m.has_method(ident.as_str()));
        let value = match value {
            Value::Function(f) if is_method => Value::Function(f.with_owner(owner, kind)),
            other => other,
        };
        let field = Expr::Field(Box::new(FieldExpr {
            target: Expr::SelfRef(SelfExpr {
                owner: Some(kind),
                span: ident.span,
            }),
            field: ident.clone(),
            index,
            span: ident.span,
        }));
        (value, Rewrite::Replace(field))
    }

    /// A public variable of an imported environment or library.
    fn resolve_imported(&mut self, ident: &Ident) -> Option<Foreign> {
        let name = ident.as_str();
        for import in self.env().imports.clone() {
            let variable: Option<VariableVal> = match self.libraries().by_id(import) {
                Some(library) => library.variable(name).cloned(),
                None => self
                    .session
                    .registry
                    .get(import)
                    .and_then(|env| env.scopes.root().variable(name).cloned()),
            };
            let Some(variable) = variable else {
                continue;
            };
            if !variable.is_pub {
                self.report(
                    AlertKind::ForeignLocalVariableAccess {
                        name: name.to_string(),
                        env: self.env_name(import),
                    },
                    ident.span,
                );
            }
            return Some(Foreign {
                env: import,
                value: variable.value,
                constant: variable.constant,
            });
        }
        None
    }

    /// An enum declared here or in an imported environment.
    fn resolve_enum(&self, name: &str) -> Option<(EnvId, Value)> {
        if let Some(enum_val) = self.env().enums.get(name) {
            return Some((self.env, Value::Enum(enum_val.ty.clone())));
        }
        self.env().imports.iter().find_map(|&import| {
            let enum_val = match self.libraries().by_id(import) {
                Some(library) => library.enum_val(name),
                None => self
                    .session
                    .registry
                    .get(import)?
                    .enums
                    .get(name)
                    .filter(|e| e.is_pub),
            }?;
            Some((import, Value::Enum(enum_val.ty.clone())))
        })
    }

    /// A name the walker itself rewrote to the built-in library.
    pub(crate) fn walk_builtin(&mut self, ident: &Ident) -> Value {
        match self.libraries().get(Library::Builtin).variable(ident.as_str()) {
            Some(variable) => variable.value.clone(),
            None => {
                self.report(
                    AlertKind::UndeclaredVariableAccess {
                        name: ident.name.clone(),
                    },
                    ident.span,
                );
                Value::Invalid
            }
        }
    }

    /// `Env::name`
    pub(crate) fn walk_env_access(&mut self, access: &EnvAccessExpr) -> (Value, Rewrite<Expr>) {
        let Some(target) = self.session.registry.lookup(access.env.as_str()) else {
            self.report(
                AlertKind::InvalidEnvironment {
                    name: access.env.name.clone(),
                },
                access.env.span,
            );
            return (Value::Invalid, Rewrite::Unchanged);
        };
        if !self.link(target, access.span) {
            return (Value::Invalid, Rewrite::Unchanged);
        }

        let name = access.name.as_str();
        let (variable, enum_val) = match self.libraries().by_id(target) {
            Some(library) => (
                library.variable(name).cloned(),
                library.enum_val(name).map(|e| (e.ty.clone(), e.is_pub)),
            ),
            None => match self.session.registry.get(target) {
                Some(env) => (
                    env.scopes.root().variable(name).cloned(),
                    env.enums.get(name).map(|e| (e.ty.clone(), e.is_pub)),
                ),
                None => (None, None),
            },
        };

        let (value, is_pub, constant) = match (variable, enum_val) {
            (Some(variable), _) => (variable.value, variable.is_pub, variable.constant),
            (None, Some((ty, is_pub))) => (Value::Enum(ty), is_pub, None),
            (None, None) => {
                self.report(
                    AlertKind::InvalidEnvironmentAccess {
                        env: access.env.name.clone(),
                        name: name.to_string(),
                    },
                    access.name.span,
                );
                return (Value::Invalid, Rewrite::Unchanged);
            }
        };
        if !is_pub && target != self.env {
            self.report(
                AlertKind::ForeignLocalVariableAccess {
                    name: name.to_string(),
                    env: access.env.name.clone(),
                },
                access.name.span,
            );
        }
        match constant {
            Some(lit) => (value, Rewrite::Replace(inline_literal(lit, access.span))),
            None => (value, Rewrite::Unchanged),
        }
    }

    /// `self`
    pub(crate) fn walk_self(&mut self, expr: &mut SelfExpr) -> Value {
        if !self.scopes().allows(ScopeAttributes::SELF_ALLOWING) {
            self.report(AlertKind::InvalidUseOfSelf, expr.span);
            return Value::Invalid;
        }
        let owner = self
            .scopes()
            .nearest(|tag| matches!(tag, ScopeTag::Class(_) | ScopeTag::Entity(_)))
            .and_then(|id| self.scopes().get(id))
            .map(|scope| scope.tag.clone());
        match owner {
            Some(ScopeTag::Class(r)) => {
                expr.owner = Some(NamedKind::Class);
                Value::Class(r)
            }
            Some(ScopeTag::Entity(r)) => {
                expr.owner = Some(NamedKind::Entity);
                Value::Entity(r)
            }
            _ => {
                self.report(AlertKind::InvalidUseOfSelf, expr.span);
                Value::Invalid
            }
        }
    }
}

fn inline_literal(mut lit: LiteralExpr, span: Span) -> Expr {
    lit.span = span;
    Expr::Literal(lit)
}
