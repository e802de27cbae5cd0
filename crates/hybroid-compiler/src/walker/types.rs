//! Resolution of written types.

use hybroid_ast::{Ident, Param, TypeExpr};
use hybroid_core::{AlertKind, EnvId, Library, Type};

use super::Walker;
use crate::environment::DeclaredType;
use crate::scope::FuncTag;
use crate::values::FunctionVal;

impl<'s> Walker<'s> {
    /// Resolve a type expression. Unknown names become [`Type::Invalid`].
    pub(crate) fn resolve_type(&mut self, expr: &TypeExpr) -> Type {
        let ty = self.resolve_base_type(expr);
        if expr.is_variadic {
            Type::variadic(ty)
        } else {
            ty
        }
    }

    fn resolve_base_type(&mut self, expr: &TypeExpr) -> Type {
        if let Some(env) = &expr.env {
            return self.resolve_qualified_type(env, &expr.name);
        }

        let name = expr.name.as_str();
        if name == "list" || name == "map" {
            if expr.wrapped.len() != 1 {
                self.report(
                    AlertKind::InvalidListOrMapWrappedType {
                        count: expr.wrapped.len(),
                    },
                    expr.span,
                );
                return Type::Invalid;
            }
            let elem = self.resolve_type(&expr.wrapped[0]);
            return if name == "list" {
                Type::list(elem)
            } else {
                Type::map(elem)
            };
        }
        if !expr.wrapped.is_empty() {
            self.report(
                AlertKind::TooManyElementsGiven {
                    name: name.to_string(),
                },
                expr.span,
            );
        }

        match name {
            "number" => Type::NUMBER,
            "text" => Type::TEXT,
            "bool" => Type::BOOL,
            "fixed" => Type::FIXED,
            "radian" => Type::RADIAN,
            "degree" => Type::DEGREE,
            "entity" => Type::RawEntity,
            "fn" => {
                let params = expr.params.iter().map(|p| self.resolve_type(p)).collect();
                let returns = expr.returns.iter().map(|r| self.resolve_type(r)).collect();
                Type::function(params, returns)
            }
            _ => self.resolve_named_type(&expr.name),
        }
    }

    /// `Env::Name`
    fn resolve_qualified_type(&mut self, env: &Ident, name: &Ident) -> Type {
        let Some(target) = self.session.registry.lookup(env.as_str()) else {
            self.report(
                AlertKind::InvalidEnvironment {
                    name: env.name.clone(),
                },
                env.span,
            );
            return Type::Invalid;
        };
        if !self.link(target, env.span) {
            return Type::Invalid;
        }

        let found = match self.libraries().by_id(target) {
            Some(library) => library_type(library, name.as_str()),
            None => self
                .session
                .registry
                .get(target)
                .and_then(|e| e.declared_type(name.as_str())),
        };
        match found {
            Some(declared) => {
                if !declared.is_pub && target != self.env {
                    self.report(
                        AlertKind::ForeignLocalVariableAccess {
                            name: name.name.clone(),
                            env: env.name.clone(),
                        },
                        name.span,
                    );
                }
                declared.ty
            }
            None => {
                self.report(
                    AlertKind::InvalidEnvironmentAccess {
                        env: env.name.clone(),
                        name: name.name.clone(),
                    },
                    name.span,
                );
                Type::Invalid
            }
        }
    }

    /// An unqualified type name: generics, own declarations, the built-in
    /// aliases, then public types of imported environments.
    fn resolve_named_type(&mut self, name: &Ident) -> Type {
        if self.scopes().generic_in_scope(name.as_str()) {
            return Type::Generic(name.name.clone());
        }
        if let Some(declared) = self.env().declared_type(name.as_str()) {
            return declared.ty;
        }
        if let Some(alias) = self
            .libraries()
            .get(Library::Builtin)
            .alias_val(name.as_str())
        {
            return alias.ty.clone();
        }

        let mut found: Option<(EnvId, Type)> = None;
        for import in self.env().imports.clone() {
            if !self.is_walked(import) {
                self.ensure_walked(import, name.span);
            }
            let declared = match self.libraries().by_id(import) {
                Some(library) => library_type(library, name.as_str()),
                None => self
                    .session
                    .registry
                    .get(import)
                    .and_then(|e| e.declared_type(name.as_str()))
                    .filter(|d| d.is_pub),
            };
            let Some(declared) = declared else {
                continue;
            };
            match &found {
                None => found = Some((import, declared.ty)),
                Some((first, _)) => {
                    self.report(
                        AlertKind::EnvironmentAccessAmbiguity {
                            name: name.name.clone(),
                            first: self.env_name(*first),
                            second: self.env_name(import),
                        },
                        name.span,
                    );
                    break;
                }
            }
        }
        if let Some((_, ty)) = found {
            return ty;
        }

        tracing::trace!(name = %name, "unresolved type");
        self.report(
            AlertKind::InvalidType {
                name: name.name.clone(),
            },
            name.span,
        );
        Type::Invalid
    }

    /// Resolve a function signature with its generics in scope.
    pub(crate) fn resolve_signature(
        &mut self,
        generics: &[Ident],
        params: &[Param],
        returns: &[TypeExpr],
    ) -> FunctionVal {
        let mut names: Vec<String> = Vec::with_capacity(generics.len());
        for generic in generics {
            if names.contains(&generic.name) {
                self.report(
                    AlertKind::DuplicateGenericParameter {
                        name: generic.name.clone(),
                    },
                    generic.span,
                );
                continue;
            }
            names.push(generic.name.clone());
        }

        self.scopes_mut().push_function(FuncTag {
            generics: names.clone(),
            returns: Vec::new(),
        });
        let params = params.iter().map(|p| self.resolve_type(&p.ty)).collect();
        let returns = returns.iter().map(|r| self.resolve_type(r)).collect();
        self.scopes_mut().close();

        FunctionVal {
            generics: names,
            params,
            returns,
            owner: None,
        }
    }
}

/// A public enum or alias of a library.
fn library_type(library: &crate::libraries::LibraryEnv, name: &str) -> Option<DeclaredType> {
    if library.enum_val(name).is_some() {
        return Some(DeclaredType {
            ty: Type::Enum {
                env: library.id(),
                name: name.to_string(),
            },
            is_pub: true,
        });
    }
    library.alias_val(name).map(|alias| DeclaredType {
        ty: alias.ty.clone(),
        is_pub: true,
    })
}
