//! Variable and function declarations.

use hybroid_ast::{FunctionDecl, VariableDecl};
use hybroid_core::{AlertKind, Span, Type};

use super::Walker;
use crate::values::{FunctionVal, NumberVal, Value, VariableVal, default_literal, to_value};

impl<'s> Walker<'s> {
    /// `let`, `pub` and `const` declarations.
    pub(crate) fn walk_variable_decl(&mut self, decl: &mut VariableDecl) {
        if decl.is_pub && !self.scopes().is_root() {
            self.report(AlertKind::PublicDeclarationInLocalScope, decl.span);
        }
        if decl.is_const && decl.ty.is_some() {
            self.report(AlertKind::UnnecessaryTypeInConstDeclaration, decl.span);
        }
        let declared = decl.ty.as_ref().map(|ty| self.resolve_type(ty));

        let values = if decl.values.is_empty() {
            self.default_values(decl, declared.as_ref())
        } else {
            let hints = vec![declared.clone().unwrap_or(Type::Invalid); decl.values.len()];
            let values = self.walk_values(&mut decl.values, &hints);
            self.check_value_count(decl.identifiers.len(), &values, decl.span, "declaration");
            values.into_iter().map(|(value, _)| value).collect()
        };

        let one_to_one = decl.values.len() == decl.identifiers.len();
        let what = if decl.is_const { "constant" } else { "variable" };
        for (index, ident) in decl.identifiers.iter().enumerate() {
            let mut value = values.get(index).cloned().unwrap_or(Value::Invalid);
            if let Some(ty) = &declared {
                let got = value.ty();
                if got != *ty {
                    self.report(
                        AlertKind::ExplicitTypeMismatch {
                            name: ident.name.clone(),
                            expected: ty.clone(),
                            got,
                        },
                        ident.span,
                    );
                }
                value = to_value(ty);
            }

            let mut variable = VariableVal::new(ident.as_str(), value, ident.span)
                .public(decl.is_pub)
                .constant(decl.is_const)
                .initialized(true);
            if decl.is_const {
                if one_to_one {
                    variable.constant = decl.values[index].as_literal().cloned();
                }
            } else {
                variable.value = forget_literal(variable.value);
            }
            self.declare(variable, what);
        }
    }

    /// The values of a declaration written without any. Typed declarations
    /// get a default literal written into the tree.
    fn default_values(&mut self, decl: &mut VariableDecl, declared: Option<&Type>) -> Vec<Value> {
        if decl.is_const {
            let name = decl
                .identifiers
                .first()
                .map_or_else(String::new, |i| i.name.clone());
            self.report(AlertKind::NoValueGivenForConstant { name }, decl.span);
        }
        let Some(ty) = declared else {
            if !decl.is_const {
                for ident in &decl.identifiers {
                    self.report(
                        AlertKind::ExplicitTypeRequiredInDeclaration {
                            name: ident.name.clone(),
                        },
                        ident.span,
                    );
                }
            }
            return Vec::new();
        };

        let mut values = Vec::with_capacity(decl.identifiers.len());
        for ident in &decl.identifiers {
            match default_literal(ty, ident.span) {
                Some(literal) => decl.values.push(literal),
                None if ty.is_invalid() => {}
                None => self.report(
                    AlertKind::ExplicitTypeNotAllowed {
                        name: ident.name.clone(),
                        ty: ty.clone(),
                    },
                    ident.span,
                ),
            }
            values.push(to_value(ty));
        }
        values
    }

    /// A named function. Top-level functions reuse the signature registered
    /// by the declaration pass.
    pub(crate) fn walk_function_decl(&mut self, decl: &mut FunctionDecl) {
        let sig = if self.scopes().is_root() {
            match self.registered_function(decl.name.as_str(), decl.name.span) {
                Some(sig) => sig,
                // A redeclaration, already reported; check the body anyway.
                None => self.resolve_signature(&decl.generics, &decl.params, &decl.returns),
            }
        } else {
            if decl.is_pub {
                self.report(AlertKind::PublicDeclarationInLocalScope, decl.span);
            }
            let sig = self.resolve_signature(&decl.generics, &decl.params, &decl.returns);
            let variable =
                VariableVal::new(decl.name.as_str(), Value::Function(sig.clone()), decl.name.span)
                    .constant(true)
                    .initialized(true);
            self.declare(variable, "function");
            sig
        };

        self.walk_function_body(&sig, &decl.params, &mut decl.body, decl.span);
    }

    /// The signature of the root function declared at `span`.
    fn registered_function(&self, name: &str, span: Span) -> Option<FunctionVal> {
        let variable = self.scopes().root().variable(name)?;
        match &variable.value {
            Value::Function(sig) if variable.span == span => Some(sig.clone()),
            _ => None,
        }
    }
}

/// Drop a folded number so later index checks do not trust a variable.
fn forget_literal(value: Value) -> Value {
    match value {
        Value::Number(_) => Value::Number(NumberVal::default()),
        other => other,
    }
}
