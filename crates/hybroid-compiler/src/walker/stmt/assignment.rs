//! Plain and compound assignment.

use hybroid_ast::{AssignOp, AssignmentStmt, Expr, Ident};
use hybroid_core::{AlertKind, Library, Type};

use super::Walker;
use crate::scope::ScopeTag;
use crate::values::{Value, VariableVal};

impl<'s> Walker<'s> {
    pub(crate) fn walk_assignment(&mut self, assignment: &mut AssignmentStmt) {
        let targets: Vec<Value> = assignment
            .targets
            .iter_mut()
            .map(|target| self.walk_place(target))
            .collect();
        let expected: Vec<Type> = targets.iter().map(Value::ty).collect();

        let values = self.walk_values(&mut assignment.values, &expected);
        self.check_value_count(targets.len(), &values, assignment.span, "assignment");

        match assignment.op {
            AssignOp::Assign => self.check_value_types(&expected, &values, "assignment"),
            AssignOp::Compound(op) => {
                for (target, (value, span)) in targets.iter().zip(&values) {
                    let result = self.binary_value(op, target, value, *span);
                    let (expected, got) = (target.ty(), result.ty());
                    if got != expected {
                        self.report(
                            AlertKind::TypeMismatch {
                                expected,
                                got,
                                context: "assignment",
                            },
                            *span,
                        );
                    }
                }
            }
        }
    }

    /// Walk the left side of an assignment, marking what it initializes.
    fn walk_place(&mut self, target: &mut Expr) -> Value {
        let mut local = false;
        let original: Option<Ident> = match target {
            Expr::Ident(ident) => Some(ident.clone()),
            _ => None,
        };
        if let Some(ident) = &original
            && let Some(scope_id) = self.scopes().resolve(ident.as_str())
        {
            local = true;
            if let Err(err) = self.scopes_mut().assign(scope_id, ident.as_str(), None) {
                self.report_scope_error(err, ident.span, "variable");
            }
        }

        let value = self.walk_single(target, None);

        match target {
            Expr::Field(field) if matches!(field.target, Expr::SelfRef(_)) => {
                self.mark_field_initialized(field.field.as_str());
            }
            Expr::Builtin(ident) => {
                let variable = self
                    .libraries()
                    .get(Library::Builtin)
                    .variable(ident.as_str())
                    .cloned();
                self.check_foreign_const(variable, ident);
            }
            Expr::EnvAccess(access) => {
                let variable = self.foreign_variable(access.env.as_str(), access.name.as_str());
                self.check_foreign_const(variable, &access.name);
            }
            Expr::Literal(lit) if !local => {
                if let Some(ident) = original {
                    self.report(AlertKind::ConstAssignment { name: ident.name }, lit.span);
                }
            }
            _ => {}
        }
        value
    }

    /// Mark a field of the enclosing class or entity as assigned.
    fn mark_field_initialized(&mut self, name: &str) {
        let owner = self
            .scopes()
            .nearest(|tag| matches!(tag, ScopeTag::Class(_) | ScopeTag::Entity(_)));
        if let Some(id) = owner
            && let Some(field) = self.scopes_mut().variable_mut(id, name)
        {
            field.is_init = true;
        }
    }

    fn foreign_variable(&self, env: &str, name: &str) -> Option<VariableVal> {
        let id = self.session.registry.lookup(env)?;
        match self.libraries().by_id(id) {
            Some(library) => library.variable(name).cloned(),
            None => self
                .session
                .registry
                .get(id)?
                .scopes
                .root()
                .variable(name)
                .cloned(),
        }
    }

    fn check_foreign_const(&mut self, variable: Option<VariableVal>, ident: &Ident) {
        if variable.is_some_and(|v| v.is_const) {
            self.report(
                AlertKind::ConstAssignment {
                    name: ident.name.clone(),
                },
                ident.span,
            );
        }
    }
}
