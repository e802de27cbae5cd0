//! `value is Entity` / `value isnt Entity` narrowing.

use hybroid_ast::EntityEvalExpr;
use hybroid_core::{AlertKind, NamedKind, Type};

use super::Walker;
use crate::libraries::is_official_entity;
use crate::values::{DeclRef, Value};
use crate::walker::Conversion;

impl<'s> Walker<'s> {
    /// Check an entity narrowing. A `let` binding is left in the walk
    /// context for the enclosing `if` to declare.
    pub(crate) fn walk_entity_eval(&mut self, eval: &mut EntityEvalExpr) -> Value {
        let value = self.walk_single(&mut eval.value, None);
        let got = value.ty();
        if got != Type::RawEntity {
            self.report(
                AlertKind::TypeMismatch {
                    expected: Type::RawEntity,
                    got,
                    context: "entity evaluation",
                },
                eval.value.span(),
            );
        }

        let name = eval.ty.name.as_str();
        if eval.ty.env.is_none() && is_official_entity(name) && !self.env().declares_type(name) {
            eval.official = true;
            if eval.binding.is_some() {
                self.report(
                    AlertKind::OfficialEntityConversion {
                        entity: name.to_string(),
                    },
                    eval.span,
                );
            }
            return Value::Bool;
        }

        match self.resolve_type(&eval.ty) {
            Type::Named {
                env,
                name,
                kind: NamedKind::Entity,
            } => {
                if let Some(binding) = &eval.binding {
                    tracing::trace!(binding = %binding, entity = %name, "pending conversion");
                    self.context.conversions.push(Conversion {
                        name: binding.clone(),
                        entity: DeclRef::new(env, name),
                        negated: eval.negated,
                    });
                }
            }
            Type::Invalid => {}
            other => self.report(
                AlertKind::TypeMismatch {
                    expected: Type::RawEntity,
                    got: other,
                    context: "entity evaluation",
                },
                eval.ty.span,
            ),
        }
        Value::Bool
    }
}
