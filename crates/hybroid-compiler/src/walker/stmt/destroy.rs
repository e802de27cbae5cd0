//! `destroy e(args)`

use hybroid_ast::DestroyStmt;
use hybroid_core::{Alert, AlertKind, Type};

use super::Walker;
use crate::values::Value;

impl<'s> Walker<'s> {
    pub(crate) fn walk_destroy(&mut self, stmt: &mut DestroyStmt) {
        match self.walk_single(&mut stmt.target, None) {
            Value::Entity(r) => {
                // A missing destroyer was reported with the entity.
                match self.entity(&r).and_then(|e| e.destroyer.clone()) {
                    Some(sig) => {
                        self.check_call(&sig, &stmt.generics, &mut stmt.args, stmt.span);
                    }
                    None => self.walk_unchecked_args(&mut stmt.args),
                }
            }
            Value::Invalid => self.walk_unchecked_args(&mut stmt.args),
            other => {
                self.push_alert(
                    Alert::new(
                        AlertKind::TypeMismatch {
                            expected: Type::RawEntity,
                            got: other.ty(),
                            context: "destroy",
                        },
                        stmt.target.span(),
                    )
                    .with_note("only entities declared in an environment can be destroyed"),
                );
                self.walk_unchecked_args(&mut stmt.args);
            }
        }
    }
}
