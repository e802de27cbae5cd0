//! `if` / `elseif` / `else`.
//!
//! The chain is one multi-path scope with a child scope per branch. A chain
//! without `else` reports an empty branch so it can never guarantee an exit.
//!
//! Entity narrowings bound in a condition are declared where they hold:
//!
//! ```text
//! if e is Ship as s     ->  `s` inside the then branch
//! if e isnt Ship as s   ->  `s` inside else, and after the `if` when the
//!                           then branch always leaves
//! ```

use hybroid_ast::{Expr, IfStmt, Stmt};
use hybroid_core::{AlertKind, Type};

use super::Walker;
use crate::exits::{ExitFlags, MultiPath};
use crate::scope::{ScopeAttributes, ScopeTag};
use crate::values::{Value, VariableVal};
use crate::walker::Conversion;

impl<'s> Walker<'s> {
    pub(crate) fn walk_if(&mut self, stmt: &mut IfStmt) {
        let conversions = self.walk_condition(&mut stmt.condition);

        self.scopes_mut().push(
            ScopeTag::MultiPath(MultiPath::new()),
            ScopeAttributes::empty(),
        );
        let then_exits = self.walk_branch(&mut stmt.body, &conversions, false);
        for elseif in &mut stmt.elseifs {
            let narrowed = self.walk_condition(&mut elseif.condition);
            self.walk_branch(&mut elseif.body, &narrowed, false);
        }
        match &mut stmt.else_body {
            Some(body) => {
                self.walk_branch(body, &conversions, true);
            }
            None => self.scopes_mut().report_exits(ExitFlags::empty()),
        }
        self.scopes_mut().close();

        if then_exits.is_guaranteed() {
            self.declare_conversions(&conversions, true);
        }
    }

    /// Walk a condition, handing back the narrowings it bound.
    pub(crate) fn walk_condition(&mut self, condition: &mut Expr) -> Vec<Conversion> {
        let got = self.walk_single(condition, None).ty();
        if got != Type::BOOL {
            self.report(
                AlertKind::TypeMismatch {
                    expected: Type::BOOL,
                    got,
                    context: "condition",
                },
                condition.span(),
            );
        }
        std::mem::take(&mut self.context.conversions)
    }

    /// Walk one branch in its own scope, returning the exits it guarantees.
    fn walk_branch(
        &mut self,
        body: &mut Vec<Stmt>,
        conversions: &[Conversion],
        negated: bool,
    ) -> ExitFlags {
        self.scopes_mut().push(ScopeTag::Untagged, ScopeAttributes::empty());
        self.declare_conversions(conversions, negated);
        self.walk_body(body);
        let exits = self.scopes().current().exits;
        self.scopes_mut().close();
        exits
    }

    fn declare_conversions(&mut self, conversions: &[Conversion], negated: bool) {
        for conversion in conversions.iter().filter(|c| c.negated == negated) {
            let variable = VariableVal::new(
                conversion.name.as_str(),
                Value::Entity(conversion.entity.clone()),
                conversion.name.span,
            )
            .initialized(true);
            self.declare(variable, "variable");
        }
    }
}
