//! `return`, `yield`, `break` and `continue`.

use hybroid_ast::ExitStmt;
use hybroid_core::{AlertKind, Span, Type};

use super::Walker;
use crate::exits::ExitFlags;
use crate::scope::{ScopeAttributes, ScopeTag};

impl<'s> Walker<'s> {
    pub(crate) fn walk_return(&mut self, exit: &mut ExitStmt) {
        if !self.exit_allowed(ScopeAttributes::RETURN_ALLOWING, "return", exit.span) {
            self.walk_values(&mut exit.values, &[]);
            return;
        }

        let expected = self
            .scopes()
            .nearest_func()
            .map(|func| func.returns.clone())
            .unwrap_or_default();
        let values = self.walk_values(&mut exit.values, &expected);
        if self.check_value_count(expected.len(), &values, exit.span, "return") {
            self.check_value_types(&expected, &values, "return");
        }
        self.scopes_mut().mark_exit(ExitFlags::RETURN);
    }

    /// `yield` inside a match expression. The first `yield` fixes the
    /// types every later one must produce.
    pub(crate) fn walk_yield(&mut self, exit: &mut ExitStmt) {
        if !self.exit_allowed(ScopeAttributes::YIELD_ALLOWING, "yield", exit.span) {
            self.walk_values(&mut exit.values, &[]);
            return;
        }

        let target = self
            .scopes()
            .nearest(|tag| matches!(tag, ScopeTag::MatchExpr(_)));
        let known = target
            .and_then(|id| self.scopes().get(id))
            .and_then(|scope| match &scope.tag {
                ScopeTag::MatchExpr(tag) => tag.yields.clone(),
                _ => None,
            });

        let hints = known.clone().unwrap_or_default();
        let values = self.walk_values(&mut exit.values, &hints);
        match known {
            Some(expected) => {
                if self.check_value_count(expected.len(), &values, exit.span, "yield") {
                    self.check_value_types(&expected, &values, "yield");
                }
            }
            None => {
                let types: Vec<Type> = values.iter().map(|(value, _)| value.ty()).collect();
                if let Some(id) = target
                    && let Some(scope) = self.scopes_mut().get_mut(id)
                    && let ScopeTag::MatchExpr(tag) = &mut scope.tag
                {
                    tag.yields = Some(types);
                }
            }
        }
        self.scopes_mut().mark_exit(ExitFlags::YIELD);
    }

    pub(crate) fn walk_break(&mut self, span: Span) {
        if self.exit_allowed(ScopeAttributes::BREAK_ALLOWING, "break", span) {
            self.scopes_mut().mark_exit(ExitFlags::BREAK);
        }
    }

    pub(crate) fn walk_continue(&mut self, span: Span) {
        if self.exit_allowed(ScopeAttributes::CONTINUE_ALLOWING, "continue", span) {
            self.scopes_mut().mark_exit(ExitFlags::CONTINUE);
        }
    }

    fn exit_allowed(
        &mut self,
        attribute: ScopeAttributes,
        statement: &'static str,
        span: Span,
    ) -> bool {
        if self.scopes().allows(attribute) {
            return true;
        }
        self.report(AlertKind::InvalidUseOfExitStatement { statement }, span);
        false
    }
}
