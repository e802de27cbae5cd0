//! `match` as a statement.

use hybroid_ast::MatchStmt;
use hybroid_core::AlertKind;

use super::Walker;
use crate::exits::{ExitFlags, MultiPath};
use crate::scope::{ScopeAttributes, ScopeTag};

impl<'s> Walker<'s> {
    pub(crate) fn walk_match_stmt(&mut self, stmt: &mut MatchStmt) {
        let subject = self.walk_single(&mut stmt.subject, None).ty();

        self.scopes_mut().push(
            ScopeTag::MultiPath(MultiPath::new()),
            ScopeAttributes::empty(),
        );
        let (has_default, cases) = self.walk_match_arms(&subject, &mut stmt.arms);
        if !has_default {
            // The value may match no arm at all.
            self.scopes_mut().report_exits(ExitFlags::empty());
        }
        self.scopes_mut().close();

        if cases == 0 {
            self.report(AlertKind::InsufficientCases, stmt.span);
        }
    }
}
