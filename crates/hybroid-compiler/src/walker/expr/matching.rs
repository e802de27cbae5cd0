//! `match` expressions, and the arm walk shared with `match` statements.

use hybroid_ast::{MatchArm, MatchExpr};
use hybroid_core::{AlertKind, Type};

use super::Walker;
use crate::exits::ExitFlags;
use crate::scope::{MatchExprTag, ScopeAttributes, ScopeTag};
use crate::values::{Value, to_value};

impl<'s> Walker<'s> {
    /// A `match` whose arms `yield` its value.
    pub(crate) fn walk_match_expr(&mut self, matching: &mut MatchExpr) -> Value {
        let subject = self.walk_single(&mut matching.stmt.subject, None).ty();

        self.scopes_mut().push(
            ScopeTag::MatchExpr(MatchExprTag::default()),
            ScopeAttributes::YIELD_ALLOWING,
        );
        let (has_default, cases) = self.walk_match_arms(&subject, &mut matching.stmt.arms);
        let tag = match self.scopes_mut().close().map(|scope| scope.tag) {
            Some(ScopeTag::MatchExpr(tag)) => tag,
            _ => MatchExprTag::default(),
        };

        let span = matching.stmt.span;
        if !has_default {
            self.report(AlertKind::DefaultCaseMissing, span);
        }
        if cases == 0 {
            self.report(AlertKind::InsufficientCases, span);
        }
        if has_default && !tag.paths.finish().contains(ExitFlags::YIELD) {
            self.report(AlertKind::NotAllCodePathsExit { exit: "yield" }, span);
        }

        let Some(yields) = tag.yields else {
            matching.return_amount = 0;
            return Value::Invalid;
        };
        matching.return_amount = yields.len();
        Value::from_values(yields.iter().map(to_value).collect())
    }

    /// Walk the arms of a match against the subject type.
    ///
    /// Each arm body gets its own scope, reported to whatever multi-path the
    /// caller pushed. Returns whether an `else` arm exists and the number of
    /// other arms.
    pub(crate) fn walk_match_arms(
        &mut self,
        subject: &Type,
        arms: &mut [MatchArm],
    ) -> (bool, usize) {
        let last = arms.len().saturating_sub(1);
        let mut has_default = false;
        let mut cases = 0;

        for (index, arm) in arms.iter_mut().enumerate() {
            if arm.is_default {
                has_default = true;
                if index != last {
                    self.report(AlertKind::InvalidDefaultCasePlacement, arm.span);
                }
            } else {
                cases += 1;
                for pattern in &mut arm.patterns {
                    let got = self.walk_single(pattern, Some(subject)).ty();
                    if got != *subject {
                        self.report(
                            AlertKind::InvalidCaseType {
                                expected: subject.clone(),
                                got,
                            },
                            pattern.span(),
                        );
                    }
                }
                self.context.conversions.clear();
            }

            self.scopes_mut().push(ScopeTag::Untagged, ScopeAttributes::empty());
            self.walk_body(&mut arm.body);
            self.scopes_mut().close();
        }

        (has_default, cases)
    }
}
