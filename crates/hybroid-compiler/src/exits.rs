//! Control-flow exit tracking.
//!
//! Every scope accumulates the exits that are *guaranteed* on every path
//! through its body so far. A straight-line body is guaranteed to exit as
//! soon as one statement exits. Multi-path constructs (`if` chains, `match`
//! arms) combine their branches with [`MultiPath`]: a kind is guaranteed only
//! when every branch guarantees it, and a branch that always leaves (`ALL`)
//! never blocks the conjunction.
//!
//! Only booleans are tracked; how often a path exits is never needed.

use bitflags::bitflags;

bitflags! {
    /// Exit kinds guaranteed on every path through a body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExitFlags: u8 {
        /// `return`
        const RETURN = 1 << 0;
        /// `yield`
        const YIELD = 1 << 1;
        /// `break`
        const BREAK = 1 << 2;
        /// `continue`
        const CONTINUE = 1 << 3;
        /// Every path leaves the body one way or another.
        const ALL = 1 << 4;
    }
}

impl ExitFlags {
    /// The flags of a single exit statement of `kind`.
    #[inline]
    pub fn exit(kind: ExitFlags) -> ExitFlags {
        kind | ExitFlags::ALL
    }

    /// Whether every path leaves the body.
    #[inline]
    pub fn is_guaranteed(self) -> bool {
        self.contains(ExitFlags::ALL)
    }

    /// The kinds this branch cannot block when branches are combined.
    #[inline]
    fn coverage(self) -> ExitFlags {
        if self.is_guaranteed() {
            ExitFlags::all()
        } else {
            self
        }
    }
}

/// Conjunction of the exits of several alternative branches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPath {
    branches: u32,
    aggregate: Option<ExitFlags>,
}

impl MultiPath {
    /// Start with no branches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the exits of one finished branch.
    pub fn report(&mut self, branch: ExitFlags) {
        self.branches += 1;
        let covered = branch.coverage();
        self.aggregate = Some(match self.aggregate {
            Some(acc) => acc & covered,
            None => covered,
        });
    }

    /// Number of branches reported.
    pub fn branches(&self) -> u32 {
        self.branches
    }

    /// Exits guaranteed by every branch. No branches guarantee nothing.
    pub fn finish(&self) -> ExitFlags {
        self.aggregate.unwrap_or_default()
    }
}
