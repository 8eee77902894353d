use crate::property::PropertySet;
use std::collections::BTreeSet;

/// Pairs of properties known not to combine.
///
/// A pair is recorded when a singleton `{q}` extended by `r` comes back
/// infeasible; every superset containing both is then assumed infeasible
/// too and never tried.
#[derive(Debug, Clone, Default)]
pub struct ConflictTable {
    pairs: BTreeSet<(usize, usize)>,
}

impl ConflictTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: usize, b: usize) -> (usize, usize) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Record the pair; returns false if it was already known.
    pub fn record(&mut self, a: usize, b: usize) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// True if adding `candidate` to `set` would join a known conflicting
    /// pair.
    pub fn blocks(&self, set: &PropertySet, candidate: usize) -> bool {
        set.iter().any(|member| self.conflicts(member, candidate))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }
}
