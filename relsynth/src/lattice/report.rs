use serde::Serialize;

/// Which step of the search made an oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Singleton,
    Lattice,
    TieBreak,
    Final,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Feasible,
    Infeasible,
    TimedOut,
}

/// One oracle call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub phase: Phase,
    /// Sorted property names; empty for the unaugmented examples
    pub properties: Vec<String>,
    pub examples: usize,
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

/// Trace of one lattice search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchReport {
    /// Properties whose singleton call was feasible, in catalog order
    pub applicable: Vec<String>,
    pub attempts: Vec<Attempt>,
    /// Conflicting pairs in the order they were found
    pub conflicts: Vec<(String, String)>,
    /// Extensions not tried because they joined a conflicting pair
    pub skipped: usize,
    pub final_frontier: Vec<Vec<String>>,
    pub chosen: Vec<String>,
    /// The chosen combination failed and the plain examples were used
    pub fell_back: bool,
}

impl SearchReport {
    pub fn oracle_calls(&self) -> usize {
        self.attempts.len()
    }

    pub fn attempts_in(&self, phase: Phase) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter().filter(move |a| a.phase == phase)
    }
}
