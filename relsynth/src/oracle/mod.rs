//! The synthesizer oracle contract
//!
//! An oracle turns a batch of examples into a ranked set of consistent
//! programs. The lattice search treats it as a black box and only looks at
//! whether the set is empty.

pub mod program;
pub mod ranking;
pub mod substring;
pub mod timed;
pub mod tree;
pub mod tree_program;

pub use program::{ListProgram, PositionProgram, StringProgram};
pub use ranking::DefaultRanking;
pub use substring::SubstringOracle;
pub use timed::{OracleOutcome, TimedOracle};
pub use tree::TreeOracle;
pub use tree_program::{NodeProgram, TreeProgram};

use crate::example::Example;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scores programs; higher is better.
pub trait Ranking<P>: Send + Sync {
    fn score(&self, program: &P) -> f64;
}

impl<P, F> Ranking<P> for F
where
    F: Fn(&P) -> f64 + Send + Sync,
{
    fn score(&self, program: &P) -> f64 {
        self(program)
    }
}

/// A program with the score its ranking gave it.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProgram<P> {
    pub program: P,
    pub score: f64,
}

/// Programs consistent with every example, best first. Empty means the
/// examples admit no program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramSet<P> {
    programs: Vec<RankedProgram<P>>,
}

impl<P> Default for ProgramSet<P> {
    fn default() -> Self {
        ProgramSet {
            programs: Vec::new(),
        }
    }
}

impl<P: fmt::Display> ProgramSet<P> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Score every program and sort descending; equal scores fall back to
    /// the printed form so the order never depends on discovery order.
    pub fn ranked(programs: Vec<P>, ranking: &dyn Ranking<P>) -> Self {
        let mut programs: Vec<(String, RankedProgram<P>)> = programs
            .into_iter()
            .map(|program| {
                let score = ranking.score(&program);
                (program.to_string(), RankedProgram { program, score })
            })
            .collect();
        programs.sort_by(|(a_text, a), (b_text, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_text.cmp(b_text))
        });
        programs.dedup_by(|(a, _), (b, _)| a == b);
        ProgramSet {
            programs: programs.into_iter().map(|(_, ranked)| ranked).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn top(&self) -> Option<&RankedProgram<P>> {
        self.programs.first()
    }

    pub fn best_score(&self) -> Option<f64> {
        self.top().map(|r| r.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedProgram<P>> {
        self.programs.iter()
    }

    pub fn truncate(&mut self, len: usize) {
        self.programs.truncate(len);
    }
}

/// A program synthesizer.
///
/// Calls must be independent: nothing one call learns may change the
/// outcome of a later call. Implementations should poll `cancel` and give
/// up (returning an empty set) once it fires, and should respect `budget`.
pub trait Oracle: Send + Sync + 'static {
    type Program: Clone + fmt::Display + Send + Sync + 'static;

    fn synthesize(
        &self,
        examples: &[Example],
        ranking: &dyn Ranking<Self::Program>,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> ProgramSet<Self::Program>;
}
