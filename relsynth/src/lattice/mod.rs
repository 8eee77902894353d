//! Relational-property lattice search
//!
//! Finds a large combination of relational properties whose perturbed
//! examples the oracle can still satisfy, then synthesizes with it:
//!
//! 1. Try every property alone; the feasible ones are *applicable*.
//! 2. Grow sets one property at a time, level by level, keeping only the
//!    feasible ones. A singleton that cannot absorb some property records the
//!    pair as conflicting, and no later set joins that pair.
//! 3. When a level adds nothing, pick one set of the last level and run the
//!    oracle on its examples.

pub mod conflict;
pub mod report;

pub use conflict::ConflictTable;
pub use report::{Attempt, AttemptOutcome, Phase, SearchReport};

use crate::example::Example;
use crate::oracle::{Oracle, OracleOutcome, ProgramSet, Ranking, TimedOracle};
use crate::property::{PropertyCatalog, PropertySet};
use crate::{SynthesisConfig, TieBreak};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of a full search.
#[derive(Debug)]
pub enum SynthesisOutcome<P> {
    Synthesized {
        programs: ProgramSet<P>,
        report: SearchReport,
    },
    /// Not even the plain examples admitted a program
    NoProgram { report: SearchReport },
}

impl<P> SynthesisOutcome<P> {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, SynthesisOutcome::Synthesized { .. })
    }

    pub fn programs(&self) -> Option<&ProgramSet<P>> {
        match self {
            SynthesisOutcome::Synthesized { programs, .. } => Some(programs),
            SynthesisOutcome::NoProgram { .. } => None,
        }
    }

    pub fn report(&self) -> &SearchReport {
        match self {
            SynthesisOutcome::Synthesized { report, .. } | SynthesisOutcome::NoProgram { report } => {
                report
            }
        }
    }
}

/// Drives the oracle through the property lattice.
pub struct LatticeSearch<O: Oracle> {
    oracle: TimedOracle<O>,
    catalog: PropertyCatalog,
    config: SynthesisConfig,
}

impl<O: Oracle> LatticeSearch<O> {
    pub fn new<R>(oracle: O, ranking: R, catalog: PropertyCatalog, config: SynthesisConfig) -> Self
    where
        R: Ranking<O::Program> + 'static,
    {
        LatticeSearch {
            oracle: TimedOracle::new(oracle, ranking, config.cancel_grace()),
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &PropertyCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Search over the whole catalog.
    pub fn run(&self, examples: &[Example]) -> SynthesisOutcome<O::Program> {
        let all: Vec<usize> = (0..self.catalog.len()).collect();
        self.run_with(examples, &all)
    }

    /// Search over the given catalog indices only.
    pub fn run_with(&self, examples: &[Example], candidates: &[usize]) -> SynthesisOutcome<O::Program> {
        let mut report = SearchReport::default();
        let relevant = self.catalog.applicable_to(examples);
        let candidates: BTreeSet<usize> = candidates
            .iter()
            .copied()
            .filter(|i| relevant.contains(i))
            .collect();
        info!(
            examples = examples.len(),
            candidates = candidates.len(),
            "relational lattice search started"
        );

        let mut applicable = Vec::new();
        for &p in &candidates {
            let outcome = self.attempt(
                examples,
                &PropertySet::singleton(p),
                Phase::Singleton,
                self.config.oracle_timeout(),
                &mut report,
            );
            if outcome.is_feasible() {
                applicable.push(p);
            }
        }
        report.applicable = applicable
            .iter()
            .filter_map(|&p| self.catalog.name(p))
            .map(str::to_string)
            .collect();
        info!(applicable = ?report.applicable, "singleton pass finished");

        let chosen = if applicable.len() <= 1 {
            applicable.iter().copied().collect()
        } else {
            let frontier = self.climb(examples, &applicable, &mut report);
            report.final_frontier = frontier.iter().map(|s| self.catalog.names(s)).collect();
            self.choose(examples, frontier, &mut report)
        };
        report.chosen = self.catalog.names(&chosen);
        info!(chosen = ?report.chosen, "property combination chosen");

        self.finish(examples, &chosen, report)
    }

    /// Grow the frontier until a level adds nothing; returns the last
    /// non-empty level.
    fn climb(
        &self,
        examples: &[Example],
        applicable: &[usize],
        report: &mut SearchReport,
    ) -> Vec<PropertySet> {
        let mut conflicts = ConflictTable::new();
        let mut frontier: BTreeSet<PropertySet> =
            applicable.iter().map(|&p| PropertySet::singleton(p)).collect();

        while frontier.len() > 1 {
            let mut next = BTreeSet::new();
            let mut tried: HashMap<PropertySet, bool> = HashMap::new();
            for set in &frontier {
                for &r in applicable {
                    if set.contains(r) {
                        continue;
                    }
                    if conflicts.blocks(set, r) {
                        report.skipped += 1;
                        continue;
                    }
                    let union = set.with(r);
                    let feasible = match tried.get(&union) {
                        Some(&known) => known,
                        None => {
                            let feasible = self
                                .attempt(
                                    examples,
                                    &union,
                                    Phase::Lattice,
                                    self.config.oracle_timeout(),
                                    report,
                                )
                                .is_feasible();
                            tried.insert(union.clone(), feasible);
                            feasible
                        }
                    };
                    if feasible {
                        next.insert(union);
                    } else if set.len() == 1 {
                        for q in set.iter() {
                            if conflicts.record(q, r) {
                                let pair = (self.property_name(q), self.property_name(r));
                                debug!(first = %pair.0, second = %pair.1, "conflict recorded");
                                report.conflicts.push(pair);
                            }
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
            info!(
                level = frontier.iter().map(PropertySet::len).max().unwrap_or(0),
                sets = frontier.len(),
                "lattice frontier grew"
            );
        }
        frontier.into_iter().collect()
    }

    fn choose(
        &self,
        examples: &[Example],
        frontier: Vec<PropertySet>,
        report: &mut SearchReport,
    ) -> PropertySet {
        let mut ordered: Vec<(Vec<String>, PropertySet)> = frontier
            .into_iter()
            .map(|set| (self.catalog.names(&set), set))
            .collect();
        ordered.sort();
        let Some((_, first)) = ordered.first().cloned() else {
            return PropertySet::empty();
        };

        match self.config.tie_break {
            TieBreak::Lexicographic => first,
            TieBreak::Seeded => {
                let mut rng = Pcg64::seed_from_u64(self.config.seed);
                let pick = rng.gen_range(0..ordered.len());
                ordered.swap_remove(pick).1
            }
            TieBreak::OracleScore => {
                let mut best: Option<(f64, PropertySet)> = None;
                for (_, set) in ordered {
                    let outcome = self.attempt(
                        examples,
                        &set,
                        Phase::TieBreak,
                        self.config.oracle_timeout(),
                        report,
                    );
                    let Some(score) = outcome.into_programs().and_then(|p| p.best_score()) else {
                        continue;
                    };
                    // Strictly better only: the earlier (lexicographically
                    // smaller) set keeps ties.
                    if best.as_ref().map_or(true, |(top, _)| score > *top) {
                        best = Some((score, set));
                    }
                }
                best.map(|(_, set)| set).unwrap_or(first)
            }
        }
    }

    fn finish(
        &self,
        examples: &[Example],
        chosen: &PropertySet,
        mut report: SearchReport,
    ) -> SynthesisOutcome<O::Program> {
        let budget = self.config.final_timeout();
        let outcome = self.attempt(examples, chosen, Phase::Final, budget, &mut report);
        if let Some(programs) = outcome.into_programs() {
            return SynthesisOutcome::Synthesized { programs, report };
        }

        if !chosen.is_empty() {
            info!("chosen combination failed; retrying with the plain examples");
            report.fell_back = true;
            let outcome = self.attempt(
                examples,
                &PropertySet::empty(),
                Phase::Fallback,
                budget,
                &mut report,
            );
            if let Some(programs) = outcome.into_programs() {
                return SynthesisOutcome::Synthesized { programs, report };
            }
        }

        info!("no program synthesized");
        SynthesisOutcome::NoProgram { report }
    }

    fn attempt(
        &self,
        examples: &[Example],
        set: &PropertySet,
        phase: Phase,
        budget: Duration,
        report: &mut SearchReport,
    ) -> OracleOutcome<O::Program> {
        let augmented = self.catalog.perturb(
            examples,
            set,
            self.config.seed,
            self.config.max_variants_per_property,
        );
        let count = augmented.len();
        let properties = self.catalog.names(set);
        let started = Instant::now();
        let outcome = self.oracle.call(augmented, budget);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = match &outcome {
            OracleOutcome::Feasible(_) => AttemptOutcome::Feasible,
            OracleOutcome::Infeasible => AttemptOutcome::Infeasible,
            OracleOutcome::TimedOut => AttemptOutcome::TimedOut,
        };
        debug!(?phase, ?properties, examples = count, ?result, elapsed_ms, "oracle attempt");
        report.attempts.push(Attempt {
            phase,
            properties,
            examples: count,
            outcome: result,
            elapsed_ms,
        });
        outcome
    }

    fn property_name(&self, index: usize) -> String {
        self.catalog
            .name(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index))
    }
}
