//! Time-bounded, cancellable oracle calls
//!
//! Each call runs on its own worker thread. The caller waits up to the
//! budget; on timeout it cancels the worker's token and gives it a short
//! grace period to finish. A worker that ignores cancellation is detached and
//! whatever it eventually produces is dropped.

use super::{Oracle, ProgramSet, Ranking};
use crate::example::Example;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Wall-clock budget tracker handed to oracle internals.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Deadline {
            start: Instant::now(),
            budget,
        }
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.start.elapsed())
    }
}

/// What a timed call produced.
#[derive(Debug)]
pub enum OracleOutcome<P> {
    Feasible(ProgramSet<P>),
    /// The oracle finished and found nothing, or its worker failed
    Infeasible,
    /// The budget ran out first; the lattice search treats this as infeasible
    TimedOut,
}

impl<P> OracleOutcome<P> {
    pub fn is_feasible(&self) -> bool {
        matches!(self, OracleOutcome::Feasible(_))
    }

    pub fn into_programs(self) -> Option<ProgramSet<P>> {
        match self {
            OracleOutcome::Feasible(programs) => Some(programs),
            _ => None,
        }
    }
}

/// An oracle plus the ranking and grace period used for every call.
pub struct TimedOracle<O: Oracle> {
    oracle: Arc<O>,
    ranking: Arc<dyn Ranking<O::Program>>,
    grace: Duration,
}

impl<O: Oracle> TimedOracle<O> {
    pub fn new<R>(oracle: O, ranking: R, grace: Duration) -> Self
    where
        R: Ranking<O::Program> + 'static,
    {
        TimedOracle {
            oracle: Arc::new(oracle),
            ranking: Arc::new(ranking),
            grace,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn call(&self, examples: Vec<Example>, budget: Duration) -> OracleOutcome<O::Program> {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel();
        let oracle = Arc::clone(&self.oracle);
        let ranking = Arc::clone(&self.ranking);
        let token = cancel.clone();
        let example_count = examples.len();

        let spawned = thread::Builder::new()
            .name("relsynth-oracle".to_string())
            .spawn(move || {
                let programs = oracle.synthesize(&examples, ranking.as_ref(), budget, &token);
                // The receiver is gone once the caller has given up on us.
                let _ = tx.send(programs);
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "failed to spawn oracle worker");
                return OracleOutcome::Infeasible;
            }
        };

        let started = Instant::now();
        match rx.recv_timeout(budget) {
            Ok(programs) => {
                let _ = handle.join();
                debug!(
                    examples = example_count,
                    programs = programs.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "oracle call finished"
                );
                if programs.is_empty() {
                    OracleOutcome::Infeasible
                } else {
                    OracleOutcome::Feasible(programs)
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                cancel.cancel();
                match rx.recv_timeout(self.grace) {
                    Ok(_) | Err(RecvTimeoutError::Disconnected) => {
                        let _ = handle.join();
                        debug!(examples = example_count, "oracle call timed out; worker stopped");
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(
                            examples = example_count,
                            grace_ms = self.grace.as_millis() as u64,
                            "oracle worker ignored cancellation; detaching it"
                        );
                    }
                }
                OracleOutcome::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                warn!(examples = example_count, "oracle worker exited without a result");
                OracleOutcome::Infeasible
            }
        }
    }
}
