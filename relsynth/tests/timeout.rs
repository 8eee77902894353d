use relsynth::{Example, Oracle, OracleOutcome, ProgramSet, Ranking, TimedOracle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn score(_: &String) -> f64 {
    1.0
}

fn examples() -> Vec<Example> {
    vec![Example::new("in", "out")]
}

/// Sleeps through its budget without ever looking at the token.
struct Stubborn(Duration);

impl Oracle for Stubborn {
    type Program = String;

    fn synthesize(
        &self,
        _examples: &[Example],
        ranking: &dyn Ranking<String>,
        _budget: Duration,
        _cancel: &CancellationToken,
    ) -> ProgramSet<String> {
        thread::sleep(self.0);
        ProgramSet::ranked(vec!["late".to_string()], ranking)
    }
}

/// Polls the token and stops as soon as it fires.
struct Cooperative {
    stopped: Arc<AtomicBool>,
}

impl Oracle for Cooperative {
    type Program = String;

    fn synthesize(
        &self,
        _examples: &[Example],
        _ranking: &dyn Ranking<String>,
        _budget: Duration,
        cancel: &CancellationToken,
    ) -> ProgramSet<String> {
        while !cancel.is_cancelled() {
            thread::sleep(Duration::from_millis(5));
        }
        self.stopped.store(true, Ordering::SeqCst);
        ProgramSet::empty()
    }
}

/// Answers immediately with a fixed set of programs.
struct Immediate(Vec<&'static str>);

impl Oracle for Immediate {
    type Program = String;

    fn synthesize(
        &self,
        _examples: &[Example],
        ranking: &dyn Ranking<String>,
        _budget: Duration,
        _cancel: &CancellationToken,
    ) -> ProgramSet<String> {
        ProgramSet::ranked(self.0.iter().map(|s| s.to_string()).collect(), ranking)
    }
}

struct Crashing;

impl Oracle for Crashing {
    type Program = String;

    fn synthesize(
        &self,
        _examples: &[Example],
        _ranking: &dyn Ranking<String>,
        _budget: Duration,
        _cancel: &CancellationToken,
    ) -> ProgramSet<String> {
        panic!("oracle bug");
    }
}

#[test]
fn stubborn_worker_is_abandoned_after_grace() {
    let oracle = TimedOracle::new(Stubborn(Duration::from_secs(3)), score, Duration::from_millis(50));
    let started = Instant::now();
    let outcome = oracle.call(examples(), Duration::from_millis(100));

    assert!(matches!(outcome, OracleOutcome::TimedOut));
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "call should return near budget + grace, took {:?}",
        started.elapsed()
    );
}

#[test]
fn cooperative_worker_stops_on_cancel() {
    let stopped = Arc::new(AtomicBool::new(false));
    let oracle = TimedOracle::new(
        Cooperative {
            stopped: Arc::clone(&stopped),
        },
        score,
        Duration::from_secs(2),
    );
    let outcome = oracle.call(examples(), Duration::from_millis(50));

    assert!(matches!(outcome, OracleOutcome::TimedOut));
    assert!(stopped.load(Ordering::SeqCst), "worker should have seen the cancellation");
}

#[test]
fn fast_answer_is_feasible() {
    let oracle = TimedOracle::new(Immediate(vec!["b", "a"]), score, Duration::from_millis(50));
    let outcome = oracle.call(examples(), Duration::from_secs(5));

    let programs = outcome.into_programs().expect("feasible");
    // Equal scores fall back to the printed form.
    let order: Vec<&str> = programs.iter().map(|r| r.program.as_str()).collect();
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn empty_answer_is_infeasible() {
    let oracle = TimedOracle::new(Immediate(Vec::new()), score, Duration::from_millis(50));
    let outcome = oracle.call(examples(), Duration::from_secs(5));
    assert!(matches!(outcome, OracleOutcome::Infeasible));
}

#[test]
fn panicking_worker_is_infeasible() {
    let oracle = TimedOracle::new(Crashing, score, Duration::from_millis(50));
    let outcome = oracle.call(examples(), Duration::from_secs(5));
    assert!(matches!(outcome, OracleOutcome::Infeasible));
}
