use crate::lattice::{Attempt, AttemptOutcome, ConflictTable, Phase, SearchReport};
use crate::property::PropertySet;

#[test]
fn test_conflicts_are_unordered_pairs() {
    let mut table = ConflictTable::new();
    assert!(table.record(3, 1));
    assert!(!table.record(1, 3), "same pair recorded twice");
    assert!(table.conflicts(1, 3));
    assert!(table.conflicts(3, 1));
    assert!(!table.conflicts(1, 2));
    assert_eq!(table.pairs().collect::<Vec<_>>(), vec![(1, 3)]);
}

#[test]
fn test_blocks_any_member() {
    let mut table = ConflictTable::new();
    table.record(0, 2);
    let set = PropertySet::singleton(0).with(1);
    assert!(table.blocks(&set, 2));
    assert!(!table.blocks(&set, 3));
    assert!(!table.blocks(&PropertySet::empty(), 2));
}

#[test]
fn test_report_counts_attempts_per_phase() {
    let attempt = |phase| Attempt {
        phase,
        properties: Vec::new(),
        examples: 1,
        outcome: AttemptOutcome::Infeasible,
        elapsed_ms: 0,
    };
    let report = SearchReport {
        attempts: vec![
            attempt(Phase::Singleton),
            attempt(Phase::Singleton),
            attempt(Phase::Final),
        ],
        ..SearchReport::default()
    };
    assert_eq!(report.oracle_calls(), 3);
    assert_eq!(report.attempts_in(Phase::Singleton).count(), 2);
    assert_eq!(report.attempts_in(Phase::Lattice).count(), 0);
}

#[test]
fn test_report_serializes_phases_in_snake_case() {
    let json = serde_json::to_value(Phase::TieBreak).unwrap();
    assert_eq!(json, serde_json::json!("tie_break"));
}
