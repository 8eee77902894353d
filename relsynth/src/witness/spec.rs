//! Disjunctive specifications and inversion outcomes

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Acceptable values per input state.
///
/// Each state maps to a non-empty, duplicate-free list kept in insertion
/// order. A state with no acceptable value is never stored; an inversion
/// that would produce one reports [`WitnessResult::Infeasible`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisjunctiveSpec {
    states: BTreeMap<usize, Vec<Value>>,
}

impl DisjunctiveSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// One state per value, each requiring exactly that value.
    pub fn exact<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut spec = Self::new();
        for (state, value) in values.into_iter().enumerate() {
            spec.insert(state, vec![value]);
        }
        spec
    }

    /// Set the candidates for a state, dropping duplicates.
    ///
    /// Returns false (and stores nothing) when no candidate remains.
    pub fn insert(&mut self, state: usize, candidates: Vec<Value>) -> bool {
        let mut unique: Vec<Value> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        if unique.is_empty() {
            self.states.remove(&state);
            return false;
        }
        self.states.insert(state, unique);
        true
    }

    pub fn get(&self, state: usize) -> Option<&[Value]> {
        self.states.get(&state).map(Vec::as_slice)
    }

    pub fn contains(&self, state: usize, value: &Value) -> bool {
        self.get(state).is_some_and(|values| values.contains(value))
    }

    pub fn states(&self) -> impl Iterator<Item = (usize, &[Value])> {
        self.states.iter().map(|(state, values)| (*state, values.as_slice()))
    }

    pub fn state_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.states.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Values acceptable in every state, in the order of the first state.
    ///
    /// This is what a literal argument (the same constant for every input)
    /// can be bound to.
    pub fn common_values(&self) -> Vec<Value> {
        let mut states = self.states.values();
        let Some(first) = states.next() else {
            return Vec::new();
        };
        let rest: Vec<&Vec<Value>> = states.collect();
        first
            .iter()
            .filter(|v| rest.iter().all(|values| values.contains(v)))
            .cloned()
            .collect()
    }

    /// Keep only the candidates `keep` accepts; `None` if a state runs dry.
    pub fn filtered<F>(&self, mut keep: F) -> Option<DisjunctiveSpec>
    where
        F: FnMut(usize, &Value) -> bool,
    {
        let mut out = DisjunctiveSpec::new();
        for (state, values) in self.states() {
            let kept: Vec<Value> = values
                .iter()
                .filter(|v| keep(state, v))
                .cloned()
                .collect();
            if !out.insert(state, kept) {
                return None;
            }
        }
        Some(out)
    }
}

impl fmt::Display for DisjunctiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (state, values)) in self.states().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "state {}: {{", state)?;
            for (j, v) in values.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

impl Serialize for DisjunctiveSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.states.len()))?;
        for (state, values) in &self.states {
            map.serialize_entry(&state.to_string(), values)?;
        }
        map.end()
    }
}

/// Result of inverting one operator slot
#[derive(Debug, Clone, PartialEq)]
pub enum WitnessResult {
    /// Every input state has at least one candidate
    Candidates(DisjunctiveSpec),
    /// No argument value can produce the output, with an optional reason
    Infeasible(Option<String>),
}

impl WitnessResult {
    pub fn infeasible(reason: impl Into<String>) -> Self {
        WitnessResult::Infeasible(Some(reason.into()))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, WitnessResult::Infeasible(_))
    }

    pub fn candidates(&self) -> Option<&DisjunctiveSpec> {
        match self {
            WitnessResult::Candidates(spec) => Some(spec),
            WitnessResult::Infeasible(_) => None,
        }
    }

    pub fn into_candidates(self) -> Option<DisjunctiveSpec> {
        match self {
            WitnessResult::Candidates(spec) => Some(spec),
            WitnessResult::Infeasible(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            WitnessResult::Infeasible(reason) => reason.as_deref(),
            WitnessResult::Candidates(_) => None,
        }
    }
}

/// Concrete values already chosen for earlier slots, one per input state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSlots {
    slots: BTreeMap<usize, Vec<Value>>,
}

impl ResolvedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, slot: usize, per_state: Vec<Value>) -> &mut Self {
        self.slots.insert(slot, per_state);
        self
    }

    pub fn with(mut self, slot: usize, per_state: Vec<Value>) -> Self {
        self.bind(slot, per_state);
        self
    }

    pub fn value(&self, slot: usize, state: usize) -> Option<&Value> {
        self.slots.get(&slot)?.get(state)
    }

    /// True when the slot has a value for every listed state.
    pub fn covers(&self, slot: usize, states: impl IntoIterator<Item = usize>) -> bool {
        match self.slots.get(&slot) {
            Some(values) => states.into_iter().all(|state| state < values.len()),
            None => false,
        }
    }
}
