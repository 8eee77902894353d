//! Witness rule registration and dispatch

use super::spec::{DisjunctiveSpec, ResolvedSlots, WitnessResult};
use crate::semantics::Operator;
use crate::value::Value;
use crate::{SynthError, SynthResult};
use std::collections::HashMap;
use tracing::trace;

/// Everything a rule sees for one inversion.
pub struct InversionContext<'a> {
    pub operator: Operator,
    pub slot: usize,
    /// Example inputs, indexed by input state
    pub inputs: &'a [Value],
    /// Required operator output per state
    pub output: &'a DisjunctiveSpec,
    pub resolved: &'a ResolvedSlots,
}

impl<'a> InversionContext<'a> {
    /// Value already chosen for an earlier slot in the given state.
    pub fn resolved(&self, slot: usize, state: usize) -> Option<&'a Value> {
        self.resolved.value(slot, state)
    }

    /// Run `candidates` once per state and assemble the result.
    ///
    /// The first state that yields nothing makes the whole inversion
    /// infeasible.
    pub fn per_state<F>(&self, mut candidates: F) -> WitnessResult
    where
        F: FnMut(usize, &'a Value, &'a [Value]) -> Vec<Value>,
    {
        let mut spec = DisjunctiveSpec::new();
        for (state, outputs) in self.output.states() {
            let Some(input) = self.inputs.get(state) else {
                return WitnessResult::infeasible(format!("no input for state {}", state));
            };
            if !spec.insert(state, candidates(state, input, outputs)) {
                return WitnessResult::infeasible(format!(
                    "{} slot {} has no candidate for state {}",
                    self.operator, self.slot, state
                ));
            }
        }
        WitnessResult::Candidates(spec)
    }
}

/// An inverse-semantics function for one operator argument.
pub trait WitnessRule: Send + Sync {
    fn invert(&self, ctx: &InversionContext<'_>) -> WitnessResult;
}

impl<F> WitnessRule for F
where
    F: Fn(&InversionContext<'_>) -> WitnessResult + Send + Sync,
{
    fn invert(&self, ctx: &InversionContext<'_>) -> WitnessResult {
        self(ctx)
    }
}

struct RegisteredRule {
    depends_on: Vec<usize>,
    rule: Box<dyn WitnessRule>,
}

/// Rules keyed by `(operator, slot)`.
///
/// Dependencies may only point at smaller slots, which rules out cycles at
/// registration time.
#[derive(Default)]
pub struct WitnessRegistry {
    rules: HashMap<(Operator, usize), RegisteredRule>,
}

impl WitnessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R>(
        &mut self,
        operator: Operator,
        slot: usize,
        depends_on: &[usize],
        rule: R,
    ) -> SynthResult<()>
    where
        R: WitnessRule + 'static,
    {
        if slot >= operator.arity() {
            return Err(SynthError::configuration(format!(
                "{} has {} argument(s); cannot register a rule for slot {}",
                operator,
                operator.arity(),
                slot
            )));
        }
        if let Some(dep) = depends_on.iter().find(|&&dep| dep >= slot) {
            return Err(SynthError::configuration(format!(
                "rule for {} slot {} depends on slot {}; dependencies must precede the slot",
                operator, slot, dep
            )));
        }
        if self.rules.contains_key(&(operator, slot)) {
            return Err(SynthError::configuration(format!(
                "duplicate witness rule for {} slot {}",
                operator, slot
            )));
        }
        let mut depends_on = depends_on.to_vec();
        depends_on.sort_unstable();
        depends_on.dedup();
        self.rules.insert(
            (operator, slot),
            RegisteredRule {
                depends_on,
                rule: Box::new(rule),
            },
        );
        Ok(())
    }

    pub fn has_rule(&self, operator: Operator, slot: usize) -> bool {
        self.rules.contains_key(&(operator, slot))
    }

    pub fn dependencies(&self, operator: Operator, slot: usize) -> Option<&[usize]> {
        self.rules
            .get(&(operator, slot))
            .map(|r| r.depends_on.as_slice())
    }

    /// Slots of `operator` that have a rule, ascending.
    pub fn slots(&self, operator: Operator) -> Vec<usize> {
        (0..operator.arity())
            .filter(|&slot| self.has_rule(operator, slot))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compute candidate values for `slot` of `operator`.
    ///
    /// Never fails with an error: an unknown rule, an unmet dependency or a
    /// rule that comes back empty for some state are all
    /// [`WitnessResult::Infeasible`].
    pub fn invert(
        &self,
        operator: Operator,
        slot: usize,
        inputs: &[Value],
        output: &DisjunctiveSpec,
        resolved: &ResolvedSlots,
    ) -> WitnessResult {
        let Some(registered) = self.rules.get(&(operator, slot)) else {
            return WitnessResult::infeasible(format!("no witness rule for {} slot {}", operator, slot));
        };
        if output.is_empty() {
            return WitnessResult::infeasible("empty output specification");
        }
        for &dep in &registered.depends_on {
            if !resolved.covers(dep, output.state_ids()) {
                trace!(%operator, slot, dep, "dependency unresolved");
                return WitnessResult::infeasible(format!(
                    "{} slot {} needs slot {} resolved for every input state",
                    operator, slot, dep
                ));
            }
        }

        let ctx = InversionContext {
            operator,
            slot,
            inputs,
            output,
            resolved,
        };
        let result = registered.rule.invert(&ctx);

        // A rule must answer for exactly the states it was asked about.
        if let WitnessResult::Candidates(spec) = &result {
            let covered = output.state_ids().all(|state| spec.get(state).is_some());
            if !covered || spec.len() != output.len() {
                return WitnessResult::infeasible(format!(
                    "{} slot {} left some input state without candidates",
                    operator, slot
                ));
            }
        }
        result
    }
}
