//! Reference oracle for the tree domain
//!
//! Learns `NodesToTexts(N)` programs over the example trees. The output
//! texts are first mapped back to nodes of each tree; from there every node
//! operator reads its source off the input root and its literal arguments
//! off the values all states agree on, exactly like the substring learner.

use super::timed::Deadline;
use super::tree_program::{NodeProgram, TreeProgram};
use super::{Oracle, ProgramSet, Ranking};
use crate::example::Example;
use crate::node::HtmlNode;
use crate::semantics::Operator;
use crate::value::Value;
use crate::witness::{DisjunctiveSpec, ResolvedSlots, WitnessRegistry};
use crate::{SynthResult, SynthesisConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

const MAX_NODE_PROGRAMS: usize = 64;

const FILTERED: [Operator; 3] = [
    Operator::DescendantsWithTag,
    Operator::DescendantsWithAttr,
    Operator::DescendantsWithAttrValue,
];

pub struct TreeOracle {
    registry: Arc<WitnessRegistry>,
    max_concat_depth: usize,
}

impl TreeOracle {
    pub fn new(config: &SynthesisConfig) -> SynthResult<Self> {
        let registry = WitnessRegistry::standard(config)?;
        Ok(Self::with_registry(Arc::new(registry), config.max_concat_depth))
    }

    pub fn with_registry(registry: Arc<WitnessRegistry>, max_concat_depth: usize) -> Self {
        TreeOracle {
            registry,
            max_concat_depth,
        }
    }

    /// Every program consistent with the examples, unranked. Inputs must be
    /// trees and outputs lists of strings; anything else learns nothing.
    pub fn learn(
        &self,
        examples: &[Example],
        cancel: &CancellationToken,
        deadline: Deadline,
    ) -> Vec<TreeProgram> {
        if examples.is_empty() {
            return Vec::new();
        }
        let Some(roots) = examples
            .iter()
            .map(|e| e.input.as_node().cloned())
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };
        let Some(outputs) = examples
            .iter()
            .map(|e| e.output.as_str_list().map(<[String]>::to_vec))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };

        let session = Session {
            registry: &self.registry,
            inputs: roots.iter().cloned().map(Value::Node).collect(),
            roots,
            cancel,
            deadline,
        };
        let spec = DisjunctiveSpec::exact(outputs.iter().cloned().map(Value::StrList));
        let Some(nodes) = session.invert(Operator::NodesToTexts, 0, &spec, &ResolvedSlots::new())
        else {
            return Vec::new();
        };
        let mut programs: Vec<TreeProgram> = session
            .learn_nodes(&nodes, self.max_concat_depth)
            .into_iter()
            .map(TreeProgram::new)
            .collect();
        programs.retain(|program| {
            session
                .roots
                .iter()
                .zip(&outputs)
                .all(|(x, y)| program.eval(x) == *y)
        });
        programs
    }
}

impl Oracle for TreeOracle {
    type Program = TreeProgram;

    fn synthesize(
        &self,
        examples: &[Example],
        ranking: &dyn Ranking<TreeProgram>,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> ProgramSet<TreeProgram> {
        let deadline = Deadline::new(budget);
        let programs = self.learn(examples, cancel, deadline);
        if cancel.is_cancelled() {
            return ProgramSet::empty();
        }
        trace!(examples = examples.len(), programs = programs.len(), "tree learner done");
        ProgramSet::ranked(programs, ranking)
    }
}

struct Session<'a> {
    registry: &'a WitnessRegistry,
    inputs: Vec<Value>,
    roots: Vec<Arc<HtmlNode>>,
    cancel: &'a CancellationToken,
    deadline: Deadline,
}

impl Session<'_> {
    fn stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.expired()
    }

    fn invert(
        &self,
        operator: Operator,
        slot: usize,
        spec: &DisjunctiveSpec,
        resolved: &ResolvedSlots,
    ) -> Option<DisjunctiveSpec> {
        if self.stopped() {
            return None;
        }
        self.registry
            .invert(operator, slot, &self.inputs, spec, resolved)
            .into_candidates()
    }

    /// Resolve slot 0 of `operator` to the example roots, provided its rule
    /// admits them in every state.
    fn bind_input(&self, operator: Operator, spec: &DisjunctiveSpec) -> Option<ResolvedSlots> {
        let admitted = self.invert(operator, 0, spec, &ResolvedSlots::new())?;
        let all = spec.state_ids().all(|state| {
            self.inputs
                .get(state)
                .is_some_and(|x| admitted.contains(state, x))
        });
        all.then(|| ResolvedSlots::new().with(0, self.inputs.clone()))
    }

    /// The same literal in every state.
    fn literal(&self, value: &Value) -> Vec<Value> {
        vec![value.clone(); self.inputs.len()]
    }

    fn learn_nodes(&self, spec: &DisjunctiveSpec, depth: usize) -> Vec<NodeProgram> {
        if self.stopped() {
            return Vec::new();
        }
        let mut out = Vec::new();

        for (operator, program) in [
            (Operator::Children, NodeProgram::Children),
            (Operator::Descendants, NodeProgram::Descendants),
            (Operator::Single, NodeProgram::Single),
        ] {
            if self.bind_input(operator, spec).is_some() {
                out.push(program);
            }
        }

        for operator in FILTERED {
            let Some(input) = self.bind_input(operator, spec) else {
                continue;
            };
            let Some(keys) = self.invert(operator, 1, spec, &input) else {
                continue;
            };
            for key in keys.common_values() {
                let Some(name) = key.as_str() else { continue };
                match operator {
                    Operator::DescendantsWithTag => {
                        out.push(NodeProgram::DescendantsWithTag { tag: name.to_string() })
                    }
                    Operator::DescendantsWithAttr => {
                        out.push(NodeProgram::DescendantsWithAttr { attr: name.to_string() })
                    }
                    _ => {
                        let resolved = input.clone().with(1, self.literal(&key));
                        let Some(values) = self.invert(operator, 2, spec, &resolved) else {
                            continue;
                        };
                        for value in values.common_values().iter().filter_map(Value::as_str) {
                            out.push(NodeProgram::DescendantsWithAttrValue {
                                attr: name.to_string(),
                                value: value.to_string(),
                            });
                        }
                    }
                }
            }
        }

        if depth > 0 {
            out.extend(self.learn_concat(spec, depth));
        }
        out.truncate(MAX_NODE_PROGRAMS);
        out
    }

    fn learn_concat(&self, spec: &DisjunctiveSpec, depth: usize) -> Vec<NodeProgram> {
        let non_empty = |_: usize, v: &Value| v.as_node_list().is_some_and(|l| !l.is_empty());
        let Some(prefixes) = self
            .invert(Operator::NodeConcat, 0, spec, &ResolvedSlots::new())
            .and_then(|p| p.filtered(non_empty))
        else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for left in self.learn_nodes(&prefixes, depth - 1) {
            let values = self
                .roots
                .iter()
                .map(|x| Value::NodeList(left.eval(x)))
                .collect();
            let resolved = ResolvedSlots::new().with(0, values);
            let Some(rest) = self
                .invert(Operator::NodeConcat, 1, spec, &resolved)
                .and_then(|r| r.filtered(non_empty))
            else {
                continue;
            };
            for right in self.learn_nodes(&rest, depth - 1) {
                out.push(NodeProgram::NodeConcat {
                    left: Box::new(left.clone()),
                    right: Box::new(right),
                });
            }
        }
        out
    }
}
