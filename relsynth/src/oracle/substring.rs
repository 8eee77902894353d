//! Reference oracle for the substring domain
//!
//! A top-down learner over fixed program shapes (see [`super::program`]).
//! Each step asks the witness registry which argument values can still
//! produce the required output; literal arguments are the values every input
//! state agrees on. Every assembled program is run forward on all examples
//! before it is kept.

use super::program::{ListProgram, PositionProgram, StringProgram};
use super::timed::Deadline;
use super::{Oracle, ProgramSet, Ranking};
use crate::example::Example;
use crate::semantics::{text, Operator};
use crate::value::Value;
use crate::witness::{DisjunctiveSpec, ResolvedSlots, WitnessRegistry};
use crate::{SynthResult, SynthesisConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

const MAX_LIST_PROGRAMS: usize = 64;
const MAX_POSITION_PROGRAMS: usize = 24;

pub struct SubstringOracle {
    registry: Arc<WitnessRegistry>,
    max_concat_depth: usize,
}

impl SubstringOracle {
    pub fn new(config: &SynthesisConfig) -> SynthResult<Self> {
        let registry = WitnessRegistry::standard(config)?;
        Ok(Self::with_registry(Arc::new(registry), config.max_concat_depth))
    }

    pub fn with_registry(registry: Arc<WitnessRegistry>, max_concat_depth: usize) -> Self {
        SubstringOracle {
            registry,
            max_concat_depth,
        }
    }

    pub fn registry(&self) -> &WitnessRegistry {
        &self.registry
    }

    /// Every program consistent with the examples, unranked.
    pub fn learn(
        &self,
        examples: &[Example],
        cancel: &CancellationToken,
        deadline: Deadline,
    ) -> Vec<StringProgram> {
        let Some(texts) = examples
            .iter()
            .map(|e| e.input.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };
        let Some(outputs) = examples
            .iter()
            .map(|e| e.output.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };
        if examples.is_empty() {
            return Vec::new();
        }

        let session = Session {
            registry: &self.registry,
            inputs: texts.iter().cloned().map(Value::Str).collect(),
            texts,
            cancel,
            deadline,
            max_concat_depth: self.max_concat_depth,
        };
        let spec = DisjunctiveSpec::exact(outputs.iter().cloned().map(Value::Str));
        let mut programs = session.learn_string(&spec);
        programs.retain(|program| {
            session
                .texts
                .iter()
                .zip(&outputs)
                .all(|(x, y)| program.eval(x).as_ref() == Some(y))
        });
        programs
    }
}

impl Oracle for SubstringOracle {
    type Program = StringProgram;

    fn synthesize(
        &self,
        examples: &[Example],
        ranking: &dyn Ranking<StringProgram>,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> ProgramSet<StringProgram> {
        let deadline = Deadline::new(budget);
        let programs = self.learn(examples, cancel, deadline);
        if cancel.is_cancelled() {
            return ProgramSet::empty();
        }
        trace!(examples = examples.len(), programs = programs.len(), "substring learner done");
        ProgramSet::ranked(programs, ranking)
    }
}

struct Session<'a> {
    registry: &'a WitnessRegistry,
    inputs: Vec<Value>,
    texts: Vec<String>,
    cancel: &'a CancellationToken,
    deadline: Deadline,
    max_concat_depth: usize,
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

    /// Evaluate a sub-program on every input.
    fn eval_all<F>(&self, f: F) -> Option<Vec<Value>>
    where
        F: Fn(&str) -> Option<Value>,
    {
        self.texts.iter().map(|x| f(x.as_str())).collect()
    }

    /// Resolve slot 0 of `operator` to the example inputs, provided its
    /// rule admits them in every state.
    fn bind_input(&self, operator: Operator, spec: &DisjunctiveSpec) -> Option<ResolvedSlots> {
        let admitted = self.invert(operator, 0, spec, &ResolvedSlots::new())?;
        let all = spec.state_ids().all(|state| {
            self.inputs
                .get(state)
                .is_some_and(|x| admitted.contains(state, x))
        });
        all.then(|| ResolvedSlots::new().with(0, self.inputs.clone()))
    }

    fn learn_string(&self, spec: &DisjunctiveSpec) -> Vec<StringProgram> {
        let none = ResolvedSlots::new();
        let mut out = Vec::new();

        if let Some(lists) = self.invert(Operator::TakeFirst, 0, spec, &none) {
            for list in self.learn_list(&lists, self.max_concat_depth) {
                out.push(StringProgram::TakeFirst { list });
            }
        }

        // One-element lists are already covered by TakeFirst.
        let joinable = self
            .invert(Operator::JoinList, 0, spec, &none)
            .and_then(|lists| lists.filtered(|_, v| v.as_str_list().is_some_and(|l| l.len() > 1)));
        if let Some(lists) = joinable {
            for list in self.learn_list(&lists, self.max_concat_depth) {
                let Some(values) = self.eval_all(|x| list.eval(x).map(Value::StrList)) else {
                    continue;
                };
                let resolved = ResolvedSlots::new().with(0, values);
                let Some(separators) = self.invert(Operator::JoinList, 1, spec, &resolved) else {
                    continue;
                };
                for separator in separators.common_values().iter().filter_map(Value::as_char) {
                    out.push(StringProgram::JoinList {
                        list: list.clone(),
                        separator,
                    });
                }
            }
        }

        for operator in [Operator::SubstringPP, Operator::SubstringPL] {
            let Some(input) = self.bind_input(operator, spec) else {
                continue;
            };
            let Some(starts) = self.invert(operator, 1, spec, &input) else {
                continue;
            };
            for start in self.learn_position(&starts) {
                let Some(values) = self.eval_all(|x| start.eval(x).map(Value::Int)) else {
                    continue;
                };
                let resolved = input.clone().with(1, values);
                let Some(thirds) = self.invert(operator, 2, spec, &resolved) else {
                    continue;
                };
                if operator == Operator::SubstringPP {
                    for end in self.learn_position(&thirds) {
                        out.push(StringProgram::SubstringPP {
                            start: start.clone(),
                            end,
                        });
                    }
                } else {
                    for len in thirds.common_values().iter().filter_map(Value::as_int) {
                        out.push(StringProgram::SubstringPL {
                            start: start.clone(),
                            len,
                        });
                    }
                }
            }
        }
        out
    }

    fn learn_list(&self, spec: &DisjunctiveSpec, depth: usize) -> Vec<ListProgram> {
        if self.stopped() {
            return Vec::new();
        }
        let none = ResolvedSlots::new();
        let mut out = Vec::new();

        for operator in [Operator::SelectK, Operator::SelectRegex] {
            let Some(lists) = self.invert(operator, 0, spec, &none) else {
                continue;
            };
            for separator in self.separators(&lists) {
                let Some(split) =
                    self.eval_all(|x| Some(Value::StrList(text::split(x, separator))))
                else {
                    continue;
                };
                let resolved = ResolvedSlots::new().with(0, split);
                let Some(args) = self.invert(operator, 1, spec, &resolved) else {
                    continue;
                };
                for arg in args.common_values() {
                    match arg {
                        Value::Int(k) => out.push(ListProgram::SelectK { separator, k }),
                        Value::Pattern(pattern) => {
                            out.push(ListProgram::SelectRegex { separator, pattern })
                        }
                        _ => {}
                    }
                }
            }
        }

        if depth > 0 {
            out.extend(self.learn_concat(spec, depth));
        }
        out.truncate(MAX_LIST_PROGRAMS);
        out
    }

    fn learn_concat(&self, spec: &DisjunctiveSpec, depth: usize) -> Vec<ListProgram> {
        let non_empty = |_: usize, v: &Value| v.as_str_list().is_some_and(|l| !l.is_empty());
        let Some(prefixes) = self
            .invert(Operator::Concat, 0, spec, &ResolvedSlots::new())
            .and_then(|p| p.filtered(non_empty))
        else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for left in self.learn_list(&prefixes, depth - 1) {
            let Some(values) = self.eval_all(|x| left.eval(x).map(Value::StrList)) else {
                continue;
            };
            let resolved = ResolvedSlots::new().with(0, values);
            let Some(rest) = self
                .invert(Operator::Concat, 1, spec, &resolved)
                .and_then(|r| r.filtered(non_empty))
            else {
                continue;
            };
            for right in self.learn_list(&rest, depth - 1) {
                out.push(ListProgram::Concat {
                    left: Box::new(left.clone()),
                    right: Box::new(right),
                });
            }
        }
        out
    }

    /// Separators `c` for which `Split(x, c)` is an acceptable list in
    /// every state.
    fn separators(&self, lists: &DisjunctiveSpec) -> Vec<char> {
        // The grammar only splits `x` itself.
        let Some(input) = self.bind_input(Operator::Split, lists) else {
            return Vec::new();
        };
        self.invert(Operator::Split, 1, lists, &input)
            .map(|seps| seps.common_values().iter().filter_map(Value::as_char).collect())
            .unwrap_or_default()
    }

    fn learn_position(&self, spec: &DisjunctiveSpec) -> Vec<PositionProgram> {
        let mut out = Vec::new();
        for operator in [Operator::AbsPos, Operator::RelPosLeft, Operator::RelPosRight] {
            let Some(input) = self.bind_input(operator, spec) else {
                continue;
            };
            let Some(args) = self.invert(operator, 1, spec, &input) else {
                continue;
            };
            for arg in args.common_values() {
                match (operator, arg) {
                    (Operator::AbsPos, Value::Int(k)) => out.push(PositionProgram::AbsPos { k }),
                    (Operator::RelPosLeft, Value::Pattern(pattern)) => {
                        out.push(PositionProgram::RelPosLeft { pattern })
                    }
                    (Operator::RelPosRight, Value::Pattern(pattern)) => {
                        out.push(PositionProgram::RelPosRight { pattern })
                    }
                    _ => {}
                }
            }
        }
        out.truncate(MAX_POSITION_PROGRAMS);
        out
    }
}
