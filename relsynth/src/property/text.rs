//! Properties that perturb the text around an extracted substring
//!
//! They apply to plain string inputs and to the text of every node of a
//! tree input. The output must be the extracted string.

use super::RelationalProperty;
use crate::example::Example;
use crate::value::Value;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg64;
use std::sync::Arc;

fn has_text(input: &Value) -> bool {
    matches!(input, Value::Str(_) | Value::Node(_))
}

fn scramble(len: usize, rng: &mut Pcg64) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// Apply `edit` to a string input or to each node text of a tree input.
fn edit_texts(input: &Value, edit: &mut dyn FnMut(&str) -> String) -> Option<Value> {
    match input {
        Value::Str(s) => Some(Value::Str(edit(s))),
        Value::Node(root) => {
            let tree = root.rewrite(&mut |node| {
                if let Some(text) = node.text.take() {
                    node.text = Some(edit(&text));
                }
            });
            Some(Value::Node(Arc::new(tree)))
        }
        _ => None,
    }
}

/// What comes before the first occurrence of the output does not matter.
pub struct PrefixInvariance;

impl PrefixInvariance {
    const VARIANTS: usize = 10;
}

impl RelationalProperty for PrefixInvariance {
    fn name(&self) -> &str {
        "prefix-invariant"
    }

    fn description(&self) -> &str {
        "scrambles the text before the extracted substring"
    }

    fn applies_to(&self, input: &Value) -> bool {
        has_text(input)
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let Some(needle) = output.as_str() else {
            return Vec::new();
        };
        (0..Self::VARIANTS)
            .filter_map(|_| {
                let changed = edit_texts(input, &mut |text| match text.find(needle) {
                    Some(at) => format!("{}{}", scramble(text[..at].chars().count(), rng), &text[at..]),
                    None => text.to_string(),
                })?;
                Some(Example {
                    input: changed,
                    output: output.clone(),
                })
            })
            .collect()
    }
}

/// What comes after the first occurrence of the output does not matter.
pub struct SuffixInvariance;

impl SuffixInvariance {
    const VARIANTS: usize = 10;
}

impl RelationalProperty for SuffixInvariance {
    fn name(&self) -> &str {
        "suffix-invariant"
    }

    fn description(&self) -> &str {
        "scrambles the text after the extracted substring"
    }

    fn applies_to(&self, input: &Value) -> bool {
        has_text(input)
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let Some(needle) = output.as_str() else {
            return Vec::new();
        };
        (0..Self::VARIANTS)
            .filter_map(|_| {
                let changed = edit_texts(input, &mut |text| match text.find(needle) {
                    Some(at) => {
                        let end = at + needle.len();
                        format!("{}{}", &text[..end], scramble(text[end..].chars().count(), rng))
                    }
                    None => text.to_string(),
                })?;
                Some(Example {
                    input: changed,
                    output: output.clone(),
                })
            })
            .collect()
    }
}

/// Space-separated words may come in any order.
pub struct WordOrdering;

impl WordOrdering {
    const VARIANTS: usize = 2;
    const SHUFFLE_ATTEMPTS: usize = 8;
}

impl RelationalProperty for WordOrdering {
    fn name(&self) -> &str {
        "word-ordering"
    }

    fn description(&self) -> &str {
        "shuffles space-separated words"
    }

    fn applies_to(&self, input: &Value) -> bool {
        has_text(input)
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let mut out = Vec::new();
        for _ in 0..Self::VARIANTS {
            let Some(changed) = edit_texts(input, &mut |text| {
                let mut words: Vec<&str> = text.split(' ').collect();
                for _ in 0..Self::SHUFFLE_ATTEMPTS {
                    words.shuffle(rng);
                    let candidate = words.join(" ");
                    if candidate != text {
                        return candidate;
                    }
                }
                text.to_string()
            }) else {
                continue;
            };
            if changed != *input {
                out.push(Example {
                    input: changed,
                    output: output.clone(),
                });
            }
        }
        out
    }
}
