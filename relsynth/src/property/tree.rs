//! Properties that perturb the structure of an input tree

use super::RelationalProperty;
use crate::example::Example;
use crate::node::HtmlNode;
use crate::value::Value;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg64;
use std::sync::Arc;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const CONTAINER_TAGS: &[&str] = &["div", "span", "p"];
const CONTAINER_REPLACEMENTS: &[&str] = &["div", "span", "p", "strong", "li"];

fn rewritten(root: &HtmlNode, output: &Value, edit: &mut dyn FnMut(&mut HtmlNode)) -> Example {
    Example {
        input: Value::Node(Arc::new(root.rewrite(edit))),
        output: output.clone(),
    }
}

/// Headings swap among themselves and generic containers swap for other
/// inline or block containers.
pub struct TagInvariance;

impl TagInvariance {
    const VARIANTS: usize = 10;
}

impl RelationalProperty for TagInvariance {
    fn name(&self) -> &str {
        "tag-invariant"
    }

    fn description(&self) -> &str {
        "renames headings and generic containers"
    }

    fn applies_to(&self, input: &Value) -> bool {
        input.as_node().is_some()
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let Some(root) = input.as_node() else {
            return Vec::new();
        };
        (0..Self::VARIANTS)
            .map(|_| {
                rewritten(root, output, &mut |node| {
                    let pool = if HEADING_TAGS.contains(&node.name.as_str()) {
                        HEADING_TAGS
                    } else if CONTAINER_TAGS.contains(&node.name.as_str()) {
                        CONTAINER_REPLACEMENTS
                    } else {
                        return;
                    };
                    if let Some(tag) = pool.choose(rng) {
                        node.name = tag.to_string();
                    }
                })
            })
            .collect()
    }
}

/// Children may appear in any order.
pub struct ChildOrderInvariance;

impl ChildOrderInvariance {
    const VARIANTS: usize = 2;
}

impl RelationalProperty for ChildOrderInvariance {
    fn name(&self) -> &str {
        "child-order-invariant"
    }

    fn description(&self) -> &str {
        "shuffles the children of every node"
    }

    fn applies_to(&self, input: &Value) -> bool {
        input.as_node().is_some()
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let Some(root) = input.as_node() else {
            return Vec::new();
        };
        (0..Self::VARIANTS)
            .map(|_| rewritten(root, output, &mut |node| node.children.shuffle(rng)))
            .collect()
    }
}

/// No single attribute decides the output.
pub struct AttributeInvariance;

impl RelationalProperty for AttributeInvariance {
    fn name(&self) -> &str {
        "attribute-invariant"
    }

    fn description(&self) -> &str {
        "drops one random attribute from every node"
    }

    fn applies_to(&self, input: &Value) -> bool {
        input.as_node().is_some()
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example> {
        let Some(root) = input.as_node() else {
            return Vec::new();
        };
        vec![rewritten(root, output, &mut |node| {
            if node.attributes.is_empty() {
                return;
            }
            let victim = rng.gen_range(0..node.attributes.len());
            if let Some(name) = node.attributes.keys().nth(victim).cloned() {
                node.attributes.remove(&name);
            }
        })]
    }
}

/// Nodes whose text is not part of the output list are irrelevant.
pub struct ExactMatch;

impl RelationalProperty for ExactMatch {
    fn name(&self) -> &str {
        "exact-match"
    }

    fn description(&self) -> &str {
        "prunes children whose text is not in the output list"
    }

    fn applies_to(&self, input: &Value) -> bool {
        input.as_node().is_some()
    }

    fn perturb(&self, input: &Value, output: &Value, _rng: &mut Pcg64) -> Vec<Example> {
        let (Some(root), Some(texts)) = (input.as_node(), output.as_str_list()) else {
            return Vec::new();
        };
        let pruned = rewritten(root, output, &mut |node| {
            node.children.retain(|child| match child.text.as_deref() {
                Some(text) if !text.is_empty() => texts.iter().any(|t| t == text),
                _ => true,
            });
        });
        if pruned.input == *input {
            return Vec::new();
        }
        vec![pruned]
    }
}
