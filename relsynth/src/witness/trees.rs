//! Witness rules for tree operators
//!
//! Source-node rules search the example tree for a node that reproduces the
//! required list. The filtered-descendant searches are memoized per
//! `(tree, tag/attribute)` since every candidate node has to be evaluated.
//! Filter keys (tags, attributes, values) are read off the output nodes.

use super::memo::Memo;
use super::registry::{InversionContext, WitnessRule};
use super::spec::WitnessResult;
use crate::node::HtmlNode;
use crate::semantics::tree;
use crate::value::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

type NodeLists = Vec<(Arc<HtmlNode>, Vec<Arc<HtmlNode>>)>;

fn tree_nodes(input: &Value) -> Vec<Arc<HtmlNode>> {
    match input {
        Value::Node(root) => root.subtree(),
        _ => Vec::new(),
    }
}

fn push_node(out: &mut Vec<Value>, node: &Arc<HtmlNode>) {
    let value = Value::Node(Arc::clone(node));
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Nodes of the input tree for which `f(node)` is one of the outputs.
fn matching_sources<F>(input: &Value, outputs: &[Value], f: F) -> Vec<Value>
where
    F: Fn(&HtmlNode) -> Vec<Arc<HtmlNode>>,
{
    let mut out = Vec::new();
    for node in tree_nodes(input) {
        let produced = f(node.as_ref());
        if outputs
            .iter()
            .filter_map(Value::as_node_list)
            .any(|list| list == produced.as_slice())
        {
            push_node(&mut out, &node);
        }
    }
    out
}

/// `Children` slot 0.
pub fn children_source(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| matching_sources(input, outputs, tree::children))
}

/// `Descendants` slot 0.
pub fn descendants_source(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| matching_sources(input, outputs, HtmlNode::descendants))
}

/// `Single` slot 0: the lone element, when it occurs in the input tree.
pub fn single_source(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let nodes = tree_nodes(input);
        let mut out = Vec::new();
        for list in outputs.iter().filter_map(Value::as_node_list) {
            if let [only] = list {
                if nodes.contains(only) {
                    push_node(&mut out, only);
                }
            }
        }
        out
    })
}

/// The filter a filtered-descendant operator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescendantFilter {
    Tag,
    Attr,
    AttrValue,
}

impl DescendantFilter {
    /// Filter keys the output list itself admits: its single tag, its
    /// shared attributes, or its shared attribute/value pairs. The second
    /// component is empty except for `AttrValue`.
    fn keys(&self, list: &[Arc<HtmlNode>]) -> Vec<(String, String)> {
        match self {
            DescendantFilter::Tag => {
                let names: BTreeSet<&str> = list.iter().map(|n| n.name.as_str()).collect();
                match names.into_iter().collect::<Vec<_>>().as_slice() {
                    [only] => vec![(only.to_string(), String::new())],
                    _ => Vec::new(),
                }
            }
            DescendantFilter::Attr => shared_attributes(list)
                .into_iter()
                .map(|name| (name, String::new()))
                .collect(),
            DescendantFilter::AttrValue => shared_attribute_values(list),
        }
    }

    fn apply(&self, node: &HtmlNode, first: &str, second: &str) -> Vec<Arc<HtmlNode>> {
        match self {
            DescendantFilter::Tag => tree::descendants_with_tag(node, first),
            DescendantFilter::Attr => tree::descendants_with_attr(node, first),
            DescendantFilter::AttrValue => tree::descendants_with_attr_value(node, first, second),
        }
    }
}

/// Attribute names present on every node of the list.
fn shared_attributes(list: &[Arc<HtmlNode>]) -> Vec<String> {
    let Some((first, rest)) = list.split_first() else {
        return Vec::new();
    };
    first
        .attributes
        .keys()
        .filter(|name| rest.iter().all(|n| n.attributes.contains_key(*name)))
        .cloned()
        .collect()
}

/// Attributes present on every node with the same value everywhere.
fn shared_attribute_values(list: &[Arc<HtmlNode>]) -> Vec<(String, String)> {
    let Some((first, rest)) = list.split_first() else {
        return Vec::new();
    };
    first
        .attributes
        .iter()
        .filter(|(name, value)| rest.iter().all(|n| n.attributes.get(*name) == Some(*value)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Slot 0 of the three filtered-descendant operators.
///
/// For one tree and one filter key, the filtered descendants of every node
/// are computed once and reused across inversions. An empty output is
/// infeasible: it would admit every node lacking the key.
pub struct FilteredSource {
    filter: DescendantFilter,
    cache: Memo<(Arc<HtmlNode>, String, String), NodeLists>,
}

impl FilteredSource {
    pub fn new(filter: DescendantFilter) -> Self {
        FilteredSource {
            filter,
            cache: Memo::new(),
        }
    }

    pub fn cache_hits(&self) -> usize {
        self.cache.hits()
    }
}

impl WitnessRule for FilteredSource {
    fn invert(&self, ctx: &InversionContext<'_>) -> WitnessResult {
        ctx.per_state(|_, input, outputs| {
            let Some(root) = input.as_node() else {
                return Vec::new();
            };
            let mut out = Vec::new();
            for list in outputs.iter().filter_map(Value::as_node_list) {
                for (first, second) in self.filter.keys(list) {
                    let key = (Arc::clone(root), first, second);
                    let lists = self.cache.get_or_compute(&key, || {
                        root.subtree()
                            .into_iter()
                            .map(|node| {
                                let produced = self.filter.apply(&node, &key.1, &key.2);
                                (node, produced)
                            })
                            .collect()
                    });
                    for (node, produced) in lists.iter() {
                        if produced.as_slice() == list {
                            push_node(&mut out, node);
                        }
                    }
                }
            }
            out
        })
    }
}

/// Slot 1 of the filtered-descendant operators (after slot 0): the tag or
/// attribute that makes the resolved node produce the output.
pub fn filter_key(filter: DescendantFilter) -> impl Fn(&InversionContext<'_>) -> WitnessResult + Send + Sync {
    move |ctx: &InversionContext<'_>| {
        ctx.per_state(|state, _, outputs| {
            let Some(node) = ctx.resolved(0, state).and_then(Value::as_node) else {
                return Vec::new();
            };
            let mut out = Vec::new();
            for list in outputs.iter().filter_map(Value::as_node_list) {
                for (first, second) in filter.keys(list) {
                    let value = Value::Str(first.clone());
                    if filter.apply(node, &first, &second).as_slice() == list
                        && !out.contains(&value)
                    {
                        out.push(value);
                    }
                }
            }
            out
        })
    }
}

/// `DescendantsWithAttrValue` slot 2 (after slots 0 and 1).
pub fn attribute_value(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let (Some(node), Some(attr)) = (
            ctx.resolved(0, state).and_then(Value::as_node),
            ctx.resolved(1, state).and_then(Value::as_str),
        ) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for list in outputs.iter().filter_map(Value::as_node_list) {
            for (name, shared) in shared_attribute_values(list) {
                if name != attr {
                    continue;
                }
                let produced = tree::descendants_with_attr_value(node, &name, &shared);
                let value = Value::Str(shared);
                if produced.as_slice() == list && !out.contains(&value) {
                    out.push(value);
                }
            }
        }
        out
    })
}

/// `NodesToTexts` slot 0: for each text, the first node of the input tree
/// carrying it.
pub fn nodes_for_texts(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let nodes = tree_nodes(input);
        let mut out = Vec::new();
        for texts in outputs.iter().filter_map(Value::as_str_list) {
            let found: Option<Vec<Arc<HtmlNode>>> = texts
                .iter()
                .map(|t| {
                    nodes
                        .iter()
                        .find(|n| n.text.as_deref().unwrap_or_default() == t)
                        .cloned()
                })
                .collect();
            if let Some(list) = found {
                let value = Value::NodeList(list);
                if !out.contains(&value) {
                    out.push(value);
                }
            }
        }
        out
    })
}
