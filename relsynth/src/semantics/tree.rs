//! Tree operators over [`HtmlNode`]

use crate::node::HtmlNode;
use std::sync::Arc;

pub fn children(node: &HtmlNode) -> Vec<Arc<HtmlNode>> {
    node.children.clone()
}

pub fn descendants_with_tag(node: &HtmlNode, tag: &str) -> Vec<Arc<HtmlNode>> {
    node.descendants()
        .into_iter()
        .filter(|n| n.name == tag)
        .collect()
}

pub fn descendants_with_attr(node: &HtmlNode, attr: &str) -> Vec<Arc<HtmlNode>> {
    node.descendants()
        .into_iter()
        .filter(|n| n.attributes.contains_key(attr))
        .collect()
}

pub fn descendants_with_attr_value(node: &HtmlNode, attr: &str, value: &str) -> Vec<Arc<HtmlNode>> {
    node.descendants()
        .into_iter()
        .filter(|n| n.attributes.get(attr).map(String::as_str) == Some(value))
        .collect()
}

pub fn node_concat(left: &[Arc<HtmlNode>], right: &[Arc<HtmlNode>]) -> Vec<Arc<HtmlNode>> {
    left.iter().chain(right).cloned().collect()
}

/// Text of each node; nodes without text contribute an empty string.
pub fn nodes_to_texts(nodes: &[Arc<HtmlNode>]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.text.clone().unwrap_or_default())
        .collect()
}
