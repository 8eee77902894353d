//! Programs of the tree domain
//!
//! ```text
//! T := NodesToTexts(N)
//! N := Children(x) | Descendants(x) | Single(x)
//!    | DescendantsWithTag(x, t) | DescendantsWithAttr(x, a)
//!    | DescendantsWithAttrValue(x, a, v) | NodeConcat(N, N)
//! ```

use crate::node::HtmlNode;
use crate::semantics::tree;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Texts of the nodes a [`NodeProgram`] selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TreeProgram {
    pub nodes: NodeProgram,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NodeProgram {
    Children,
    Descendants,
    Single,
    DescendantsWithTag { tag: String },
    DescendantsWithAttr { attr: String },
    DescendantsWithAttrValue { attr: String, value: String },
    NodeConcat { left: Box<NodeProgram>, right: Box<NodeProgram> },
}

impl TreeProgram {
    pub fn new(nodes: NodeProgram) -> Self {
        TreeProgram { nodes }
    }

    pub fn eval(&self, x: &Arc<HtmlNode>) -> Vec<String> {
        tree::nodes_to_texts(&self.nodes.eval(x))
    }
}

impl NodeProgram {
    pub fn eval(&self, x: &Arc<HtmlNode>) -> Vec<Arc<HtmlNode>> {
        match self {
            NodeProgram::Children => tree::children(x),
            NodeProgram::Descendants => x.descendants(),
            NodeProgram::Single => vec![Arc::clone(x)],
            NodeProgram::DescendantsWithTag { tag } => tree::descendants_with_tag(x, tag),
            NodeProgram::DescendantsWithAttr { attr } => tree::descendants_with_attr(x, attr),
            NodeProgram::DescendantsWithAttrValue { attr, value } => {
                tree::descendants_with_attr_value(x, attr, value)
            }
            NodeProgram::NodeConcat { left, right } => {
                tree::node_concat(&left.eval(x), &right.eval(x))
            }
        }
    }

    pub fn concat_depth(&self) -> usize {
        match self {
            NodeProgram::NodeConcat { left, right } => {
                1 + left.concat_depth().max(right.concat_depth())
            }
            _ => 0,
        }
    }
}

impl fmt::Display for TreeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodesToTexts({})", self.nodes)
    }
}

impl fmt::Display for NodeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeProgram::Children => write!(f, "Children(x)"),
            NodeProgram::Descendants => write!(f, "Descendants(x)"),
            NodeProgram::Single => write!(f, "Single(x)"),
            NodeProgram::DescendantsWithTag { tag } => write!(f, "DescendantsWithTag(x, {:?})", tag),
            NodeProgram::DescendantsWithAttr { attr } => {
                write!(f, "DescendantsWithAttr(x, {:?})", attr)
            }
            NodeProgram::DescendantsWithAttrValue { attr, value } => {
                write!(f, "DescendantsWithAttrValue(x, {:?}, {:?})", attr, value)
            }
            NodeProgram::NodeConcat { left, right } => write!(f, "NodeConcat({}, {})", left, right),
        }
    }
}
