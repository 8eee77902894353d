//! A minimal HTML-like tree

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An element with a name, attributes, optional text and ordered children.
///
/// Nodes compare structurally, so two separately built trees with the same
/// shape are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HtmlNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<HtmlNode>>,
}

impl HtmlNode {
    pub fn element(name: impl Into<String>) -> Self {
        HtmlNode {
            name: name.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: HtmlNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// All nodes below this one, in pre-order.
    pub fn descendants(&self) -> Vec<Arc<HtmlNode>> {
        let mut out = Vec::new();
        let mut stack: Vec<&Arc<HtmlNode>> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(Arc::clone(node));
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// The node itself followed by its descendants.
    pub fn subtree(self: &Arc<Self>) -> Vec<Arc<HtmlNode>> {
        let mut out = vec![Arc::clone(self)];
        out.extend(self.descendants());
        out
    }

    /// Rebuild the tree, applying `edit` to each node before its children
    /// are visited. Edits may reorder or drop children.
    pub fn rewrite(&self, edit: &mut dyn FnMut(&mut HtmlNode)) -> HtmlNode {
        let mut current = Rewrite::open(self, edit);
        let mut parents: Vec<Rewrite> = Vec::new();
        loop {
            if let Some(child) = current.pending.next() {
                let frame = Rewrite::open(&child, edit);
                parents.push(std::mem::replace(&mut current, frame));
                continue;
            }
            let mut finished = current.node;
            finished.children = current.done;
            match parents.pop() {
                Some(mut parent) => {
                    parent.done.push(Arc::new(finished));
                    current = parent;
                }
                None => return finished,
            }
        }
    }
}

/// A node being rebuilt: its edited copy, the children still to visit and
/// the children already rebuilt.
struct Rewrite {
    node: HtmlNode,
    pending: std::vec::IntoIter<Arc<HtmlNode>>,
    done: Vec<Arc<HtmlNode>>,
}

impl Rewrite {
    fn open(source: &HtmlNode, edit: &mut dyn FnMut(&mut HtmlNode)) -> Self {
        let mut node = source.clone();
        edit(&mut node);
        let pending = std::mem::take(&mut node.children).into_iter();
        Rewrite {
            node,
            pending,
            done: Vec::new(),
        }
    }
}

// Unlinks deep chains one level at a time so dropping them cannot exhaust
// the stack.
impl Drop for HtmlNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child) {
                pending.append(&mut node.children);
            }
        }
    }
}

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {}={:?}", name, value)?;
        }
        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.name)
    }
}
