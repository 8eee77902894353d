//! The dynamic value universe shared by every operator

use crate::node::HtmlNode;
use crate::{SynthError, SynthResult};
use regex::Regex;
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value flowing into or out of an operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Str(String),
    StrList(Vec<String>),
    Char(char),
    Int(i64),
    Pattern(Pattern),
    Node(Arc<HtmlNode>),
    NodeList(Vec<Arc<HtmlNode>>),
}

/// The kind of a [`Value`], used for operator signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Str,
    StrList,
    Char,
    Int,
    Pattern,
    Node,
    NodeList,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::StrList(_) => ValueKind::StrList,
            Value::Char(_) => ValueKind::Char,
            Value::Int(_) => ValueKind::Int,
            Value::Pattern(_) => ValueKind::Pattern,
            Value::Node(_) => ValueKind::Node,
            Value::NodeList(_) => ValueKind::NodeList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Value::StrList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Arc<HtmlNode>> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_node_list(&self) -> Option<&[Arc<HtmlNode>]> {
        match self {
            Value::NodeList(l) => Some(l),
            _ => None,
        }
    }

    /// Read a JSON value as a value of the given kind.
    ///
    /// Characters are one-character strings, patterns are their regex source
    /// and nodes use the [`HtmlNode`] object layout.
    pub fn from_json(kind: ValueKind, json: &serde_json::Value) -> SynthResult<Value> {
        let mismatch = || SynthError::invalid_value(kind.to_string(), json.to_string());
        match kind {
            ValueKind::Str => json
                .as_str()
                .map(|s| Value::Str(s.to_string()))
                .ok_or_else(mismatch),
            ValueKind::StrList => {
                let items = json.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
                    .collect::<SynthResult<Vec<_>>>()
                    .map(Value::StrList)
            }
            ValueKind::Char => {
                let s = json.as_str().ok_or_else(mismatch)?;
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(SynthError::invalid_value(
                        "char",
                        format!("expected exactly one character, got {:?}", s),
                    )),
                }
            }
            ValueKind::Int => json.as_i64().map(Value::Int).ok_or_else(mismatch),
            ValueKind::Pattern => {
                let s = json.as_str().ok_or_else(mismatch)?;
                Pattern::new(s).map(Value::Pattern)
            }
            ValueKind::Node => {
                let node: HtmlNode = serde_json::from_value(json.clone())?;
                Ok(Value::Node(Arc::new(node)))
            }
            ValueKind::NodeList => {
                let nodes: Vec<Arc<HtmlNode>> = serde_json::from_value(json.clone())?;
                Ok(Value::NodeList(nodes))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::StrList(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::Pattern(p) => write!(f, "/{}/", p),
            Value::Node(n) => write!(f, "{}", n),
            Value::NodeList(nodes) => {
                write!(f, "[")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", node)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Str => "string",
            ValueKind::StrList => "string list",
            ValueKind::Char => "char",
            ValueKind::Int => "int",
            ValueKind::Pattern => "pattern",
            ValueKind::Node => "node",
            ValueKind::NodeList => "node list",
        };
        write!(f, "{}", name)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<HtmlNode> for Value {
    fn from(node: HtmlNode) -> Self {
        Value::Node(Arc::new(node))
    }
}

/// A compiled regular expression that compares, hashes and orders by its
/// source text.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> SynthResult<Self> {
        let regex = Regex::new(source).map_err(|e| SynthError::InvalidPattern {
            pattern: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Pattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}
