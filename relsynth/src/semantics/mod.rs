//! Forward semantics of the operator vocabulary
//!
//! Witness rules are checked against these functions: every candidate a rule
//! proposes must reproduce the required output when fed back through
//! [`Operator::apply`].

pub mod text;
pub mod tree;

use crate::value::{Value, ValueKind};
use crate::SynthError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which kind of example input an operator's rules read as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Text,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Operator {
    Split,
    Concat,
    SelectK,
    SelectRegex,
    TakeFirst,
    JoinList,
    AbsPos,
    RelPosLeft,
    RelPosRight,
    SubstringPP,
    SubstringPL,
    Children,
    Descendants,
    Single,
    DescendantsWithTag,
    DescendantsWithAttr,
    DescendantsWithAttrValue,
    NodeConcat,
    NodesToTexts,
}

impl Operator {
    pub const ALL: [Operator; 19] = [
        Operator::Split,
        Operator::Concat,
        Operator::SelectK,
        Operator::SelectRegex,
        Operator::TakeFirst,
        Operator::JoinList,
        Operator::AbsPos,
        Operator::RelPosLeft,
        Operator::RelPosRight,
        Operator::SubstringPP,
        Operator::SubstringPL,
        Operator::Children,
        Operator::Descendants,
        Operator::Single,
        Operator::DescendantsWithTag,
        Operator::DescendantsWithAttr,
        Operator::DescendantsWithAttrValue,
        Operator::NodeConcat,
        Operator::NodesToTexts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Split => "Split",
            Operator::Concat => "Concat",
            Operator::SelectK => "SelectK",
            Operator::SelectRegex => "SelectRegex",
            Operator::TakeFirst => "TakeFirst",
            Operator::JoinList => "JoinList",
            Operator::AbsPos => "AbsPos",
            Operator::RelPosLeft => "RelPosLeft",
            Operator::RelPosRight => "RelPosRight",
            Operator::SubstringPP => "SubstringPP",
            Operator::SubstringPL => "SubstringPL",
            Operator::Children => "Children",
            Operator::Descendants => "Descendants",
            Operator::Single => "Single",
            Operator::DescendantsWithTag => "DescendantsWithTag",
            Operator::DescendantsWithAttr => "DescendantsWithAttr",
            Operator::DescendantsWithAttrValue => "DescendantsWithAttrValue",
            Operator::NodeConcat => "NodeConcat",
            Operator::NodesToTexts => "NodesToTexts",
        }
    }

    /// Argument kinds, in slot order.
    pub fn params(&self) -> &'static [ValueKind] {
        use ValueKind::*;
        match self {
            Operator::Split => &[Str, Char],
            Operator::Concat => &[StrList, StrList],
            Operator::SelectK => &[StrList, Int],
            Operator::SelectRegex => &[StrList, Pattern],
            Operator::TakeFirst => &[StrList],
            Operator::JoinList => &[StrList, Char],
            Operator::AbsPos => &[Str, Int],
            Operator::RelPosLeft | Operator::RelPosRight => &[Str, Pattern],
            Operator::SubstringPP | Operator::SubstringPL => &[Str, Int, Int],
            Operator::Children | Operator::Descendants | Operator::Single => &[Node],
            Operator::DescendantsWithTag | Operator::DescendantsWithAttr => &[Node, Str],
            Operator::DescendantsWithAttrValue => &[Node, Str, Str],
            Operator::NodeConcat => &[NodeList, NodeList],
            Operator::NodesToTexts => &[NodeList],
        }
    }

    pub fn arity(&self) -> usize {
        self.params().len()
    }

    pub fn result(&self) -> ValueKind {
        match self {
            Operator::Split
            | Operator::Concat
            | Operator::SelectK
            | Operator::SelectRegex
            | Operator::NodesToTexts => ValueKind::StrList,
            Operator::TakeFirst
            | Operator::JoinList
            | Operator::SubstringPP
            | Operator::SubstringPL => ValueKind::Str,
            Operator::AbsPos | Operator::RelPosLeft | Operator::RelPosRight => ValueKind::Int,
            Operator::Children
            | Operator::Descendants
            | Operator::Single
            | Operator::DescendantsWithTag
            | Operator::DescendantsWithAttr
            | Operator::DescendantsWithAttrValue
            | Operator::NodeConcat => ValueKind::NodeList,
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Operator::Children
            | Operator::Descendants
            | Operator::Single
            | Operator::DescendantsWithTag
            | Operator::DescendantsWithAttr
            | Operator::DescendantsWithAttrValue
            | Operator::NodeConcat
            | Operator::NodesToTexts => Domain::Tree,
            _ => Domain::Text,
        }
    }

    /// Evaluate the operator. `None` means the arguments are outside its
    /// domain (wrong kinds, index out of range, position off a boundary).
    pub fn apply(&self, args: &[Value]) -> Option<Value> {
        if args.len() != self.arity() {
            return None;
        }
        match self {
            Operator::Split => Some(Value::StrList(text::split(
                args[0].as_str()?,
                args[1].as_char()?,
            ))),
            Operator::Concat => Some(Value::StrList(text::concat(
                args[0].as_str_list()?,
                args[1].as_str_list()?,
            ))),
            Operator::SelectK => {
                text::select_k(args[0].as_str_list()?, args[1].as_int()?).map(Value::StrList)
            }
            Operator::SelectRegex => Some(Value::StrList(text::select_regex(
                args[0].as_str_list()?,
                args[1].as_pattern()?,
            ))),
            Operator::TakeFirst => text::take_first(args[0].as_str_list()?).map(Value::Str),
            Operator::JoinList => Some(Value::Str(text::join_list(
                args[0].as_str_list()?,
                args[1].as_char()?,
            ))),
            Operator::AbsPos => text::abs_pos(args[0].as_str()?, args[1].as_int()?).map(Value::Int),
            Operator::RelPosLeft => {
                text::rel_pos_left(args[0].as_str()?, args[1].as_pattern()?).map(Value::Int)
            }
            Operator::RelPosRight => {
                text::rel_pos_right(args[0].as_str()?, args[1].as_pattern()?).map(Value::Int)
            }
            Operator::SubstringPP => text::substring_pp(
                args[0].as_str()?,
                args[1].as_int()?,
                args[2].as_int()?,
            )
            .map(Value::Str),
            Operator::SubstringPL => text::substring_pl(
                args[0].as_str()?,
                args[1].as_int()?,
                args[2].as_int()?,
            )
            .map(Value::Str),
            Operator::Children => Some(Value::NodeList(tree::children(args[0].as_node()?))),
            Operator::Descendants => Some(Value::NodeList(args[0].as_node()?.descendants())),
            Operator::Single => Some(Value::NodeList(vec![args[0].as_node()?.clone()])),
            Operator::DescendantsWithTag => Some(Value::NodeList(tree::descendants_with_tag(
                args[0].as_node()?,
                args[1].as_str()?,
            ))),
            Operator::DescendantsWithAttr => Some(Value::NodeList(tree::descendants_with_attr(
                args[0].as_node()?,
                args[1].as_str()?,
            ))),
            Operator::DescendantsWithAttrValue => {
                Some(Value::NodeList(tree::descendants_with_attr_value(
                    args[0].as_node()?,
                    args[1].as_str()?,
                    args[2].as_str()?,
                )))
            }
            Operator::NodeConcat => Some(Value::NodeList(tree::node_concat(
                args[0].as_node_list()?,
                args[1].as_node_list()?,
            ))),
            Operator::NodesToTexts => Some(Value::StrList(tree::nodes_to_texts(
                args[0].as_node_list()?,
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operator {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SynthError::UnknownOperator(s.to_string()))
    }
}
