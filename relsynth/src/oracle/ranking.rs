use super::program::{ListProgram, PositionProgram, StringProgram};
use super::tree_program::{NodeProgram, TreeProgram};
use super::Ranking;

/// Product-of-features ranking for substring and tree programs.
///
/// Small indices beat large ones, token filters beat indices further than
/// one step from either end, and every concatenation costs a little. On
/// trees, attribute/value filters beat tags, direct children beat a full
/// descent, and the `style` attribute is almost never what selects nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRanking;

impl DefaultRanking {
    const CONCAT: f64 = 0.9;
    const SELECT_REGEX: f64 = 0.8;
    const JOIN: f64 = 0.5;
    const SUBSTRING: f64 = 0.8;
    const FIXED_LENGTH: f64 = 0.5;

    const NODE_CONCAT: f64 = 0.5;
    const CHILDREN: f64 = 0.8;
    const DESCENDANTS: f64 = 0.7;
    const SINGLE: f64 = 0.7;
    const WITH_TAG: f64 = 0.8;
    const WITH_ATTR: f64 = 0.6;
    const WITH_ATTR_VALUE: f64 = 0.9;
    const STYLE: f64 = 0.01;

    fn index(k: i64) -> f64 {
        1.0 / (1.0 + k.unsigned_abs() as f64)
    }

    fn pattern(source: &str) -> f64 {
        1.0 / (1.0 + source.len() as f64 / 8.0)
    }

    fn list(program: &ListProgram) -> f64 {
        match program {
            ListProgram::SelectK { k, .. } => Self::index(*k),
            ListProgram::SelectRegex { .. } => Self::SELECT_REGEX,
            ListProgram::Concat { left, right } => Self::CONCAT * Self::list(left) * Self::list(right),
        }
    }

    fn nodes(program: &NodeProgram) -> f64 {
        match program {
            NodeProgram::Children => Self::CHILDREN,
            NodeProgram::Descendants => Self::DESCENDANTS,
            NodeProgram::Single => Self::SINGLE,
            NodeProgram::DescendantsWithTag { .. } => Self::WITH_TAG,
            NodeProgram::DescendantsWithAttr { .. } => Self::WITH_ATTR,
            NodeProgram::DescendantsWithAttrValue { attr, .. } if attr == "style" => Self::STYLE,
            NodeProgram::DescendantsWithAttrValue { .. } => Self::WITH_ATTR_VALUE,
            NodeProgram::NodeConcat { left, right } => {
                Self::NODE_CONCAT * Self::nodes(left) * Self::nodes(right)
            }
        }
    }

    fn position(program: &PositionProgram) -> f64 {
        match program {
            PositionProgram::AbsPos { k } => Self::index(*k),
            PositionProgram::RelPosLeft { pattern } | PositionProgram::RelPosRight { pattern } => {
                Self::pattern(pattern.source())
            }
        }
    }
}

impl Ranking<StringProgram> for DefaultRanking {
    fn score(&self, program: &StringProgram) -> f64 {
        match program {
            StringProgram::TakeFirst { list } => Self::list(list),
            StringProgram::JoinList { list, .. } => Self::JOIN * Self::list(list),
            StringProgram::SubstringPP { start, end } => {
                Self::SUBSTRING * Self::position(start) * Self::position(end)
            }
            StringProgram::SubstringPL { start, .. } => {
                Self::SUBSTRING * Self::FIXED_LENGTH * Self::position(start)
            }
        }
    }
}

impl Ranking<TreeProgram> for DefaultRanking {
    fn score(&self, program: &TreeProgram) -> f64 {
        Self::nodes(&program.nodes)
    }
}
