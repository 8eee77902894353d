//! Programs of the substring domain
//!
//! ```text
//! S := TakeFirst(L) | JoinList(L, c) | SubstringPP(x, P, P) | SubstringPL(x, P, n)
//! L := SelectK(Split(x, c), k) | SelectRegex(Split(x, c), r) | Concat(L, L)
//! P := AbsPos(x, k) | RelPosLeft(x, r) | RelPosRight(x, r)
//! ```

use crate::semantics::text;
use crate::value::Pattern;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StringProgram {
    TakeFirst { list: ListProgram },
    JoinList { list: ListProgram, separator: char },
    SubstringPP { start: PositionProgram, end: PositionProgram },
    SubstringPL { start: PositionProgram, len: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListProgram {
    SelectK { separator: char, k: i64 },
    SelectRegex { separator: char, pattern: Pattern },
    Concat { left: Box<ListProgram>, right: Box<ListProgram> },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PositionProgram {
    AbsPos { k: i64 },
    RelPosLeft { pattern: Pattern },
    RelPosRight { pattern: Pattern },
}

impl StringProgram {
    pub fn eval(&self, x: &str) -> Option<String> {
        match self {
            StringProgram::TakeFirst { list } => text::take_first(&list.eval(x)?),
            StringProgram::JoinList { list, separator } => {
                Some(text::join_list(&list.eval(x)?, *separator))
            }
            StringProgram::SubstringPP { start, end } => {
                text::substring_pp(x, start.eval(x)?, end.eval(x)?)
            }
            StringProgram::SubstringPL { start, len } => text::substring_pl(x, start.eval(x)?, *len),
        }
    }
}

impl ListProgram {
    pub fn eval(&self, x: &str) -> Option<Vec<String>> {
        match self {
            ListProgram::SelectK { separator, k } => text::select_k(&text::split(x, *separator), *k),
            ListProgram::SelectRegex { separator, pattern } => {
                Some(text::select_regex(&text::split(x, *separator), pattern))
            }
            ListProgram::Concat { left, right } => {
                Some(text::concat(&left.eval(x)?, &right.eval(x)?))
            }
        }
    }

    pub fn concat_depth(&self) -> usize {
        match self {
            ListProgram::Concat { left, right } => 1 + left.concat_depth().max(right.concat_depth()),
            _ => 0,
        }
    }
}

impl PositionProgram {
    pub fn eval(&self, x: &str) -> Option<i64> {
        match self {
            PositionProgram::AbsPos { k } => text::abs_pos(x, *k),
            PositionProgram::RelPosLeft { pattern } => text::rel_pos_left(x, pattern),
            PositionProgram::RelPosRight { pattern } => text::rel_pos_right(x, pattern),
        }
    }
}

impl fmt::Display for StringProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringProgram::TakeFirst { list } => write!(f, "TakeFirst({})", list),
            StringProgram::JoinList { list, separator } => {
                write!(f, "JoinList({}, {:?})", list, separator)
            }
            StringProgram::SubstringPP { start, end } => {
                write!(f, "SubstringPP(x, {}, {})", start, end)
            }
            StringProgram::SubstringPL { start, len } => {
                write!(f, "SubstringPL(x, {}, {})", start, len)
            }
        }
    }
}

impl fmt::Display for ListProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListProgram::SelectK { separator, k } => {
                write!(f, "SelectK(Split(x, {:?}), {})", separator, k)
            }
            ListProgram::SelectRegex { separator, pattern } => {
                write!(f, "SelectRegex(Split(x, {:?}), /{}/)", separator, pattern)
            }
            ListProgram::Concat { left, right } => write!(f, "Concat({}, {})", left, right),
        }
    }
}

impl fmt::Display for PositionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionProgram::AbsPos { k } => write!(f, "AbsPos(x, {})", k),
            PositionProgram::RelPosLeft { pattern } => write!(f, "RelPosLeft(x, /{}/)", pattern),
            PositionProgram::RelPosRight { pattern } => write!(f, "RelPosRight(x, /{}/)", pattern),
        }
    }
}
