//! String and substring operators
//!
//! Positions are byte offsets into the string and must fall on character
//! boundaries.

use crate::value::Pattern;

pub fn split(s: &str, separator: char) -> Vec<String> {
    s.split(separator).map(str::to_string).collect()
}

pub fn concat(left: &[String], right: &[String]) -> Vec<String> {
    left.iter().chain(right).cloned().collect()
}

/// Map `k` onto `0..len`; negative values count from the end (`-1` is the
/// last element).
pub fn resolve_index(len: usize, k: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if k >= 0 { k } else { len + k };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

pub fn select_k(list: &[String], k: i64) -> Option<Vec<String>> {
    resolve_index(list.len(), k).map(|i| vec![list[i].clone()])
}

pub fn select_regex(list: &[String], pattern: &Pattern) -> Vec<String> {
    list.iter()
        .filter(|item| pattern.regex().is_match(item))
        .cloned()
        .collect()
}

pub fn take_first(list: &[String]) -> Option<String> {
    list.first().cloned()
}

pub fn join_list(list: &[String], separator: char) -> String {
    let mut buf = [0u8; 4];
    list.join(separator.encode_utf8(&mut buf))
}

/// `k > 0` is the position before the k-th character (1-based), `k < 0`
/// counts from the end so that `-1` is the end of the string.
pub fn abs_pos(s: &str, k: i64) -> Option<i64> {
    let len = i64::try_from(s.len()).ok()?;
    let pos = if k > 0 { k - 1 } else { len + k + 1 };
    checked_position(s, pos)
}

pub fn rel_pos_left(s: &str, pattern: &Pattern) -> Option<i64> {
    let m = pattern.regex().find(s)?;
    i64::try_from(m.start()).ok()
}

pub fn rel_pos_right(s: &str, pattern: &Pattern) -> Option<i64> {
    let m = pattern.regex().find(s)?;
    i64::try_from(m.end()).ok()
}

pub fn substring_pp(s: &str, start: i64, end: i64) -> Option<String> {
    let start = usize::try_from(checked_position(s, start)?).ok()?;
    let end = usize::try_from(checked_position(s, end)?).ok()?;
    s.get(start..end).map(str::to_string)
}

pub fn substring_pl(s: &str, start: i64, len: i64) -> Option<String> {
    substring_pp(s, start, start.checked_add(len)?)
}

/// Byte offsets of every (possibly overlapping) occurrence of `needle`.
pub fn occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(haystack.len()))
        .filter(|&i| haystack[i..].starts_with(needle))
        .collect()
}

fn checked_position(s: &str, pos: i64) -> Option<i64> {
    let index = usize::try_from(pos).ok()?;
    if index <= s.len() && s.is_char_boundary(index) {
        Some(pos)
    } else {
        None
    }
}
