//! Witness rules for the list-of-strings operators
//!
//! Lists handed to `SelectK`, `SelectRegex` and `TakeFirst` come from
//! `Split(x, c)`, so their rules enumerate the split lists of the input.

use super::pattern::TOKEN_PATTERNS;
use super::registry::InversionContext;
use super::spec::WitnessResult;
use crate::semantics::text;
use crate::value::{Pattern, Value};

/// Separators tried when splitting must leave the input whole.
pub const FALLBACK_SEPARATORS: &[char] = &[' ', ',', ';', ':', '-', '_', '.', '/', '|', '\t', '\n', '@'];

/// Distinct characters of `s` in order of first appearance.
pub(crate) fn distinct_chars(s: &str) -> Vec<char> {
    let mut seen = Vec::new();
    for c in s.chars() {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

/// Every distinct `(separator, Split(x, separator))` pair.
fn split_lists(x: &str) -> Vec<(char, Vec<String>)> {
    distinct_chars(x)
        .into_iter()
        .map(|c| (c, text::split(x, c)))
        .collect()
}

fn push_unique(out: &mut Vec<Value>, value: Value) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// `Split` slot 0: strings that split back into the required list, joined
/// with a character of `x` or a fallback separator.
pub fn split_source(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let mut pool = input.as_str().map(distinct_chars).unwrap_or_default();
        let extra: Vec<char> = FALLBACK_SEPARATORS
            .iter()
            .copied()
            .filter(|c| !pool.contains(c))
            .collect();
        pool.extend(extra);
        let mut out = Vec::new();
        for list in outputs.iter().filter_map(Value::as_str_list) {
            for &c in &pool {
                let joined = text::join_list(list, c);
                if text::split(&joined, c).as_slice() == list {
                    push_unique(&mut out, Value::Str(joined));
                }
            }
        }
        out
    })
}

/// `Split` slot 1 (after slot 0): separators that cut the resolved string
/// into the required list.
pub fn split_separator(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(s) = ctx.resolved(0, state).and_then(Value::as_str) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for list in outputs.iter().filter_map(Value::as_str_list) {
            for (c, split) in split_lists(s) {
                if split.as_slice() == list {
                    push_unique(&mut out, Value::Char(c));
                }
            }
            if list.len() == 1 && list[0] == s {
                for &c in FALLBACK_SEPARATORS.iter().filter(|c| !s.contains(**c)) {
                    push_unique(&mut out, Value::Char(c));
                }
            }
        }
        out
    })
}

/// Every prefix of a string or node list, shortest first.
pub(crate) fn list_prefixes(value: &Value) -> Vec<Value> {
    match value {
        Value::StrList(items) => (0..=items.len())
            .map(|i| Value::StrList(items[..i].to_vec()))
            .collect(),
        Value::NodeList(items) => (0..=items.len())
            .map(|i| Value::NodeList(items[..i].to_vec()))
            .collect(),
        _ => Vec::new(),
    }
}

fn strip_list_prefix(value: &Value, prefix: &Value) -> Option<Value> {
    match (value, prefix) {
        (Value::StrList(items), Value::StrList(head)) if items.starts_with(head) => {
            Some(Value::StrList(items[head.len()..].to_vec()))
        }
        (Value::NodeList(items), Value::NodeList(head)) if items.starts_with(head) => {
            Some(Value::NodeList(items[head.len()..].to_vec()))
        }
        _ => None,
    }
}

/// `Concat`/`NodeConcat` slot 0: every way to cut the output in two.
pub fn concat_prefix(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, _, outputs| outputs.iter().flat_map(list_prefixes).collect())
}

/// `Concat`/`NodeConcat` slot 1 (after slot 0): what follows the prefix.
pub fn concat_suffix(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(prefix) = ctx.resolved(0, state) else {
            return Vec::new();
        };
        outputs
            .iter()
            .filter_map(|out| strip_list_prefix(out, prefix))
            .collect()
    })
}

/// `SelectK` slot 0: split lists of `x` that contain the selected item.
pub fn select_k_list(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let Some(x) = input.as_str() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for selected in outputs.iter().filter_map(Value::as_str_list) {
            let [item] = selected else { continue };
            for (_, list) in split_lists(x) {
                if list.contains(item) {
                    push_unique(&mut out, Value::StrList(list));
                }
            }
        }
        out
    })
}

/// `SelectK` slot 1 (after slot 0): index of the item, counted from either
/// end.
pub fn select_k_index(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(list) = ctx.resolved(0, state).and_then(Value::as_str_list) else {
            return Vec::new();
        };
        let len = list.len() as i64;
        let mut out = Vec::new();
        for selected in outputs.iter().filter_map(Value::as_str_list) {
            let [item] = selected else { continue };
            for (i, element) in list.iter().enumerate() {
                if element == item {
                    let i = i as i64;
                    push_unique(&mut out, Value::Int(i));
                    push_unique(&mut out, Value::Int(i - len));
                }
            }
        }
        out
    })
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|n| rest.any(|h| h == n))
}

/// `SelectRegex` slot 0: split lists of `x` holding the output in order.
pub fn select_regex_list(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let Some(x) = input.as_str() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for selected in outputs.iter().filter_map(Value::as_str_list) {
            if selected.is_empty() {
                continue;
            }
            for (_, list) in split_lists(x) {
                if is_subsequence(selected, &list) {
                    push_unique(&mut out, Value::StrList(list));
                }
            }
        }
        out
    })
}

/// `SelectRegex` slot 1 (after slot 0): token patterns that filter the
/// resolved list down to the output.
pub fn select_regex_pattern(ctx: &InversionContext<'_>) -> WitnessResult {
    let tokens: Vec<Pattern> = TOKEN_PATTERNS
        .iter()
        .filter_map(|source| Pattern::new(source).ok())
        .collect();
    ctx.per_state(|state, _, outputs| {
        let Some(list) = ctx.resolved(0, state).and_then(Value::as_str_list) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for selected in outputs.iter().filter_map(Value::as_str_list) {
            for token in &tokens {
                if text::select_regex(list, token).as_slice() == selected {
                    push_unique(&mut out, Value::Pattern(token.clone()));
                }
            }
        }
        out
    })
}

/// `TakeFirst` slot 0: the singleton list, plus split lists of `x` that
/// start with the output.
pub fn take_first_list(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, outputs| {
        let mut out = Vec::new();
        for y in outputs.iter().filter_map(Value::as_str) {
            push_unique(&mut out, Value::StrList(vec![y.to_string()]));
            let Some(x) = input.as_str() else { continue };
            for (_, list) in split_lists(x) {
                if list.len() > 1 && list[0] == y {
                    push_unique(&mut out, Value::StrList(list));
                }
            }
        }
        out
    })
}

/// Cut points beyond which only the full split of a string is offered.
const MAX_GROUPED_CUTS: usize = 9;

/// Every way to glue adjacent segments back together with `c`, starting
/// with the full split. Each grouping joins back into the original string.
fn groupings(segments: &[String], c: char) -> Vec<Vec<String>> {
    let cuts = segments.len().saturating_sub(1);
    if cuts > MAX_GROUPED_CUTS {
        return vec![segments.to_vec()];
    }
    let glue = c.to_string();
    (0..1u32 << cuts)
        .rev()
        .map(|mask| {
            let mut list = Vec::new();
            let mut current = segments[0].clone();
            for (i, segment) in segments[1..].iter().enumerate() {
                if mask & (1 << i) != 0 {
                    list.push(std::mem::take(&mut current));
                } else {
                    current.push_str(&glue);
                }
                current.push_str(segment);
            }
            list.push(current);
            list
        })
        .collect()
}

/// `JoinList` slot 0: lists that join back into the output with one of its
/// characters, in every grouping of the segments, plus the output as a
/// one-element list. An empty output is also the join of the empty list.
pub fn join_list(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, _, outputs| {
        let mut out = Vec::new();
        for y in outputs.iter().filter_map(Value::as_str) {
            push_unique(&mut out, Value::StrList(vec![y.to_string()]));
            if y.is_empty() {
                push_unique(&mut out, Value::StrList(Vec::new()));
            }
            for c in distinct_chars(y) {
                for list in groupings(&text::split(y, c), c) {
                    push_unique(&mut out, Value::StrList(list));
                }
            }
        }
        out
    })
}

/// `JoinList` slot 1 (after slot 0): separators that glue the resolved list
/// into the output. A list of fewer than two elements accepts any fallback
/// separator.
pub fn join_separator(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(list) = ctx.resolved(0, state).and_then(Value::as_str_list) else {
            return Vec::new();
        };
        let mut pool: Vec<char> = Vec::new();
        match list {
            [] | [_] => pool.extend(FALLBACK_SEPARATORS),
            [first, ..] => {
                for y in outputs.iter().filter_map(Value::as_str) {
                    if let Some(c) = y.get(first.len()..).and_then(|rest| rest.chars().next()) {
                        pool.push(c);
                    }
                }
            }
        }
        let mut out = Vec::new();
        for c in pool {
            let joined = text::join_list(list, c);
            if outputs.iter().any(|y| y.as_str() == Some(joined.as_str())) {
                push_unique(&mut out, Value::Char(c));
            }
        }
        out
    })
}
