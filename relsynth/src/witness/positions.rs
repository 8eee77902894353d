//! Witness rules for position and substring operators

use super::memo::Memo;
use super::pattern::{Boundary, PatternSearch};
use super::registry::{InversionContext, WitnessRule};
use super::spec::WitnessResult;
use crate::semantics::text;
use crate::value::{Pattern, Value};

/// Slot 0 of every position operator: the string being indexed is the
/// example input itself.
pub fn input_binding(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, input, _| match input {
        Value::Str(_) => vec![input.clone()],
        _ => Vec::new(),
    })
}

fn resolved_string<'a>(ctx: &InversionContext<'a>, state: usize) -> Option<&'a str> {
    ctx.resolved(0, state).and_then(Value::as_str)
}

/// `AbsPos` slot 1 (after slot 0): `k = pos + 1` counting from the start and
/// `k = pos - len - 1` counting from the end.
pub fn abs_pos_index(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(s) = resolved_string(ctx, state) else {
            return Vec::new();
        };
        let len = s.len() as i64;
        let mut out = Vec::new();
        for pos in outputs.iter().filter_map(Value::as_int) {
            let (Some(from_start), Some(from_end)) = (
                pos.checked_add(1),
                pos.checked_sub(len).and_then(|k| k.checked_sub(1)),
            ) else {
                continue;
            };
            if text::abs_pos(s, from_start) != Some(pos) {
                continue;
            }
            out.push(Value::Int(from_start));
            out.push(Value::Int(from_end));
        }
        out
    })
}

/// `RelPosLeft`/`RelPosRight` slot 1: patterns found by [`PatternSearch`],
/// cached per `(string, position)`.
pub struct RelPosPattern {
    boundary: Boundary,
    search: PatternSearch,
    cache: Memo<(String, usize), Vec<Pattern>>,
}

impl RelPosPattern {
    pub fn new(boundary: Boundary, search: PatternSearch) -> Self {
        RelPosPattern {
            boundary,
            search,
            cache: Memo::new(),
        }
    }

    pub fn cache_hits(&self) -> usize {
        self.cache.hits()
    }
}

impl WitnessRule for RelPosPattern {
    fn invert(&self, ctx: &InversionContext<'_>) -> WitnessResult {
        ctx.per_state(|state, _, outputs| {
            let Some(s) = resolved_string(ctx, state) else {
                return Vec::new();
            };
            let mut out = Vec::new();
            for pos in outputs.iter().filter_map(Value::as_int) {
                let Ok(pos) = usize::try_from(pos) else { continue };
                let key = (s.to_string(), pos);
                let found = self
                    .cache
                    .get_or_compute(&key, || self.search.find(s, pos, self.boundary));
                out.extend(found.iter().cloned().map(Value::Pattern));
            }
            out
        })
    }
}

/// `SubstringPP`/`SubstringPL` slot 1 (after slot 0): every start offset of
/// the output in the string.
pub fn substring_start(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let Some(s) = resolved_string(ctx, state) else {
            return Vec::new();
        };
        outputs
            .iter()
            .filter_map(Value::as_str)
            .flat_map(|y| text::occurrences(s, y))
            .map(|start| Value::Int(start as i64))
            .collect()
    })
}

/// `SubstringPP` slot 2 (after slots 0 and 1): start plus output length,
/// provided the output actually sits at that start.
pub fn substring_end(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|state, _, outputs| {
        let (Some(s), Some(start)) = (
            resolved_string(ctx, state),
            ctx.resolved(1, state).and_then(Value::as_int),
        ) else {
            return Vec::new();
        };
        let Some(rest) = usize::try_from(start).ok().and_then(|i| s.get(i..)) else {
            return Vec::new();
        };
        outputs
            .iter()
            .filter_map(Value::as_str)
            .filter(|y| rest.starts_with(*y))
            .map(|y| Value::Int(start + y.len() as i64))
            .collect()
    })
}

/// `SubstringPL` slot 2: the output length.
pub fn substring_length(ctx: &InversionContext<'_>) -> WitnessResult {
    ctx.per_state(|_, _, outputs| {
        outputs
            .iter()
            .filter_map(Value::as_str)
            .map(|y| Value::Int(y.len() as i64))
            .collect()
    })
}
