//! Breadth-first search for patterns that pin down a position
//!
//! A pattern identifies a position when it matches the input exactly once
//! and the match starts (left positions) or ends (right positions) there.

use crate::value::Pattern;
use regex::Regex;
use std::collections::HashSet;

pub const PHONE_PATTERN: &str = r"\(?\d{3}\)?[\s.-]\d{3}[\s.-]\d{4}";

/// Whole-token patterns used to filter split lists.
pub const TOKEN_PATTERNS: &[&str] = &[
    r"[a-zA-Z]+",
    r"\d+",
    r"\s+",
    r"(\n|\r|\r\n)",
    PHONE_PATTERN,
];

/// Pieces appended at each level of the search.
pub const COMPOSITION_PARTS: &[&str] = &[r"[a-zA-Z]", r"\d", r"\s", "$", "+", PHONE_PATTERN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct PatternSearch {
    depth: usize,
    frontier_limit: usize,
}

impl Default for PatternSearch {
    fn default() -> Self {
        PatternSearch {
            depth: 5,
            frontier_limit: 64,
        }
    }
}

impl PatternSearch {
    pub fn new(depth: usize, frontier_limit: usize) -> Self {
        PatternSearch {
            depth,
            frontier_limit: frontier_limit.max(1),
        }
    }

    /// Patterns whose unique match has its `boundary` at byte `position`,
    /// shortest compositions first.
    pub fn find(&self, text: &str, position: usize, boundary: Boundary) -> Vec<Pattern> {
        if position > text.len() || !text.is_char_boundary(position) {
            return Vec::new();
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut accepted: Vec<Pattern> = Vec::new();
        let mut frontier: Vec<String> = Vec::new();

        let seeds = COMPOSITION_PARTS
            .iter()
            .map(|part| part.to_string())
            .chain(literal_seeds(text, position, boundary));
        for seed in seeds {
            self.consider(seed, text, position, boundary, &mut seen, &mut accepted, &mut frontier);
        }

        for _ in 1..self.depth {
            if frontier.is_empty() {
                break;
            }
            let bases = std::mem::take(&mut frontier);
            for base in &bases {
                for part in COMPOSITION_PARTS {
                    let candidate = format!("{}{}", base, part);
                    self.consider(
                        candidate,
                        text,
                        position,
                        boundary,
                        &mut seen,
                        &mut accepted,
                        &mut frontier,
                    );
                }
            }
        }
        accepted
    }

    #[allow(clippy::too_many_arguments)]
    fn consider(
        &self,
        candidate: String,
        text: &str,
        position: usize,
        boundary: Boundary,
        seen: &mut HashSet<String>,
        accepted: &mut Vec<Pattern>,
        frontier: &mut Vec<String>,
    ) {
        if !seen.insert(candidate.clone()) {
            return;
        }
        let Ok(regex) = Regex::new(&candidate) else {
            return;
        };
        let matches: Vec<_> = regex.find_iter(text).take(2).collect();
        match matches.as_slice() {
            [] => {}
            [only] => {
                let at = match boundary {
                    Boundary::Start => only.start(),
                    Boundary::End => only.end(),
                };
                if at == position {
                    if let Ok(pattern) = Pattern::new(&candidate) {
                        accepted.push(pattern);
                    }
                } else if frontier.len() < self.frontier_limit {
                    frontier.push(candidate);
                }
            }
            _ => {
                if frontier.len() < self.frontier_limit {
                    frontier.push(candidate);
                }
            }
        }
    }
}

/// Escaped literal substrings touching the position: starting there for
/// left boundaries, ending there for right boundaries.
fn literal_seeds(text: &str, position: usize, boundary: Boundary) -> Vec<String> {
    let cuts = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));
    match boundary {
        Boundary::Start => cuts
            .filter(|&end| end > position)
            .map(|end| regex::escape(&text[position..end]))
            .collect(),
        Boundary::End => cuts
            .filter(|&start| start < position)
            .map(|start| regex::escape(&text[start..position]))
            .collect(),
    }
}
