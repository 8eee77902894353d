use crate::{SynthError, SynthResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Knobs for one synthesis run.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Budget for each oracle call made during the lattice search
    /// Typical call: ~10-500ms, Limit: 60s
    pub oracle_timeout_ms: u64,

    /// Budget for the final synthesis with the chosen property combination
    pub final_timeout_ms: u64,

    /// How long a cancelled worker gets to wind down before it is detached
    pub cancel_grace_ms: u64,

    /// Cap on the variants one property may add per example
    pub max_variants_per_property: usize,

    /// Composition levels explored by the pattern search
    /// Real usage: 1-3 levels, Limit: 5
    pub pattern_search_depth: usize,

    /// Candidates carried from one pattern-search level to the next
    pub pattern_frontier_limit: usize,

    /// Nesting bound for list concatenation in the reference oracle
    pub max_concat_depth: usize,

    /// Seed for perturbation and for the seeded tie-break
    pub seed: u64,

    pub tie_break: TieBreak,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            oracle_timeout_ms: 60_000,
            final_timeout_ms: 60_000,
            cancel_grace_ms: 100,
            max_variants_per_property: 10,
            pattern_search_depth: 5,
            pattern_frontier_limit: 64,
            max_concat_depth: 3,
            seed: 0,
            tie_break: TieBreak::default(),
        }
    }
}

impl SynthesisConfig {
    /// Create a new SynthesisConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(source: &str) -> SynthResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.oracle_timeout_ms == 0 || self.final_timeout_ms == 0 {
            return Err(SynthError::configuration(
                "oracle timeouts must be greater than zero",
            ));
        }
        if self.pattern_frontier_limit == 0 {
            return Err(SynthError::configuration(
                "pattern_frontier_limit must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn final_timeout(&self) -> Duration {
        Duration::from_millis(self.final_timeout_ms)
    }

    pub fn cancel_grace(&self) -> Duration {
        Duration::from_millis(self.cancel_grace_ms)
    }
}

/// How the lattice search picks one combination from the final frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Smallest sorted list of property names wins
    #[default]
    Lexicographic,
    /// Highest top-program score wins, ties broken lexicographically
    OracleScore,
    /// Seeded choice over the lexicographically sorted frontier
    Seeded,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieBreak::Lexicographic => "lexicographic",
            TieBreak::OracleScore => "oracle-score",
            TieBreak::Seeded => "seeded",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TieBreak {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicographic" => Ok(TieBreak::Lexicographic),
            "oracle-score" => Ok(TieBreak::OracleScore),
            "seeded" => Ok(TieBreak::Seeded),
            other => Err(SynthError::configuration(format!(
                "unknown tie-break policy '{}' (expected lexicographic, oracle-score or seeded)",
                other
            ))),
        }
    }
}
