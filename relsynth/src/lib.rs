//! # relsynth
//!
//! **Programming by example with witness rules and relational properties**
//!
//! Given a few input/output examples, relsynth searches for a program that
//! reproduces all of them. Two pieces do the work:
//!
//! - **Witness rules** run operators backwards: for a required output they
//!   compute which argument values could have produced it, so a synthesizer
//!   can prune instead of enumerating.
//! - **Relational-property lattice search** adds perturbed examples that a
//!   good program should also satisfy (reordered children, scrambled prefixes,
//!   ...) and finds the largest combination the synthesizer can still honour.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relsynth::{
//!     DefaultRanking, Example, LatticeSearch, PropertyCatalog, SubstringOracle,
//!     SynthResult, SynthesisConfig,
//! };
//!
//! fn main() -> SynthResult<()> {
//!     let config = SynthesisConfig::default();
//!     let oracle = SubstringOracle::new(&config)?;
//!     let search = LatticeSearch::new(oracle, DefaultRanking, PropertyCatalog::standard(), config);
//!
//!     let examples = vec![
//!         Example::new("1270 adffss", "1270"),
//!         Example::new("asdf 1271 adffss", "1271"),
//!     ];
//!     let outcome = search.run(&examples);
//!     if let Some(best) = outcome.programs().and_then(|p| p.top()) {
//!         println!("{}", best.program);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Disjunctive specifications
//! For every input state (an example's position in the batch) a list of
//! acceptable values. Witness rules consume and produce them.
//!
//! ### Oracles
//! Anything implementing [`Oracle`]. Calls are made on worker threads with a
//! budget and a cancellation token; a call that runs out of time counts as
//! infeasible.
//!
//! ### Relational properties
//! Named perturbation generators registered in a [`PropertyCatalog`].

pub mod config;
pub mod error;
pub mod example;
pub mod lattice;
pub mod node;
pub mod oracle;
pub mod property;
pub mod semantics;
pub mod value;
pub mod witness;

pub use config::{SynthesisConfig, TieBreak};
pub use error::SynthError;
pub use example::Example;
pub use lattice::{ConflictTable, LatticeSearch, SearchReport, SynthesisOutcome};
pub use node::HtmlNode;
pub use oracle::{
    DefaultRanking, Oracle, OracleOutcome, ProgramSet, Ranking, StringProgram, SubstringOracle,
    TimedOracle, TreeOracle, TreeProgram,
};
pub use property::{PropertyCatalog, PropertySet, RelationalProperty};
pub use semantics::{Domain, Operator};
pub use value::{Pattern, Value, ValueKind};
pub use witness::{
    DisjunctiveSpec, InversionContext, ResolvedSlots, WitnessRegistry, WitnessResult, WitnessRule,
};

/// Result type for relsynth operations
pub type SynthResult<T> = Result<T, SynthError>;

#[cfg(test)]
mod tests;
