//! Backward constraint propagation
//!
//! A witness rule answers: given the output an operator must produce for
//! each input state, which values may its argument in one slot take? Rules
//! are registered per `(operator, slot)` and may depend on earlier slots
//! whose values have already been fixed.

pub mod memo;
pub mod pattern;
pub mod positions;
pub mod registry;
pub mod spec;
pub mod strings;
pub mod trees;

pub use pattern::{Boundary, PatternSearch};
pub use registry::{InversionContext, WitnessRegistry, WitnessRule};
pub use spec::{DisjunctiveSpec, ResolvedSlots, WitnessResult};

use crate::semantics::Operator;
use crate::{SynthResult, SynthesisConfig};
use trees::DescendantFilter;

impl WitnessRegistry {
    /// Registry holding the rules for every built-in operator.
    pub fn standard(config: &SynthesisConfig) -> SynthResult<Self> {
        let search = PatternSearch::new(config.pattern_search_depth, config.pattern_frontier_limit);
        let mut registry = WitnessRegistry::new();

        registry.register(Operator::Split, 0, &[], strings::split_source)?;
        registry.register(Operator::Split, 1, &[0], strings::split_separator)?;
        registry.register(Operator::Concat, 0, &[], strings::concat_prefix)?;
        registry.register(Operator::Concat, 1, &[0], strings::concat_suffix)?;
        registry.register(Operator::SelectK, 0, &[], strings::select_k_list)?;
        registry.register(Operator::SelectK, 1, &[0], strings::select_k_index)?;
        registry.register(Operator::SelectRegex, 0, &[], strings::select_regex_list)?;
        registry.register(Operator::SelectRegex, 1, &[0], strings::select_regex_pattern)?;
        registry.register(Operator::TakeFirst, 0, &[], strings::take_first_list)?;
        registry.register(Operator::JoinList, 0, &[], strings::join_list)?;
        registry.register(Operator::JoinList, 1, &[0], strings::join_separator)?;

        for op in [
            Operator::AbsPos,
            Operator::RelPosLeft,
            Operator::RelPosRight,
            Operator::SubstringPP,
            Operator::SubstringPL,
        ] {
            registry.register(op, 0, &[], positions::input_binding)?;
        }
        registry.register(Operator::AbsPos, 1, &[0], positions::abs_pos_index)?;
        registry.register(
            Operator::RelPosLeft,
            1,
            &[0],
            positions::RelPosPattern::new(Boundary::Start, search.clone()),
        )?;
        registry.register(
            Operator::RelPosRight,
            1,
            &[0],
            positions::RelPosPattern::new(Boundary::End, search),
        )?;
        registry.register(Operator::SubstringPP, 1, &[0], positions::substring_start)?;
        registry.register(Operator::SubstringPP, 2, &[0, 1], positions::substring_end)?;
        registry.register(Operator::SubstringPL, 1, &[0], positions::substring_start)?;
        registry.register(Operator::SubstringPL, 2, &[], positions::substring_length)?;

        registry.register(Operator::Children, 0, &[], trees::children_source)?;
        registry.register(Operator::Descendants, 0, &[], trees::descendants_source)?;
        registry.register(Operator::Single, 0, &[], trees::single_source)?;
        for (op, filter) in [
            (Operator::DescendantsWithTag, DescendantFilter::Tag),
            (Operator::DescendantsWithAttr, DescendantFilter::Attr),
            (Operator::DescendantsWithAttrValue, DescendantFilter::AttrValue),
        ] {
            registry.register(op, 0, &[], trees::FilteredSource::new(filter))?;
            registry.register(op, 1, &[0], trees::filter_key(filter))?;
        }
        registry.register(
            Operator::DescendantsWithAttrValue,
            2,
            &[0, 1],
            trees::attribute_value,
        )?;
        registry.register(Operator::NodeConcat, 0, &[], strings::concat_prefix)?;
        registry.register(Operator::NodeConcat, 1, &[0], strings::concat_suffix)?;
        registry.register(Operator::NodesToTexts, 0, &[], trees::nodes_for_texts)?;

        Ok(registry)
    }
}
