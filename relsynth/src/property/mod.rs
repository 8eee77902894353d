//! Relational properties: semantics-preserving perturbations of examples
//!
//! A property claims that some change to an input leaves the correct output
//! unchanged. Adding the perturbed examples forces the oracle towards
//! programs that respect the claim.

pub mod set;
pub mod text;
pub mod tree;

pub use set::PropertySet;

use crate::example::Example;
use crate::value::Value;
use crate::{SynthError, SynthResult};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::HashSet;

/// A named perturbation generator.
///
/// Implementations must be pure apart from the generator they are handed,
/// and return a bounded number of variants (possibly none, for inputs the
/// property does not apply to).
pub trait RelationalProperty: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Whether the property has anything to say about this kind of input.
    /// Properties that do not apply to every example are left out of a
    /// search.
    fn applies_to(&self, input: &Value) -> bool {
        let _ = input;
        true
    }

    fn perturb(&self, input: &Value, output: &Value, rng: &mut Pcg64) -> Vec<Example>;
}

/// Ordered registry of properties; positions in it are the indices a
/// [`PropertySet`] refers to.
#[derive(Default)]
pub struct PropertyCatalog {
    properties: Vec<Box<dyn RelationalProperty>>,
}

impl PropertyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in property, tree properties first.
    pub fn standard() -> Self {
        let properties: Vec<Box<dyn RelationalProperty>> = vec![
            Box::new(tree::TagInvariance),
            Box::new(tree::ChildOrderInvariance),
            Box::new(tree::AttributeInvariance),
            Box::new(tree::ExactMatch),
            Box::new(text::PrefixInvariance),
            Box::new(text::SuffixInvariance),
            Box::new(text::WordOrdering),
        ];
        PropertyCatalog { properties }
    }

    pub fn register<P>(&mut self, property: P) -> SynthResult<usize>
    where
        P: RelationalProperty + 'static,
    {
        if self.index_of(property.name()).is_some() {
            return Err(SynthError::configuration(format!(
                "relational property '{}' registered twice",
                property.name()
            )));
        }
        self.properties.push(Box::new(property));
        Ok(self.properties.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn RelationalProperty> {
        self.properties.get(index).map(|p| p.as_ref())
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).map(|p| p.name())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RelationalProperty> {
        self.properties.iter().map(|p| p.as_ref())
    }

    /// Indices of the properties that apply to every example input.
    pub fn applicable_to(&self, examples: &[Example]) -> Vec<usize> {
        (0..self.properties.len())
            .filter(|&i| {
                examples
                    .iter()
                    .all(|e| self.properties[i].applies_to(&e.input))
            })
            .collect()
    }

    /// Look up indices for the given names, in catalog order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> SynthResult<Vec<usize>> {
        let mut indices = names
            .iter()
            .map(|name| {
                self.index_of(name.as_ref())
                    .ok_or_else(|| SynthError::UnknownProperty(name.as_ref().to_string()))
            })
            .collect::<SynthResult<Vec<_>>>()?;
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }

    /// Sorted property names of a set.
    pub fn names(&self, set: &PropertySet) -> Vec<String> {
        let mut names: Vec<String> = set
            .iter()
            .filter_map(|i| self.name(i))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// The examples plus every variant the properties in `set` generate.
    ///
    /// Each example is followed by its variants, property by property in
    /// catalog order, duplicates dropped. The generator is seeded from
    /// `seed` and the set alone, so a set always yields the same examples.
    pub fn perturb(
        &self,
        examples: &[Example],
        set: &PropertySet,
        seed: u64,
        max_variants: usize,
    ) -> Vec<Example> {
        let mut rng = Pcg64::seed_from_u64(seed ^ set.fingerprint());
        let mut seen: HashSet<Example> = HashSet::new();
        let mut out = Vec::new();
        for example in examples {
            if seen.insert(example.clone()) {
                out.push(example.clone());
            }
            for property in set.iter().filter_map(|i| self.get(i)) {
                let variants = property.perturb(&example.input, &example.output, &mut rng);
                for variant in variants.into_iter().take(max_variants) {
                    if seen.insert(variant.clone()) {
                        out.push(variant);
                    }
                }
            }
        }
        out
    }
}
