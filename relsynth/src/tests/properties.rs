use crate::property::text::{PrefixInvariance, SuffixInvariance, WordOrdering};
use crate::property::tree::{AttributeInvariance, ChildOrderInvariance, ExactMatch, TagInvariance};
use crate::property::{PropertyCatalog, PropertySet, RelationalProperty};
use crate::{Example, HtmlNode, SynthError, Value};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::sync::Arc;

fn rng() -> Pcg64 {
    Pcg64::seed_from_u64(7)
}

fn tree() -> HtmlNode {
    HtmlNode::element("div")
        .with_child(HtmlNode::element("h2").with_attr("id", "t").with_text("Title"))
        .with_child(
            HtmlNode::element("p")
                .with_attr("class", "body")
                .with_attr("lang", "en")
                .with_text("Text"),
        )
        .with_child(HtmlNode::element("span").with_text("aside"))
}

#[test]
fn test_standard_catalog_order() {
    let catalog = PropertyCatalog::standard();
    let names: Vec<&str> = catalog.iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec![
            "tag-invariant",
            "child-order-invariant",
            "attribute-invariant",
            "exact-match",
            "prefix-invariant",
            "suffix-invariant",
            "word-ordering",
        ]
    );
    assert!(catalog.iter().all(|p| !p.description().is_empty()));
}

#[test]
fn test_register_rejects_duplicate_names() {
    let mut catalog = PropertyCatalog::new();
    assert_eq!(catalog.register(WordOrdering).unwrap(), 0);
    let err = catalog.register(WordOrdering).unwrap_err();
    assert!(matches!(err, SynthError::Configuration(_)));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_select_by_name() {
    let catalog = PropertyCatalog::standard();
    let indices = catalog
        .select(&["word-ordering", "tag-invariant", "word-ordering"])
        .unwrap();
    assert_eq!(indices, vec![0, 6]);

    let err = catalog.select(&["no-such-property"]).unwrap_err();
    assert!(matches!(err, SynthError::UnknownProperty(name) if name == "no-such-property"));
}

#[test]
fn test_tree_properties_skip_string_inputs() {
    let catalog = PropertyCatalog::standard();
    let examples = vec![Example::new("1270 adffss", "1270")];
    assert_eq!(catalog.applicable_to(&examples), vec![4, 5, 6]);

    let examples = vec![Example::new(tree(), Value::StrList(vec!["Title".to_string()]))];
    assert_eq!(catalog.applicable_to(&examples).len(), 7);
}

#[test]
fn test_prefix_invariance_scrambles_only_the_prefix() {
    let input = Value::from("1270 adffss");
    let output = Value::from("adffss");
    let variants = PrefixInvariance.perturb(&input, &output, &mut rng());
    assert_eq!(variants.len(), 10);
    for variant in variants {
        let changed = variant.input.as_str().unwrap();
        assert_eq!(changed.len(), 11);
        assert!(changed.ends_with("adffss"), "suffix lost in {:?}", changed);
        assert_eq!(variant.output, output);
    }
}

#[test]
fn test_suffix_invariance_keeps_the_output() {
    let input = Value::from("asdf 1271 adffss");
    let output = Value::from("1271");
    for variant in SuffixInvariance.perturb(&input, &output, &mut rng()) {
        let changed = variant.input.as_str().unwrap();
        assert!(changed.starts_with("asdf 1271"), "prefix lost in {:?}", changed);
        assert_eq!(changed.len(), 16);
    }
}

#[test]
fn test_text_properties_edit_node_texts() {
    let input = Value::from(HtmlNode::element("p").with_text("id 42 end"));
    let output = Value::from("42");
    let variants = PrefixInvariance.perturb(&input, &output, &mut rng());
    assert!(!variants.is_empty());
    for variant in variants {
        let text = variant.input.as_node().and_then(|n| n.text.clone()).unwrap_or_default();
        assert!(text.ends_with("42 end"));
    }
}

#[test]
fn test_word_ordering_permutes_words() {
    let input = Value::from("a b c d");
    let output = Value::from("a");
    let variants = WordOrdering.perturb(&input, &output, &mut rng());
    assert!(!variants.is_empty());
    for variant in variants {
        assert_ne!(variant.input, input);
        let mut words: Vec<&str> = variant.input.as_str().unwrap().split(' ').collect();
        words.sort_unstable();
        assert_eq!(words, vec!["a", "b", "c", "d"]);
    }

    // A single word has no other order.
    assert!(WordOrdering
        .perturb(&Value::from("solo"), &output, &mut rng())
        .is_empty());
}

#[test]
fn test_tag_invariance_keeps_tag_families() {
    let input = Value::from(tree());
    let output = Value::StrList(vec!["Title".to_string()]);
    let variants = TagInvariance.perturb(&input, &output, &mut rng());
    assert_eq!(variants.len(), 10);
    for variant in variants {
        let root = variant.input.as_node().unwrap();
        assert!(["div", "span", "p", "strong", "li"].contains(&root.name.as_str()));
        assert!(root.children[0].name.starts_with('h'));
        assert_eq!(root.children[0].text.as_deref(), Some("Title"));
    }
}

#[test]
fn test_child_order_invariance_keeps_children() {
    let input = Value::from(tree());
    let output = Value::StrList(Vec::new());
    for variant in ChildOrderInvariance.perturb(&input, &output, &mut rng()) {
        let mut texts: Vec<String> = variant
            .input
            .as_node()
            .unwrap()
            .children
            .iter()
            .filter_map(|c| c.text.clone())
            .collect();
        texts.sort();
        assert_eq!(texts, vec!["Text", "Title", "aside"]);
    }
}

#[test]
fn test_attribute_invariance_drops_one_per_node() {
    let input = Value::from(tree());
    let output = Value::StrList(Vec::new());
    let variants = AttributeInvariance.perturb(&input, &output, &mut rng());
    assert_eq!(variants.len(), 1);
    let root = variants[0].input.as_node().unwrap();
    assert!(root.children[0].attributes.is_empty());
    assert_eq!(root.children[1].attributes.len(), 1);
}

#[test]
fn test_exact_match_prunes_unrelated_children() {
    let input = Value::from(tree());
    let output = Value::StrList(vec!["Title".to_string(), "Text".to_string()]);
    let variants = ExactMatch.perturb(&input, &output, &mut rng());
    assert_eq!(variants.len(), 1);
    let root = variants[0].input.as_node().unwrap();
    assert_eq!(root.children.len(), 2);
    assert!(root.children.iter().all(|c| c.text.as_deref() != Some("aside")));

    let everything = Value::StrList(vec!["Title".into(), "Text".into(), "aside".into()]);
    assert!(ExactMatch.perturb(&input, &everything, &mut rng()).is_empty());
}

#[test]
fn test_tree_properties_ignore_strings() {
    let input = Value::from("plain");
    let output = Value::from("p");
    assert!(TagInvariance.perturb(&input, &output, &mut rng()).is_empty());
    assert!(!TagInvariance.applies_to(&input));
    assert!(PrefixInvariance.applies_to(&input));
    assert!(PrefixInvariance.applies_to(&Value::Node(Arc::new(tree()))));
}

#[test]
fn test_catalog_perturbation_is_deterministic() {
    let catalog = PropertyCatalog::standard();
    let examples = vec![
        Example::new("1270 adffss", "1270"),
        Example::new("asdf 1271 adffss", "1271"),
    ];
    let set: PropertySet = [4, 5].into_iter().collect();

    let first = catalog.perturb(&examples, &set, 42, 10);
    let second = catalog.perturb(&examples, &set, 42, 10);
    assert_eq!(first, second);
    assert_eq!(first[0], examples[0]);
    assert!(first.contains(&examples[1]));

    let other_seed = catalog.perturb(&examples, &set, 43, 10);
    assert_ne!(first, other_seed);
}

#[test]
fn test_catalog_perturbation_caps_variants() {
    let catalog = PropertyCatalog::standard();
    let examples = vec![Example::new("xx 1270 adffss", "1270")];
    let set = PropertySet::singleton(4);
    let augmented = catalog.perturb(&examples, &set, 0, 3);
    assert!(augmented.len() <= 4);
    assert_eq!(augmented[0], examples[0]);
    assert_eq!(catalog.perturb(&examples, &PropertySet::empty(), 0, 3), examples);
}

#[test]
fn test_property_set_basics() {
    let set = PropertySet::singleton(2).with(0);
    assert_eq!(set.to_string(), "{0, 2}");
    assert!(set.contains(2));
    assert_eq!(set.len(), 2);
    assert_ne!(set.fingerprint(), PropertySet::singleton(2).fingerprint());
    assert_eq!(set.fingerprint(), PropertySet::singleton(0).with(2).fingerprint());
    assert_ne!(PropertySet::empty().fingerprint(), PropertySet::singleton(0).fingerprint());
}
