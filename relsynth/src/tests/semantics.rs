use crate::semantics::{text, tree, Domain, Operator};
use crate::value::{Pattern, Value};
use crate::{HtmlNode, SynthError};
use std::str::FromStr;
use std::sync::Arc;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_split_keeps_empty_fields() {
    assert_eq!(text::split("a,,b", ','), strings(&["a", "", "b"]));
    assert_eq!(text::split("", ','), strings(&[""]));
}

#[test]
fn test_select_k_counts_from_both_ends() {
    let list = strings(&["a", "b", "c"]);
    assert_eq!(text::select_k(&list, 0), Some(strings(&["a"])));
    assert_eq!(text::select_k(&list, -1), Some(strings(&["c"])));
    assert_eq!(text::select_k(&list, 3), None);
    assert_eq!(text::select_k(&list, -4), None);
}

#[test]
fn test_select_regex_keeps_order() {
    let list = strings(&["1270", "adffss", "99"]);
    let digits = Pattern::new(r"\d+").unwrap();
    assert_eq!(text::select_regex(&list, &digits), strings(&["1270", "99"]));
}

#[test]
fn test_abs_pos_conventions() {
    // Positive k is 1-based from the start, -1 is the end of the string.
    assert_eq!(text::abs_pos("abcd", 1), Some(0));
    assert_eq!(text::abs_pos("abcd", 5), Some(4));
    assert_eq!(text::abs_pos("abcd", -1), Some(4));
    assert_eq!(text::abs_pos("abcd", -5), Some(0));
    assert_eq!(text::abs_pos("abcd", 6), None);
    assert_eq!(text::abs_pos("abcd", 0), None);
}

#[test]
fn test_rel_pos_uses_first_match() {
    let digits = Pattern::new(r"\d+").unwrap();
    assert_eq!(text::rel_pos_left("ab 12 34", &digits), Some(3));
    assert_eq!(text::rel_pos_right("ab 12 34", &digits), Some(5));
    assert_eq!(text::rel_pos_left("none", &digits), None);
}

#[test]
fn test_substring_rejects_bad_ranges() {
    assert_eq!(text::substring_pp("hello", 1, 3), Some("el".to_string()));
    assert_eq!(text::substring_pp("hello", 3, 1), None);
    assert_eq!(text::substring_pp("hello", 0, 6), None);
    assert_eq!(text::substring_pl("hello", 2, 3), Some("llo".to_string()));
    // 'é' is two bytes; offset 1 is inside it.
    assert_eq!(text::substring_pp("é", 1, 2), None);
}

#[test]
fn test_occurrences_overlap() {
    assert_eq!(text::occurrences("aaa", "aa"), vec![0, 1]);
    assert_eq!(text::occurrences("abc", "x"), Vec::<usize>::new());
}

#[test]
fn test_join_inverts_split() {
    let list = strings(&["1270", "adffss"]);
    assert_eq!(text::join_list(&list, ' '), "1270 adffss");
}

fn sample_tree() -> Arc<HtmlNode> {
    Arc::new(
        HtmlNode::element("div")
            .with_child(
                HtmlNode::element("p")
                    .with_attr("class", "x")
                    .with_text("one")
                    .with_child(HtmlNode::element("span").with_attr("class", "y").with_text("two")),
            )
            .with_child(HtmlNode::element("p").with_text("three")),
    )
}

#[test]
fn test_tree_operators() {
    let root = sample_tree();
    assert_eq!(tree::children(&root).len(), 2);
    assert_eq!(root.descendants().len(), 3);
    assert_eq!(tree::descendants_with_tag(&root, "p").len(), 2);
    assert_eq!(tree::descendants_with_attr(&root, "class").len(), 2);
    let x = tree::descendants_with_attr_value(&root, "class", "x");
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].text.as_deref(), Some("one"));
}

#[test]
fn test_nodes_to_texts_defaults_to_empty() {
    let nodes = vec![
        Arc::new(HtmlNode::element("b").with_text("bold")),
        Arc::new(HtmlNode::element("br")),
    ];
    assert_eq!(tree::nodes_to_texts(&nodes), strings(&["bold", ""]));
}

#[test]
fn test_apply_checks_arity_and_kinds() {
    let split = Operator::Split.apply(&[Value::from("a b"), Value::Char(' ')]);
    assert_eq!(split, Some(Value::StrList(strings(&["a", "b"]))));
    assert_eq!(Operator::Split.apply(&[Value::from("a b")]), None);
    assert_eq!(Operator::Split.apply(&[Value::Int(1), Value::Char(' ')]), None);
}

#[test]
fn test_operator_names_round_trip() {
    for op in Operator::ALL {
        assert_eq!(Operator::from_str(op.name()).unwrap(), op);
        assert_eq!(op.params().len(), op.arity());
    }
    assert_eq!(Operator::from_str("substringpp").unwrap(), Operator::SubstringPP);
    assert!(matches!(
        Operator::from_str("Explode"),
        Err(SynthError::UnknownOperator(name)) if name == "Explode"
    ));
}

#[test]
fn test_operator_domains() {
    assert_eq!(Operator::Split.domain(), Domain::Text);
    assert_eq!(Operator::DescendantsWithTag.domain(), Domain::Tree);
    assert_eq!(Operator::NodesToTexts.domain(), Domain::Tree);
}
