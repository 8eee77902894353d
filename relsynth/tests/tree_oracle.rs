use relsynth::lattice::Phase;
use relsynth::oracle::timed::Deadline;
use relsynth::oracle::NodeProgram;
use relsynth::{
    DefaultRanking, Example, HtmlNode, LatticeSearch, Oracle, PropertyCatalog, SynthesisConfig,
    TreeOracle, TreeProgram, Value,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config() -> SynthesisConfig {
    SynthesisConfig {
        oracle_timeout_ms: 20_000,
        final_timeout_ms: 20_000,
        max_concat_depth: 1,
        ..SynthesisConfig::default()
    }
}

fn oracle() -> TreeOracle {
    TreeOracle::new(&config()).unwrap()
}

fn texts(items: &[&str]) -> Value {
    Value::StrList(items.iter().map(|s| s.to_string()).collect())
}

/// A page with a heading, a list of items and a note.
fn page(title: &str, items: &[&str], note: &str) -> HtmlNode {
    let list = items.iter().fold(HtmlNode::element("ul"), |ul, item| {
        ul.with_child(HtmlNode::element("li").with_attr("class", "item").with_text(*item))
    });
    HtmlNode::element("html")
        .with_child(HtmlNode::element("h1").with_text(title))
        .with_child(list)
        .with_child(HtmlNode::element("div").with_attr("class", "note").with_text(note))
}

fn item_examples() -> Vec<Example> {
    vec![
        Example::new(
            page("Catalog", &["Apples", "Pears"], "Prices vary"),
            texts(&["Apples", "Pears"]),
        ),
        Example::new(
            page("Fruit", &["Plums", "Figs", "Kiwis"], "Seasonal"),
            texts(&["Plums", "Figs", "Kiwis"]),
        ),
    ]
}

fn synthesize(examples: &[Example]) -> Vec<TreeProgram> {
    oracle()
        .synthesize(
            examples,
            &DefaultRanking,
            Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .iter()
        .map(|r| r.program.clone())
        .collect()
}

fn assert_consistent(programs: &[TreeProgram], examples: &[Example]) {
    for program in programs {
        for example in examples {
            let root = example.input.as_node().unwrap();
            assert_eq!(
                Some(program.eval(root).as_slice()),
                example.output.as_str_list(),
                "{} is inconsistent with the examples",
                program
            );
        }
    }
}

#[test]
fn attribute_value_filter_ranks_first() {
    let examples = item_examples();
    let programs = synthesize(&examples);
    assert_consistent(&programs, &examples);
    assert_eq!(
        programs[0].to_string(),
        r#"NodesToTexts(DescendantsWithAttrValue(x, "class", "item"))"#
    );
    assert!(programs.contains(&TreeProgram::new(NodeProgram::DescendantsWithTag {
        tag: "li".to_string()
    })));
    // The note carries a class too, so the bare attribute filter is out.
    assert!(!programs.contains(&TreeProgram::new(NodeProgram::DescendantsWithAttr {
        attr: "class".to_string()
    })));
}

#[test]
fn children_of_the_root_are_learned() {
    let root = HtmlNode::element("parent")
        .with_child(HtmlNode::element("child1").with_text("a"))
        .with_child(HtmlNode::element("child2").with_text("b"));
    let examples = vec![Example::new(root, texts(&["a", "b"]))];
    let programs = synthesize(&examples);
    assert_consistent(&programs, &examples);
    assert!(programs.contains(&TreeProgram::new(NodeProgram::Children)));
}

#[test]
fn heading_and_items_need_a_concatenation() {
    let examples = vec![
        Example::new(
            page("Catalog", &["Apples", "Pears"], "Prices vary"),
            texts(&["Catalog", "Apples", "Pears"]),
        ),
        Example::new(
            page("Fruit", &["Plums"], "Seasonal"),
            texts(&["Fruit", "Plums"]),
        ),
    ];
    let programs = synthesize(&examples);
    assert!(!programs.is_empty());
    assert_consistent(&programs, &examples);
    assert!(programs.iter().all(|p| p.nodes.concat_depth() == 1));

    let fresh = Arc::new(page("Veg", &["Leeks", "Kale"], "Local"));
    assert_eq!(programs[0].eval(&fresh), ["Veg", "Leeks", "Kale"]);
}

#[test]
fn text_inputs_learn_nothing() {
    let programs = synthesize(&[Example::new("a b", texts(&["a"]))]);
    assert!(programs.is_empty());
}

#[test]
fn missing_text_is_infeasible() {
    let examples = vec![Example::new(
        page("Catalog", &["Apples"], "Prices vary"),
        texts(&["Bananas"]),
    )];
    assert!(synthesize(&examples).is_empty());
}

#[test]
fn expired_deadline_learns_nothing() {
    let learned = oracle().learn(
        &item_examples(),
        &CancellationToken::new(),
        Deadline::new(Duration::ZERO),
    );
    assert!(learned.is_empty());
}

#[test]
fn lattice_search_over_tree_properties() {
    let config = config();
    let catalog = PropertyCatalog::standard();
    let candidates = catalog.select(&["tag-invariant", "exact-match"]).unwrap();
    let search = LatticeSearch::new(TreeOracle::new(&config).unwrap(), DefaultRanking, catalog, config);
    let examples = item_examples();

    let outcome = search.run_with(&examples, &candidates);
    assert!(outcome.is_synthesized());
    let report = outcome.report();
    assert_eq!(report.attempts_in(Phase::Singleton).count(), 2);
    assert!(report.applicable.contains(&"tag-invariant".to_string()));
    assert!(report.chosen.contains(&"tag-invariant".to_string()));

    // Renaming the note to an <li> must not pull it into the selection.
    let renamed = HtmlNode::element("html")
        .with_child(
            HtmlNode::element("ul")
                .with_child(HtmlNode::element("li").with_attr("class", "item").with_text("Oats")),
        )
        .with_child(HtmlNode::element("li").with_attr("class", "note").with_text("Dry"));
    let top = outcome
        .programs()
        .and_then(|p| p.top())
        .map(|r| r.program.clone())
        .expect("tag-invariant examples admit a program");
    assert_eq!(top.eval(&Arc::new(renamed)), ["Oats"]);
}
