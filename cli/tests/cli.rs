use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FAST_CONFIG: &str = r#"{
    "oracle_timeout_ms": 20000,
    "final_timeout_ms": 20000,
    "pattern_search_depth": 1,
    "pattern_frontier_limit": 16
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn relsynth() -> Command {
    Command::cargo_bin("relsynth").unwrap()
}

#[test]
fn test_cli_properties_lists_catalog() {
    relsynth()
        .arg("properties")
        .assert()
        .success()
        .stdout(predicate::str::contains("tag-invariant"))
        .stdout(predicate::str::contains("prefix-invariant"))
        .stdout(predicate::str::contains("word-ordering"));
}

#[test]
fn test_cli_operators_lists_slots() {
    relsynth()
        .arg("operators")
        .assert()
        .success()
        .stdout(predicate::str::contains("SubstringPP"))
        .stdout(predicate::str::contains("DescendantsWithAttrValue"))
        .stdout(predicate::str::contains("slot 1 after 0"));
}

#[test]
fn test_cli_invert_split_separator() {
    relsynth()
        .args(["invert", "Split", "1"])
        .args(["--input", r#"["1270 adffss"]"#])
        .args(["--output", r#"[["1270", "adffss"]]"#])
        .args(["--resolved", r#"0=["1270 adffss"]"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split slot 1: feasible"))
        .stdout(predicate::str::contains("' '"));
}

#[test]
fn test_cli_invert_json_output() {
    let assert = relsynth()
        .args(["invert", "Split", "1", "--json"])
        .args(["--input", r#"["1270 adffss"]"#])
        .args(["--output", r#"[["1270", "adffss"]]"#])
        .args(["--resolved", r#"0=["1270 adffss"]"#])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["feasible"], true);
    assert_eq!(json["candidates"]["0"][0]["kind"], "char");
    assert_eq!(json["candidates"]["0"][0]["value"], " ");
}

#[test]
fn test_cli_invert_unresolved_dependency_is_infeasible() {
    relsynth()
        .args(["invert", "Split", "1"])
        .args(["--input", r#"["1270 adffss"]"#])
        .args(["--output", r#"[["1270", "adffss"]]"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("infeasible"));
}

#[test]
fn test_cli_invert_unknown_operator() {
    relsynth()
        .args(["invert", "Explode", "0", "--input", "[]", "--output", "[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown operator 'Explode'"));
}

#[test]
fn test_cli_invert_state_count_mismatch() {
    relsynth()
        .args(["invert", "TakeFirst", "0"])
        .args(["--input", r#"["a", "b"]"#])
        .args(["--output", r#"["a"]"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 state(s)"));
}

#[test]
fn test_cli_synth_plain_examples() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.json", FAST_CONFIG);
    let examples = write(
        &dir,
        "examples.json",
        r#"[
            {"input": "1270 adffss", "output": "1270"},
            {"input": "asdf 1271 adffss", "output": "1271"}
        ]"#,
    );

    relsynth()
        .arg("synth")
        .arg(&examples)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("program(s)"))
        .stdout(predicate::str::contains("oracle calls"));
}

#[test]
fn test_cli_synth_with_properties_as_json() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.json", FAST_CONFIG);
    let examples = write(
        &dir,
        "examples.json",
        r#"[
            {"input": "1270 adffss", "output": "1270"},
            {"input": "asdf 1271 adffss", "output": "1271"}
        ]"#,
    );

    let assert = relsynth()
        .arg("synth")
        .arg(&examples)
        .arg("--config")
        .arg(&config)
        .args(["-p", "prefix-invariant", "-p", "suffix-invariant", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["synthesized"], true);
    let applicable = json["report"]["applicable"].as_array().unwrap();
    assert!(applicable.len() <= 2);
    assert!(!json["programs"].as_array().unwrap().is_empty());
    assert!(json["programs"][0]["text"].is_string());
}

#[test]
fn test_cli_synth_tree_examples() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.json", FAST_CONFIG);
    let examples = write(
        &dir,
        "examples.json",
        r#"[
            {
                "input": {"name": "ul", "children": [
                    {"name": "li", "attributes": {"class": "item"}, "text": "Apples"},
                    {"name": "li", "attributes": {"class": "item"}, "text": "Pears"},
                    {"name": "p", "text": "Prices vary"}
                ]},
                "output": ["Apples", "Pears"]
            },
            {
                "input": {"name": "ul", "children": [
                    {"name": "li", "attributes": {"class": "item"}, "text": "Plums"},
                    {"name": "p", "text": "Seasonal"}
                ]},
                "output": ["Plums"]
            }
        ]"#,
    );

    let assert = relsynth()
        .arg("synth")
        .arg(&examples)
        .arg("--config")
        .arg(&config)
        .args(["-p", "tag-invariant", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("starting synthesis"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["synthesized"], true);
    assert_eq!(
        json["programs"][0]["text"],
        r#"NodesToTexts(DescendantsWithAttrValue(x, "class", "item"))"#
    );
    assert_eq!(json["programs"][0]["program"]["nodes"]["op"], "descendants_with_attr_value");
    assert_eq!(json["report"]["applicable"][0], "tag-invariant");
}

#[test]
fn test_cli_synth_unknown_property() {
    let dir = TempDir::new().unwrap();
    let examples = write(&dir, "examples.json", r#"[{"input": "a b", "output": "a"}]"#);

    relsynth()
        .arg("synth")
        .arg(&examples)
        .args(["-p", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown relational property 'nope'"));
}

#[test]
fn test_cli_synth_no_program() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.json", FAST_CONFIG);
    let examples = write(&dir, "examples.json", r#"[{"input": "abc", "output": "xyz"}]"#);

    relsynth()
        .arg("synth")
        .arg(&examples)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no program is consistent"));
}

#[test]
fn test_cli_synth_rejects_bad_tie_break() {
    let dir = TempDir::new().unwrap();
    let examples = write(&dir, "examples.json", r#"[{"input": "a b", "output": "a"}]"#);

    relsynth()
        .arg("synth")
        .arg(&examples)
        .args(["--tie-break", "coin-flip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tie-break policy"));
}

#[test]
fn test_cli_synth_rejects_malformed_examples() {
    let dir = TempDir::new().unwrap();
    let examples = write(&dir, "examples.json", r#"{"input": "a"}"#);

    relsynth()
        .arg("synth")
        .arg(&examples)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));
}

#[test]
fn test_cli_synth_missing_file() {
    relsynth()
        .args(["synth", "/nonexistent/examples.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read examples file"));
}

#[test]
fn test_cli_synth_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.json", r#"{"oracle_timeout_ms": 0}"#);
    let examples = write(&dir, "examples.json", r#"[{"input": "a b", "output": "a"}]"#);

    relsynth()
        .arg("synth")
        .arg(&examples)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}
