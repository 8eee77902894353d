use crate::witness::pattern::TOKEN_PATTERNS;
use crate::witness::{Boundary, PatternSearch};
use crate::Pattern;

fn assert_locates(text: &str, position: usize, boundary: Boundary, found: &[Pattern]) {
    for pattern in found {
        let matches: Vec<_> = pattern.regex().find_iter(text).collect();
        assert_eq!(matches.len(), 1, "/{}/ must match exactly once", pattern);
        let at = match boundary {
            Boundary::Start => matches[0].start(),
            Boundary::End => matches[0].end(),
        };
        assert_eq!(at, position, "/{}/ lands on the wrong position", pattern);
    }
}

#[test]
fn test_finds_literal_at_start() {
    let search = PatternSearch::default();
    let found = search.find("1270 adffss", 0, Boundary::Start);
    assert!(found.iter().any(|p| p.source() == "1"));
    assert_locates("1270 adffss", 0, Boundary::Start, &found);
}

#[test]
fn test_finds_patterns_at_end_boundary() {
    let search = PatternSearch::default();
    let found = search.find("1270 adffss", 4, Boundary::End);
    assert!(found.iter().any(|p| p.source() == "0"));
    assert_locates("1270 adffss", 4, Boundary::End, &found);
}

#[test]
fn test_end_anchor_locates_end_of_string() {
    let text = "x 12 y 12";
    let found = PatternSearch::new(4, 64).find(text, 9, Boundary::End);
    assert!(found.iter().any(|p| p.source() == "$"));
    // "12" occurs twice, so it cannot pin the position down.
    assert!(found.iter().all(|p| p.source() != "12"));
    assert_locates(text, 9, Boundary::End, &found);
}

#[test]
fn test_rejects_positions_off_the_string() {
    let search = PatternSearch::default();
    assert!(search.find("abc", 4, Boundary::Start).is_empty());
    assert!(search.find("é", 1, Boundary::Start).is_empty());
}

#[test]
fn test_shallow_search_is_a_subset() {
    let text = "ab 12 cd 34";
    let shallow = PatternSearch::new(1, 64).find(text, 3, Boundary::Start);
    let deep = PatternSearch::new(3, 64).find(text, 3, Boundary::Start);
    assert!(shallow.iter().all(|p| deep.contains(p)));
    assert_locates(text, 3, Boundary::Start, &deep);
}

#[test]
fn test_token_patterns_compile() {
    for source in TOKEN_PATTERNS {
        assert!(Pattern::new(source).is_ok(), "/{}/ should compile", source);
    }
}
