//! Tests for issue-reference extraction.

use rstest::rstest;

use super::*;

fn number(reference: Option<IssueReference>) -> Option<u64> {
    reference.map(|r| r.number.as_u64())
}

#[rstest]
#[case::bare_hash("fix: close #123", 123)]
#[case::owner_issues("see acme/issues#123", 123)]
#[case::issue_url("Fixes https://github.com/acme/widgets/issues/123", 123)]
#[case::hash_at_start("#123 tidy up", 123)]
#[case::embedded_hash("closes(#123)", 123)]
#[case::http_url("http://github.com/acme/widgets/issues/123", 123)]
fn supported_shapes_extract_the_issue_number(#[case] text: &str, #[case] expected: u64) {
    assert_eq!(number(extract(text)), Some(expected));
}

#[rstest]
#[case::empty("")]
#[case::plain("refactor the parser")]
#[case::hash_without_digits("tag # release")]
#[case::pull_url("https://github.com/acme/widgets/pull/9")]
#[case::other_host("https://gitlab.com/acme/widgets/issues/9")]
fn text_without_a_reference_yields_nothing(#[case] text: &str) {
    assert_eq!(extract(text), None);
}

#[test]
fn first_pattern_wins_over_later_patterns() {
    assert_eq!(number(extract("acme/issues#456 and #123")), Some(456));
    assert_eq!(number(extract("#123 then acme/issues#456")), Some(123));
}

#[test]
fn first_match_wins_within_a_pattern() {
    assert_eq!(number(extract("#7 and #8")), Some(7));
}

#[test]
fn hash_takes_priority_over_url_anywhere_in_the_text() {
    let text = "https://github.com/acme/widgets/issues/55 (dup of #12)";
    assert_eq!(number(extract(text)), Some(12));
}

#[test]
fn url_reference_carries_owner_and_repository() {
    let reference = extract("https://GitHub.com/Acme/Widgets/issues/9").unwrap();
    assert_eq!(
        reference.repository,
        Some(IssueRepository::Named {
            owner: "Acme".into(),
            name: "Widgets".into(),
        })
    );
}

#[test]
fn hash_reference_has_no_repository_context() {
    assert_eq!(extract("acme/issues#5").unwrap().repository, None);
}

#[test]
fn matched_but_invalid_number_does_not_fall_through() {
    // `#0` satisfies the first pattern, so the URL is never considered.
    assert_eq!(extract("#0 https://github.com/acme/widgets/issues/3"), None);
    assert_eq!(extract("#999999999999999999999999"), None);
}

#[test]
fn extract_all_skips_misses_and_keeps_order() {
    let found = extract_all(&["#3", "nothing here", "https://github.com/a/b/issues/1"]);
    let numbers: Vec<u64> = found.iter().map(|r| r.number.as_u64()).collect();
    assert_eq!(numbers, vec![3, 1]);
}

#[test]
fn custom_extractor_matches_the_shared_one() {
    let extractor = ReferenceExtractor::default();
    assert_eq!(extractor.extract("#42"), extract("#42"));
}

#[rstest]
#[case::arabic_indic_digits("#١٢ fixes #5", 5)]
#[case::fullwidth_digit_then_url("#５ then https://github.com/a/b/issues/7", 7)]
fn non_ascii_digits_are_not_issue_numbers(#[case] text: &str, #[case] expected: u64) {
    assert_eq!(number(extract(text)), Some(expected));
}

#[test]
fn non_ascii_url_owner_is_not_matched() {
    assert_eq!(extract("https://github.com/ácme/x/issues/3"), None);
    assert_eq!(extract("https://github.com/acme/wídgets/issues/3"), None);
}
