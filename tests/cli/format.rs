//! Tests for `credder format`.

use crate::support::*;

#[test]
fn test_format_canonicalizes_unordered_file() {
    let t = Test::with_document(UNORDERED_DOCUMENT);

    let output = t.format();
    assert_success(&output);
    assert_stdout_contains(&output, "formatted");

    let formatted = t.read("gitlab_variables.json");
    let doc = credder::core::document::parse(&formatted).unwrap();
    let project = credder::core::nesting::decode(&doc).unwrap();

    assert!(project.is_ordered());
    assert_eq!(project.len(), 3);
    // DB_URL is written once, as a group
    assert_eq!(formatted.matches("\"DB_URL\"").count(), 1);
}

#[test]
fn test_format_is_idempotent() {
    let t = Test::with_document(UNORDERED_DOCUMENT);
    assert_success(&t.format());
    let first = t.read("gitlab_variables.json");

    let output = t.format();
    assert_success(&output);
    assert_stdout_contains(&output, "already formatted");
    assert_eq!(t.read("gitlab_variables.json"), first);
}

#[test]
fn test_format_respects_file_flag() {
    let t = Test::new();
    t.write("ci/vars.json", UNORDERED_DOCUMENT);

    let output = t.run(&["format", "--file", "ci/vars.json"]);
    assert_success(&output);
    assert!(!t.path("gitlab_variables.json").exists());
}

#[test]
fn test_format_reads_config_file() {
    let t = Test::new();
    t.write("ci/vars.json", UNORDERED_DOCUMENT);
    t.write(".credder.toml", "file = \"ci/vars.json\"\n");

    let output = t.format();
    assert_success(&output);
    assert_stdout_contains(&output, "formatted");
}

#[test]
fn test_format_rejects_incomplete_record() {
    let t = Test::with_document(INCOMPLETE_DOCUMENT);

    let output = t.format();
    assert_failure(&output);
    assert_stderr_contains(&output, "TOKEN is missing 'mask'");
    assert_eq!(t.read("gitlab_variables.json"), INCOMPLETE_DOCUMENT);
}
