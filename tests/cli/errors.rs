//! Error reporting for commands that fail before any network call.

use crate::support::*;

#[test]
fn test_format_without_file() {
    let t = Test::new();

    let output = t.format();
    assert_failure(&output);
    assert_stderr_contains(&output, "variables file not found");
    assert_stderr_contains(&output, "credder init");
}

#[test]
fn test_pull_requires_token() {
    let t = Test::with_document(SAMPLE_DOCUMENT);

    let output = t.run(&["pull"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no GitLab token");
    assert_stderr_contains(&output, "GL_PAT");
}

#[test]
fn test_push_requires_token() {
    let t = Test::with_document(SAMPLE_DOCUMENT);

    let output = t.run(&["push", "--yes"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no GitLab token");
}

#[test]
fn test_init_refuses_existing_file() {
    let t = Test::with_document(SAMPLE_DOCUMENT);

    let output = t.cmd().args(["init", "--project-id", "1"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.read("gitlab_variables.json"), SAMPLE_DOCUMENT);
}

#[test]
fn test_invalid_gitlab_url() {
    let t = Test::with_document(SAMPLE_DOCUMENT);

    let output = t.run(&["--gitlab-url", "gitlab.example.com", "format"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "gitlab.url");
}

#[test]
fn test_unknown_config_key() {
    let t = Test::with_document(SAMPLE_DOCUMENT);
    t.write(".credder.toml", "colour = \"blue\"\n");

    let output = t.format();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
}

#[test]
fn test_malformed_json() {
    let t = Test::with_document("{ not json");

    let output = t.format();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse variables file");
}
