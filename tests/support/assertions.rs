//! Test assertion helpers.

use std::process::Output;

use credder::core::domain::IdentityKey;
use credder::ProjectSecrets;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert stdout contains a string.
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(
        out.contains(expected),
        "stdout missing '{}', got: {}",
        expected,
        out
    );
}

/// Identity keys of a collection, in order.
pub fn identities(project: &ProjectSecrets) -> Vec<IdentityKey> {
    project.variables.iter().map(|s| s.identity()).collect()
}

/// Assert a collection holds `key`/`scope` with `value`.
pub fn assert_value(project: &ProjectSecrets, key: &str, scope: &str, value: &str) {
    let secret = project
        .get(key, scope)
        .unwrap_or_else(|| panic!("{} ({}) missing from {:?}", key, scope, identities(project)));
    assert_eq!(secret.value, value, "value of {} ({})", key, scope);
}
