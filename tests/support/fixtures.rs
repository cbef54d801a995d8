//! Test fixtures and constants.

use credder::{ProjectSecrets, Secret, VariableType};

/// Project id used across tests.
pub const PROJECT_ID: u64 = 4242;

/// A valid storage document: one group sharing everything but value and
/// scope, and one standalone leaf.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "project_id": 4242,
  "variables": [
    {
      "key": "DB_URL",
      "description": "database connection",
      "type": "env_var",
      "protect": true,
      "mask": true,
      "raw": true,
      "nested": [
        { "value": "op://prod/db/url", "env": "production" },
        { "value": "op://staging/db/url", "env": "staging" }
      ]
    },
    {
      "key": "LOG_LEVEL",
      "value": "debug",
      "description": "",
      "type": "env_var",
      "env": "*",
      "protect": false,
      "mask": false,
      "raw": true
    }
  ]
}
"#;

/// The same variables as `SAMPLE_DOCUMENT`, listed out of order.
pub const UNORDERED_DOCUMENT: &str = r#"{
  "project_id": 4242,
  "variables": [
    { "key": "LOG_LEVEL", "value": "debug", "description": "", "type": "env_var", "env": "*", "protect": false, "mask": false, "raw": true },
    { "key": "DB_URL", "value": "op://staging/db/url", "description": "database connection", "type": "env_var", "env": "staging", "protect": true, "mask": true, "raw": true },
    { "key": "DB_URL", "value": "op://prod/db/url", "description": "database connection", "type": "env_var", "env": "production", "protect": true, "mask": true, "raw": true }
  ]
}
"#;

/// A leaf missing its `mask` field.
pub const INCOMPLETE_DOCUMENT: &str = r#"{
  "project_id": 4242,
  "variables": [
    { "key": "TOKEN", "value": "x", "description": "", "type": "env_var", "env": "*", "protect": true, "raw": true }
  ]
}
"#;

/// Build an `env_var` secret with default metadata.
pub fn secret(key: &str, value: &str, scope: &str) -> Secret {
    Secret::new(key, value, scope)
}

/// Build a `file` secret with default metadata.
pub fn file_secret(key: &str, value: &str, scope: &str) -> Secret {
    let mut s = Secret::new(key, value, scope);
    s.variable_type = VariableType::File;
    s
}

/// Build a canonically ordered collection for `PROJECT_ID`.
pub fn project(variables: Vec<Secret>) -> ProjectSecrets {
    ProjectSecrets::new(PROJECT_ID, variables).ordered()
}
