//! Secret type.
//!
//! A single CI/CD variable as the remote store sees it, flattened.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::constants;

/// How the remote exposes a variable to CI jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// Plain environment variable.
    #[default]
    EnvVar,
    /// Value is written to a temp file and the variable holds its path.
    File,
}

impl VariableType {
    /// Wire name (`env_var` or `file`).
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::EnvVar => "env_var",
            VariableType::File => "file",
        }
    }
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair that identifies a variable within a collection.
///
/// Ordering is by key, then environment scope, which is the canonical
/// collection order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub key: String,
    pub environment_scope: String,
}

impl IdentityKey {
    pub fn new(key: impl Into<String>, environment_scope: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            environment_scope: environment_scope.into(),
        }
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.environment_scope)
    }
}

/// A flat variable record.
///
/// Fields missing from JSON input fall back to the remote's defaults for a
/// new variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub variable_type: VariableType,
    #[serde(rename = "env", default = "default_scope")]
    pub environment_scope: String,
    #[serde(default = "default_true")]
    pub protect: bool,
    #[serde(default)]
    pub mask: bool,
    #[serde(default = "default_true")]
    pub raw: bool,
}

fn default_scope() -> String {
    constants::DEFAULT_SCOPE.to_string()
}

fn default_true() -> bool {
    true
}

impl Secret {
    /// New `env_var` secret with the remote's defaults for everything but
    /// key, value and scope.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        environment_scope: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: String::new(),
            variable_type: VariableType::EnvVar,
            environment_scope: environment_scope.into(),
            protect: true,
            mask: false,
            raw: true,
        }
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(&self.key, &self.environment_scope)
    }

    pub fn is_file(&self) -> bool {
        self.variable_type == VariableType::File
    }

    /// Field-wise equality across all eight fields.
    ///
    /// Scopes compare literally; `*` does not match `production`.
    pub fn equal(&self, other: &Secret) -> bool {
        self == other
    }

    /// True when everything except the value matches.
    pub fn same_metadata(&self, other: &Secret) -> bool {
        self.key == other.key
            && self.description == other.description
            && self.variable_type == other.variable_type
            && self.environment_scope == other.environment_scope
            && self.protect == other.protect
            && self.mask == other.mask
            && self.raw == other.raw
    }

    /// Canonical comparison: key, then environment scope.
    pub fn canonical_cmp(&self, other: &Secret) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.environment_scope.cmp(&other.environment_scope))
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.environment_scope)
    }
}
