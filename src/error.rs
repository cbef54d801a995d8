//! Error types for credder.
//!
//! Every failure is typed and propagated to the calling command. The core
//! never prints or prompts; `main` decides how to present an error.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Malformed or incomplete storage document.
#[derive(Error, Debug)]
pub enum StructuralError {
    #[error("incomplete secret record: {key} is missing '{field}'")]
    IncompleteRecord { key: String, field: &'static str },

    #[error("variable at position {position} has no key")]
    MissingKey { position: usize },

    #[error("{key} nests deeper than one level")]
    UnexpectedNesting { key: String },

    #[error("failed to parse variables file: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize variables file: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Invalid records or collections.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("duplicate variable: {key} ({environment_scope}) appears more than once")]
    DuplicateIdentity {
        key: String,
        environment_scope: String,
    },

    #[error("variable key cannot be empty")]
    EmptyKey,

    #[error("invalid variable key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

/// Secret resolution failed.
///
/// Always fatal before any remote mutation, so unresolved references are
/// never pushed as literal values.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("resolver command is empty")]
    EmptyCommand,

    #[error("resolver '{0}' not found on PATH")]
    NotFound(String),

    #[error("failed to run resolver '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resolver exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to encode variables for resolver: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("resolver returned invalid output: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("resolver changed the set of variables: {0}")]
    ShapeMismatch(String),
}

/// A remote store call failed.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("no GitLab token provided")]
    MissingToken,

    #[error("GitLab rejected the token (401 Unauthorized)")]
    Unauthorized,

    #[error("GitLab denied access (403 Forbidden)")]
    Forbidden,

    #[error("not found on GitLab: {0}")]
    NotFound(String),

    #[error("GitLab returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request to GitLab failed: {0}")]
    Transport(String),

    #[error("failed to parse GitLab response: {0}")]
    Parse(String),

    #[error("could not detect the GitLab project: {0}")]
    ProjectDetection(String),
}

/// Settings and project-file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("variables file not found: {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("variables file already exists: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
