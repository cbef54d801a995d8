//! Settings.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `.credder.toml` in the project directory
//! 3. Environment variables and command-line flags
//!
//! ```toml
//! file = "ci/gitlab_variables.json"
//!
//! [gitlab]
//! url = "https://gitlab.example.com"
//!
//! [resolver]
//! command = "op inject --account work"
//! ```
//!
//! The GitLab token is never read from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, RemoteError, Result};

/// Contents of `.credder.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Variables file, relative to the project directory
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub gitlab: GitLabSection,
    #[serde(default)]
    pub resolver: ResolverSection,
}

/// `[gitlab]` section.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitLabSection {
    /// Instance URL (e.g., `https://gitlab.example.com`)
    #[serde(default)]
    pub url: Option<String>,
}

/// `[resolver]` section.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Command line of the secret resolver, or `none`
    #[serde(default)]
    pub command: Option<String>,
}

impl FileConfig {
    /// Load `.credder.toml` from `dir`, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` if the file
    /// exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(constants::CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub file: Option<PathBuf>,
    pub gitlab_url: Option<String>,
    pub gitlab_token: Option<String>,
    pub resolver: Option<String>,
}

/// Effective settings for one command.
#[derive(Clone)]
pub struct Settings {
    /// Path of the variables file
    pub variables_file: PathBuf,
    /// GitLab instance URL
    pub gitlab_url: String,
    /// GitLab token, required only by commands that reach the remote
    pub gitlab_token: Option<String>,
    /// Resolver command line, or `none`
    pub resolver: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("variables_file", &self.variables_file)
            .field("gitlab_url", &self.gitlab_url)
            .field("gitlab_token", &self.gitlab_token.as_ref().map(|_| "<redacted>"))
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Settings {
    /// Merge defaults, the project's `.credder.toml` and overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file is invalid or a value fails
    /// validation.
    pub fn load(dir: &Path, overrides: Overrides) -> Result<Self> {
        let file = FileConfig::load(dir)?;
        let settings = Self::merge(dir, file, overrides);
        settings.validate()?;

        debug!(settings = ?settings, "settings resolved");
        Ok(settings)
    }

    fn merge(dir: &Path, file: FileConfig, overrides: Overrides) -> Self {
        let variables_file = overrides
            .file
            .or(file.file)
            .map(|p| if p.is_absolute() { p } else { dir.join(p) })
            .unwrap_or_else(|| dir.join(constants::VARIABLES_FILE));

        Self {
            variables_file,
            gitlab_url: overrides
                .gitlab_url
                .or(file.gitlab.url)
                .unwrap_or_else(|| constants::DEFAULT_GITLAB_URL.to_string()),
            gitlab_token: overrides.gitlab_token.filter(|t| !t.trim().is_empty()),
            resolver: overrides
                .resolver
                .or(file.resolver.command)
                .unwrap_or_else(|| constants::DEFAULT_RESOLVER.to_string()),
        }
    }

    /// Check values that would otherwise fail late.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(self.gitlab_url.starts_with("https://") || self.gitlab_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "gitlab.url",
                reason: format!("must start with http:// or https://: {}", self.gitlab_url),
            }
            .into());
        }

        if self.variables_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file",
                reason: "path is empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// The GitLab token.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingToken` if none was provided.
    pub fn token(&self) -> Result<&str> {
        self.gitlab_token
            .as_deref()
            .ok_or_else(|| RemoteError::MissingToken.into())
    }

    /// Directory file-variable paths are relative to.
    pub fn project_dir(&self) -> &Path {
        match self.variables_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}
