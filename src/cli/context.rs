//! Per-command setup shared by the handlers.

use std::path::PathBuf;
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::core::cache::LookupCache;
use crate::core::config::{Overrides, Settings};
use crate::core::remote::GitLab;
use crate::core::types::ProjectId;
use crate::core::workspace::{self, Workspace};
use crate::error::Result;

/// Settings and workspace for the current directory.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub workspace: Workspace,
}

impl Context {
    /// Resolve settings from the working directory and global flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid `.credder.toml` or value, and
    /// `ResolveError` for an unusable resolver command.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let dir = std::env::current_dir()?;
        let overrides = Overrides {
            file: global.file.clone(),
            gitlab_url: global.gitlab_url.clone(),
            gitlab_token: global
                .gitlab_token
                .clone()
                .or_else(|| std::env::var("GITLAB_TOKEN").ok()),
            resolver: global.resolver.clone(),
        };

        let settings = Settings::load(&dir, overrides)?;
        let workspace = Workspace::from_settings(&settings)?;
        Ok(Self {
            settings,
            workspace,
        })
    }

    /// GitLab client for the configured instance.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingToken` if no token was provided.
    pub fn gitlab(&self) -> Result<GitLab> {
        GitLab::new(&self.settings.gitlab_url, self.settings.token()?)
    }

    /// Variables file path for messages.
    pub fn file_display(&self) -> String {
        display_path(self.workspace.path())
    }

    /// Project id from the flag, the variables file, or the origin remote.
    ///
    /// # Errors
    ///
    /// Returns error if detection fails.
    pub fn project_id(&self, explicit: Option<ProjectId>, remote: &GitLab) -> Result<ProjectId> {
        let mut cache = LookupCache::load_default();
        let id = workspace::resolve_project_id(
            explicit,
            &self.workspace,
            remote,
            &mut cache,
            remote.api_base(),
        )?;

        if let Err(e) = cache.save() {
            debug!(error = %e, "could not save lookup cache");
        }
        Ok(id)
    }
}

/// Path relative to the working directory when possible.
pub fn display_path(path: &std::path::Path) -> String {
    let relative: PathBuf = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(PathBuf::from))
        .unwrap_or_else(|| path.to_path_buf());
    relative.display().to_string()
}
