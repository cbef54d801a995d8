//! Git repository helpers.
//!
//! Detects the GitLab project path from the `origin` remote.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::types::ProjectPath;
use crate::error::{RemoteError, Result};

/// Project path of the `origin` remote of the repository at `dir`.
///
/// # Errors
///
/// Returns `RemoteError::ProjectDetection` if git is unavailable, there is
/// no `origin` remote, or its URL has no recognizable path.
pub fn origin_project_path(dir: &Path) -> Result<ProjectPath> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| RemoteError::ProjectDetection(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        return Err(RemoteError::ProjectDetection(format!(
            "git remote get-url origin failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ))
        .into());
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(url = %url, "origin remote");

    parse_remote_url(&url).ok_or_else(|| {
        RemoteError::ProjectDetection(format!("unrecognized remote url: {}", url)).into()
    })
}

/// Extract `group/project` from an SSH or HTTP(S) remote URL.
///
/// ```
/// use credder::core::git::parse_remote_url;
///
/// assert_eq!(parse_remote_url("git@gitlab.com:acme/api.git").as_deref(), Some("acme/api"));
/// assert_eq!(parse_remote_url("https://gitlab.com/acme/api").as_deref(), Some("acme/api"));
/// ```
pub fn parse_remote_url(url: &str) -> Option<ProjectPath> {
    let url = url.trim();

    let path = if let Some((_, rest)) = url.split_once("://") {
        // scheme://[user@]host[:port]/path
        let (_, path) = rest.split_once('/')?;
        path
    } else {
        // scp-like: [user@]host:path
        let (_, path) = url.split_once(':')?;
        path
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    if path.is_empty() || !path.contains('/') {
        return None;
    }
    Some(path.to_string())
}
