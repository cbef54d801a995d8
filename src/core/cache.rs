//! Lookup cache.
//!
//! Remembers remote lookups that rarely change (project path to project
//! id) between runs. The cache is an explicit value: commands load it at
//! start, pass it to whatever needs it, and save it before exiting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::constants;
use crate::core::types::ProjectId;
use crate::error::Result;

/// Persistent string-keyed lookup cache.
#[derive(Debug, Default)]
pub struct LookupCache {
    path: Option<PathBuf>,
    entries: Entries,
    dirty: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Entries {
    #[serde(default)]
    project_ids: BTreeMap<String, ProjectId>,
}

impl LookupCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from the user cache directory, or start empty.
    pub fn load_default() -> Self {
        match dirs::cache_dir() {
            Some(dir) => Self::load(dir.join(constants::CACHE_FILE)),
            None => {
                warn!("no user cache directory, lookups will not be cached");
                Self::in_memory()
            }
        }
    }

    /// Load from `path`. A missing or unreadable file gives an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt lookup cache");
                Entries::default()
            }),
            Err(_) => Entries::default(),
        };

        debug!(
            path = %path.display(),
            project_ids = entries.project_ids.len(),
            "lookup cache loaded"
        );

        Self {
            path: Some(path),
            entries,
            dirty: false,
        }
    }

    /// Cached project id for a GitLab API base and project path.
    pub fn project_id(&self, api_base: &str, project_path: &str) -> Option<ProjectId> {
        self.entries
            .project_ids
            .get(&project_key(api_base, project_path))
            .copied()
    }

    /// Remember a project id.
    pub fn set_project_id(&mut self, api_base: &str, project_path: &str, id: ProjectId) {
        let previous = self
            .entries
            .project_ids
            .insert(project_key(api_base, project_path), id);
        if previous != Some(id) {
            self.dirty = true;
        }
    }

    /// Where the cache is persisted, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the cache back if anything changed.
    ///
    /// # Errors
    ///
    /// Returns error if the cache directory or file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| crate::error::Error::Other(format!("failed to encode cache: {}", e)))?;
        std::fs::write(path, contents)?;

        debug!(path = %path.display(), "lookup cache saved");
        self.dirty = false;
        Ok(())
    }
}

fn project_key(api_base: &str, project_path: &str) -> String {
    format!("{}/projects/{}", api_base, project_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/cache.json");

        let mut cache = LookupCache::load(&path);
        assert_eq!(cache.project_id("https://gitlab.com/api/v4", "a/b"), None);

        cache.set_project_id("https://gitlab.com/api/v4", "a/b", 42);
        cache.save().unwrap();
        assert!(path.exists());

        let reloaded = LookupCache::load(&path);
        assert_eq!(reloaded.project_id("https://gitlab.com/api/v4", "a/b"), Some(42));
        assert_eq!(reloaded.project_id("https://other/api/v4", "a/b"), None);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = LookupCache::load(&path);
        assert_eq!(cache.project_id("x", "y"), None);
    }

    #[test]
    fn test_clean_cache_is_not_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");

        let mut cache = LookupCache::load(&path);
        cache.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_in_memory_never_writes() {
        let mut cache = LookupCache::in_memory();
        cache.set_project_id("x", "y", 1);
        assert!(cache.save().is_ok());
        assert!(cache.path().is_none());
        assert_eq!(cache.project_id("x", "y"), Some(1));
    }
}
