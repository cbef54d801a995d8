//! Remote variable stores.
//!
//! The remote is where CI jobs read variables from. The sync logic only
//! needs the handful of calls in [`RemoteStore`]; paging, auth and HTTP
//! stay inside the implementation.
//!
//! ## Stores
//!
//! - **GitLab**: Project-level CI/CD variables through the REST v4 API.

use std::collections::BTreeMap;
use tracing::debug;

use crate::core::domain::{IdentityKey, ProjectSecrets, Secret};
use crate::core::types::ProjectId;
use crate::error::{Result, ValidationError};

mod gitlab;

pub use gitlab::GitLab;

/// A store holding a project's CI/CD variables.
pub trait RemoteStore {
    /// Resolve a project path (`group/project`) to its id.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the project cannot be found.
    fn lookup_project(&self, path: &str) -> Result<ProjectId>;

    /// Fetch every variable of a project, following pagination until
    /// exhausted. The result is canonically ordered.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if any page fails; no partial result is
    /// returned.
    fn fetch(&self, project_id: ProjectId) -> Result<ProjectSecrets>;

    /// Create a variable.
    fn create(&self, project_id: ProjectId, secret: &Secret) -> Result<()>;

    /// Replace the variable with the same key and environment scope.
    fn update(&self, project_id: ProjectId, secret: &Secret) -> Result<()>;

    /// Delete the variable with this key and environment scope.
    fn delete(&self, project_id: ProjectId, key: &str, environment_scope: &str) -> Result<()>;
}

/// Merge fetched pages into one canonically ordered collection.
///
/// Pages may arrive in any order and may overlap when the remote shifts
/// between requests. Exact repeats are dropped.
///
/// # Errors
///
/// Returns `ValidationError::DuplicateIdentity` if two different records
/// share a key and environment scope.
pub fn merge_pages(project_id: ProjectId, pages: Vec<Vec<Secret>>) -> Result<ProjectSecrets> {
    let mut merged: BTreeMap<IdentityKey, Secret> = BTreeMap::new();
    let mut repeats = 0usize;

    for secret in pages.into_iter().flatten() {
        let id = secret.identity();
        match merged.get(&id) {
            Some(existing) if existing.equal(&secret) => repeats += 1,
            Some(_) => {
                return Err(ValidationError::DuplicateIdentity {
                    key: id.key,
                    environment_scope: id.environment_scope,
                }
                .into())
            }
            None => {
                merged.insert(id, secret);
            }
        }
    }

    if repeats > 0 {
        debug!(repeats, "dropped repeated variables across pages");
    }

    Ok(ProjectSecrets::new(
        project_id,
        merged.into_values().collect(),
    ))
}
