//! ProjectSecrets type.
//!
//! The flat collection every comparison and transform works on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::secret::{IdentityKey, Secret};
use crate::core::types::ProjectId;

/// All variables of one project, flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSecrets {
    pub project_id: ProjectId,
    #[serde(default)]
    pub variables: Vec<Secret>,
}

impl ProjectSecrets {
    pub fn new(project_id: ProjectId, variables: Vec<Secret>) -> Self {
        Self {
            project_id,
            variables,
        }
    }

    /// Empty collection for a project.
    pub fn empty(project_id: ProjectId) -> Self {
        Self::new(project_id, Vec::new())
    }

    /// Sort in place into canonical order (key, then environment scope).
    ///
    /// The sort is stable, so running it twice changes nothing.
    pub fn order(&mut self) {
        self.variables.sort_by(|a, b| a.canonical_cmp(b));
    }

    /// Consume and return in canonical order.
    pub fn ordered(mut self) -> Self {
        self.order();
        self
    }

    /// Whether the collection is already in canonical order.
    pub fn is_ordered(&self) -> bool {
        self.variables
            .windows(2)
            .all(|w| w[0].canonical_cmp(&w[1]).is_le())
    }

    /// Variables of type `file`.
    pub fn file_variables(&self) -> Vec<&Secret> {
        self.variables.iter().filter(|s| s.is_file()).collect()
    }

    /// Index by identity key.
    ///
    /// Assumes identity keys are unique; see
    /// [`validation::ensure_unique`](crate::core::validation::ensure_unique).
    pub fn index(&self) -> BTreeMap<IdentityKey, &Secret> {
        self.variables.iter().map(|s| (s.identity(), s)).collect()
    }

    /// Look up a variable by identity.
    pub fn get(&self, key: &str, environment_scope: &str) -> Option<&Secret> {
        self.variables
            .iter()
            .find(|s| s.key == key && s.environment_scope == environment_scope)
    }

    /// Field-wise equality of project id and every variable, in order.
    pub fn equal(&self, other: &ProjectSecrets) -> bool {
        self.project_id == other.project_id
            && self.variables.len() == other.variables.len()
            && self
                .variables
                .iter()
                .zip(&other.variables)
                .all(|(a, b)| a.equal(b))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
