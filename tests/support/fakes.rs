//! In-memory collaborators for workspace tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use credder::core::domain::IdentityKey;
use credder::core::inject::Resolver;
use credder::core::remote::RemoteStore;
use credder::core::types::ProjectId;
use credder::error::{RemoteError, ResolveError, Result};
use credder::{ProjectSecrets, Secret};

/// A remote call recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(IdentityKey),
    Update(IdentityKey),
    Delete(IdentityKey),
}

/// Remote store backed by a map, recording every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RefCell<BTreeMap<ProjectId, Vec<Secret>>>,
    paths: BTreeMap<String, ProjectId>,
    calls: RefCell<Vec<Call>>,
    fail_on: Option<IdentityKey>,
}

impl MemoryStore {
    /// Store holding `variables` for `project_id`.
    pub fn with(project_id: ProjectId, variables: Vec<Secret>) -> Self {
        let store = Self::default();
        store.projects.borrow_mut().insert(project_id, variables);
        store
    }

    /// Register a project path for lookups.
    pub fn with_path(mut self, path: &str, project_id: ProjectId) -> Self {
        self.paths.insert(path.to_string(), project_id);
        self
    }

    /// Fail any write targeting `key`/`scope`.
    pub fn failing_on(mut self, key: &str, scope: &str) -> Self {
        self.fail_on = Some(IdentityKey::new(key, scope));
        self
    }

    /// Writes performed so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Current variables of a project, canonically ordered.
    pub fn variables(&self, project_id: ProjectId) -> ProjectSecrets {
        let vars = self
            .projects
            .borrow()
            .get(&project_id)
            .cloned()
            .unwrap_or_default();
        ProjectSecrets::new(project_id, vars).ordered()
    }

    fn check(&self, id: &IdentityKey) -> Result<()> {
        if self.fail_on.as_ref() == Some(id) {
            return Err(RemoteError::Http {
                status: 500,
                body: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn lookup_project(&self, path: &str) -> Result<ProjectId> {
        self.paths
            .get(path)
            .copied()
            .ok_or_else(|| RemoteError::NotFound(path.to_string()).into())
    }

    fn fetch(&self, project_id: ProjectId) -> Result<ProjectSecrets> {
        let projects = self.projects.borrow();
        let vars = projects
            .get(&project_id)
            .ok_or_else(|| RemoteError::NotFound(format!("project {}", project_id)))?;
        Ok(ProjectSecrets::new(project_id, vars.clone()).ordered())
    }

    fn create(&self, project_id: ProjectId, secret: &Secret) -> Result<()> {
        self.check(&secret.identity())?;
        self.calls.borrow_mut().push(Call::Create(secret.identity()));
        self.projects
            .borrow_mut()
            .entry(project_id)
            .or_default()
            .push(secret.clone());
        Ok(())
    }

    fn update(&self, project_id: ProjectId, secret: &Secret) -> Result<()> {
        let id = secret.identity();
        self.check(&id)?;
        self.calls.borrow_mut().push(Call::Update(id.clone()));
        let mut projects = self.projects.borrow_mut();
        let vars = projects.entry(project_id).or_default();
        match vars.iter_mut().find(|s| s.identity() == id) {
            Some(existing) => {
                *existing = secret.clone();
                Ok(())
            }
            None => Err(RemoteError::NotFound(id.to_string()).into()),
        }
    }

    fn delete(&self, project_id: ProjectId, key: &str, environment_scope: &str) -> Result<()> {
        let id = IdentityKey::new(key, environment_scope);
        self.check(&id)?;
        self.calls.borrow_mut().push(Call::Delete(id.clone()));
        let mut projects = self.projects.borrow_mut();
        projects
            .entry(project_id)
            .or_default()
            .retain(|s| s.identity() != id);
        Ok(())
    }
}

/// Resolver substituting whole values from a reference table.
///
/// Values not in the table pass through unchanged, like literals.
#[derive(Debug, Default)]
pub struct MapResolver {
    references: HashMap<String, String>,
    fail: bool,
}

impl MapResolver {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            references: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fail: false,
        }
    }

    /// A resolver whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl Resolver for MapResolver {
    fn name(&self) -> &str {
        "map"
    }

    fn resolve(&self, project: &ProjectSecrets) -> Result<ProjectSecrets> {
        if self.fail {
            return Err(ResolveError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "not signed in".to_string(),
            }
            .into());
        }

        let mut resolved = project.clone();
        for secret in resolved.variables.iter_mut() {
            if let Some(value) = self.references.get(&secret.value) {
                secret.value = value.clone();
            }
        }
        Ok(resolved)
    }
}
