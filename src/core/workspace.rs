//! The primary interface for credder operations.
//!
//! A workspace owns the variables file location and the resolver, and runs
//! each command as one pipeline:
//!
//! ```text
//! load -> materialize files -> resolve -> fetch -> reconcile -> save/execute
//! ```
//!
//! The remote store is passed per call so commands that never reach the
//! network need no token.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::cache::LookupCache;
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::document;
use crate::core::domain::{
    Action, Diff, ImportReport, ProjectSecrets, PullReport, PushPlan, PushReport, Secret,
};
use crate::core::git;
use crate::core::inject::{self, Resolver};
use crate::core::reconcile::{self, Reconciler};
use crate::core::remote::RemoteStore;
use crate::core::types::ProjectId;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// A project's variables file plus the resolver used to inject it.
pub struct Workspace {
    path: PathBuf,
    project_dir: PathBuf,
    resolver: Box<dyn Resolver>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("path", &self.path)
            .field("project_dir", &self.project_dir)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

/// A push plan bound to the project it was computed for.
#[derive(Debug)]
pub struct PendingPush {
    pub project_id: ProjectId,
    pub plan: PushPlan,
}

impl Workspace {
    /// Create a workspace for an explicit file, directory and resolver.
    pub fn new(
        path: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        resolver: Box<dyn Resolver>,
    ) -> Self {
        Self {
            path: path.into(),
            project_dir: project_dir.into(),
            resolver,
        }
    }

    /// Create a workspace from effective settings.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if the resolver command is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            &settings.variables_file,
            settings.project_dir(),
            inject::from_command(&settings.resolver)?,
        ))
    }

    /// Path of the variables file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory file-variable paths are relative to.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    /// Whether the variables file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the local declarations.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, malformed or has duplicates.
    pub fn load(&self) -> Result<ProjectSecrets> {
        document::load(&self.path)
    }

    /// Write the local declarations in canonical form.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, project: &ProjectSecrets) -> Result<()> {
        document::save(&self.path, project)
    }

    /// Rewrite the file in canonical order and nesting.
    ///
    /// Returns whether the file content changed.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be loaded or written.
    pub fn format(&self) -> Result<bool> {
        let before = std::fs::read_to_string(&self.path).unwrap_or_default();
        let project = self.load()?;
        let after = document::render(&project)?;

        if before == after {
            return Ok(false);
        }
        self.save(&project)?;
        Ok(true)
    }

    /// Load file contents and resolve references.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if resolution fails.
    pub fn inject(&self, local: &ProjectSecrets) -> Result<ProjectSecrets> {
        let materialized = inject::materialize_files(local, &self.project_dir);
        let injected = self.resolver.resolve(&materialized)?;
        debug!(resolver = self.resolver.name(), variables = injected.len(), "injected");
        Ok(injected)
    }

    /// Create an empty variables file and fill it from the remote.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if the file exists, or any
    /// error from the following pull.
    pub fn init(&self, project_id: ProjectId, remote: &dyn RemoteStore) -> Result<PullReport> {
        if self.exists() {
            return Err(ConfigError::AlreadyInitialized(self.path.clone()).into());
        }

        info!(project_id, path = %self.path.display(), "initializing variables file");
        self.save(&ProjectSecrets::empty(project_id))?;
        self.pull(remote)
    }

    /// Overwrite the file with the remote variables, values included.
    ///
    /// `file` variable contents go to files under `variables/`, named from
    /// the key and the URL-safe base64 of the scope; the variable then holds
    /// that path.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or files cannot be written.
    pub fn import(&self, project_id: ProjectId, remote: &dyn RemoteStore) -> Result<ImportReport> {
        let mut project = remote.fetch(project_id)?;
        let mut files = Vec::with_capacity(project.file_variables().len());

        for secret in project.variables.iter_mut().filter(|s| s.is_file()) {
            let relative = file_variable_path(secret);
            let path = self.project_dir.join(&relative);
            write_private(&path, &secret.value)?;
            debug!(key = %secret.key, path = %path.display(), "wrote file variable");

            secret.value = relative.to_string_lossy().into_owned();
            files.push(path);
        }

        self.save(&project)?;
        info!(variables = project.len(), files = files.len(), "imported remote variables");

        Ok(ImportReport {
            variables: project.len(),
            files,
        })
    }

    /// Rewrite the file to mirror the remote while keeping declarations
    /// that still resolve to the remote value.
    ///
    /// # Errors
    ///
    /// Returns error if loading, resolving or fetching fails. The file is
    /// not touched on failure.
    pub fn pull(&self, remote: &dyn RemoteStore) -> Result<PullReport> {
        let local = self.load()?;
        let injected = self.inject(&local)?;
        let fetched = remote.fetch(local.project_id)?;

        let reconciler = Reconciler::new(&local, &injected, &fetched)?;
        let pulled = reconciler.pull();
        let report = PullReport {
            variables: pulled.len(),
            blanked: reconciler.stale(),
            dropped: reconciler.local_only(),
        };

        self.save(&pulled)?;
        info!(
            variables = report.variables,
            blanked = report.blanked.len(),
            dropped = report.dropped.len(),
            "pulled remote variables"
        );
        Ok(report)
    }

    /// Classify local changes against the remote.
    ///
    /// # Errors
    ///
    /// Returns error if loading, resolving or fetching fails, or a key is
    /// not a valid GitLab variable name.
    pub fn plan_push(&self, remote: &dyn RemoteStore) -> Result<PendingPush> {
        let local = self.load()?;
        validation::validate_project(&local)?;
        let injected = self.inject(&local)?;
        let fetched = remote.fetch(local.project_id)?;

        let plan = reconcile::plan_push(&local, &injected, &fetched)?;
        debug!(
            create = plan.create.len(),
            update = plan.update.len(),
            delete = plan.delete.len(),
            unchanged = plan.unchanged.len(),
            "push planned"
        );

        Ok(PendingPush {
            project_id: local.project_id,
            plan,
        })
    }

    /// Execute the actions `confirm` approves, in plan order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing remote call or confirmation and returns
    /// its error; later actions are not executed.
    pub fn apply<F>(
        &self,
        pending: &PendingPush,
        remote: &dyn RemoteStore,
        mut confirm: F,
    ) -> Result<PushReport>
    where
        F: FnMut(&Action<'_>) -> Result<bool>,
    {
        let mut report = PushReport::default();
        let project_id = pending.project_id;

        for action in pending.plan.actions() {
            if !confirm(&action)? {
                debug!(action = action.verb(), variable = %action.identity(), "skipped");
                report.skipped += 1;
                continue;
            }

            match action {
                Action::Create(secret) => {
                    remote.create(project_id, secret)?;
                    report.created += 1;
                }
                Action::Update(update) => {
                    remote.update(project_id, &update.local)?;
                    report.updated += 1;
                }
                Action::Delete(secret) => {
                    remote.delete(project_id, &secret.key, &secret.environment_scope)?;
                    report.deleted += 1;
                }
            }
            info!(action = action.verb(), variable = %action.identity(), "applied");
        }

        Ok(report)
    }

    /// Compare resolved local values with the remote.
    ///
    /// # Errors
    ///
    /// Returns error if loading, resolving or fetching fails.
    pub fn diff(&self, remote: &dyn RemoteStore) -> Result<Diff> {
        let local = self.load()?;
        let injected = self.inject(&local)?;
        let fetched = remote.fetch(local.project_id)?;

        reconcile::compare(&injected, &fetched)
    }
}

/// Find the project id: an explicit value, then the id of an existing
/// variables file, then the git `origin` remote looked up on the store.
///
/// # Errors
///
/// Returns `RemoteError` if detection or lookup fails.
pub fn resolve_project_id(
    explicit: Option<ProjectId>,
    workspace: &Workspace,
    remote: &dyn RemoteStore,
    cache: &mut LookupCache,
    cache_scope: &str,
) -> Result<ProjectId> {
    if let Some(id) = explicit {
        return Ok(id);
    }

    if workspace.exists() {
        let id = workspace.load()?.project_id;
        debug!(project_id = id, "using project id from variables file");
        return Ok(id);
    }

    let path = git::origin_project_path(workspace.project_dir())?;
    if let Some(id) = cache.project_id(cache_scope, &path) {
        debug!(project_id = id, path = %path, "project id from cache");
        return Ok(id);
    }

    let id = remote.lookup_project(&path)?;
    cache.set_project_id(cache_scope, &path, id);
    info!(project_id = id, path = %path, "detected project");
    Ok(id)
}

/// `variables/<KEY>_<base64url(scope)>`
fn file_variable_path(secret: &Secret) -> PathBuf {
    let scope = URL_SAFE.encode(secret.environment_scope.as_bytes());
    Path::new(constants::FILE_VARIABLES_DIR).join(format!("{}_{}", secret.key, scope))
}

/// Write a file readable only by the owner.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, contents)?;
    }

    Ok(())
}
