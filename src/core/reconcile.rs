//! Reconciliation engine.
//!
//! Three-way comparison between the local declarations, their resolved
//! form, and the remote variables. Every collection is indexed by identity
//! key first; a key missing from an index reads as an empty value.
//!
//! Nothing here performs I/O. Each call is a pure function of its inputs.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::domain::{
    Diff, DiffEntry, IdentityKey, ProjectSecrets, PushPlan, Secret, Update,
};
use crate::core::validation;
use crate::error::{ResolveError, Result};

type Index<'a> = BTreeMap<IdentityKey, &'a Secret>;

/// The three collections of one sync, indexed by identity key.
#[derive(Debug)]
pub struct Reconciler<'a> {
    local: &'a ProjectSecrets,
    local_index: Index<'a>,
    injected_index: Index<'a>,
    remote_index: Index<'a>,
}

impl<'a> Reconciler<'a> {
    /// Index the local, injected and remote collections.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateIdentity` if any collection has two
    /// variables with the same key and environment scope.
    pub fn new(
        local: &'a ProjectSecrets,
        injected: &'a ProjectSecrets,
        remote: &'a ProjectSecrets,
    ) -> Result<Self> {
        validation::ensure_unique(local)?;
        validation::ensure_unique(injected)?;
        validation::ensure_unique(remote)?;

        Ok(Self {
            local,
            local_index: local.index(),
            injected_index: injected.index(),
            remote_index: remote.index(),
        })
    }

    /// Rewrite the local collection to mirror the remote.
    ///
    /// For every remote variable, the local declaration is kept when it
    /// resolves to exactly the remote value; otherwise the value is
    /// blanked. Remote values are never copied in. All other fields come
    /// from the remote, and variables the remote lacks are dropped.
    pub fn pull(&self) -> ProjectSecrets {
        let variables = self
            .remote_index
            .iter()
            .map(|(id, remote)| {
                let injected = value_of(&self.injected_index, id);
                let value = if injected == remote.value {
                    value_of(&self.local_index, id).to_string()
                } else {
                    String::new()
                };

                Secret {
                    value,
                    ..(*remote).clone()
                }
            })
            .collect();

        ProjectSecrets::new(self.local.project_id, variables)
    }

    /// Remote variables whose local declaration does not resolve to the
    /// remote value. A pull blanks these.
    pub fn stale(&self) -> Vec<IdentityKey> {
        self.remote_index
            .iter()
            .filter(|(id, remote)| value_of(&self.injected_index, id) != remote.value)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Local variables the remote does not have. A pull drops these.
    pub fn local_only(&self) -> Vec<IdentityKey> {
        self.local_index
            .keys()
            .filter(|id| !self.remote_index.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Classify every variable into create/update/delete candidates.
    ///
    /// Candidates carry the resolved record, so references never reach the
    /// remote. Overlapping variables identical in all eight fields are
    /// listed as unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::ShapeMismatch` if the resolved collection does
    /// not hold exactly the local identity keys.
    pub fn plan_push(&self) -> Result<PushPlan> {
        self.check_shape()?;

        let mut plan = PushPlan::default();

        for (id, injected) in &self.injected_index {
            match self.remote_index.get(id) {
                None => plan.create.push((*injected).clone()),
                Some(remote) if injected.equal(remote) => plan.unchanged.push(id.clone()),
                Some(remote) => plan.update.push(Update {
                    local: (*injected).clone(),
                    remote: (*remote).clone(),
                }),
            }
        }

        plan.delete = self
            .remote_index
            .iter()
            .filter(|(id, _)| !self.local_index.contains_key(*id))
            .map(|(_, remote)| (*remote).clone())
            .collect();

        Ok(plan)
    }

    /// Pair resolved local and remote variables over the union of keys.
    pub fn diff(&self) -> Diff {
        diff(&self.injected_index, &self.remote_index)
    }

    fn check_shape(&self) -> Result<()> {
        let local: BTreeSet<_> = self.local_index.keys().collect();
        let injected: BTreeSet<_> = self.injected_index.keys().collect();

        if let Some(id) = local.difference(&injected).next() {
            return Err(ResolveError::ShapeMismatch(format!("{} missing from output", id)).into());
        }
        if let Some(id) = injected.difference(&local).next() {
            return Err(ResolveError::ShapeMismatch(format!("{} not declared locally", id)).into());
        }
        Ok(())
    }
}

fn value_of<'a>(index: &Index<'a>, id: &IdentityKey) -> &'a str {
    index.get(id).copied().map(|s| s.value.as_str()).unwrap_or("")
}

fn diff(local: &Index<'_>, remote: &Index<'_>) -> Diff {
    let ids: BTreeSet<&IdentityKey> = local.keys().chain(remote.keys()).collect();

    let entries = ids
        .into_iter()
        .map(|id| {
            DiffEntry::new(
                id.clone(),
                local.get(id).map(|s| (*s).clone()),
                remote.get(id).map(|s| (*s).clone()),
            )
        })
        .collect();

    Diff::from_entries(entries)
}

/// Pull semantics as a single call. See [`Reconciler::pull`].
///
/// # Errors
///
/// Returns `ValidationError::DuplicateIdentity` on duplicate identity keys.
pub fn pull(
    local: &ProjectSecrets,
    injected: &ProjectSecrets,
    remote: &ProjectSecrets,
) -> Result<ProjectSecrets> {
    Ok(Reconciler::new(local, injected, remote)?.pull())
}

/// Push classification as a single call. See [`Reconciler::plan_push`].
///
/// # Errors
///
/// Returns `ValidationError::DuplicateIdentity` on duplicate identity keys
/// and `ResolveError::ShapeMismatch` if `injected` does not match `local`.
pub fn plan_push(
    local: &ProjectSecrets,
    injected: &ProjectSecrets,
    remote: &ProjectSecrets,
) -> Result<PushPlan> {
    Reconciler::new(local, injected, remote)?.plan_push()
}

/// Read-only comparison of resolved local and remote values.
///
/// # Errors
///
/// Returns `ValidationError::DuplicateIdentity` on duplicate identity keys.
pub fn compare(injected: &ProjectSecrets, remote: &ProjectSecrets) -> Result<Diff> {
    validation::ensure_unique(injected)?;
    validation::ensure_unique(remote)?;
    Ok(diff(&injected.index(), &remote.index()))
}
