//! Diff type.
//!
//! Represents the value-level comparison between the resolved local
//! variables and the remote ones.

use super::secret::{IdentityKey, Secret};

/// The sync state of a single variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Present on both sides with matching values.
    Synced,
    /// Present on both sides but values differ.
    Modified,
    /// Declared locally but not on the remote.
    LocalOnly,
    /// Present on the remote but not declared locally.
    RemoteOnly,
}

/// A single entry in a diff comparison.
#[derive(Debug, Clone)]
pub struct DiffEntry {
    identity: IdentityKey,
    local: Option<Secret>,
    remote: Option<Secret>,
    status: EntryStatus,
}

impl DiffEntry {
    /// Create an entry from whichever sides are present.
    ///
    /// At least one side must be present.
    pub fn new(identity: IdentityKey, local: Option<Secret>, remote: Option<Secret>) -> Self {
        let status = match (&local, &remote) {
            (Some(l), Some(r)) if l.value == r.value => EntryStatus::Synced,
            (Some(_), Some(_)) => EntryStatus::Modified,
            (Some(_), None) => EntryStatus::LocalOnly,
            (None, _) => EntryStatus::RemoteOnly,
        };
        Self {
            identity,
            local,
            remote,
            status,
        }
    }

    pub fn identity(&self) -> &IdentityKey {
        &self.identity
    }

    /// The variable key.
    pub fn key(&self) -> &str {
        &self.identity.key
    }

    /// The environment scope.
    pub fn environment_scope(&self) -> &str {
        &self.identity.environment_scope
    }

    pub fn status(&self) -> &EntryStatus {
        &self.status
    }

    pub fn local(&self) -> Option<&Secret> {
        self.local.as_ref()
    }

    pub fn remote(&self) -> Option<&Secret> {
        self.remote.as_ref()
    }

    /// Resolved local value, empty when not declared locally.
    pub fn local_value(&self) -> &str {
        self.local.as_ref().map(|s| s.value.as_str()).unwrap_or("")
    }

    /// Remote value, empty when absent remotely.
    pub fn remote_value(&self) -> &str {
        self.remote.as_ref().map(|s| s.value.as_str()).unwrap_or("")
    }

    /// Whether the two values differ, treating absence as empty.
    pub fn is_changed(&self) -> bool {
        self.local_value() != self.remote_value()
    }

    /// Whether either side is a `file` variable.
    pub fn is_file(&self) -> bool {
        self.local.iter().chain(self.remote.iter()).any(|s| s.is_file())
    }

    /// Whether both sides exist and differ outside the value.
    pub fn metadata_changed(&self) -> bool {
        match (&self.local, &self.remote) {
            (Some(l), Some(r)) => !l.same_metadata(r),
            _ => false,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self.status, EntryStatus::Synced)
    }
}

/// The full diff between local and remote variables.
#[derive(Debug)]
pub struct Diff {
    entries: Vec<DiffEntry>,
}

impl Diff {
    /// Build from entries; they are sorted into canonical order.
    pub fn from_entries(mut entries: Vec<DiffEntry>) -> Self {
        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        Self { entries }
    }

    /// All entries.
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Entries whose values differ (absence counts as empty).
    pub fn changed(&self) -> Vec<&DiffEntry> {
        self.entries.iter().filter(|e| e.is_changed()).collect()
    }

    /// Only entries with a given status.
    pub fn with_status(&self, status: EntryStatus) -> Vec<&DiffEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    /// Whether no value differs.
    pub fn is_synced(&self) -> bool {
        self.entries.iter().all(|e| !e.is_changed())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::VariableType;

    fn entry(local: Option<&str>, remote: Option<&str>) -> DiffEntry {
        DiffEntry::new(
            IdentityKey::new("KEY", "*"),
            local.map(|v| Secret::new("KEY", v, "*")),
            remote.map(|v| Secret::new("KEY", v, "*")),
        )
    }

    #[test]
    fn test_entry_status() {
        assert_eq!(*entry(Some("a"), Some("a")).status(), EntryStatus::Synced);
        assert_eq!(*entry(Some("a"), Some("b")).status(), EntryStatus::Modified);
        assert_eq!(*entry(Some("a"), None).status(), EntryStatus::LocalOnly);
        assert_eq!(*entry(None, Some("b")).status(), EntryStatus::RemoteOnly);
    }

    #[test]
    fn test_absence_compares_as_empty() {
        assert!(!entry(Some(""), None).is_changed());
        assert!(entry(Some("x"), None).is_changed());
        assert!(!entry(None, Some("")).is_changed());
    }

    #[test]
    fn test_metadata_changed() {
        let mut remote = Secret::new("KEY", "a", "*");
        remote.protect = false;
        let e = DiffEntry::new(
            IdentityKey::new("KEY", "*"),
            Some(Secret::new("KEY", "a", "*")),
            Some(remote),
        );

        assert!(e.is_synced());
        assert!(e.metadata_changed());
    }

    #[test]
    fn test_is_file_either_side() {
        let mut remote = Secret::new("KEY", "a", "*");
        remote.variable_type = VariableType::File;
        let e = DiffEntry::new(IdentityKey::new("KEY", "*"), None, Some(remote));
        assert!(e.is_file());
    }

    #[test]
    fn test_diff_sorted_and_filtered() {
        let diff = Diff::from_entries(vec![
            DiffEntry::new(
                IdentityKey::new("B", "*"),
                Some(Secret::new("B", "1", "*")),
                Some(Secret::new("B", "1", "*")),
            ),
            DiffEntry::new(
                IdentityKey::new("A", "*"),
                Some(Secret::new("A", "1", "*")),
                Some(Secret::new("A", "2", "*")),
            ),
        ]);

        assert_eq!(diff.entries()[0].key(), "A");
        assert_eq!(diff.changed().len(), 1);
        assert_eq!(diff.with_status(EntryStatus::Synced).len(), 1);
        assert!(!diff.is_synced());
    }
}
