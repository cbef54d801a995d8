use std::path::PathBuf;

use super::secret::IdentityKey;

/// Result of a pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    /// Variables in the rewritten file
    pub variables: usize,
    /// Variables whose local declaration no longer matches the remote and
    /// were blanked
    pub blanked: Vec<IdentityKey>,
    /// Local variables the remote does not have, removed from the file
    pub dropped: Vec<IdentityKey>,
}

/// Result of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Variables written to the file
    pub variables: usize,
    /// Files written for `file` variables
    pub files: Vec<PathBuf>,
}
