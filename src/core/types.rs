//! Type aliases for domain concepts.

/// A GitLab project id.
pub type ProjectId = u64;

/// A GitLab project path (e.g., `group/subgroup/project`).
pub type ProjectPath = String;
