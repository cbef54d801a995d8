//! Value injection.
//!
//! Turns local declarations into the literal values the remote should hold:
//! file-variable paths are replaced by file contents, and secret references
//! are substituted by a [`Resolver`].
//!
//! ## Resolvers
//!
//! - **command**: Pipes the collection as JSON through an external tool
//!   (`op inject` by default) and reads the substituted JSON back.
//! - **none**: Returns the collection unchanged, for projects that keep no
//!   references.

use std::path::Path;
use tracing::{debug, warn};

use crate::core::domain::ProjectSecrets;
use crate::error::Result;

mod command;

pub use command::CommandResolver;

/// Substitutes secret references with literal values.
///
/// Implementations return a collection of identical shape and fail as a
/// whole; a partially substituted collection is never returned.
pub trait Resolver {
    /// Short name for logs and messages.
    fn name(&self) -> &str;

    /// Resolve every reference in `project`.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if resolution fails for any variable.
    fn resolve(&self, project: &ProjectSecrets) -> Result<ProjectSecrets>;
}

/// Resolver that leaves every value as declared.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Resolver for Passthrough {
    fn name(&self) -> &str {
        "none"
    }

    fn resolve(&self, project: &ProjectSecrets) -> Result<ProjectSecrets> {
        Ok(project.clone())
    }
}

/// Build the resolver named by a settings value.
///
/// `none` (or an empty string) disables resolution; anything else is a
/// command line.
///
/// # Errors
///
/// Returns `ResolveError` if the command cannot be parsed.
pub fn from_command(command: &str) -> Result<Box<dyn Resolver>> {
    let trimmed = command.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Box::new(Passthrough));
    }
    Ok(Box::new(CommandResolver::parse(trimmed)?))
}

/// Replace each `file` variable's path with the file's content.
///
/// Relative paths are resolved against `base`. Empty values and unreadable
/// files are left unchanged. Content that is not UTF-8 is loaded with
/// invalid sequences replaced, since remote values are text.
pub fn materialize_files(project: &ProjectSecrets, base: &Path) -> ProjectSecrets {
    let mut materialized = project.clone();

    for secret in materialized.variables.iter_mut() {
        if !secret.is_file() || secret.value.is_empty() {
            continue;
        }

        let path = base.join(&secret.value);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(key = %secret.key, path = %path.display(), "loaded file variable");
                secret.value = match String::from_utf8(bytes) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(
                            key = %secret.key,
                            path = %path.display(),
                            "file variable is not valid UTF-8, replacing invalid bytes"
                        );
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
            }
            Err(e) => {
                warn!(
                    key = %secret.key,
                    path = %path.display(),
                    error = %e,
                    "could not load file variable, keeping path"
                );
            }
        }
    }

    materialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Secret, VariableType};
    use tempfile::TempDir;

    fn file_secret(key: &str, path: &str) -> Secret {
        let mut s = Secret::new(key, path, "*");
        s.variable_type = VariableType::File;
        s
    }

    #[test]
    fn test_materialize_reads_relative_path() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("variables")).unwrap();
        std::fs::write(tmp.path().join("variables/cert"), "-----BEGIN CERT-----\n").unwrap();

        let project = ProjectSecrets::new(
            1,
            vec![
                file_secret("CERT", "variables/cert"),
                Secret::new("PLAIN", "variables/cert", "*"),
            ],
        );

        let out = materialize_files(&project, tmp.path());
        assert_eq!(out.variables[0].value, "-----BEGIN CERT-----\n");
        assert_eq!(out.variables[1].value, "variables/cert");
    }

    #[test]
    fn test_materialize_loads_non_utf8_content() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("blob"), [b'o', b'k', 0xff, b'\n']).unwrap();

        let project = ProjectSecrets::new(1, vec![file_secret("BLOB", "blob")]);
        let out = materialize_files(&project, tmp.path());

        assert_eq!(out.variables[0].value, "ok\u{FFFD}\n");
    }

    #[test]
    fn test_materialize_skips_missing_and_empty() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectSecrets::new(
            1,
            vec![file_secret("GONE", "no/such/file"), file_secret("EMPTY", "")],
        );

        let out = materialize_files(&project, tmp.path());
        assert_eq!(out, project);
    }

    #[test]
    fn test_from_command_none_is_passthrough() {
        let resolver = from_command("none").unwrap();
        assert_eq!(resolver.name(), "none");

        let project = ProjectSecrets::new(1, vec![Secret::new("A", "op://x", "*")]);
        assert_eq!(resolver.resolve(&project).unwrap(), project);
    }
}
