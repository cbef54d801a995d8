//! Command-backed resolver.
//!
//! Pipes the collection as JSON through an external tool and parses the
//! substituted JSON from its stdout. The default is the 1Password CLI:
//!
//! ```text
//! op inject
//! ```
//!
//! which replaces every `{{ op://vault/item/field }}` reference in its input.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::Resolver;
use crate::core::domain::{IdentityKey, ProjectSecrets};
use crate::error::{ResolveError, Result};

/// Resolver running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResolver {
    program: String,
    args: Vec<String>,
    display: String,
}

impl CommandResolver {
    /// Parse a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::EmptyCommand` for a blank command.
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ResolveError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
            display: command.trim().to_string(),
        })
    }

    /// Check the program is on PATH.
    fn check_program(&self) -> Result<()> {
        which::which(&self.program).map_err(|_| ResolveError::NotFound(self.program.clone()))?;
        Ok(())
    }

    fn run(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ResolveError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own thread so a resolver that streams its
        // output cannot block on a full stdout pipe. A resolver that exits
        // early closes its stdin; the exit status reports the real failure.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_vec();
            std::thread::spawn(move || match stdin.write_all(&input) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let output = child.wait_with_output().map_err(|source| ResolveError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if let Some(writer) = writer {
            let written = writer.join().map_err(|_| ResolveError::Spawn {
                program: self.program.clone(),
                source: std::io::Error::new(ErrorKind::Other, "stdin writer panicked"),
            })?;
            written.map_err(|source| ResolveError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        }

        if !output.status.success() {
            return Err(ResolveError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(output.stdout)
    }
}

impl Resolver for CommandResolver {
    fn name(&self) -> &str {
        &self.display
    }

    fn resolve(&self, project: &ProjectSecrets) -> Result<ProjectSecrets> {
        debug!(resolver = %self.display, variables = project.len(), "resolving secrets");

        self.check_program()?;

        let input = serde_json::to_vec_pretty(project).map_err(ResolveError::Encode)?;
        let output = self.run(&input)?;
        trace!(bytes = output.len(), "resolver finished");

        let resolved: ProjectSecrets =
            serde_json::from_slice(&output).map_err(ResolveError::Parse)?;
        let resolved = resolved.ordered();

        ensure_same_shape(&project.clone().ordered(), &resolved)?;

        Ok(resolved)
    }
}

fn ensure_same_shape(input: &ProjectSecrets, output: &ProjectSecrets) -> Result<()> {
    if input.project_id != output.project_id {
        return Err(ResolveError::ShapeMismatch(format!(
            "project id changed from {} to {}",
            input.project_id, output.project_id
        ))
        .into());
    }

    let before: Vec<IdentityKey> = input.variables.iter().map(|s| s.identity()).collect();
    let after: Vec<IdentityKey> = output.variables.iter().map(|s| s.identity()).collect();
    if before != after {
        return Err(ResolveError::ShapeMismatch(format!(
            "expected {} variables, got {}",
            before.len(),
            after.len()
        ))
        .into());
    }

    Ok(())
}
