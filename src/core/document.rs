//! Variables file.
//!
//! Reads and writes the storage document: the nested tree form, as
//! pretty-printed JSON with `project_id` and `variables`.

use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::core::domain::{NestedProjectSecrets, ProjectSecrets};
use crate::core::nesting;
use crate::error::{ConfigError, Result, StructuralError};

/// Parse a document from JSON text.
///
/// # Errors
///
/// Returns `StructuralError::Parse` on malformed JSON.
pub fn parse(contents: &str) -> Result<NestedProjectSecrets> {
    serde_json::from_str(contents).map_err(|e| StructuralError::Parse(e).into())
}

/// Render a collection as document text, in canonical order.
///
/// # Errors
///
/// Returns `StructuralError::Serialize` if encoding fails.
pub fn render(project: &ProjectSecrets) -> Result<String> {
    let nested = nesting::encode(&project.clone().ordered());
    let mut contents = serde_json::to_string_pretty(&nested).map_err(StructuralError::Serialize)?;
    contents.push('\n');
    Ok(contents)
}

/// Load and decode the variables file.
///
/// # Errors
///
/// Returns `ConfigError::NotInitialized` if the file does not exist,
/// `StructuralError` if it is malformed or incomplete, and
/// `ValidationError::DuplicateIdentity` on repeated variables.
pub fn load(path: &Path) -> Result<ProjectSecrets> {
    debug!(path = %path.display(), "loading variables file");

    if !path.exists() {
        return Err(ConfigError::NotInitialized(path.to_path_buf()).into());
    }
    let contents = std::fs::read_to_string(path)?;
    let project = nesting::decode(&parse(&contents)?)?;

    debug!(
        project_id = project.project_id,
        variables = project.len(),
        "variables file loaded"
    );
    Ok(project)
}

/// Encode and write the variables file.
///
/// The file is replaced atomically; a failed save leaves the previous
/// content in place.
///
/// # Errors
///
/// Returns error if encoding or writing fails.
pub fn save(path: &Path, project: &ProjectSecrets) -> Result<()> {
    debug!(path = %path.display(), variables = project.len(), "saving variables file");

    let contents = render(project)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
