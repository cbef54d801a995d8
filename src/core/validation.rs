//! Input validation for variable collections.
//!
//! Validates variable keys and identity-key uniqueness.

use std::collections::BTreeSet;

use crate::core::domain::ProjectSecrets;
use crate::error::{Result, ValidationError};

/// Longest key GitLab accepts.
const MAX_KEY_LEN: usize = 255;

/// Validate a variable key.
///
/// GitLab keys must be:
/// - Only A-Z, a-z, 0-9, and underscore
/// - At most 255 characters
/// - Not empty
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: format!("longer than {} characters", MAX_KEY_LEN),
        }
        .into());
    }

    if let Some((i, ch)) = key
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: format!(
                "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                ch,
                i + 1
            ),
        }
        .into());
    }

    Ok(())
}

/// Reject collections where two variables share (key, environment scope).
///
/// # Errors
///
/// Returns `ValidationError::DuplicateIdentity` naming the first repeat.
pub fn ensure_unique(project: &ProjectSecrets) -> Result<()> {
    let mut seen = BTreeSet::new();
    for secret in &project.variables {
        if !seen.insert(secret.identity()) {
            return Err(ValidationError::DuplicateIdentity {
                key: secret.key.clone(),
                environment_scope: secret.environment_scope.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate every key and identity uniqueness.
///
/// # Errors
///
/// Returns the first `ValidationError` found.
pub fn validate_project(project: &ProjectSecrets) -> Result<()> {
    for secret in &project.variables {
        validate_key(&secret.key)?;
    }
    ensure_unique(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Secret;
    use crate::error::Error;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("DATABASE_URL").is_ok());
        assert!(validate_key("api_key").is_ok());
        assert!(validate_key("_X1").is_ok());
        assert!(validate_key("1ST").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            validate_key(""),
            Err(Error::Validation(ValidationError::EmptyKey))
        ));
        assert!(validate_key("MY-KEY").is_err());
        assert!(validate_key("MY KEY").is_err());
        assert!(validate_key(&"A".repeat(256)).is_err());
    }

    #[test]
    fn test_ensure_unique_accepts_distinct_scopes() {
        let project = ProjectSecrets::new(
            1,
            vec![
                Secret::new("KEY", "a", "*"),
                Secret::new("KEY", "b", "production"),
            ],
        );
        assert!(ensure_unique(&project).is_ok());
    }

    #[test]
    fn test_ensure_unique_rejects_duplicate() {
        let project = ProjectSecrets::new(
            1,
            vec![
                Secret::new("KEY", "a", "production"),
                Secret::new("KEY", "b", "production"),
            ],
        );

        match ensure_unique(&project) {
            Err(Error::Validation(ValidationError::DuplicateIdentity {
                key,
                environment_scope,
            })) => {
                assert_eq!(key, "KEY");
                assert_eq!(environment_scope, "production");
            }
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_project_checks_keys() {
        let project = ProjectSecrets::new(1, vec![Secret::new("BAD-KEY", "a", "*")]);
        assert!(validate_project(&project).is_err());
    }
}
