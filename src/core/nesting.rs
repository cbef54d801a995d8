//! Nesting codec.
//!
//! Converts between the flat collection used for all logic and the factored
//! tree used on disk. Variables sharing a key are grouped under one parent;
//! each field whose value is identical across the whole group moves onto
//! the parent and is dropped from every child.
//!
//! `decode(encode(p))` equals `p` for any canonically ordered `p` with
//! unique identity keys.

use std::collections::HashMap;

use crate::core::domain::{NestedProjectSecrets, NestedSecret, ProjectSecrets, Secret};
use crate::core::validation;
use crate::error::{Result, StructuralError};

/// Flat collection to storage tree.
///
/// Groups appear in order of their key's first occurrence; members keep
/// their collection order.
pub fn encode(project: &ProjectSecrets) -> NestedProjectSecrets {
    let mut groups: Vec<Vec<&Secret>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for secret in &project.variables {
        match positions.get(secret.key.as_str()) {
            Some(&i) => groups[i].push(secret),
            None => {
                positions.insert(&secret.key, groups.len());
                groups.push(vec![secret]);
            }
        }
    }

    NestedProjectSecrets {
        project_id: project.project_id,
        variables: groups.iter().map(|g| encode_group(g)).collect(),
    }
}

fn encode_group(group: &[&Secret]) -> NestedSecret {
    let first = group[0];
    if group.len() == 1 {
        return leaf(first);
    }

    let parent = NestedSecret {
        key: first.key.clone(),
        value: common(group, |s| &s.value),
        description: common(group, |s| &s.description),
        variable_type: common(group, |s| &s.variable_type),
        environment_scope: common(group, |s| &s.environment_scope),
        protect: common(group, |s| &s.protect),
        mask: common(group, |s| &s.mask),
        raw: common(group, |s| &s.raw),
        nested: Vec::new(),
    };

    let nested = group
        .iter()
        .map(|s| NestedSecret {
            key: String::new(),
            value: own(&parent.value, &s.value),
            description: own(&parent.description, &s.description),
            variable_type: own(&parent.variable_type, &s.variable_type),
            environment_scope: own(&parent.environment_scope, &s.environment_scope),
            protect: own(&parent.protect, &s.protect),
            mask: own(&parent.mask, &s.mask),
            raw: own(&parent.raw, &s.raw),
            nested: Vec::new(),
        })
        .collect();

    NestedSecret { nested, ..parent }
}

fn leaf(secret: &Secret) -> NestedSecret {
    NestedSecret {
        key: secret.key.clone(),
        value: Some(secret.value.clone()),
        description: Some(secret.description.clone()),
        variable_type: Some(secret.variable_type),
        environment_scope: Some(secret.environment_scope.clone()),
        protect: Some(secret.protect),
        mask: Some(secret.mask),
        raw: Some(secret.raw),
        nested: Vec::new(),
    }
}

/// The field's value if every member of the group agrees on it.
fn common<T, F>(group: &[&Secret], field: F) -> Option<T>
where
    T: PartialEq + Clone,
    F: Fn(&Secret) -> &T,
{
    let first = field(group[0]);
    group
        .iter()
        .all(|s| field(s) == first)
        .then(|| first.clone())
}

/// A child keeps a field only when the parent did not factor it out.
fn own<T: Clone>(factored: &Option<T>, value: &T) -> Option<T> {
    match factored {
        Some(_) => None,
        None => Some(value.clone()),
    }
}

/// Storage tree to flat collection, in canonical order.
///
/// Children take their key from the parent and inherit every field the
/// parent sets.
///
/// # Errors
///
/// Returns `StructuralError` if a node has no key, a child has children of
/// its own, or a variable ends up without a required field, and `ValidationError::DuplicateIdentity` if
/// two variables share a key and environment scope. Nothing is returned
/// on failure.
pub fn decode(document: &NestedProjectSecrets) -> Result<ProjectSecrets> {
    let mut variables = Vec::new();

    for (position, node) in document.variables.iter().enumerate() {
        if node.key.is_empty() {
            return Err(StructuralError::MissingKey { position }.into());
        }

        if node.is_group() {
            for child in &node.nested {
                if child.is_group() {
                    return Err(StructuralError::UnexpectedNesting {
                        key: node.key.clone(),
                    }
                    .into());
                }
                variables.push(flatten(&node.key, child, Some(node))?);
            }
        } else {
            variables.push(flatten(&node.key, node, None)?);
        }
    }

    let project = ProjectSecrets::new(document.project_id, variables).ordered();
    validation::ensure_unique(&project)?;

    Ok(project)
}

fn flatten(key: &str, node: &NestedSecret, parent: Option<&NestedSecret>) -> Result<Secret> {
    Ok(Secret {
        key: key.to_string(),
        value: require(key, "value", pick(parent.map(|p| &p.value), &node.value))?,
        description: require(
            key,
            "description",
            pick(parent.map(|p| &p.description), &node.description),
        )?,
        variable_type: require(
            key,
            "type",
            pick(parent.map(|p| &p.variable_type), &node.variable_type),
        )?,
        environment_scope: require(
            key,
            "env",
            pick(parent.map(|p| &p.environment_scope), &node.environment_scope),
        )?,
        protect: require(key, "protect", pick(parent.map(|p| &p.protect), &node.protect))?,
        mask: require(key, "mask", pick(parent.map(|p| &p.mask), &node.mask))?,
        raw: require(key, "raw", pick(parent.map(|p| &p.raw), &node.raw))?,
    })
}

/// A value set on the parent applies to every child; otherwise the
/// node's own value is used.
fn pick<'a, T>(inherited: Option<&'a Option<T>>, own: &'a Option<T>) -> Option<&'a T> {
    inherited.and_then(Option::as_ref).or(own.as_ref())
}

fn require<T: Clone>(key: &str, field: &'static str, value: Option<&T>) -> Result<T> {
    value.cloned().ok_or_else(|| {
        StructuralError::IncompleteRecord {
            key: key.to_string(),
            field,
        }
        .into()
    })
}
