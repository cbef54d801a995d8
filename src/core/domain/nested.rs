//! Storage-tree types.
//!
//! The on-disk form of a project. Every field but the key is optional:
//! a field set on a parent is shared by all of its children, a field left
//! out must be set on each child. Absent fields are never serialized, so
//! presence alone carries the grouping.

use serde::{Deserialize, Serialize};

use super::secret::VariableType;
use crate::core::types::ProjectId;

/// A storage-tree node.
///
/// Without children it is one concrete variable. With children it is a
/// group sharing its key and whatever fields are set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedSecret {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    #[serde(rename = "env", default, skip_serializing_if = "Option::is_none")]
    pub environment_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<NestedSecret>,
}

impl NestedSecret {
    /// Whether this node stands for a group rather than one variable.
    pub fn is_group(&self) -> bool {
        !self.nested.is_empty()
    }

    /// Names of the fields this node leaves unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.value.is_none() {
            missing.push("value");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.variable_type.is_none() {
            missing.push("type");
        }
        if self.environment_scope.is_none() {
            missing.push("env");
        }
        if self.protect.is_none() {
            missing.push("protect");
        }
        if self.mask.is_none() {
            missing.push("mask");
        }
        if self.raw.is_none() {
            missing.push("raw");
        }
        missing
    }
}

/// The storage document: `project_id` plus the variable tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedProjectSecrets {
    pub project_id: ProjectId,
    #[serde(default)]
    pub variables: Vec<NestedSecret>,
}
