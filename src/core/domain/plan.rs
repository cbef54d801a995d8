//! Push plan types.
//!
//! The classification a push produces. Executing it is the remote store's
//! job; nothing here touches the network.

use super::secret::{IdentityKey, Secret};

/// An overlapping variable whose local record differs from the remote one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Local record, with its resolved value.
    pub local: Secret,
    /// Current remote record.
    pub remote: Secret,
}

impl Update {
    /// Names of the fields that differ.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let (l, r) = (&self.local, &self.remote);
        let mut fields = Vec::new();
        if l.value != r.value {
            fields.push("value");
        }
        if l.description != r.description {
            fields.push("description");
        }
        if l.variable_type != r.variable_type {
            fields.push("type");
        }
        if l.protect != r.protect {
            fields.push("protect");
        }
        if l.mask != r.mask {
            fields.push("mask");
        }
        if l.raw != r.raw {
            fields.push("raw");
        }
        fields
    }
}

/// Create/update/delete candidates for a push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushPlan {
    /// Declared locally, absent remotely.
    pub create: Vec<Secret>,
    /// Present on both sides and different.
    pub update: Vec<Update>,
    /// Present remotely, not declared locally.
    pub delete: Vec<Secret>,
    /// Present on both sides and identical in every field.
    pub unchanged: Vec<IdentityKey>,
}

/// One step of a push, borrowed from its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Create(&'a Secret),
    Update(&'a Update),
    Delete(&'a Secret),
}

impl Action<'_> {
    /// The variable the action targets.
    pub fn identity(&self) -> IdentityKey {
        match self {
            Action::Create(s) | Action::Delete(s) => s.identity(),
            Action::Update(u) => u.remote.identity(),
        }
    }

    /// Verb for prompts and messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Create(_) => "create",
            Action::Update(_) => "update",
            Action::Delete(_) => "delete",
        }
    }
}

impl PushPlan {
    /// Every action in execution order: creates, updates, then deletes.
    pub fn actions(&self) -> impl Iterator<Item = Action<'_>> {
        self.create
            .iter()
            .map(Action::Create)
            .chain(self.update.iter().map(Action::Update))
            .chain(self.delete.iter().map(Action::Delete))
    }

    /// Whether there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    /// Number of actions (creates, updates and deletes).
    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }
}

/// What a push actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Candidates the user declined.
    pub skipped: usize,
}
