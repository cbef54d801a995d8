//! Domain types.

mod diff;
mod nested;
mod plan;
mod project;
mod secret;
mod sync;

pub use diff::{Diff, DiffEntry, EntryStatus};
pub use nested::{NestedProjectSecrets, NestedSecret};
pub use plan::{Action, PushPlan, PushReport, Update};
pub use project::ProjectSecrets;
pub use secret::{IdentityKey, Secret, VariableType};
pub use sync::{ImportReport, PullReport};
