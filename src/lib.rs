//! Credder - Keep GitLab CI/CD variables in sync with a versioned file.
//!
//! Variables live in `gitlab_variables.json` next to the code. Values may
//! be secret references that a resolver (`op inject` by default) turns into
//! literal values just before they are compared with, or written to, the
//! remote.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create the variables file from the remote
//! │   ├── import        # Copy remote values into the file
//! │   ├── pull          # Mirror the remote, keeping matching references
//! │   ├── push          # Create/update/delete remote variables
//! │   ├── diff          # Show resolved local vs remote
//! │   ├── format        # Rewrite the file canonically
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── domain/       # Secret, collections, plans, diffs
//!     ├── nesting       # Factored tree encode/decode
//!     ├── reconcile     # Pull, push classification, diff
//!     ├── validation    # Keys and identity uniqueness
//!     ├── document      # Variables file read/write
//!     ├── inject/       # Resolver trait and command resolver
//!     ├── remote/       # RemoteStore trait and GitLab client
//!     ├── git           # Project path from the origin remote
//!     ├── cache         # Project id lookup cache
//!     ├── config        # .credder.toml and overrides
//!     └── workspace     # Command pipelines
//! ```
//!
//! # Features
//!
//! - Variables identified by key and environment scope
//! - Compact nested file format factoring shared fields
//! - Secret references resolved outside the file
//! - Interactive, per-variable confirmation on push

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::domain::{IdentityKey, ProjectSecrets, Secret, VariableType};
pub use crate::core::workspace::Workspace;
pub use crate::error::{Error, Result};
