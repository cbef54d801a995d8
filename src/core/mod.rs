//! Core library components.
//!
//! This module contains the reusable sync logic: the variable model, the
//! nesting codec, reconciliation, and the collaborators that load, resolve
//! and fetch variables.

pub mod cache;
pub mod config;
pub mod constants;
pub mod document;
pub mod domain;
pub mod git;
pub mod inject;
pub mod nesting;
pub mod reconcile;
pub mod remote;
pub mod types;
pub mod validation;
pub mod workspace;
