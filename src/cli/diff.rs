//! Diff command - show resolved local values that differ from the remote.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::cli::context::Context;
use crate::cli::{output, GlobalArgs};
use crate::core::domain::{DiffEntry, EntryStatus};
use crate::error::Result;

/// Context lines around each change in file diffs.
const CONTEXT_LINES: &str = "8";

/// Print every variable whose resolved value differs from the remote.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(global)?;
    let remote = ctx.gitlab()?;
    let diff = ctx.workspace.diff(&remote)?;

    let settings_only = diff
        .entries()
        .iter()
        .filter(|e| !e.is_changed() && e.metadata_changed())
        .count();

    let changed = diff.changed();
    if changed.is_empty() {
        output::success(&format!("values in sync ({} variables)", diff.len()));
        note_settings(settings_only);
        return Ok(());
    }

    for entry in &changed {
        let subject = format!("{} ({})", entry.key(), entry.environment_scope());
        match entry.status() {
            EntryStatus::LocalOnly => output::change('+', &subject, Some("local only")),
            EntryStatus::RemoteOnly => output::change('-', &subject, Some("remote only")),
            _ => output::change('~', &subject, Some("modified")),
        }

        if entry.is_file() {
            print!("{}", unified(entry)?);
        }
    }

    println!();
    output::dimmed(&format!("{} of {} variables differ", changed.len(), diff.len()));
    note_settings(settings_only);
    Ok(())
}

fn note_settings(count: usize) {
    if count > 0 {
        output::dimmed(&format!(
            "{} variable(s) differ only in settings (protect, mask, ...)",
            count
        ));
    }
}

/// Unified diff of the remote content against the local content.
fn unified(entry: &DiffEntry) -> Result<String> {
    let (remote, local) = (entry.remote_value(), entry.local_value());

    if which::which("diff").is_err() {
        debug!("diff not found, using line listing");
        return Ok(listing(remote, local));
    }

    let mut before = NamedTempFile::new()?;
    before.write_all(remote.as_bytes())?;
    let mut after = NamedTempFile::new()?;
    after.write_all(local.as_bytes())?;

    let result = Command::new("diff")
        .arg("-U")
        .arg(CONTEXT_LINES)
        .args(["--label", "remote", "--label", "local"])
        .arg(before.path())
        .arg(after.path())
        .output()?;

    // diff exits 1 when the inputs differ
    match result.status.code() {
        Some(0) | Some(1) => Ok(String::from_utf8_lossy(&result.stdout).into_owned()),
        _ => {
            debug!(
                stderr = %String::from_utf8_lossy(&result.stderr),
                "diff failed, using line listing"
            );
            Ok(listing(remote, local))
        }
    }
}

fn listing(remote: &str, local: &str) -> String {
    let mut out = String::from("--- remote\n+++ local\n");
    for line in remote.lines() {
        out.push_str(&format!("-{}\n", line));
    }
    for line in local.lines() {
        out.push_str(&format!("+{}\n", line));
    }
    out
}
