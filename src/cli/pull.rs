//! Pull command - update the variables file from the remote.

use crate::cli::context::Context;
use crate::cli::{output, GlobalArgs};
use crate::error::Result;

/// Rewrite the variables file to mirror the remote.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(global)?;
    let remote = ctx.gitlab()?;
    let report = ctx.workspace.pull(&remote)?;

    if !report.blanked.is_empty() {
        output::warn(&format!(
            "{} value(s) no longer match the remote and were cleared:",
            report.blanked.len()
        ));
        for id in &report.blanked {
            output::list_item(&format!("{} ({})", output::key(&id.key), id.environment_scope));
        }
    }

    if !report.dropped.is_empty() {
        output::warn(&format!(
            "{} variable(s) not on the remote were removed:",
            report.dropped.len()
        ));
        for id in &report.dropped {
            output::list_item(&format!("{} ({})", output::key(&id.key), id.environment_scope));
        }
    }

    output::success(&format!(
        "pulled {} variable(s) into {}",
        report.variables,
        output::path(&ctx.file_display())
    ));
    Ok(())
}
