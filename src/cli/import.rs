//! Import command - copy remote values into the variables file.

use dialoguer::Confirm;
use tracing::info;

use crate::cli::context::{display_path, Context};
use crate::cli::{output, GlobalArgs};
use crate::core::types::ProjectId;
use crate::error::Result;

/// Overwrite the variables file with the remote variables and values.
pub fn execute(global: &GlobalArgs, project_id: Option<ProjectId>, yes: bool) -> Result<()> {
    let ctx = Context::load(global)?;
    let remote = ctx.gitlab()?;
    let project_id = ctx.project_id(project_id, &remote)?;

    if ctx.workspace.exists() && !yes {
        let overwrite = Confirm::new()
            .with_prompt(format!("Overwrite {}?", ctx.file_display()))
            .default(false)
            .interact()?;
        if !overwrite {
            output::dimmed("aborted");
            return Ok(());
        }
    }

    info!(project_id, "running import");
    let report = ctx.workspace.import(project_id, &remote)?;

    output::success(&format!(
        "imported {} variable(s) into {}",
        report.variables,
        output::path(&ctx.file_display())
    ));
    for file in &report.files {
        output::list_item(&output::path(&display_path(file)));
    }
    output::warn("the file now holds secret values, replace them with references before committing");
    Ok(())
}
