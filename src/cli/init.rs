//! Init command - create the variables file from the remote.

use tracing::info;

use crate::cli::context::Context;
use crate::cli::{output, GlobalArgs};
use crate::core::types::ProjectId;
use crate::error::{ConfigError, Result};

/// Create the variables file and pull the project's variables into it.
pub fn execute(global: &GlobalArgs, project_id: Option<ProjectId>) -> Result<()> {
    let ctx = Context::load(global)?;
    if ctx.workspace.exists() {
        return Err(ConfigError::AlreadyInitialized(ctx.workspace.path().to_path_buf()).into());
    }

    let remote = ctx.gitlab()?;
    let project_id = ctx.project_id(project_id, &remote)?;
    info!(project_id, "running init");

    let report = ctx.workspace.init(project_id, &remote)?;

    output::success(&format!("created {}", output::path(&ctx.file_display())));
    output::kv("project:  ", project_id);
    output::kv("variables:", report.variables);
    if report.variables > 0 {
        output::hint("values are blank until you fill in references, then run: credder push");
    }
    Ok(())
}
