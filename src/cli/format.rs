//! Format command - rewrite the variables file canonically.

use crate::cli::context::Context;
use crate::cli::{output, GlobalArgs};
use crate::error::Result;

/// Rewrite the variables file in canonical order and nesting.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(global)?;

    if ctx.workspace.format()? {
        output::success(&format!("formatted {}", output::path(&ctx.file_display())));
    } else {
        output::dimmed("already formatted");
    }
    Ok(())
}
