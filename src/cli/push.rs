//! Push command - apply local changes to the remote.

use dialoguer::Confirm;

use crate::cli::context::Context;
use crate::cli::{output, GlobalArgs};
use crate::core::domain::Action;
use crate::error::Result;

/// Create, update and delete remote variables, confirming each unless
/// `yes` is set.
pub fn execute(global: &GlobalArgs, yes: bool) -> Result<()> {
    let ctx = Context::load(global)?;
    let remote = ctx.gitlab()?;
    let pending = ctx.workspace.plan_push(&remote)?;

    if pending.plan.is_empty() {
        output::success("remote already matches, nothing to push");
        return Ok(());
    }

    output::section(&format!(
        "{} change(s) for project {}",
        pending.plan.len(),
        pending.project_id
    ));

    let report = ctx.workspace.apply(&pending, &remote, |action| {
        show(action);
        if yes {
            return Ok(true);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("{} {}?", capitalize(action.verb()), action.identity()))
            .default(false)
            .interact()?;
        Ok(confirmed)
    })?;

    println!();
    output::success(&format!(
        "{} created, {} updated, {} deleted",
        report.created, report.updated, report.deleted
    ));
    if report.skipped > 0 {
        output::dimmed(&format!("{} skipped", report.skipped));
    }
    Ok(())
}

fn show(action: &Action<'_>) {
    let subject = action.identity().to_string();
    match action {
        Action::Create(secret) => {
            output::change('+', &subject, Some(secret.variable_type.as_str()))
        }
        Action::Update(update) => {
            let fields = update.changed_fields().join(", ");
            output::change('~', &subject, Some(&fields))
        }
        Action::Delete(_) => output::change('-', &subject, None),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
