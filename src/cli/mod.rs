//! Command-line interface.

pub mod completions;
pub mod context;
pub mod diff;
pub mod format;
pub mod import;
pub mod init;
pub mod output;
pub mod pull;
pub mod push;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::ProjectId;

/// Credder - Keep GitLab CI/CD variables in sync with a versioned file.
#[derive(Parser)]
#[command(
    name = "credder",
    about = "Keep GitLab CI/CD variables in sync with a versioned file",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Variables file [default: gitlab_variables.json]
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// GitLab personal access token (falls back to GITLAB_TOKEN)
    #[arg(short = 'g', long, env = "GL_PAT", global = true, hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// GitLab instance URL [default: https://gitlab.com]
    #[arg(long, env = "CREDDER_GITLAB_URL", global = true)]
    pub gitlab_url: Option<String>,

    /// Command that resolves secret references, or `none` [default: op inject]
    #[arg(long, env = "CREDDER_RESOLVER", global = true)]
    pub resolver: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the variables file from the project's remote variables
    Init {
        /// GitLab project id (detected from the origin remote if omitted)
        #[arg(short, long)]
        project_id: Option<ProjectId>,
    },

    /// Overwrite the variables file with remote values, secrets included
    Import {
        /// GitLab project id (detected if omitted)
        #[arg(short, long)]
        project_id: Option<ProjectId>,
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Update the variables file from the remote
    Pull,

    /// Create, update and delete remote variables to match the file
    Push {
        /// Apply every change without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show variables whose resolved value differs from the remote
    Diff,

    /// Rewrite the variables file in canonical form
    Format,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    use Command::*;

    let global = cli.global;
    match cli.command {
        Init { project_id } => init::execute(&global, project_id),
        Import { project_id, yes } => import::execute(&global, project_id, yes),
        Pull => pull::execute(&global),
        Push { yes } => push::execute(&global, yes),
        Diff => diff::execute(&global),
        Format => format::execute(&global),
        Completions { shell } => completions::execute(shell),
    }
}
