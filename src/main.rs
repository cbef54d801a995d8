//! Credder - Keep GitLab CI/CD variables in sync with a versioned file.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use credder::cli::output;
use credder::cli::{execute, Cli};
use credder::core::constants;
use credder::error::{ConfigError, Error, RemoteError, ResolveError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("credder=debug")
        } else {
            EnvFilter::new("credder=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::NotInitialized(_)) => Some("run: credder init"),
        Error::Config(ConfigError::AlreadyInitialized(_)) => Some("run: credder pull"),
        Error::Remote(RemoteError::MissingToken) => {
            Some("pass --gitlab-token or set GL_PAT / GITLAB_TOKEN")
        }
        Error::Remote(RemoteError::Unauthorized) => Some("check that the token is valid"),
        Error::Remote(RemoteError::ProjectDetection(_)) => Some("pass --project-id"),
        Error::Resolve(ResolveError::NotFound(_)) => {
            Some("install the resolver or pass --resolver none")
        }
        _ => None,
    }
}
