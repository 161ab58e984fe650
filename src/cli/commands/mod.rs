//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod check;
pub mod plugins;
pub mod show;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::{ConfigError, TailcfgError};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), TailcfgError> {
    let loader = cli.loader();
    match cli.command {
        Commands::Check(args) => check::run(&args, &loader),
        Commands::Show(args) => show::run(&args, &loader),
        Commands::Plugins(args) => plugins::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Renders an error for stderr: the kind, the message, and for schema
/// violations every offending key path.
#[must_use]
pub fn render_error(error: &TailcfgError) -> String {
    match error {
        TailcfgError::Config(config) => {
            let mut out = format!("error[{}]: {config}", config.kind());
            match config {
                ConfigError::SchemaViolation { issues, .. } => {
                    for issue in issues {
                        out.push_str(&format!("\n  --> {}: {}", issue.path, issue.message));
                    }
                }
                other => {
                    if let Some(path) = other.key_path() {
                        out.push_str(&format!("\n  --> {path}"));
                    }
                }
            }
            out
        }
        other => format!("error: {other}"),
    }
}
