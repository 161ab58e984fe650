//! `check` command: validates configuration files.

use std::path::Path;

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::loader::{ConfigLoader, LoadResult};
use crate::error::{ConfigError, Severity, TailcfgError, ValidationIssue};

/// Validate each file in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the loader's error for the first invalid file. With `--strict`,
/// warnings are reported as a schema violation.
pub fn run(args: &CheckArgs, loader: &ConfigLoader) -> Result<(), TailcfgError> {
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");

        let outcome = loader
            .load_path(path)
            .and_then(|loaded| enforce_strict(path, loaded, args.strict));

        if args.format == OutputFormat::Json {
            println!("{}", report(path, &outcome));
        }

        let loaded = outcome?;
        if args.format == OutputFormat::Human {
            let config = &loaded.config;
            println!(
                "ok: {} ({} content globs, {} plugins, {} warnings)",
                path.display(),
                config.content_globs().len(),
                config.plugins().len(),
                loaded.warnings.len()
            );
        }
    }

    Ok(())
}

fn enforce_strict(path: &Path, loaded: LoadResult, strict: bool) -> Result<LoadResult, ConfigError> {
    if !strict || loaded.warnings.is_empty() {
        return Ok(loaded);
    }
    Err(ConfigError::SchemaViolation {
        origin: path.display().to_string(),
        issues: loaded
            .warnings
            .into_iter()
            .map(|w| ValidationIssue {
                path: w.location.unwrap_or_default(),
                message: w.message,
                severity: Severity::Error,
            })
            .collect(),
    })
}

fn report(path: &Path, outcome: &Result<LoadResult, ConfigError>) -> serde_json::Value {
    match outcome {
        Ok(loaded) => serde_json::json!({
            "file": path.display().to_string(),
            "valid": true,
            "warnings": loaded
                .warnings
                .iter()
                .map(|w| serde_json::json!({ "location": w.location, "message": w.message }))
                .collect::<Vec<_>>(),
        }),
        Err(err) => serde_json::json!({
            "file": path.display().to_string(),
            "valid": false,
            "error": {
                "kind": err.kind(),
                "keyPath": err.key_path(),
                "message": err.to_string(),
            },
        }),
    }
}
