//! `show` command: prints the normalized configuration.

use crate::cli::args::{DocumentFormat, ShowArgs};
use crate::config::loader::ConfigLoader;
use crate::error::TailcfgError;

/// Load a configuration and print it.
///
/// # Errors
///
/// Returns a usage error when no file is given (argument or
/// `TAILCFG_CONFIG`), or the loader's error when the file is invalid.
pub fn run(args: &ShowArgs, loader: &ConfigLoader) -> Result<(), TailcfgError> {
    let Some(path) = args.file.as_deref() else {
        return Err(TailcfgError::Usage(
            "no configuration file given (pass a path or set TAILCFG_CONFIG)".to_string(),
        ));
    };

    tracing::info!(file = %path.display(), "loading configuration");
    let loaded = loader.load_path(path)?;

    let rendered = match args.format {
        DocumentFormat::Json => serde_json::to_string_pretty(loaded.config.as_ref())?,
        DocumentFormat::Yaml => serde_yaml::to_string(loaded.config.as_ref())?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
