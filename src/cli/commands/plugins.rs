//! `plugins` command: lists the registered plugins.

use crate::cli::args::{OutputFormat, PluginsArgs};
use crate::error::TailcfgError;
use crate::plugin::PluginRegistry;

/// Print the built-in plugin registry.
///
/// # Errors
///
/// Returns a JSON error if the listing cannot be serialized.
pub fn run(args: &PluginsArgs) -> Result<(), TailcfgError> {
    let registry = PluginRegistry::builtin();

    match args.format {
        OutputFormat::Human => {
            for descriptor in registry.descriptors() {
                println!(
                    "{:<14} {:<28} {}",
                    descriptor.name, descriptor.package, descriptor.description
                );
            }
        }
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = registry
                .descriptors()
                .map(|d| {
                    serde_json::json!({
                        "name": d.name,
                        "package": d.package,
                        "description": d.description,
                        "themeSections": (d.theme_defaults)().keys().collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
