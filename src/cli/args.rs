//! CLI argument definitions
//!
//! All Clap derive structs for `tailcfg` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::loader::{
    ConfigLimits, ConfigLoader, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SOURCE_BYTES, LoaderOptions,
};
use crate::observability::{LogFormat, LogSettings};

// ============================================================================
// Root CLI
// ============================================================================

/// Check and inspect utility-CSS configuration files.
#[derive(Parser, Debug)]
#[command(name = "tailcfg", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TAILCFG_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,

    /// Reject configuration sources larger than this many bytes.
    #[arg(
        long,
        global = true,
        env = "TAILCFG_MAX_SOURCE_BYTES",
        default_value_t = DEFAULT_MAX_SOURCE_BYTES
    )]
    pub max_source_bytes: usize,

    /// Reject theme trees nested deeper than this.
    #[arg(long, global = true, env = "TAILCFG_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl Cli {
    /// Logging flags for [`init_logging`](crate::observability::init_logging).
    #[must_use]
    pub const fn log_settings(&self) -> LogSettings {
        LogSettings {
            format: self.log_format,
            verbosity: self.verbose,
            quiet: self.quiet,
            color: self.color,
        }
    }

    /// A loader with the built-in registry and the limits given on the
    /// command line or in the environment.
    #[must_use]
    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::new(LoaderOptions {
            limits: ConfigLimits {
                max_source_bytes: self.max_source_bytes,
                max_depth: self.max_depth,
            },
            ..LoaderOptions::default()
        })
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration files.
    Check(CheckArgs),

    /// Print the normalized configuration.
    Show(ShowArgs),

    /// List registered plugins.
    Plugins(PluginsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Subcommand Arguments
// ============================================================================

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file to load.
    #[arg(env = "TAILCFG_CONFIG")]
    pub file: Option<PathBuf>,

    /// Document format for the printed configuration.
    #[arg(short, long, default_value = "json")]
    pub format: DocumentFormat,
}

/// Arguments for `plugins`.
#[derive(Args, Debug)]
pub struct PluginsArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Serialization used by `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DocumentFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}
