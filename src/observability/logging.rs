//! Subscriber setup for the `tailcfg` binary.
//!
//! Events go to stderr so `show` and `check --format json` keep stdout
//! clean for machine consumption.

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::args::ColorChoice;

/// Environment variable holding an `EnvFilter` directive. Overrides `-v`.
pub const LOG_LEVEL_ENV: &str = "TAILCFG_LOG_LEVEL";

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, colored when the terminal allows it.
    #[default]
    Human,
    /// Newline-delimited JSON objects.
    Json,
}

/// Logging flags as collected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Number of `-v` flags
    pub verbosity: u8,
    /// `-q`: nothing is logged, whatever the environment says
    pub quiet: bool,
    pub color: ColorChoice,
}

impl LogSettings {
    /// Level used when no directive is set in the environment. Loader
    /// warnings are `warn` events, so they are visible without `-v`.
    #[must_use]
    pub const fn default_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::OFF;
        }
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn ansi(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.quiet {
            return EnvFilter::new("off");
        }
        EnvFilter::builder()
            .with_default_directive(self.default_level().into())
            .with_env_var(LOG_LEVEL_ENV)
            .from_env_lossy()
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init_logging(settings: LogSettings) {
    let human = (settings.format == LogFormat::Human).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(settings.ansi())
            .with_target(settings.verbosity >= 2)
    });
    let json = (settings.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(settings.filter())
        .with(human)
        .with(json)
        .try_init();
}
