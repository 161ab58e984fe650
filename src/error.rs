//! Error types for `tailcfg`
//!
//! Every failure of the loading phase is terminal: callers receive exactly
//! one [`ConfigError`] and no partial configuration.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for the `tailcfg` binary.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (malformed source, schema violation, unknown plugin)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `tailcfg` operations.
#[derive(Debug, Error)]
pub enum TailcfgError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TailcfgError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::SourceUnreadable { .. }) => ExitCode::IO_ERROR,
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Json(_) | Self::Yaml(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// Each variant carries enough context (origin and key path) for a human
/// to locate and fix the offending part of the source.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source could not be parsed into a mapping with string keys.
    #[error("malformed source {origin}: {message}")]
    MalformedSource {
        /// Name of the source (file path or caller-supplied label)
        origin: String,
        /// Line number where parsing failed (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// A field is missing, has the wrong shape, or repeats a plugin.
    #[error("schema violation in {origin}: {}", summarize(issues))]
    SchemaViolation {
        /// Name of the source
        origin: String,
        /// Every error-severity issue found, in document order
        issues: Vec<ValidationIssue>,
    },

    /// `contentGlobs` parsed correctly but holds no patterns.
    #[error("no content globs in {origin}: '{key_path}' must list at least one pattern")]
    EmptyContentGlobs {
        /// Name of the source
        origin: String,
        /// Key path of the empty field
        key_path: String,
    },

    /// A plugin reference has no registered factory.
    #[error("unknown plugin '{name}' at {key_path}{}", suggestion_suffix(suggestion.as_deref()))]
    UnknownPlugin {
        /// Referenced plugin name
        name: String,
        /// Key path of the reference (e.g. "plugins[2]")
        key_path: String,
        /// Closest registered name, when one is near enough
        suggestion: Option<String>,
    },

    /// The source file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    SourceUnreadable {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Short, stable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedSource { .. } => "malformed-source",
            Self::SchemaViolation { .. } => "schema-violation",
            Self::EmptyContentGlobs { .. } => "empty-content-globs",
            Self::UnknownPlugin { .. } => "unknown-plugin",
            Self::SourceUnreadable { .. } => "source-unreadable",
        }
    }

    /// Key path of the offending field, when the error has one.
    ///
    /// For schema violations this is the path of the first issue.
    #[must_use]
    pub fn key_path(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { issues, .. } => issues.first().map(|i| i.path.as_str()),
            Self::EmptyContentGlobs { key_path, .. } | Self::UnknownPlugin { key_path, .. } => {
                Some(key_path)
            }
            Self::MalformedSource { .. } | Self::SourceUnreadable { .. } => None,
        }
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    match issues {
        [] => "no issues recorded".to_string(),
        [only] => format!("{} at {}", only.message, only.path),
        [first, rest @ ..] => format!(
            "{} at {} (and {} more)",
            first.message,
            first.path,
            rest.len()
        ),
    }
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking a source's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Key path to the problematic field (e.g., `plugins[1]`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the configuration from loading
    Error,
    /// Reported, but the configuration still loads
    Warning,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `tailcfg` operations.
pub type Result<T> = std::result::Result<T, TailcfgError>;

// ============================================================================
// Tests
// ============================================================================
