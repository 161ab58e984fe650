//! Configuration loader
//!
//! This module implements the configuration loading pipeline:
//! 1. Read the source (single read; size checked first)
//! 2. Parse YAML or JSON into a mapping with string keys
//! 3. Validate the shape, collecting every issue with its key path
//! 4. Reject an empty `contentGlobs`
//! 5. Resolve the theme: defaults, section replacements, extensions
//! 6. Resolve plugin references through the registry
//! 7. Freeze with `Arc`

use crate::config::merge::resolve_theme;
use crate::config::schema::Configuration;
use crate::config::validation::Validator;
use crate::config::value::ThemeMap;
use crate::error::ConfigError;
use crate::plugin::PluginRegistry;

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
///
/// Defaults and the plugin registry are passed in explicitly so tests can
/// inject synthetic ones.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Default theme the source's theme is merged over.
    pub defaults: Arc<ThemeMap>,

    /// Registry used to resolve plugin references.
    pub registry: Arc<PluginRegistry>,

    /// Limits for source size and nesting.
    pub limits: ConfigLimits,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        let registry = PluginRegistry::builtin();
        Self {
            defaults: Arc::new(registry.default_theme()),
            registry: Arc::new(registry),
            limits: ConfigLimits::default(),
        }
    }
}

/// Limits on source size to keep loading cheap and bounded.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum source size in bytes.
    pub max_source_bytes: usize,

    /// Maximum nesting depth of a theme section or plugin options.
    pub max_depth: usize,
}

/// Default source size limit (1 MiB).
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 1024 * 1024;

/// Default nesting limit for theme trees and plugin options.
pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Syntax of a source artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// YAML (also accepts JSON documents)
    #[default]
    Yaml,
    /// Strict JSON
    Json,
}

impl SourceFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Where a configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A file on disk; format follows the extension.
    Path(PathBuf),

    /// In-memory text.
    Text {
        /// Label used in diagnostics
        name: String,
        /// Source text
        contents: String,
        /// Source syntax
        format: SourceFormat,
    },
}

impl ConfigSource {
    /// In-memory YAML (or JSON) text.
    #[must_use]
    pub fn text(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            contents: contents.into(),
            format: SourceFormat::Yaml,
        }
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub fn origin(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Text { name, .. } => name.clone(),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded, validated and frozen configuration.
    pub config: Arc<Configuration>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Key path where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
///
/// Holds no state between calls: each [`load`](Self::load) is an
/// independent, deterministic transformation of its source.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with the built-in registry and
    /// its default theme.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// The loader's options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_path(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        self.load(&ConfigSource::Path(path.to_path_buf()))
    }

    /// Loads a configuration from in-memory YAML or JSON text.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_str(&self, name: &str, contents: &str) -> Result<LoadResult, ConfigError> {
        self.load(&ConfigSource::text(name, contents))
    }

    /// Loads, validates and freezes a configuration.
    ///
    /// # Errors
    ///
    /// Returns exactly one error, checked in this order:
    /// - [`ConfigError::SourceUnreadable`] if the file cannot be read
    /// - [`ConfigError::MalformedSource`] if it does not parse into a
    ///   mapping with string keys, or exceeds the size limit
    /// - [`ConfigError::SchemaViolation`] if any field has the wrong shape
    ///   or a plugin is listed twice
    /// - [`ConfigError::EmptyContentGlobs`] if no content globs are given
    /// - [`ConfigError::UnknownPlugin`] if a plugin has no factory
    pub fn load(&self, source: &ConfigSource) -> Result<LoadResult, ConfigError> {
        let origin = source.origin();
        let limits = &self.options.limits;

        // Stage 1: Read
        let (text, format) = match source {
            ConfigSource::Path(path) => (read_source(path, limits)?, SourceFormat::from_path(path)),
            ConfigSource::Text {
                contents, format, ..
            } => {
                check_size(&origin, contents.len(), limits)?;
                (contents.clone(), *format)
            }
        };
        tracing::debug!(%origin, bytes = text.len(), ?format, "read configuration source");

        // Stage 2: Parse
        let root = parse_source(&text, format, &origin)?;

        // Stage 3: Validate
        let mut validator = Validator::new();
        let validation = validator.validate(&root, limits);

        let warnings: Vec<LoadWarning> = validation
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();
        for warning in &warnings {
            tracing::warn!(
                %origin,
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        let Some(document) = validation.document else {
            return Err(ConfigError::SchemaViolation {
                origin,
                issues: validation.errors,
            });
        };

        // Stage 4: Non-empty content
        if document.content_globs.is_empty() {
            return Err(ConfigError::EmptyContentGlobs {
                origin,
                key_path: document.content_key,
            });
        }

        // Stage 5: Theme
        let theme = resolve_theme(
            &self.options.defaults,
            &document.theme_replacements,
            &document.theme_extensions,
        );

        // Stage 6: Plugins
        let plugins = self.options.registry.resolve_for(&origin, &document.plugins)?;

        tracing::info!(
            %origin,
            globs = document.content_globs.len(),
            extended_sections = document.theme_extensions.len(),
            plugins = plugins.len(),
            "configuration loaded"
        );

        // Stage 7: Freeze
        Ok(LoadResult {
            config: Arc::new(Configuration::new(
                origin,
                document.content_globs,
                document.theme_extensions,
                theme,
                plugins,
            )),
            warnings,
        })
    }
}

// ============================================================================
// Reading and Parsing
// ============================================================================

fn read_source(path: &Path, limits: &ConfigLimits) -> Result<String, ConfigError> {
    let unreadable = |source| ConfigError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(unreadable)?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    check_size(&path.display().to_string(), size, limits)?;

    std::fs::read_to_string(path).map_err(unreadable)
}

fn check_size(origin: &str, size: usize, limits: &ConfigLimits) -> Result<(), ConfigError> {
    if size > limits.max_source_bytes {
        return Err(ConfigError::MalformedSource {
            origin: origin.to_string(),
            line: None,
            message: format!(
                "source is {size} bytes, exceeding the limit of {} bytes",
                limits.max_source_bytes
            ),
        });
    }
    Ok(())
}

/// Parses source text into its root mapping.
fn parse_source(text: &str, format: SourceFormat, origin: &str) -> Result<Mapping, ConfigError> {
    let malformed = |line: Option<usize>, message: String| ConfigError::MalformedSource {
        origin: origin.to_string(),
        line,
        message,
    };

    // Handle UTF-8 BOM
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Err(malformed(None, "source is empty".to_string()));
    }

    let root: Value = match format {
        SourceFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| malformed(e.location().map(|l| l.line()), e.to_string()))?,
        SourceFormat::Json => serde_json::from_str::<serde_json::Value>(text)
            .map(|json| json_to_yaml(&json))
            .map_err(|e| malformed(Some(e.line()), e.to_string()))?,
    };

    match root {
        Value::Mapping(map) => {
            if map.keys().any(|k| !k.is_string()) {
                return Err(malformed(None, "top-level keys must be strings".to_string()));
            }
            Ok(map)
        }
        Value::Null => Err(malformed(None, "source is empty".to_string())),
        _ => Err(malformed(
            None,
            "expected a mapping with string keys at the top level".to_string(),
        )),
    }
}

/// Converts a `serde_json::Value` to `serde_yaml::Value`.
fn json_to_yaml(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(serde_yaml::Number::from(f))
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => Value::Sequence(arr.iter().map(json_to_yaml).collect()),
        serde_json::Value::Object(obj) => {
            let map: Mapping = obj
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), json_to_yaml(v)))
                .collect();
            Value::Mapping(map)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::ThemeValue;

    fn small_limits() -> ConfigLimits {
        ConfigLimits {
            max_source_bytes: 64,
            max_depth: 64,
        }
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("tailwind.config")), SourceFormat::Yaml);
    }

    #[test]
    fn test_parse_strips_bom() {
        let root = parse_source("\u{feff}contentGlobs: ['*.html']", SourceFormat::Yaml, "t").unwrap();
        assert!(root.contains_key("contentGlobs"));
    }

    #[test]
    fn test_parse_empty_source() {
        for text in ["", "   \n", "~", "null"] {
            let err = parse_source(text, SourceFormat::Yaml, "t").unwrap_err();
            assert!(err.to_string().contains("empty"), "{text:?}: {err}");
        }
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        let err = parse_source("- a\n- b", SourceFormat::Yaml, "t").unwrap_err();
        assert_eq!(err.kind(), "malformed-source");
    }

    #[test]
    fn test_parse_rejects_non_string_top_level_keys() {
        let err = parse_source("1: a", SourceFormat::Yaml, "t").unwrap_err();
        assert!(err.to_string().contains("keys must be strings"));
    }

    #[test]
    fn test_parse_reports_yaml_line() {
        let err = parse_source("contentGlobs: ['a'\nplugins: [", SourceFormat::Yaml, "t").unwrap_err();
        match err {
            ConfigError::MalformedSource { line, .. } => assert!(line.is_some()),
            other => panic!("Expected MalformedSource, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_json() {
        let root = parse_source(
            r#"{"contentGlobs": ["*.html"], "plugins": ["forms"]}"#,
            SourceFormat::Json,
            "t.json",
        )
        .unwrap();
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_parse_invalid_json_reports_line() {
        let err = parse_source("{\n  \"contentGlobs\": [,]\n}", SourceFormat::Json, "t.json").unwrap_err();
        match err {
            ConfigError::MalformedSource { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("Expected MalformedSource, got {other:?}"),
        }
    }

    #[test]
    fn test_size_limit_applies_to_text() {
        let options = LoaderOptions {
            limits: small_limits(),
            ..LoaderOptions::default()
        };
        let loader = ConfigLoader::new(options);
        let text = format!("contentGlobs: ['{}']", "a".repeat(100));
        let err = loader.load_str("big", &text).unwrap_err();
        assert_eq!(err.kind(), "malformed-source");
        assert!(err.to_string().contains("exceeding the limit"));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let loader = ConfigLoader::with_defaults();
        let err = loader
            .load_path(Path::new("/nonexistent/tailcfg/config.yaml"))
            .unwrap_err();
        assert_eq!(err.kind(), "source-unreadable");
    }

    #[test]
    fn test_injected_defaults_are_used() {
        let defaults: ThemeMap = [(
            "colors".to_string(),
            ThemeValue::mapping([("ink", ThemeValue::from("#000"))]),
        )]
        .into_iter()
        .collect();
        let options = LoaderOptions {
            defaults: Arc::new(defaults),
            registry: Arc::new(PluginRegistry::new()),
            ..LoaderOptions::default()
        };
        let loader = ConfigLoader::new(options);
        let result = loader
            .load_str(
                "inline",
                "contentGlobs: ['*.html']\ntheme:\n  extend:\n    colors:\n      paper: '#fff'",
            )
            .unwrap();

        let config = result.config;
        assert_eq!(
            config.theme_value(&["colors", "ink"]).and_then(ThemeValue::as_str),
            Some("#000")
        );
        assert_eq!(
            config.theme_value(&["colors", "paper"]).and_then(ThemeValue::as_str),
            Some("#fff")
        );
        assert!(config.theme_value(&["typography"]).is_none());
    }

    #[test]
    fn test_warnings_are_returned() {
        let loader = ConfigLoader::with_defaults();
        let result = loader
            .load_str("inline", "contentGlobs: ['*.html']\nprefix: tw-")
            .unwrap();
        assert_eq!(
            result.warnings,
            [LoadWarning {
                message: "Unrecognized key is ignored".to_string(),
                location: Some("prefix".to_string()),
            }]
        );
    }

    #[test]
    fn test_json_to_yaml_conversion() {
        let json = serde_json::json!({
            "string": "hello",
            "number": 42,
            "float": 1.5,
            "bool": true,
            "array": [1, 2]
        });

        let yaml = json_to_yaml(&json);
        let map = yaml.as_mapping().unwrap();

        assert_eq!(map.get("string").unwrap(), &Value::String("hello".to_string()));
        assert_eq!(map.get("number").unwrap(), &Value::Number(42.into()));
        assert_eq!(map.get("bool").unwrap(), &Value::Bool(true));
        assert_eq!(map.get("array").unwrap().as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_config_limits_default() {
        let limits = ConfigLimits::default();
        assert_eq!(limits.max_source_bytes, DEFAULT_MAX_SOURCE_BYTES);
        assert_eq!(limits.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(DEFAULT_MAX_SOURCE_BYTES, 1024 * 1024);
    }
}
