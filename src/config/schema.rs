//! Configuration schema types
//!
//! [`SourceDocument`] is the validated shape of a source artifact before
//! defaults are applied. [`Configuration`] is the normalized, frozen result
//! handed to the generation engine.

use crate::config::value::{ThemeMap, ThemeValue};
use crate::plugin::PluginHandle;

use serde::{Serialize, Serializer};
use std::path::Path;

// ============================================================================
// Source Document
// ============================================================================

/// Top-level keys recognized in a source artifact.
pub const KNOWN_KEYS: &[&str] = &["contentGlobs", "content", "theme", "plugins"];

/// A validated source artifact, before default merging.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Content glob patterns, in source order
    pub content_globs: Vec<ContentGlob>,

    /// Key path the globs were read from (`contentGlobs`, `content` or
    /// `content.files`)
    pub content_key: String,

    /// Sections given directly under `theme`; each replaces its default
    pub theme_replacements: ThemeMap,

    /// Sections under `theme.extend`; deep-merged over defaults
    pub theme_extensions: ThemeMap,

    /// Plugin references, in source order
    pub plugins: Vec<PluginReference>,
}

/// A plugin reference as written in the source.
///
/// Either a bare name (`"forms"`) or `{ name, options }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginReference {
    /// Registered name or scoped package name
    pub name: String,

    /// Factory options (empty when the bare-name form is used)
    #[serde(skip_serializing_if = "ThemeMap::is_empty")]
    pub options: ThemeMap,
}

impl PluginReference {
    /// Creates a reference without options.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ThemeMap::new(),
        }
    }

    /// Creates a reference with options.
    #[must_use]
    pub fn with_options(name: impl Into<String>, options: ThemeMap) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

// ============================================================================
// Content Globs
// ============================================================================

/// A compiled content glob.
///
/// Keeps the pattern exactly as written alongside its compiled form so the
/// scanner can match paths without recompiling.
#[derive(Debug, Clone)]
pub struct ContentGlob {
    raw: String,
    pattern: glob::Pattern,
}

impl ContentGlob {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns the glob crate's error when the pattern is not a valid glob.
    pub fn new(raw: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            raw: raw.to_string(),
            pattern: glob::Pattern::new(raw)?,
        })
    }

    /// The pattern exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if `path` is selected by this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches_path(path)
    }
}

impl PartialEq for ContentGlob {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Serialize for ContentGlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

// ============================================================================
// Normalized Configuration
// ============================================================================

/// The normalized, validated, immutable configuration.
///
/// Produced only by the loader. Fields are private; consumers read them
/// through accessors on a shared `Arc<Configuration>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    origin: String,
    content_globs: Vec<ContentGlob>,
    theme_extensions: ThemeMap,
    theme: ThemeMap,
    plugins: Vec<PluginHandle>,
}

impl Configuration {
    pub(crate) const fn new(
        origin: String,
        content_globs: Vec<ContentGlob>,
        theme_extensions: ThemeMap,
        theme: ThemeMap,
        plugins: Vec<PluginHandle>,
    ) -> Self {
        Self {
            origin,
            content_globs,
            theme_extensions,
            theme,
            plugins,
        }
    }

    /// Name of the source this configuration was loaded from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Content globs in source order. Never empty.
    #[must_use]
    pub fn content_globs(&self) -> &[ContentGlob] {
        &self.content_globs
    }

    /// Returns `true` if any content glob selects `path`.
    #[must_use]
    pub fn is_content_path(&self, path: &Path) -> bool {
        self.content_globs.iter().any(|g| g.matches(path))
    }

    /// Theme extensions exactly as supplied under `theme.extend`.
    #[must_use]
    pub const fn theme_extensions(&self) -> &ThemeMap {
        &self.theme_extensions
    }

    /// The resolved theme: defaults with replacements and extensions applied.
    #[must_use]
    pub const fn theme(&self) -> &ThemeMap {
        &self.theme
    }

    /// Looks up a value in the resolved theme.
    #[must_use]
    pub fn theme_value(&self, path: &[&str]) -> Option<&ThemeValue> {
        crate::config::value::lookup(&self.theme, path)
    }

    /// Resolved plugins in source order. Later plugins take precedence
    /// when they emit conflicting utilities.
    #[must_use]
    pub fn plugins(&self) -> &[PluginHandle] {
        &self.plugins
    }
}
