//! Plugin registry and resolution.
//!
//! Plugins are referenced by name in the source. Each name is resolved
//! against a registry of statically-known factories, so a typo fails at
//! load time instead of deep inside the generation engine.
//!
//! # Precedence
//!
//! [`PluginRegistry::resolve_plugins`] preserves reference order. When two
//! plugins emit conflicting utility classes, the one listed **later** wins.
//!
//! # Built-in plugins
//!
//! | Name | Package | Options |
//! |------|---------|---------|
//! | [`FormsPlugin`] | `@tailwindcss/forms` | `strategy: base \| class` |
//! | [`TypographyPlugin`] | `@tailwindcss/typography` | `className: <string>` |
//! | [`AspectRatioPlugin`] | `@tailwindcss/aspect-ratio` | none |

mod builtin;

pub use builtin::{AspectRatioPlugin, FormsPlugin, FormsStrategy, TypographyPlugin};

use crate::config::merge::merge_theme_extensions;
use crate::config::schema::PluginReference;
use crate::config::value::ThemeMap;
use crate::error::{ConfigError, Severity, ValidationIssue};

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

// ============================================================================
// Core Traits
// ============================================================================

/// A configured plugin instance.
///
/// Instances are created by a [`PluginFactory`] from the options given in
/// the source and are immutable afterwards.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Registered short name (e.g. `"forms"`).
    fn name(&self) -> &'static str;

    /// Normalized options, with factory defaults filled in.
    fn options(&self) -> ThemeMap {
        ThemeMap::new()
    }
}

/// Builds a plugin instance from its source options.
pub type PluginFactory = fn(&ThemeMap) -> Result<Arc<dyn Plugin>, OptionError>;

/// An invalid plugin option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionError {
    /// Offending option key, or `None` for the options mapping as a whole
    pub key: Option<String>,
    /// What was wrong
    pub message: String,
}

impl OptionError {
    /// Error attached to a single option key.
    #[must_use]
    pub fn at(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: Some(key.to_string()),
            message: message.into(),
        }
    }
}

/// A registry entry: names, default theme contribution and factory.
#[derive(Debug, Clone, Copy)]
pub struct PluginDescriptor {
    /// Short name used in references
    pub name: &'static str,
    /// Scoped package name, also accepted in references
    pub package: &'static str,
    /// One-line description for listings
    pub description: &'static str,
    /// Theme sections this plugin contributes to the defaults
    pub theme_defaults: fn() -> ThemeMap,
    /// Instance factory
    pub factory: PluginFactory,
}

impl PluginDescriptor {
    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.package == name
    }
}

// ============================================================================
// Plugin Handle
// ============================================================================

/// A resolved plugin, as stored in a `Configuration`.
///
/// Two handles are equal when they name the same plugin with the same
/// normalized options.
#[derive(Debug, Clone)]
pub struct PluginHandle {
    reference: String,
    plugin: Arc<dyn Plugin>,
}

impl PluginHandle {
    /// Registered short name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.plugin.name()
    }

    /// The name exactly as written in the source.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The plugin instance.
    #[must_use]
    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }
}

impl PartialEq for PluginHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.plugin.options() == other.plugin.options()
    }
}

impl Serialize for PluginHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PluginReference::with_options(self.name(), self.plugin.options()).serialize(serializer)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Maps plugin names to statically-known factories.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in plugins.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin::DESCRIPTORS {
            registry.register(*descriptor);
        }
        registry
    }

    /// Registers a plugin. A descriptor with the same short name replaces
    /// the earlier one in place.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> &mut Self {
        if let Some(existing) = self
            .descriptors
            .iter_mut()
            .find(|d| d.name == descriptor.name)
        {
            *existing = descriptor;
        } else {
            self.descriptors.push(descriptor);
        }
        self
    }

    /// Finds a descriptor by short or package name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.answers_to(name))
    }

    /// Registered descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    /// The default theme: every plugin's contribution, merged in
    /// registration order.
    #[must_use]
    pub fn default_theme(&self) -> ThemeMap {
        self.descriptors
            .iter()
            .fold(ThemeMap::new(), |theme, descriptor| {
                merge_theme_extensions(&theme, &(descriptor.theme_defaults)())
            })
    }

    /// Resolves references to handles, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SchemaViolation`] when two references name the
    /// same plugin, [`ConfigError::UnknownPlugin`] for the first reference
    /// with no registered factory, or [`ConfigError::SchemaViolation`] when
    /// a factory rejects its options.
    pub fn resolve_plugins(
        &self,
        references: &[PluginReference],
    ) -> Result<Vec<PluginHandle>, ConfigError> {
        self.resolve_for("plugin references", references)
    }

    pub(crate) fn resolve_for(
        &self,
        origin: &str,
        references: &[PluginReference],
    ) -> Result<Vec<PluginHandle>, ConfigError> {
        self.check_aliases(origin, references)?;

        references
            .iter()
            .enumerate()
            .map(|(index, reference)| -> Result<PluginHandle, ConfigError> {
                let key_path = format!("plugins[{index}]");
                let descriptor =
                    self.get(&reference.name)
                        .ok_or_else(|| ConfigError::UnknownPlugin {
                            name: reference.name.clone(),
                            key_path: key_path.clone(),
                            suggestion: self.suggest(&reference.name),
                        })?;

                let plugin = (descriptor.factory)(&reference.options).map_err(|e| {
                    let path = match e.key {
                        Some(key) => format!("{key_path}.options.{key}"),
                        None => format!("{key_path}.options"),
                    };
                    ConfigError::SchemaViolation {
                        origin: origin.to_string(),
                        issues: vec![ValidationIssue {
                            path,
                            message: e.message,
                            severity: Severity::Error,
                        }],
                    }
                })?;

                tracing::debug!(plugin = descriptor.name, %key_path, "resolved plugin");
                Ok(PluginHandle {
                    reference: reference.name.clone(),
                    plugin,
                })
            })
            .collect()
    }

    /// Rejects two references that name the same plugin, e.g. `forms` and
    /// `@tailwindcss/forms`. Runs before any factory so a duplicate is
    /// reported ahead of an unknown name further down the list.
    fn check_aliases(&self, origin: &str, references: &[PluginReference]) -> Result<(), ConfigError> {
        let mut first_seen: HashMap<&'static str, usize> = HashMap::new();
        let issues: Vec<ValidationIssue> = references
            .iter()
            .enumerate()
            .filter_map(|(index, reference)| {
                let descriptor = self.get(&reference.name)?;
                match first_seen.get(descriptor.name).copied() {
                    Some(first) => Some(ValidationIssue {
                        path: format!("plugins[{index}]"),
                        message: format!(
                            "Duplicate plugin reference '{}' resolves to '{}' (first listed at plugins[{first}])",
                            reference.name, descriptor.name
                        ),
                        severity: Severity::Error,
                    }),
                    None => {
                        first_seen.insert(descriptor.name, index);
                        None
                    }
                }
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::SchemaViolation {
                origin: origin.to_string(),
                issues,
            })
        }
    }

    /// Suggests a registered name for a likely typo.
    #[must_use]
    pub fn suggest(&self, input: &str) -> Option<String> {
        self.descriptors
            .iter()
            .flat_map(|d| [d.name, d.package])
            .map(|name| (name, strsim::damerau_levenshtein(input, name)))
            .filter(|(_, dist)| *dist <= SUGGESTION_DISTANCE)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name.to_string())
    }
}

/// Resolves `references` against `registry`. See
/// [`PluginRegistry::resolve_plugins`].
///
/// # Errors
///
/// Same as [`PluginRegistry::resolve_plugins`].
pub fn resolve_plugins(
    registry: &PluginRegistry,
    references: &[PluginReference],
) -> Result<Vec<PluginHandle>, ConfigError> {
    registry.resolve_plugins(references)
}

// ============================================================================
// Tests
// ============================================================================
