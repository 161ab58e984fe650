//! Source validation
//!
//! Walks a parsed source tree, checks its shape and builds a
//! [`SourceDocument`]. Validation collects ALL issues (doesn't stop at the
//! first) so a single run reports everything that needs fixing, each with
//! the key path of the offending field.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{ContentGlob, KNOWN_KEYS, PluginReference, SourceDocument};
use crate::config::value::{Scalar, ThemeMap, ThemeValue};
use crate::error::{Severity, ValidationIssue};

use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

// ============================================================================
// Public API
// ============================================================================

/// Result of validating a source tree.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// The validated document; `None` when there are errors.
    pub document: Option<SourceDocument>,

    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

/// Source validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    max_depth: usize,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a root mapping and returns the result.
    ///
    /// The root must already be known to be a mapping; anything else is a
    /// malformed source and is rejected by the loader before this point.
    pub fn validate(&mut self, root: &Mapping, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();
        self.max_depth = limits.max_depth;

        self.check_unknown_keys(root);
        let (content_globs, content_key) = self.validate_content(root);
        let (theme_replacements, theme_extensions) = self.validate_theme(root.get("theme"));
        let plugins = self.validate_plugins(root.get("plugins"));

        let document = self.errors.is_empty().then(|| SourceDocument {
            content_globs,
            content_key,
            theme_replacements,
            theme_extensions,
            plugins,
        });

        ValidationResult {
            document,
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Top Level
    // ========================================================================

    fn check_unknown_keys(&mut self, root: &Mapping) {
        for key in root.keys() {
            if let Some(name) = key.as_str()
                && !KNOWN_KEYS.contains(&name)
            {
                self.add_warning(&child_path("", name), "Unrecognized key is ignored");
            }
        }
    }

    // ========================================================================
    // Content Globs
    // ========================================================================

    fn validate_content(&mut self, root: &Mapping) -> (Vec<ContentGlob>, String) {
        match (root.get("contentGlobs"), root.get("content")) {
            (Some(_), Some(_)) => {
                self.add_error(
                    "content",
                    "Cannot have both 'contentGlobs' and 'content'; use one of them",
                );
                (Vec::new(), "contentGlobs".to_string())
            }
            (Some(globs), None) => (self.validate_globs(globs, "contentGlobs"), "contentGlobs".to_string()),
            (None, Some(Value::Mapping(content))) => match content.get("files") {
                Some(files) => (self.validate_globs(files, "content.files"), "content.files".to_string()),
                None => {
                    self.add_error("content.files", "Missing required field 'files'");
                    (Vec::new(), "content.files".to_string())
                }
            },
            (None, Some(content)) => (self.validate_globs(content, "content"), "content".to_string()),
            (None, None) => {
                self.add_error("contentGlobs", "Missing required field 'contentGlobs'");
                (Vec::new(), "contentGlobs".to_string())
            }
        }
    }

    fn validate_globs(&mut self, value: &Value, path: &str) -> Vec<ContentGlob> {
        let Value::Sequence(items) = value else {
            self.add_error(
                path,
                &format!("Expected a sequence of glob patterns, got {}", describe(value)),
            );
            return Vec::new();
        };

        let mut globs: Vec<ContentGlob> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = index_path(path, index);
            let Some(raw) = item.as_str() else {
                self.add_error(
                    &item_path,
                    &format!("Expected a string glob pattern, got {}", describe(item)),
                );
                continue;
            };
            if raw.trim().is_empty() {
                self.add_error(&item_path, "Glob pattern cannot be empty");
                continue;
            }
            match ContentGlob::new(raw) {
                Ok(glob) => {
                    if globs.iter().any(|g| g.as_str() == raw) {
                        self.add_warning(&item_path, &format!("Duplicate glob pattern '{raw}'"));
                    }
                    globs.push(glob);
                }
                Err(e) => self.add_error(&item_path, &format!("Invalid glob pattern '{raw}': {e}")),
            }
        }
        globs
    }

    // ========================================================================
    // Theme
    // ========================================================================

    fn validate_theme(&mut self, theme: Option<&Value>) -> (ThemeMap, ThemeMap) {
        let mut replacements = ThemeMap::new();
        let mut extensions = ThemeMap::new();

        let theme = match theme {
            None => return (replacements, extensions),
            Some(Value::Mapping(theme)) => theme,
            Some(other) => {
                self.add_error("theme", &format!("Expected a mapping, got {}", describe(other)));
                return (replacements, extensions);
            }
        };

        for (key, value) in theme {
            let Some(name) = self.mapping_key(key, "theme") else {
                continue;
            };
            let path = child_path("theme", &name);
            if name == "extend" {
                extensions = self.validate_sections(value, "theme.extend");
            } else if self.is_unique_key(&replacements, &name, &path)
                && let Some(section) = self.validate_section(value, &path)
            {
                replacements.insert(name, section);
            }
        }

        (replacements, extensions)
    }

    fn validate_sections(&mut self, value: &Value, path: &str) -> ThemeMap {
        let Value::Mapping(sections) = value else {
            self.add_error(path, &format!("Expected a mapping, got {}", describe(value)));
            return ThemeMap::new();
        };

        let mut map = ThemeMap::new();
        for (key, section) in sections {
            let Some(name) = self.mapping_key(key, path) else {
                continue;
            };
            let section_path = child_path(path, &name);
            if self.is_unique_key(&map, &name, &section_path)
                && let Some(section) = self.validate_section(section, &section_path)
            {
                map.insert(name, section);
            }
        }
        map
    }

    fn validate_section(&mut self, value: &Value, path: &str) -> Option<ThemeValue> {
        if !value.is_mapping() {
            self.add_error(
                path,
                &format!("Theme section must be a mapping, got {}", describe(value)),
            );
            return None;
        }
        self.convert(value, path, 1)
    }

    /// Converts a YAML node into a theme value, recording every issue below it.
    fn convert(&mut self, value: &Value, path: &str, depth: usize) -> Option<ThemeValue> {
        let is_container = value.is_mapping() || value.is_sequence();
        if is_container && depth > self.max_depth {
            self.add_error(
                path,
                &format!("Nesting exceeds the maximum depth of {}", self.max_depth),
            );
            return None;
        }

        match value {
            Value::Null => {
                self.add_error(path, "Null is not a valid theme value");
                None
            }
            Value::Bool(b) => Some(ThemeValue::Scalar(Scalar::Bool(*b))),
            Value::Number(n) => Some(ThemeValue::Scalar(Scalar::Number(n.clone()))),
            Value::String(s) => Some(ThemeValue::Scalar(Scalar::String(s.clone()))),
            Value::Sequence(items) => {
                let mut converted = Vec::with_capacity(items.len());
                let mut complete = true;
                for (index, item) in items.iter().enumerate() {
                    match self.convert(item, &index_path(path, index), depth + 1) {
                        Some(v) => converted.push(v),
                        None => complete = false,
                    }
                }
                complete.then_some(ThemeValue::Sequence(converted))
            }
            Value::Mapping(entries) => {
                let mut map = ThemeMap::new();
                let mut complete = true;
                for (key, entry) in entries {
                    let Some(name) = self.mapping_key(key, path) else {
                        complete = false;
                        continue;
                    };
                    let entry_path = child_path(path, &name);
                    if !self.is_unique_key(&map, &name, &entry_path) {
                        complete = false;
                        continue;
                    }
                    match self.convert(entry, &entry_path, depth + 1) {
                        Some(v) => {
                            map.insert(name, v);
                        }
                        None => complete = false,
                    }
                }
                complete.then_some(ThemeValue::Mapping(map))
            }
            Value::Tagged(tagged) => {
                self.add_error(
                    path,
                    &format!("YAML tags are not supported (found '{}')", tagged.tag),
                );
                None
            }
        }
    }

    /// Returns a mapping key as a string. Numeric keys are accepted and
    /// stringified; anything else is an error at `parent`.
    fn mapping_key(&mut self, key: &Value, parent: &str) -> Option<String> {
        match key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => {
                self.add_error(
                    parent,
                    &format!("Mapping keys must be strings, got {}", describe(other)),
                );
                None
            }
        }
    }

    /// Numeric keys are stringified, so `1` and `'1'` land on the same
    /// entry. Records an error at `path` when `name` is already taken.
    fn is_unique_key(&mut self, map: &ThemeMap, name: &str, path: &str) -> bool {
        if map.contains_key(name) {
            self.add_error(path, &format!("Duplicate key '{name}' after normalization"));
            return false;
        }
        true
    }

    // ========================================================================
    // Plugins
    // ========================================================================

    fn validate_plugins(&mut self, plugins: Option<&Value>) -> Vec<PluginReference> {
        let items = match plugins {
            None => return Vec::new(),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                self.add_error(
                    "plugins",
                    &format!("Expected a sequence of plugin references, got {}", describe(other)),
                );
                return Vec::new();
            }
        };

        let mut references = Vec::with_capacity(items.len());
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (index, item) in items.iter().enumerate() {
            let path = index_path("plugins", index);
            let Some(reference) = self.validate_plugin_reference(item, &path) else {
                continue;
            };

            if let Some(first) = first_seen.get(&reference.name) {
                self.add_error(
                    &path,
                    &format!(
                        "Duplicate plugin reference '{}' (first listed at plugins[{first}])",
                        reference.name
                    ),
                );
                continue;
            }
            first_seen.insert(reference.name.clone(), index);
            references.push(reference);
        }

        references
    }

    fn validate_plugin_reference(&mut self, item: &Value, path: &str) -> Option<PluginReference> {
        match item {
            Value::String(name) => self.plugin_name(name, path).map(PluginReference::named),
            Value::Mapping(entry) => {
                for key in entry.keys() {
                    if !matches!(key.as_str(), Some("name" | "options")) {
                        self.add_error(
                            path,
                            &format!(
                                "Unknown key {} in plugin reference (expected 'name' and optional 'options')",
                                describe(key)
                            ),
                        );
                    }
                }

                let name = match entry.get("name") {
                    Some(Value::String(name)) => self.plugin_name(name, &child_path(path, "name")),
                    Some(other) => {
                        self.add_error(
                            &child_path(path, "name"),
                            &format!("Expected a string, got {}", describe(other)),
                        );
                        None
                    }
                    None => {
                        self.add_error(&child_path(path, "name"), "Missing required field 'name'");
                        None
                    }
                };

                let options_path = child_path(path, "options");
                let options = match entry.get("options") {
                    None => Some(ThemeMap::new()),
                    Some(value @ Value::Mapping(_)) => match self.convert(value, &options_path, 1) {
                        Some(ThemeValue::Mapping(map)) => Some(map),
                        _ => None,
                    },
                    Some(other) => {
                        self.add_error(
                            &options_path,
                            &format!("Expected a mapping, got {}", describe(other)),
                        );
                        None
                    }
                };

                Some(PluginReference::with_options(name?, options?))
            }
            other => {
                self.add_error(
                    path,
                    &format!(
                        "Expected a plugin name or {{ name, options }}, got {}",
                        describe(other)
                    ),
                );
                None
            }
        }
    }

    fn plugin_name(&mut self, name: &str, path: &str) -> Option<String> {
        if name.trim().is_empty() {
            self.add_error(path, "Plugin name cannot be empty");
            return None;
        }
        Some(name.to_string())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Key Paths
// ============================================================================

/// Appends a mapping key to a key path.
///
/// Plain identifiers use dot notation (`theme.extend`); anything else is
/// quoted in brackets (`a["&:hover"]`).
#[must_use]
pub fn child_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    match (parent.is_empty(), plain) {
        (true, true) => key.to_string(),
        (false, true) => format!("{parent}.{key}"),
        (_, false) => format!("{parent}[{key:?}]"),
    }
}

/// Appends a sequence index to a key path.
#[must_use]
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ============================================================================
// Tests
// ============================================================================
