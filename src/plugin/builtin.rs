//! Built-in plugins.
//!
//! These carry only what the loader needs: option validation and the
//! theme sections each plugin contributes to the defaults. CSS output is
//! the generation engine's job.

use std::sync::Arc;

use crate::config::value::{ThemeMap, ThemeValue};
use crate::plugin::{OptionError, Plugin, PluginDescriptor};

pub(super) const DESCRIPTORS: &[PluginDescriptor] = &[
    PluginDescriptor {
        name: "forms",
        package: "@tailwindcss/forms",
        description: "Basic reset for form elements",
        theme_defaults: ThemeMap::new,
        factory: FormsPlugin::create,
    },
    PluginDescriptor {
        name: "typography",
        package: "@tailwindcss/typography",
        description: "Prose classes for rendered HTML",
        theme_defaults: TypographyPlugin::theme_defaults,
        factory: TypographyPlugin::create,
    },
    PluginDescriptor {
        name: "aspect-ratio",
        package: "@tailwindcss/aspect-ratio",
        description: "Aspect ratio utilities",
        theme_defaults: AspectRatioPlugin::theme_defaults,
        factory: AspectRatioPlugin::create,
    },
];

/// Rejects any option key not in `allowed`.
fn check_keys(options: &ThemeMap, allowed: &[&str]) -> Result<(), OptionError> {
    match options.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) if allowed.is_empty() => Err(OptionError::at(key, "this plugin takes no options")),
        Some(key) => Err(OptionError::at(
            key,
            format!("unknown option (expected one of: {})", allowed.join(", ")),
        )),
        None => Ok(()),
    }
}

fn string_option<'a>(options: &'a ThemeMap, key: &str) -> Result<Option<&'a str>, OptionError> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| OptionError::at(key, "expected a string")),
    }
}

// ============================================================================
// forms
// ============================================================================

/// How the forms plugin applies its styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormsStrategy {
    /// Global element resets only
    Base,
    /// Opt-in `form-*` classes only
    Class,
}

impl FormsStrategy {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Class => "class",
        }
    }
}

/// `@tailwindcss/forms`. Without a strategy both resets and classes are
/// generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormsPlugin {
    strategy: Option<FormsStrategy>,
}

impl FormsPlugin {
    fn create(options: &ThemeMap) -> Result<Arc<dyn Plugin>, OptionError> {
        check_keys(options, &["strategy"])?;
        let strategy = match string_option(options, "strategy")? {
            None => None,
            Some("base") => Some(FormsStrategy::Base),
            Some("class") => Some(FormsStrategy::Class),
            Some(other) => {
                return Err(OptionError::at(
                    "strategy",
                    format!("expected 'base' or 'class', got '{other}'"),
                ));
            }
        };
        Ok(Arc::new(Self { strategy }))
    }
}

impl Plugin for FormsPlugin {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn options(&self) -> ThemeMap {
        self.strategy
            .map(|s| ("strategy".to_string(), ThemeValue::from(s.as_str())))
            .into_iter()
            .collect()
    }
}

// ============================================================================
// typography
// ============================================================================

/// `@tailwindcss/typography`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypographyPlugin {
    /// Class the prose styles hang off (`prose` unless overridden)
    class_name: String,
}

impl TypographyPlugin {
    fn create(options: &ThemeMap) -> Result<Arc<dyn Plugin>, OptionError> {
        check_keys(options, &["className"])?;
        let class_name = match string_option(options, "className")? {
            Some("") => return Err(OptionError::at("className", "must not be empty")),
            Some(name) => name.to_string(),
            None => "prose".to_string(),
        };
        Ok(Arc::new(Self { class_name }))
    }

    /// The `typography` section: a `DEFAULT.css` rule tree keyed by selector.
    fn theme_defaults() -> ThemeMap {
        let rule = |entries: &[(&str, &str)]| {
            ThemeValue::mapping(entries.iter().map(|(k, v)| (*k, ThemeValue::from(*v))))
        };

        let css = ThemeValue::mapping([
            ("color", ThemeValue::from("var(--tw-prose-body)")),
            ("maxWidth", ThemeValue::from("65ch")),
            (
                "a",
                rule(&[
                    ("color", "var(--tw-prose-links)"),
                    ("textDecoration", "underline"),
                    ("fontWeight", "500"),
                ]),
            ),
            (
                "strong",
                rule(&[("color", "var(--tw-prose-bold)"), ("fontWeight", "600")]),
            ),
            (
                "code",
                rule(&[("color", "var(--tw-prose-code)"), ("fontWeight", "600")]),
            ),
            (
                "pre",
                rule(&[
                    ("color", "var(--tw-prose-pre-code)"),
                    ("backgroundColor", "var(--tw-prose-pre-bg)"),
                    ("overflowX", "auto"),
                ]),
            ),
            (
                "blockquote",
                rule(&[("fontStyle", "italic"), ("borderInlineStartWidth", "0.25rem")]),
            ),
        ]);

        [(
            "typography".to_string(),
            ThemeValue::mapping([("DEFAULT", ThemeValue::mapping([("css", css)]))]),
        )]
        .into_iter()
        .collect()
    }
}

impl Plugin for TypographyPlugin {
    fn name(&self) -> &'static str {
        "typography"
    }

    fn options(&self) -> ThemeMap {
        [("className".to_string(), ThemeValue::from(self.class_name.as_str()))]
            .into_iter()
            .collect()
    }
}

// ============================================================================
// aspect-ratio
// ============================================================================

/// `@tailwindcss/aspect-ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatioPlugin;

impl AspectRatioPlugin {
    fn create(options: &ThemeMap) -> Result<Arc<dyn Plugin>, OptionError> {
        check_keys(options, &[])?;
        Ok(Arc::new(Self))
    }

    /// The `aspectRatio` section: ratios 1 through 16.
    fn theme_defaults() -> ThemeMap {
        let ratios = (1..=16).map(|n: u8| (n.to_string(), ThemeValue::from(n.to_string())));
        [("aspectRatio".to_string(), ThemeValue::mapping(ratios))]
            .into_iter()
            .collect()
    }
}

impl Plugin for AspectRatioPlugin {
    fn name(&self) -> &'static str {
        "aspect-ratio"
    }
}
