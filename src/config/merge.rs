//! Theme merging.
//!
//! Two operations build the resolved theme from defaults:
//! 1. Section replacement: sections given directly under `theme`
//!    replace the default section wholesale.
//! 2. Extension: sections under `theme.extend` are deep-merged over the
//!    result. Mappings merge key-by-key; every other value (scalars and
//!    sequences) replaces the default outright.
//!
//! Both operations return new maps and leave their inputs untouched.

use crate::config::value::{ThemeMap, ThemeValue};

/// Deep-merges `overrides` over `defaults`.
///
/// For each key in `overrides`: when both sides hold a mapping the merge
/// recurses, otherwise the override value wins wholesale. Sequences are
/// never merged element-wise. Keys present only in `defaults` are kept
/// unchanged and keep their position; new keys are appended in override
/// order.
#[must_use]
pub fn merge_theme_extensions(defaults: &ThemeMap, overrides: &ThemeMap) -> ThemeMap {
    let mut merged = defaults.clone();
    for (key, override_value) in overrides {
        let next = match (merged.get(key), override_value) {
            (Some(ThemeValue::Mapping(default_map)), ThemeValue::Mapping(override_map)) => {
                ThemeValue::Mapping(merge_theme_extensions(default_map, override_map))
            }
            _ => override_value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Replaces whole default sections with the given ones.
#[must_use]
pub fn replace_theme_sections(defaults: &ThemeMap, sections: &ThemeMap) -> ThemeMap {
    let mut replaced = defaults.clone();
    for (name, section) in sections {
        replaced.insert(name.clone(), section.clone());
    }
    replaced
}

/// Builds the resolved theme: defaults, then replacements, then extensions.
#[must_use]
pub fn resolve_theme(defaults: &ThemeMap, replacements: &ThemeMap, extensions: &ThemeMap) -> ThemeMap {
    let base = replace_theme_sections(defaults, replacements);
    merge_theme_extensions(&base, extensions)
}
