//! Configuration module
//!
//! Loads, validates and normalizes utility-CSS configuration sources:
//! content globs, theme overrides and plugin references.

pub mod loader;
pub mod merge;
pub mod schema;
pub mod validation;
pub mod value;

pub use loader::{
    ConfigLimits, ConfigLoader, ConfigSource, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SOURCE_BYTES,
    LoadResult, LoadWarning, LoaderOptions, SourceFormat,
};
pub use merge::{merge_theme_extensions, replace_theme_sections, resolve_theme};
pub use schema::{Configuration, ContentGlob, PluginReference, SourceDocument};
pub use validation::{ValidationResult, Validator};
pub use value::{Scalar, ThemeMap, ThemeValue};
