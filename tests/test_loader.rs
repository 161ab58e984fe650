mod common;

use std::sync::Arc;

use common::TailcfgProcess;
use tailcfg::config::{
    ConfigLimits, ConfigLoader, ConfigSource, LoaderOptions, PluginReference, SourceFormat,
    ThemeMap, ThemeValue,
};
use tailcfg::error::ConfigError;
use tailcfg::plugin::{Plugin, PluginRegistry, resolve_plugins};

fn loader() -> ConfigLoader {
    ConfigLoader::with_defaults()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn basic_source_loads_globs_theme_and_plugins() {
    let loaded = loader()
        .load_path(&TailcfgProcess::fixture_path("basic.yaml"))
        .expect("basic.yaml should load");
    let config = &loaded.config;

    assert_eq!(config.content_globs().len(), 1);
    assert_eq!(config.content_globs()[0].as_str(), "templates/**/*.html");

    let color = tailcfg::config::value::lookup(
        config.theme_extensions(),
        &["typography", "DEFAULT", "css", "a", "color"],
    );
    assert_eq!(color.and_then(ThemeValue::as_str), Some("#fff"));

    let names: Vec<_> = config.plugins().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["forms", "typography", "aspect-ratio"]);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn duplicate_plugin_is_schema_violation() {
    let err = loader()
        .load_path(&TailcfgProcess::fixture_path("duplicate_plugins.yaml"))
        .unwrap_err();
    match err {
        ConfigError::SchemaViolation { issues, .. } => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].path, "plugins[1]");
            assert!(issues[0].message.contains("Duplicate plugin reference 'forms'"));
        }
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn empty_globs_is_empty_content_globs() {
    let err = loader()
        .load_path(&TailcfgProcess::fixture_path("empty_globs.yaml"))
        .unwrap_err();
    assert!(
        matches!(&err, ConfigError::EmptyContentGlobs { key_path, .. } if key_path == "contentGlobs"),
        "{err:?}"
    );
}

#[test]
fn missing_globs_is_schema_violation() {
    let err = loader()
        .load_path(&TailcfgProcess::fixture_path("missing_globs.yaml"))
        .unwrap_err();
    assert_eq!(err.kind(), "schema-violation");
    assert_eq!(err.key_path(), Some("contentGlobs"));
}

#[test]
fn site_configuration_loads() {
    let loaded = loader()
        .load_path(&TailcfgProcess::fixture_path("site.yaml"))
        .expect("site.yaml should load");
    let config = &loaded.config;

    assert!(config.is_content_path(std::path::Path::new("site/templates/blog/post.html")));
    assert_eq!(
        config
            .theme_value(&["typography", "DEFAULT", "css", "a", "&:hover", "color"])
            .and_then(ThemeValue::as_str),
        Some("rgb(45 212 191)")
    );
    assert_eq!(
        config
            .theme_value(&["typography", "DEFAULT", "css", ".codehilite", "border-radius"])
            .and_then(ThemeValue::as_str),
        Some("0.25rem")
    );

    let references: Vec<_> = config.plugins().iter().map(|p| p.reference()).collect();
    assert_eq!(
        references,
        ["@tailwindcss/forms", "@tailwindcss/typography", "@tailwindcss/aspect-ratio"]
    );
}

#[test]
fn json_source_matches_yaml_source() {
    let yaml = loader()
        .load_path(&TailcfgProcess::fixture_path("basic.yaml"))
        .unwrap();
    let json = loader()
        .load_path(&TailcfgProcess::fixture_path("basic.json"))
        .unwrap();
    assert_eq!(yaml.config.theme(), json.config.theme());
    assert_eq!(yaml.config.plugins(), json.config.plugins());
    assert_eq!(yaml.config.content_globs(), json.config.content_globs());
}

// ============================================================================
// Theme resolution
// ============================================================================

#[test]
fn extension_keeps_plugin_defaults() {
    let loaded = loader()
        .load_path(&TailcfgProcess::fixture_path("basic.yaml"))
        .unwrap();
    let theme = loaded.config.theme();

    // Overridden leaf
    assert_eq!(
        tailcfg::config::value::lookup(theme, &["typography", "DEFAULT", "css", "a", "color"])
            .and_then(ThemeValue::as_str),
        Some("#fff")
    );
    // Sibling default untouched
    assert_eq!(
        tailcfg::config::value::lookup(
            theme,
            &["typography", "DEFAULT", "css", "a", "textDecoration"]
        )
        .and_then(ThemeValue::as_str),
        Some("underline")
    );
    // Other plugin's section present
    assert!(tailcfg::config::value::lookup(theme, &["aspectRatio", "16"]).is_some());
}

#[test]
fn section_replacement_drops_defaults() {
    let loaded = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\ntheme:\n  aspectRatio:\n    square: '1 / 1'\n",
        )
        .unwrap();
    let section = loaded.config.theme()["aspectRatio"].as_mapping().unwrap();
    assert_eq!(section.len(), 1);
    assert_eq!(section["square"], ThemeValue::from("1 / 1"));
}

#[test]
fn injected_defaults_are_used() {
    let defaults: ThemeMap = [(
        "colors".to_string(),
        ThemeValue::mapping([("brand", ThemeValue::from("#000")), ("ink", ThemeValue::from("#111"))]),
    )]
    .into_iter()
    .collect();
    let loader = ConfigLoader::new(LoaderOptions {
        defaults: Arc::new(defaults),
        ..LoaderOptions::default()
    });

    let loaded = loader
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\ntheme:\n  extend:\n    colors:\n      brand: '#0f766e'\n",
        )
        .unwrap();
    let colors = loaded.config.theme()["colors"].as_mapping().unwrap();
    assert_eq!(colors["brand"], ThemeValue::from("#0f766e"));
    assert_eq!(colors["ink"], ThemeValue::from("#111"));
    assert!(!loaded.config.theme().contains_key("typography"));
}

// ============================================================================
// Determinism and errors
// ============================================================================

#[test]
fn load_is_deterministic() {
    let path = TailcfgProcess::fixture_path("site.yaml");
    let first = loader().load_path(&path).unwrap();
    let second = loader().load_path(&path).unwrap();
    assert_eq!(*first.config, *second.config);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(
        serde_json::to_string(first.config.as_ref()).unwrap(),
        serde_json::to_string(second.config.as_ref()).unwrap()
    );
}

#[test]
fn unknown_plugin_reports_suggestion() {
    let err = loader()
        .load_path(&TailcfgProcess::fixture_path("unknown_plugin.yaml"))
        .unwrap_err();
    match &err {
        ConfigError::UnknownPlugin {
            name,
            key_path,
            suggestion,
        } => {
            assert_eq!(name, "typograhpy");
            assert_eq!(key_path, "plugins[1]");
            assert_eq!(suggestion.as_deref(), Some("typography"));
        }
        other => panic!("expected UnknownPlugin, got {other:?}"),
    }
    assert!(err.to_string().contains("did you mean 'typography'?"));
}

#[test]
fn malformed_yaml_is_malformed_source() {
    let err = loader()
        .load_path(&TailcfgProcess::fixture_path("bad_yaml.yaml"))
        .unwrap_err();
    assert_eq!(err.kind(), "malformed-source");
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader()
        .load_path(&dir.path().join("absent.yaml"))
        .unwrap_err();
    assert_eq!(err.kind(), "source-unreadable");
}

#[test]
fn loads_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailwind.config.yaml");
    std::fs::write(&path, "content:\n  files:\n    - src/**/*.rs\n").unwrap();

    let loaded = loader().load_path(&path).unwrap();
    assert_eq!(loaded.config.content_globs()[0].as_str(), "src/**/*.rs");
    assert_eq!(loaded.config.origin(), path.display().to_string());
}

#[test]
fn oversized_source_is_rejected() {
    let loader = ConfigLoader::new(LoaderOptions {
        limits: ConfigLimits {
            max_source_bytes: 16,
            max_depth: 64,
        },
        ..LoaderOptions::default()
    });
    let err = loader
        .load(&ConfigSource::Text {
            name: "big.json".to_string(),
            contents: r#"{"contentGlobs": ["templates/**/*.html"]}"#.to_string(),
            format: SourceFormat::Json,
        })
        .unwrap_err();
    assert_eq!(err.kind(), "malformed-source");
}

#[test]
fn unknown_top_level_key_warns() {
    let loaded = loader()
        .load_path(&TailcfgProcess::fixture_path("unknown_key.yaml"))
        .unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].location.as_deref(), Some("darkMode"));
}

// ============================================================================
// Plugin resolution
// ============================================================================

#[test]
fn plugin_order_is_preserved() {
    let registry = PluginRegistry::builtin();
    let forward = resolve_plugins(
        &registry,
        &[PluginReference::named("forms"), PluginReference::named("typography")],
    )
    .unwrap();
    let reverse = resolve_plugins(
        &registry,
        &[PluginReference::named("typography"), PluginReference::named("forms")],
    )
    .unwrap();

    assert_ne!(forward, reverse);
    assert_eq!(forward[0], reverse[1]);
    assert_eq!(forward[1], reverse[0]);
}

#[test]
fn duplicate_through_options_form_is_still_duplicate() {
    let err = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\nplugins:\n  - typography\n  - name: typography\n    options:\n      className: markdown\n",
        )
        .unwrap_err();
    assert_eq!(err.kind(), "schema-violation");
    assert_eq!(err.key_path(), Some("plugins[1]"));
}

#[test]
fn plugin_options_reach_the_handle() {
    let loaded = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\nplugins:\n  - name: forms\n    options:\n      strategy: class\n",
        )
        .unwrap();
    let options = loaded.config.plugins()[0].plugin().options();
    assert_eq!(options["strategy"], ThemeValue::from("class"));
}

#[test]
fn rejected_plugin_option_is_schema_violation() {
    let err = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\nplugins:\n  - name: forms\n    options:\n      strategy: inline\n",
        )
        .unwrap_err();
    assert_eq!(err.kind(), "schema-violation");
    assert_eq!(err.key_path(), Some("plugins[0].options.strategy"));
}

#[test]
fn short_and_scoped_names_are_the_same_plugin() {
    let err = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\nplugins: [forms, '@tailwindcss/forms']\n",
        )
        .unwrap_err();
    match &err {
        ConfigError::SchemaViolation { issues, .. } => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].path, "plugins[1]");
            assert!(issues[0].message.contains("plugins[0]"), "{}", issues[0].message);
        }
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

// ============================================================================
// Content aliases and key normalization
// ============================================================================

#[test]
fn empty_content_sequence_reports_content_path() {
    let err = loader()
        .load_str("inline.yaml", "content: []\n")
        .unwrap_err();
    assert!(
        matches!(&err, ConfigError::EmptyContentGlobs { key_path, .. } if key_path == "content"),
        "{err:?}"
    );
}

#[test]
fn empty_content_files_reports_files_path() {
    let err = loader()
        .load_str("inline.yaml", "content:\n  files: []\n")
        .unwrap_err();
    assert_eq!(err.kind(), "empty-content-globs");
    assert_eq!(err.key_path(), Some("content.files"));
}

#[test]
fn numeric_key_colliding_with_string_key_is_rejected() {
    let err = loader()
        .load_str(
            "inline.yaml",
            "contentGlobs: ['*.html']\ntheme:\n  extend:\n    aspectRatio:\n      1: one-int\n      '1': one-str\n",
        )
        .unwrap_err();
    assert_eq!(err.kind(), "schema-violation");
    assert_eq!(err.key_path(), Some("theme.extend.aspectRatio.1"));
}

#[test]
fn default_limits_do_not_depend_on_environment() {
    let loader = ConfigLoader::with_defaults();
    let limits = &loader.options().limits;
    assert_eq!(limits.max_source_bytes, tailcfg::config::DEFAULT_MAX_SOURCE_BYTES);
    assert_eq!(limits.max_depth, tailcfg::config::DEFAULT_MAX_DEPTH);
}
