//! Integration tests for whole-configuration resolution.
//!
//! These exercise the public API end to end: raw input in each accepted
//! shape, input files on disk and in a mock environment, the incremental
//! builder, rendered templates and the reported errors.

use std::fs;
use std::path::PathBuf;

use build_block::prelude::*;
use build_block::validators::StringValidator;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn resolver() -> Resolver {
    init_tracing();
    Resolver::new(Constants::with_working_dir("/projects")).unwrap()
}

fn raw(json: serde_json::Value) -> Value {
    Value::from(json)
}

// ============================================================================
// Accepted input shapes
// ============================================================================

#[test]
fn test_core_round_trip() {
    let resolver = resolver();
    let input = raw(json!({
        "namespace": "Test Namespace",
        "slug": "Test Slug",
        "title": "Test Title",
        "description": "d"
    }))
    .into_table()
    .unwrap();

    let core: CoreConfig = resolver.resolve_typed(&input).unwrap();
    assert_eq!(core.namespace, "test-namespace");
    assert_eq!(core.slug, "test-slug");
    assert_eq!(core.title, "Test Title");
    assert_eq!(core.description, "d");
    assert!(core.output_directory.ends_with("test-slug"));
    assert_eq!(core.output_directory, PathBuf::from("/projects/test-slug"));
    assert_eq!(core.license.kind, "GPLv2+");
}

#[test]
fn test_minimum_input_derives_every_section() {
    let resolved = resolver()
        .resolve_input(&raw(json!({
            "namespace": "my-plugin",
            "slug": "awesome-block",
            "title": "My Awesome Block"
        })))
        .unwrap();

    assert_eq!(resolved.block.name, "my-plugin/awesome-block");
    assert_eq!(resolved.block.textdomain, "awesome-block");
    assert_eq!(resolved.block.title, "My Awesome Block");
    assert_eq!(resolved.block.api_version, 3);
    assert_eq!(
        resolved.block.supports.get("interactivity"),
        Some(&Value::Bool(true))
    );
    assert_eq!(resolved.php.class_scope, "AwesomeBlock");
    assert_eq!(resolved.php.method_scope, "awesome_block");
    assert!(resolved.wp.tags.is_empty());
    assert_eq!(resolved.npm.name, "awesome-block");
    assert_eq!(resolved.npm.url, "");
}

#[test]
fn test_recommended_input_normalizes() {
    let raw_input = raw(json!({
        "namespace": "test-namespace",
        "slug": "test-slug",
        "title": "Test Title",
        "description": "A test description",
        "blockCategory": "widgets",
        "npmPackageName": "npm-package",
        "npmPackageUrl": "https://www.npmjs.com/package/npm-package",
        "wp": { "tags": ["block", "widget"] }
    }));

    let shape = InputShape::classify(&raw_input).unwrap();
    assert_eq!(shape.name(), "recommended");

    let normalized = shape.normalize();
    assert_eq!(normalized.block.get("category"), Some(&Value::from("widgets")));
    assert_eq!(normalized.npm.get("name"), Some(&Value::from("npm-package")));

    let resolved = resolver().resolve_input(&raw_input).unwrap();
    assert_eq!(resolved.core.description, "A test description");
    assert_eq!(resolved.block.category, "widgets");
    assert_eq!(resolved.npm.name, "npm-package");
    assert_eq!(resolved.npm.url, "https://www.npmjs.com/package/npm-package");
    assert_eq!(resolved.wp.tags, vec!["block", "widget"]);
}

#[test]
fn test_recommended_shortcut_lands_in_block() {
    let normalized = InputShape::classify(&raw(json!({
        "namespace": "n",
        "slug": "s",
        "title": "t",
        "blockCategory": "widgets"
    })))
    .unwrap()
    .normalize();

    assert_eq!(
        Value::Table(normalized.core.clone()),
        raw(json!({ "namespace": "n", "slug": "s", "title": "t" }))
    );
    assert_eq!(
        Value::Table(normalized.block.clone()),
        raw(json!({ "category": "widgets" }))
    );
    assert!(normalized.php.is_empty());
    assert!(normalized.wp.is_empty());
    assert!(normalized.npm.is_empty());
}

#[test]
fn test_empty_npm_package_name_falls_back_to_slug() {
    let resolved = resolver()
        .resolve_input(&raw(json!({
            "namespace": "my-plugin",
            "slug": "awesome-block",
            "title": "Awesome",
            "blockCategory": "text",
            "npmPackageName": ""
        })))
        .unwrap();
    assert_eq!(resolved.npm.name, "awesome-block");
}

#[test]
fn test_structured_input_keeps_section_values() {
    let resolved = resolver()
        .resolve_input(&raw(json!({
            "core": {
                "namespace": "my-plugin",
                "slug": "awesome-block",
                "title": "Awesome",
                "outputDirectory": "build"
            },
            "block": { "icon": "star", "keywords": ["fun"] },
            "php": {},
            "wp": { "requiresPlugins": ["woocommerce"] },
            "npm": {
                "contributors": [{ "name": "Ada", "url": "", "email": "" }]
            }
        })))
        .unwrap();

    assert_eq!(
        resolved.core.output_directory,
        PathBuf::from("/projects/build/awesome-block")
    );
    assert_eq!(resolved.block.icon, "star");
    assert_eq!(resolved.block.keywords, vec!["fun"]);
    assert_eq!(resolved.wp.requires_plugins, vec!["woocommerce"]);
    assert_eq!(resolved.npm.contributors[0].name, "Ada");
}

#[test]
fn test_identity_cannot_be_overridden_from_block() {
    let resolved = resolver()
        .resolve_input(&raw(json!({
            "core": { "namespace": "my-plugin", "slug": "awesome-block", "title": "Awesome" },
            "block": {
                "namespace": "other-plugin",
                "slug": "other-block",
                "supports": { "interactivity": false }
            }
        })))
        .unwrap();
    assert_eq!(resolved.block.name, "my-plugin/awesome-block");
    assert_eq!(
        resolved.block.supports.get("interactivity"),
        Some(&Value::Bool(true))
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unknown_shape_is_a_normalize_error() {
    let err = resolver().resolve_input(&raw(json!({ "title": "Only" }))).unwrap_err();
    assert!(matches!(err, ResolveError::Normalize { .. }));
    assert_eq!(err.section(), None);
}

#[test]
fn test_first_failing_section_aborts() {
    let err = resolver()
        .resolve_input(&raw(json!({
            "core": { "namespace": "abc", "slug": "awesome-block", "title": "Tiny" },
            "wp": { "tags": ["a", "b", "c", "d", "e", "f"] }
        })))
        .unwrap_err();

    assert_eq!(err.section(), Some(Section::Core));
    let diagnostics = err.diagnostics().unwrap();
    assert_eq!(diagnostics.labels(), vec!["core.namespace", "core.title"]);

    let message = err.to_string();
    assert!(message.starts_with("Failed to resolve full input configuration."));
    assert!(message.contains("[❌ Failed] (core.namespace) must be at least 5 characters"));
    assert!(!message.contains("wp.tags"));
}

#[test]
fn test_pretty_output_groups_by_section() {
    let err = resolver()
        .resolve_input(&raw(json!({
            "core": { "namespace": "abc", "slug": "awesome-block", "title": "Tiny" }
        })))
        .unwrap_err();

    let output = err.format(&PrettyPrintOptions::no_color());
    assert!(output.contains("Configuration errors (2):"));
    assert!(output.contains("  core:"));
    assert!(output.contains("received: \"abc\""));
}

#[test]
fn test_module_errors_accumulate_within_a_section() {
    let resolver = resolver();
    let input = raw(json!({
        "name": "",
        "contributors": [{ "name": "Ada" }, "Grace"],
        "keywords": [1]
    }))
    .into_table()
    .unwrap();

    let err = resolver.resolve_module(Section::Npm, &input).unwrap_err();
    let labels = err.diagnostics().unwrap().labels();
    assert!(labels.contains(&"npm.name"));
    assert!(labels.contains(&"npm.contributors at index 0"));
    assert!(labels.contains(&"npm.contributors at index 1"));
    assert!(labels.contains(&"npm.keywords at index 0"));
}

// ============================================================================
// Custom modules
// ============================================================================

#[test]
fn test_custom_module_definition_errors() {
    let err = ConfigModule::builder("theme")
        .required("name")
        .default_value("name", "x")
        .validator("name", StringValidator::new())
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "module 'theme': key 'name' is declared as both required and optional"
    );

    let err = ConfigModule::builder("theme")
        .required("name")
        .build()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::MissingValidator { .. }));
}

#[test]
fn test_custom_module_validate_prop() {
    let module = ConfigModule::builder("theme")
        .required("name")
        .validator("name", StringValidator::new().min(3))
        .build()
        .unwrap();

    let result = module.validate_prop("name", &Value::from("ab")).unwrap();
    assert!(result.message().contains("(theme.name) must be at least 3 characters"));
    assert!(module.validate_prop("missing", &Value::Null).is_none());
}

// ============================================================================
// Input files
// ============================================================================

#[test]
fn test_json_file_on_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("build-block.json");
    fs::write(
        &path,
        r#"{ "namespace": "my-plugin", "slug": "awesome-block", "title": "Awesome" }"#,
    )
    .unwrap();

    let env = RealEnv::new();
    let source = InputSource::discover(dir.path(), &env).unwrap();
    assert_eq!(source.name(), path.display().to_string());

    let resolved = resolver().resolve_source(&source, &env).unwrap();
    assert_eq!(resolved.block.name, "my-plugin/awesome-block");
}

#[test]
fn test_package_json_on_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "unrelated",
            "build-block": {
                "namespace": "my-plugin",
                "slug": "awesome-block",
                "title": "Awesome",
                "blockCategory": "media"
            }
        }"#,
    )
    .unwrap();

    let env = RealEnv::new();
    let source = InputSource::discover(dir.path(), &env).unwrap();
    let resolved = resolver().resolve_source(&source, &env).unwrap();
    assert_eq!(resolved.block.category, "media");
    assert_eq!(resolved.npm.name, "awesome-block");
}

#[cfg(feature = "toml")]
#[test]
fn test_structured_toml_in_mock_env() {
    let env = MockEnv::new().with_file(
        "/work/build-block.toml",
        r#"
[core]
namespace = "my-plugin"
slug = "awesome-block"
title = "Awesome"

[block]
category = "design"

[wp]
tags = ["block"]
"#,
    );

    let source = InputSource::discover("/work", &env).unwrap();
    let resolved = resolver().resolve_source(&source, &env).unwrap();
    assert_eq!(resolved.block.category, "design");
    assert_eq!(resolved.wp.tags, vec!["block"]);
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_string_source() {
    let source = Yaml::string("namespace: my-plugin\nslug: awesome-block\ntitle: Awesome\n");
    let resolved = resolver().resolve_source(&source, &MockEnv::new()).unwrap();
    assert_eq!(resolved.php.class_scope, "AwesomeBlock");
}

#[test]
fn test_invalid_json_is_a_source_error() {
    let env = MockEnv::new().with_file("/work/build-block.json", "{ not json");
    let source = InputSource::from_path("/work/build-block.json").unwrap();
    let err = resolver().resolve_source(&source, &env).unwrap_err();
    assert!(matches!(err, ResolveError::Source { .. }));
    assert_eq!(err.exit_code(), build_block::constants::exit_codes::ERROR);
}

#[test]
fn test_missing_file_is_reported() {
    let source = Json::file("/work/absent.json");
    let err = resolver().resolve_source(&source, &MockEnv::new()).unwrap_err();
    assert!(err.to_string().contains("file not found"));
}

// ============================================================================
// Builder and templates
// ============================================================================

#[test]
fn test_builder_then_render() {
    let resolver = resolver();
    let resolved = resolver
        .builder(MinimumInput::new("my-plugin", "awesome-block", "Awesome").description("Shiny"))
        .set(Section::Wp, "tags", Value::from(vec!["block"]))
        .build()
        .unwrap();

    let block_json = FnTemplate::new("block.json", |resolved: &Resolved| {
        format!(
            "{{\"name\":\"{}\",\"title\":\"{}\"}}",
            resolved.block.name, resolved.block.title
        )
    })
    .under("src");
    let readme = FnTemplate::new("readme.txt", |resolved: &Resolved| {
        format!("=== {} ===\nTags: {}\n", resolved.core.title, resolved.wp.tags.join(", "))
    });

    let files = render_all(&resolved, &[&block_json, &readme]);
    assert_eq!(files.len(), 2);
    assert_eq!(
        files[0].path,
        PathBuf::from("/projects/awesome-block/src/block.json")
    );
    assert_eq!(
        files[0].contents,
        r#"{"name":"my-plugin/awesome-block","title":"Awesome"}"#
    );
    assert_eq!(files[1].path, PathBuf::from("/projects/awesome-block/readme.txt"));
    assert!(files[1].contents.contains("Tags: block"));
}
