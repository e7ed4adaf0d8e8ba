//! Resolve a block project's input and preview the generated files.
//!
//! This example demonstrates:
//! - Discovering `build-block.json`, `build-block.toml` or `package.json`
//! - Resolving every section with cross-section derivation
//! - Pretty printed diagnostics and exit codes on failure
//! - Rendering templates against the resolved configuration
//!
//! Run with: cargo run --example scaffold -- path/to/project

use std::path::PathBuf;

use build_block::prelude::*;

fn block_json(resolved: &Resolved) -> String {
    let block = &resolved.block;
    let value = serde_json::json!({
        "$schema": "https://schemas.wp.org/trunk/block.json",
        "apiVersion": block.api_version,
        "name": block.name,
        "version": block.version,
        "title": block.title,
        "category": block.category,
        "icon": block.icon,
        "description": block.description,
        "keywords": block.keywords,
        "textdomain": block.textdomain,
        "supports": Value::Table(block.supports.clone()).to_json(),
        "editorScript": block.editor_script,
        "editorStyle": block.editor_style,
        "style": block.style,
        "render": block.render,
        "viewScriptModule": block.view_script_module,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

fn plugin_header(resolved: &Resolved) -> String {
    let core = &resolved.core;
    format!(
        "<?php\n/**\n * Plugin Name: {}\n * Description: {}\n * Version: {}\n * Requires at least: {}\n * Author: {}\n * License: {}\n * Text Domain: {}\n */\n\nnamespace {};\n\nfunction {}_register_block() {{\n\tregister_block_type( __DIR__ . '/build' );\n}}\n",
        core.title,
        core.description,
        core.version,
        resolved.wp.version,
        core.author_name,
        core.license.kind,
        resolved.block.textdomain,
        resolved.php.class_scope,
        resolved.php.method_scope,
    )
}

fn main() {
    tracing_subscriber::fmt::init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let env = RealEnv::new();
    let resolver = Resolver::new(Constants::with_working_dir(&dir)).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(build_block::constants::exit_codes::ERROR);
    });

    let resolved = InputSource::discover(&dir, &env)
        .and_then(|source| resolver.resolve_source(&source, &env))
        .unwrap_or_exit();

    let block = FnTemplate::new("block.json", block_json).under("src");
    let plugin = FnTemplate::new(format!("{}.php", resolved.core.slug), plugin_header);

    for file in render_all(&resolved, &[&block, &plugin]) {
        println!("==> {}", file.path.display());
        println!("{}\n", file.contents);
    }
}
