//! JSON input source.
//!
//! Loads build-block input from a JSON file, a JSON string, or the
//! `build-block` key of a `package.json`.
//!
//! # Example
//!
//! ```
//! use build_block::env::MockEnv;
//! use build_block::source::Source;
//! use build_block::Json;
//!
//! let env = MockEnv::new().with_file(
//!     "package.json",
//!     r#"{ "name": "pkg", "build-block": { "namespace": "my-plugin" } }"#,
//! );
//! let input = Json::package_json("package.json").load(&env).unwrap();
//! assert_eq!(input.get_path("namespace").and_then(|v| v.as_str()), Some("my-plugin"));
//! ```

use std::path::PathBuf;

use crate::constants::CONFIG_KEY;
use crate::env::ConfigEnv;
use crate::error::ResolveError;
use crate::source::{parse_error, read_file, Source};
use crate::value::Value;

#[derive(Debug, Clone)]
enum JsonSource {
    File(PathBuf),
    PackageJson(PathBuf),
    String(String),
}

/// JSON input source.
#[derive(Debug, Clone)]
pub struct Json {
    source: JsonSource,
    name: String,
}

impl Json {
    /// Load JSON from a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source: JsonSource::File(path),
        }
    }

    /// Load the object under the `build-block` key of a `package.json`.
    pub fn package_json(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source: JsonSource::PackageJson(path),
        }
    }

    /// Load JSON from a string.
    pub fn string(content: impl Into<String>) -> Self {
        Self {
            source: JsonSource::String(content.into()),
            name: "<string>".to_string(),
        }
    }

    /// Set a custom name for this source in error messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Source for Json {
    fn load(&self, env: &dyn ConfigEnv) -> Result<Value, ResolveError> {
        let content = match &self.source {
            JsonSource::File(path) | JsonSource::PackageJson(path) => {
                read_file(env, path, &self.name)?
            }
            JsonSource::String(content) => content.clone(),
        };

        let document = parse_json(&content, &self.name)?;

        match &self.source {
            JsonSource::PackageJson(_) => document
                .as_table()
                .and_then(|table| table.get(CONFIG_KEY))
                .cloned()
                .ok_or_else(|| {
                    parse_error(&self.name, format!("no \"{}\" key in package.json", CONFIG_KEY))
                }),
            _ => Ok(document),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_json(content: &str, source_name: &str) -> Result<Value, ResolveError> {
    serde_json::from_str::<serde_json::Value>(content)
        .map(Value::from)
        .map_err(|e| parse_error(source_name, format!("invalid JSON: {}", e)))
}
