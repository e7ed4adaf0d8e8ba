//! TOML input source.
//!
//! ```
//! use build_block::env::MockEnv;
//! use build_block::source::Source;
//! use build_block::Toml;
//!
//! let env = MockEnv::new().with_file(
//!     "build-block.toml",
//!     r#"
//!     [core]
//!     namespace = "my-plugin"
//!     slug = "awesome-block"
//!     title = "My Awesome Block"
//!     "#,
//! );
//! let input = Toml::file("build-block.toml").load(&env).unwrap();
//! assert!(input.get_path("core.slug").is_some());
//! ```

use std::path::PathBuf;

use crate::env::ConfigEnv;
use crate::error::ResolveError;
use crate::source::{parse_error, read_file, Source};
use crate::value::Value;

#[derive(Debug, Clone)]
enum TomlSource {
    File(PathBuf),
    String(String),
}

/// TOML input source.
#[derive(Debug, Clone)]
pub struct Toml {
    source: TomlSource,
    name: String,
}

impl Toml {
    /// Load TOML from a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source: TomlSource::File(path),
        }
    }

    /// Load TOML from a string.
    pub fn string(content: impl Into<String>) -> Self {
        Self {
            source: TomlSource::String(content.into()),
            name: "<string>".to_string(),
        }
    }

    /// Set a custom name for this source in error messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Source for Toml {
    fn load(&self, env: &dyn ConfigEnv) -> Result<Value, ResolveError> {
        let content = match &self.source {
            TomlSource::File(path) => read_file(env, path, &self.name)?,
            TomlSource::String(content) => content.clone(),
        };
        parse_toml(&content, &self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_toml(content: &str, source_name: &str) -> Result<Value, ResolveError> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| parse_error(source_name, format!("invalid TOML: {}", e.message())))?;
    Ok(toml_to_value(toml::Value::Table(table)))
}

fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Table(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn test_toml_nested_sections() {
        let source = Toml::string(
            r#"
            namespace = "my-plugin"
            slug = "awesome-block"
            title = "Awesome"
            blockCategory = "widgets"

            [wp]
            tags = ["blocks", "interactive"]

            [block.supports]
            interactivity = true
            html = false
            "#,
        );
        let input = source.load(&MockEnv::new()).unwrap();
        assert_eq!(input.get_path("blockCategory"), Some(&Value::from("widgets")));
        assert_eq!(input.get_path("wp.tags").and_then(Value::as_array).map(<[_]>::len), Some(2));
        assert_eq!(input.get_path("block.supports.html"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_toml_parse_error() {
        let err = Toml::string("namespace = ").load(&MockEnv::new()).unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_toml_permission_denied() {
        let env = MockEnv::new().with_unreadable_file("build-block.toml");
        let err = Toml::file("build-block.toml").load(&env).unwrap_err();
        assert!(matches!(err, ResolveError::Source { .. }));
    }
}
