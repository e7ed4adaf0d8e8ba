//! YAML input source.

use std::path::PathBuf;

use crate::env::ConfigEnv;
use crate::error::ResolveError;
use crate::source::{parse_error, read_file, Source};
use crate::value::Value;

#[derive(Debug, Clone)]
enum YamlSource {
    File(PathBuf),
    String(String),
}

/// YAML input source.
#[derive(Debug, Clone)]
pub struct Yaml {
    source: YamlSource,
    name: String,
}

impl Yaml {
    /// Load YAML from a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source: YamlSource::File(path),
        }
    }

    /// Load YAML from a string.
    pub fn string(content: impl Into<String>) -> Self {
        Self {
            source: YamlSource::String(content.into()),
            name: "<string>".to_string(),
        }
    }

    /// Set a custom name for this source in error messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Source for Yaml {
    fn load(&self, env: &dyn ConfigEnv) -> Result<Value, ResolveError> {
        let content = match &self.source {
            YamlSource::File(path) => read_file(env, path, &self.name)?,
            YamlSource::String(content) => content.clone(),
        };
        parse_yaml(&content, &self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_yaml(content: &str, source_name: &str) -> Result<Value, ResolveError> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| parse_error(source_name, format!("invalid YAML: {}", e)))?;
    yaml_to_value(document, source_name)
}

fn yaml_to_value(yaml: serde_yaml::Value, source_name: &str) -> Result<Value, ResolveError> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(|item| yaml_to_value(item, source_name))
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut table = crate::value::Table::new();
            for (key, value) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(parse_error(
                            source_name,
                            format!("unsupported mapping key: {:?}", other),
                        ))
                    }
                };
                table.insert(key, yaml_to_value(value, source_name)?);
            }
            Value::Table(table)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value, source_name)?,
    })
}
