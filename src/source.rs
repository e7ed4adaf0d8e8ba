//! Input source trait and file discovery.
//!
//! A [`Source`] produces the raw, unvalidated input the composite resolver
//! normalizes. File access goes through [`ConfigEnv`]; parsing is pure and
//! happens after the read.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::CONFIG_KEY;
use crate::env::ConfigEnv;
use crate::error::ResolveError;
use crate::sources::Json;
#[cfg(feature = "toml")]
use crate::sources::Toml;
#[cfg(feature = "yaml")]
use crate::sources::Yaml;
use crate::value::Value;

/// Something that loads raw build-block input.
pub trait Source: Send + Sync {
    /// Load the raw input document.
    fn load(&self, env: &dyn ConfigEnv) -> Result<Value, ResolveError>;

    /// Name used in error messages.
    fn name(&self) -> &str;
}

/// File extensions [`InputSource::from_path`] accepts.
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = vec!["json"];
    if cfg!(feature = "toml") {
        extensions.push("toml");
    }
    if cfg!(feature = "yaml") {
        extensions.extend(["yaml", "yml"]);
    }
    extensions
}

/// A file source chosen by extension.
#[derive(Debug, Clone)]
pub enum InputSource {
    Json(Json),
    #[cfg(feature = "toml")]
    Toml(Toml),
    #[cfg(feature = "yaml")]
    Yaml(Yaml),
}

impl InputSource {
    /// Pick a source for `path` by its extension.
    ///
    /// A file named `package.json` reads its input from the `build-block`
    /// key.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" if path.file_name().is_some_and(|name| name == "package.json") => {
                Ok(InputSource::Json(Json::package_json(path)))
            }
            "json" => Ok(InputSource::Json(Json::file(path))),
            #[cfg(feature = "toml")]
            "toml" => Ok(InputSource::Toml(Toml::file(path))),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(InputSource::Yaml(Yaml::file(path))),
            other => Err(ResolveError::Source {
                source_name: path.display().to_string(),
                message: format!(
                    "Unsupported file extension: .{}. Supported extensions include: {}",
                    other,
                    supported_extensions().join(", ")
                ),
            }),
        }
    }

    /// Find input in `dir`.
    ///
    /// Looks for `build-block.<ext>` for every supported extension, then for
    /// a `package.json`.
    pub fn discover(dir: impl AsRef<Path>, env: &dyn ConfigEnv) -> Result<Self, ResolveError> {
        let dir = dir.as_ref();
        let candidates = supported_extensions()
            .into_iter()
            .map(|ext| dir.join(format!("{}.{}", CONFIG_KEY, ext)))
            .chain(std::iter::once(dir.join("package.json")));

        for candidate in candidates {
            if env.file_exists(&candidate) {
                debug!(path = %candidate.display(), "discovered input file");
                return Self::from_path(candidate);
            }
        }

        Err(ResolveError::Source {
            source_name: dir.display().to_string(),
            message: "Unable to locate config file".to_string(),
        })
    }
}

impl Source for InputSource {
    fn load(&self, env: &dyn ConfigEnv) -> Result<Value, ResolveError> {
        match self {
            InputSource::Json(source) => source.load(env),
            #[cfg(feature = "toml")]
            InputSource::Toml(source) => source.load(env),
            #[cfg(feature = "yaml")]
            InputSource::Yaml(source) => source.load(env),
        }
    }

    fn name(&self) -> &str {
        match self {
            InputSource::Json(source) => source.name(),
            #[cfg(feature = "toml")]
            InputSource::Toml(source) => source.name(),
            #[cfg(feature = "yaml")]
            InputSource::Yaml(source) => source.name(),
        }
    }
}

/// Read a source file, mapping I/O failures to [`ResolveError::Source`].
pub(crate) fn read_file(
    env: &dyn ConfigEnv,
    path: &Path,
    source_name: &str,
) -> Result<String, ResolveError> {
    env.read_file(path).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::NotFound => format!("file not found: {}", path.display()),
            _ => e.to_string(),
        };
        ResolveError::Source {
            source_name: source_name.to_string(),
            message,
        }
    })
}

/// A parse failure in `source_name`.
pub(crate) fn parse_error(source_name: &str, message: impl Into<String>) -> ResolveError {
    ResolveError::Source {
        source_name: source_name.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn test_from_path_by_extension() {
        assert!(matches!(
            InputSource::from_path("build-block.json"),
            Ok(InputSource::Json(_))
        ));
        assert!(matches!(
            InputSource::from_path("BUILD-BLOCK.JSON"),
            Ok(InputSource::Json(_))
        ));
        #[cfg(feature = "toml")]
        assert!(matches!(
            InputSource::from_path("build-block.toml"),
            Ok(InputSource::Toml(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = InputSource::from_path("build-block.ts").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unsupported file extension: .ts"));
        assert!(message.contains("json"));
    }

    #[test]
    fn test_discover_prefers_build_block_file() {
        let env = MockEnv::new()
            .with_file("/work/package.json", "{}")
            .with_file("/work/build-block.json", "{}");
        let source = InputSource::discover("/work", &env).unwrap();
        assert_eq!(source.name(), "/work/build-block.json");
    }

    #[test]
    fn test_discover_falls_back_to_package_json() {
        let env = MockEnv::new().with_file("/work/package.json", "{}");
        let source = InputSource::discover("/work", &env).unwrap();
        assert_eq!(source.name(), "/work/package.json");
    }

    #[test]
    fn test_discover_nothing() {
        let err = InputSource::discover("/work", &MockEnv::new()).unwrap_err();
        assert!(err.to_string().contains("Unable to locate config file"));
    }

    #[test]
    fn test_read_file_errors() {
        let env = MockEnv::new().with_unreadable_file("secret.json");
        let err = read_file(&env, Path::new("secret.json"), "secret.json").unwrap_err();
        assert!(err.to_string().contains("permission denied"));

        let err = read_file(&env, Path::new("missing.json"), "missing.json").unwrap_err();
        assert!(err.to_string().contains("file not found: missing.json"));
    }
}
