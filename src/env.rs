//! ConfigEnv trait for testable I/O.
//!
//! Input sources read files only through [`ConfigEnv`], so tests can load
//! configuration from a [`MockEnv`] instead of the real file system.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// File access used by input sources.
///
/// # Example
///
/// ```
/// use build_block::env::{ConfigEnv, MockEnv};
/// use std::path::Path;
///
/// let env = MockEnv::new().with_file("build-block.json", r#"{"namespace": "my-plugin"}"#);
/// assert!(env.file_exists(Path::new("build-block.json")));
/// ```
pub trait ConfigEnv: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if:
    /// - File does not exist (`ErrorKind::NotFound`)
    /// - File is not valid UTF-8
    /// - Permission denied
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Check if a file exists.
    fn file_exists(&self, path: &Path) -> bool;
}

/// Production environment using standard library I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigEnv for RealEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[derive(Debug, Clone)]
enum MockFile {
    Content(String),
    NotFound,
    PermissionDenied,
}

/// In-memory files for tests.
#[derive(Debug, Default)]
pub struct MockEnv {
    files: RwLock<HashMap<PathBuf, MockFile>>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Content(content.into()));
        self
    }

    /// Add a file that will return "not found" error.
    pub fn with_missing_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::NotFound);
        self
    }

    /// Add a file that will return "permission denied" error.
    pub fn with_unreadable_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::PermissionDenied);
        self
    }
}

impl ConfigEnv for MockEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let files = self.files.read().unwrap();

        match files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            Some(MockFile::NotFound) | None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )),
            Some(MockFile::PermissionDenied) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", path.display()),
            )),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        matches!(files.get(path), Some(MockFile::Content(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_env_file_exists() {
        let env = RealEnv::new();
        assert!(env.file_exists(Path::new("Cargo.toml")));
        assert!(!env.file_exists(Path::new("build-block.missing")));
    }

    #[test]
    fn test_mock_env_files() {
        let env = MockEnv::new()
            .with_file("build-block.json", "{}")
            .with_file("package.json", r#"{"name": "pkg"}"#);

        assert!(env.file_exists(Path::new("build-block.json")));
        assert!(!env.file_exists(Path::new("build-block.toml")));
        assert_eq!(env.read_file(Path::new("build-block.json")).unwrap(), "{}");
    }

    #[test]
    fn test_mock_env_missing_file() {
        let env = MockEnv::new().with_missing_file("gone.json");

        assert!(!env.file_exists(Path::new("gone.json")));
        let result = env.read_file(Path::new("gone.json"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_env_permission_denied() {
        let env = MockEnv::new().with_unreadable_file("secret.json");

        let result = env.read_file(Path::new("secret.json"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
    }
}
