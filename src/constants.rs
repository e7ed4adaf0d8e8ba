//! Process-wide constants, built once and passed by reference.
//!
//! Every module definition reads its versions, license and limits from a
//! [`Constants`] value instead of globals, so tests can resolve against a
//! different working directory without touching the process.

use std::path::{Path, PathBuf};

use crate::validate::validators::license_value;
use crate::value::Value;

/// Key under which a `package.json` carries build-block input.
pub const CONFIG_KEY: &str = "build-block";

/// Process exit codes used by command-line front ends.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const CANCELLED: i32 = 3;
}

/// Versions found throughout the generated project.
#[derive(Debug, Clone, PartialEq)]
pub struct Versions {
    /// Starting version of the generated plugin and package
    pub base: String,
    /// Minimum WordPress version
    pub wp: String,
    /// Minimum PHP version
    pub php: String,
    /// block.json `apiVersion`
    pub wp_block_api: i64,
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            base: "0.0.0".to_string(),
            wp: "6.7.0".to_string(),
            php: "8.0.0".to_string(),
            wp_block_api: 3,
        }
    }
}

/// The license every generated plugin carries.
#[derive(Debug, Clone, PartialEq)]
pub struct License {
    pub kind: String,
    pub url: String,
}

impl License {
    /// The license as a `{ type, url }` object.
    pub fn to_value(&self) -> Value {
        license_value(&self.kind, &self.url)
    }
}

impl Default for License {
    fn default() -> Self {
        Self {
            kind: "GPLv2+".to_string(),
            url: "https://www.gnu.org/licenses/gpl-2.0.html".to_string(),
        }
    }
}

/// Length limits for identity and metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_namespace: usize,
    pub min_slug: usize,
    pub min_title: usize,
    pub max_description: usize,
    pub max_wp_tags: usize,
}

impl Limits {
    /// Shortest valid `namespace/slug` block name.
    pub fn min_block_name(&self) -> usize {
        self.min_namespace + self.min_slug + 1
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_namespace: 5,
            min_slug: 5,
            min_title: 5,
            max_description: 150,
            max_wp_tags: 5,
        }
    }
}

/// Immutable runtime configuration for module definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Constants {
    pub versions: Versions,
    pub license: License,
    pub limits: Limits,
    /// Base for relative output directories
    pub working_dir: PathBuf,
}

impl Constants {
    /// Constants rooted at the process's current directory.
    pub fn new() -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_working_dir(working_dir)
    }

    /// Constants rooted at `working_dir`.
    pub fn with_working_dir(working_dir: impl AsRef<Path>) -> Self {
        Self {
            versions: Versions::default(),
            license: License::default(),
            limits: Limits::default(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let constants = Constants::with_working_dir("/tmp/work");
        assert_eq!(constants.versions.base, "0.0.0");
        assert_eq!(constants.versions.wp, "6.7.0");
        assert_eq!(constants.versions.php, "8.0.0");
        assert_eq!(constants.versions.wp_block_api, 3);
        assert_eq!(constants.license.kind, "GPLv2+");
        assert_eq!(constants.limits.min_block_name(), 11);
        assert_eq!(constants.working_dir, PathBuf::from("/tmp/work"));
    }

    #[test]
    fn test_license_value() {
        let value = License::default().to_value();
        assert_eq!(value.get_path("type"), Some(&Value::from("GPLv2+")));
        assert_eq!(
            value.get_path("url"),
            Some(&Value::from("https://www.gnu.org/licenses/gpl-2.0.html"))
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::INVALID_CONFIG, 2);
    }
}
