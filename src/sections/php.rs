//! The `php` section: class and method scopes for the plugin's PHP code.

use serde::{Deserialize, Serialize};

use super::{Section, SectionConfig};
use crate::constants::Constants;
use crate::error::DefinitionError;
use crate::module::ConfigModule;
use crate::text::kebab_to_pascal;
use crate::validate::{literal, StringValidator};

/// A resolved `php` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhpConfig {
    /// Prefix of the plugin's PHP classes, e.g. `AwesomeBlock`
    pub class_scope: String,
    /// Prefix of options and functions, e.g. `awesome_block`
    pub method_scope: String,
    /// Minimum PHP version
    pub version: String,
}

impl SectionConfig for PhpConfig {
    const SECTION: Section = Section::Php;
}

/// The class scope derived from a slug: `awesome-block` to `AwesomeBlock`.
pub fn class_scope(slug: &str) -> String {
    kebab_to_pascal(slug)
}

/// The method scope derived from a slug: `awesome-block` to `awesome_block`.
pub fn method_scope(slug: &str) -> String {
    slug.replace('-', "_")
}

/// Define the `php` module.
///
/// Both scopes are required here; the composite resolver derives them from
/// the resolved slug when the caller leaves them out.
pub fn module(constants: &Constants) -> Result<ConfigModule, DefinitionError> {
    let min = constants.limits.min_namespace;
    ConfigModule::builder(Section::Php.as_str())
        .static_value("version", constants.versions.php.as_str())
        .required("classScope")
        .required("methodScope")
        .validator("version", literal(constants.versions.php.as_str()))
        .validator("classScope", StringValidator::new().min(min))
        .validator("methodScope", StringValidator::new().min(min))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckedExt;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_scopes_from_slug() {
        assert_eq!(class_scope("awesome-block"), "AwesomeBlock");
        assert_eq!(method_scope("awesome-block"), "awesome_block");
    }

    #[test]
    fn test_resolves_with_static_version() {
        let php = module(&Constants::with_working_dir("/tmp")).unwrap();
        let raw = Value::from(json!({ "classScope": "AwesomeBlock", "methodScope": "awesome_block" }));
        let table = php.resolve_unknown_input(&raw).into_value().unwrap();
        let config = PhpConfig::from_table(&table).unwrap();
        assert_eq!(config.version, "8.0.0");
        assert_eq!(config.class_scope, "AwesomeBlock");
    }

    #[test]
    fn test_scopes_are_required() {
        let php = module(&Constants::with_working_dir("/tmp")).unwrap();
        let diagnostics = php
            .resolve_unknown_input(&Value::table())
            .into_result()
            .unwrap_err();
        assert_eq!(diagnostics.labels(), vec!["php.classScope", "php.methodScope"]);
    }
}
