//! The `wp` section: WordPress.org readme and plugin header metadata.

use serde::{Deserialize, Serialize};

use super::{Section, SectionConfig};
use crate::constants::Constants;
use crate::error::DefinitionError;
use crate::module::ConfigModule;
use crate::validate::{literal, ArrayOf, StringValidator};
use crate::value::Value;

/// A resolved `wp` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpConfig {
    /// WordPress.org usernames
    pub contributors: Vec<String>,
    /// At most five plugin directory tags
    pub tags: Vec<String>,
    pub update_url: String,
    /// Slugs of plugins this plugin depends on
    pub requires_plugins: Vec<String>,
    /// Minimum WordPress version
    pub version: String,
}

impl SectionConfig for WpConfig {
    const SECTION: Section = Section::Wp;
}

/// Define the `wp` module. Every input key is optional.
pub fn module(constants: &Constants) -> Result<ConfigModule, DefinitionError> {
    let string_list = || ArrayOf::new(StringValidator::new()).allow_empty(true);
    ConfigModule::builder(Section::Wp.as_str())
        .static_value("version", constants.versions.wp.as_str())
        .default_value("contributors", Value::Array(vec![]))
        .default_value("tags", Value::Array(vec![]))
        .default_value("updateUrl", "")
        .default_value("requiresPlugins", Value::Array(vec![]))
        .validator("version", literal(constants.versions.wp.as_str()))
        .validator("contributors", string_list())
        .validator("tags", string_list().max(constants.limits.max_wp_tags))
        .validator("updateUrl", StringValidator::new().allow_empty(true))
        .validator("requiresPlugins", string_list())
        .build()
}
