//! The `core` section: plugin identity, metadata and output location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Section, SectionConfig};
use crate::constants::Constants;
use crate::error::DefinitionError;
use crate::module::ConfigModule;
use crate::text::slugify;
use crate::validate::{literal, StringValidator};
use crate::value::{Table, Value};

/// The license object carried by every resolved core section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// A resolved `core` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    /// Slugified block namespace
    pub namespace: String,
    /// Slugified plugin and block identifier
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Where the plugin is generated; always ends with the slug
    pub output_directory: PathBuf,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    pub repository: String,
    pub funding: String,
    pub version: String,
    pub license: LicenseInfo,
}

impl SectionConfig for CoreConfig {
    const SECTION: Section = Section::Core;
}

/// Define the `core` module.
pub fn module(constants: &Constants) -> Result<ConfigModule, DefinitionError> {
    let limits = constants.limits;
    let working_dir = constants.working_dir.clone();

    let optional_text = || StringValidator::new().allow_empty(true);

    let mut builder = ConfigModule::builder(Section::Core.as_str())
        .static_value("version", constants.versions.base.as_str())
        .static_value("license", constants.license.to_value())
        .required("namespace")
        .required("slug")
        .required("title")
        .default_value("description", "")
        .default_value("outputDirectory", path_value(&working_dir))
        .validator("version", literal(constants.versions.base.as_str()))
        .validator("license", literal(constants.license.to_value()))
        .validator("namespace", StringValidator::new().min(limits.min_namespace))
        .validator("slug", StringValidator::new().min(limits.min_slug))
        .validator("title", StringValidator::new().min(limits.min_title))
        .validator(
            "description",
            optional_text().max(limits.max_description),
        )
        .validator("outputDirectory", StringValidator::new());

    for key in ["authorName", "authorEmail", "authorUrl", "repository", "funding"] {
        builder = builder
            .default_value(key, "")
            .validator(key, optional_text());
    }

    builder
        .resolve_helper(move |input, _defaults, _statics| derive_identity(input, &working_dir))
        .build()
}

fn path_value(path: &Path) -> Value {
    Value::from(path.to_string_lossy().into_owned())
}

/// Slugify the identity fields and pin the output directory to the slug.
fn derive_identity(input: &Table, working_dir: &Path) -> Table {
    let mut derived = Table::new();

    if let Some(namespace) = input.get("namespace").and_then(Value::as_str) {
        derived.insert("namespace".into(), Value::from(slugify(namespace)));
    }

    let slug = input.get("slug").and_then(Value::as_str).map(slugify);
    if let Some(slug) = &slug {
        derived.insert("slug".into(), Value::from(slug.as_str()));
    }

    let base = match input.get("outputDirectory").and_then(Value::as_str) {
        Some(dir) if !dir.is_empty() => working_dir.join(dir),
        _ => working_dir.to_path_buf(),
    };
    let output = match slug.as_deref() {
        Some(slug) if !slug.is_empty() && base.file_name().map_or(true, |name| name != slug) => {
            base.join(slug)
        }
        _ => base,
    };
    derived.insert("outputDirectory".into(), path_value(&output));

    derived
}
