//! The `npm` section: package.json metadata.

use serde::{Deserialize, Serialize};

use super::{Section, SectionConfig};
use crate::constants::Constants;
use crate::error::DefinitionError;
use crate::module::ConfigModule;
use crate::validate::{literal, ArrayOf, PersonAllowEmpty, PersonValidator, StringValidator};
use crate::value::Value;

/// A package.json person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub url: String,
    pub email: String,
}

/// A resolved `npm` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmConfig {
    /// Package name; the core slug unless given
    pub name: String,
    pub url: String,
    pub contributors: Vec<Person>,
    pub keywords: Vec<String>,
    pub version: String,
}

impl SectionConfig for NpmConfig {
    const SECTION: Section = Section::Npm;
}

/// Define the `npm` module.
pub fn module(constants: &Constants) -> Result<ConfigModule, DefinitionError> {
    let contributor = PersonValidator::new().allow_empty(PersonAllowEmpty {
        all: true,
        ..PersonAllowEmpty::default()
    });
    ConfigModule::builder(Section::Npm.as_str())
        .static_value("version", constants.versions.base.as_str())
        .required("name")
        .default_value("url", "")
        .default_value("contributors", Value::Array(vec![]))
        .default_value("keywords", Value::Array(vec![]))
        .validator("version", literal(constants.versions.base.as_str()))
        .validator("name", StringValidator::new())
        .validator("url", StringValidator::new().allow_empty(true))
        .validator("contributors", ArrayOf::new(contributor).allow_empty(true))
        .validator(
            "keywords",
            ArrayOf::new(StringValidator::new()).allow_empty(true),
        )
        .build()
}
