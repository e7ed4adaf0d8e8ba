//! The five configuration sections of a block plugin.
//!
//! Each submodule defines one [`ConfigModule`] from a [`Constants`] value
//! plus the typed struct its resolved table deserializes into. [`Modules`]
//! is the closed registry the composite resolver dispatches through.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::constants::Constants;
use crate::error::{DefinitionError, ResolveError};
use crate::module::ConfigModule;
use crate::value::{Table, Value};

pub mod block;
pub mod core;
pub mod npm;
pub mod php;
pub mod wp;

pub use self::block::BlockConfig;
pub use self::core::{CoreConfig, LicenseInfo};
pub use self::npm::{NpmConfig, Person};
pub use self::php::PhpConfig;
pub use self::wp::WpConfig;

/// A configuration section, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Core,
    Block,
    Php,
    Wp,
    Npm,
}

impl Section {
    /// Every section, in resolution order.
    pub const ALL: [Section; 5] = [
        Section::Core,
        Section::Block,
        Section::Php,
        Section::Wp,
        Section::Npm,
    ];

    /// The section's key in composite input and resolved output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Core => "core",
            Section::Block => "block",
            Section::Php => "php",
            Section::Wp => "wp",
            Section::Npm => "npm",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown section '{}'", s))
    }
}

/// A resolved section's typed form.
pub trait SectionConfig: DeserializeOwned {
    const SECTION: Section;

    /// Deserialize a resolved section table.
    fn from_table(table: &Table) -> Result<Self, ResolveError> {
        serde_json::from_value(Value::Table(table.clone()).to_json()).map_err(|e| {
            ResolveError::Shape {
                section: Self::SECTION,
                message: e.to_string(),
            }
        })
    }
}

/// The registry of section modules, built once from [`Constants`].
#[derive(Debug, Clone)]
pub struct Modules {
    core: ConfigModule,
    block: ConfigModule,
    php: ConfigModule,
    wp: ConfigModule,
    npm: ConfigModule,
}

impl Modules {
    /// Define every section module.
    pub fn new(constants: &Constants) -> Result<Self, DefinitionError> {
        Ok(Self {
            core: self::core::module(constants)?,
            block: block::module(constants)?,
            php: php::module(constants)?,
            wp: wp::module(constants)?,
            npm: npm::module(constants)?,
        })
    }

    pub fn get(&self, section: Section) -> &ConfigModule {
        match section {
            Section::Core => &self.core,
            Section::Block => &self.block,
            Section::Php => &self.php,
            Section::Wp => &self.wp,
            Section::Npm => &self.npm,
        }
    }

    /// Modules paired with their sections, in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &ConfigModule)> {
        Section::ALL.into_iter().map(move |section| (section, self.get(section)))
    }
}
