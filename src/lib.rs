// Allow large error types - resolution errors carry their diagnostics
#![allow(clippy::result_large_err)]

//! build-block: validated configuration for scaffolding WordPress blocks.
//!
//! A block project is described by five sections: `core` (plugin identity
//! and output directory), `block` (the `block.json` metadata), `php`
//! (generated class and function scopes), `wp` (the plugin readme header)
//! and `npm` (the package manifest). Each section is a [`ConfigModule`]:
//! a declaration of required, optional and static keys with one validator
//! per key. Resolution layers defaults, caller input, a derivation helper
//! and statics, then validates the merged table.
//!
//! # Core Concepts
//!
//! - **Accumulated diagnostics**: a failing section reports every bad field
//!   at once, labelled by its path (`block.supports.interactivity`)
//! - **Accepted input shapes**: structured, partially structured,
//!   recommended and minimum input all normalize to one composite form
//! - **Cross-section derivation**: block name, PHP scopes and npm package
//!   name follow from the core identity unless given
//! - **Testable I/O**: input files are read through the `ConfigEnv` trait
//!
//! # Quick Start
//!
//! ```
//! use build_block::{Constants, Resolver, Value};
//! use serde_json::json;
//!
//! let resolver = Resolver::new(Constants::with_working_dir("/projects")).unwrap();
//! let resolved = resolver
//!     .resolve_input(&Value::from(json!({
//!         "namespace": "my-plugin",
//!         "slug": "awesome-block",
//!         "title": "My Awesome Block",
//!         "blockCategory": "widgets"
//!     })))
//!     .unwrap();
//!
//! assert_eq!(resolved.block.name, "my-plugin/awesome-block");
//! assert_eq!(resolved.block.category, "widgets");
//! assert_eq!(resolved.php.class_scope, "AwesomeBlock");
//! assert!(resolved.core.output_directory.ends_with("awesome-block"));
//! ```
//!
//! # Loading Input Files
//!
//! ```ignore
//! use build_block::prelude::*;
//!
//! let resolver = Resolver::with_defaults()?;
//! let source = InputSource::discover(".", &RealEnv::new())?;
//! let resolved = resolver.resolve_source(&source, &RealEnv::new()).unwrap_or_exit();
//! ```
//!
//! A failing resolution prints grouped diagnostics:
//!
//! ```text
//! Configuration errors (2):
//!
//!   core:
//!     • core.namespace: must be at least 5 characters
//!         received: "abc"
//!     • core.title: must be at least 5 characters
//!         received: "Tiny"
//! ```
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`validate`]: The [`Validator`] trait and the built-in validators
//! - [`check`]: The [`Checked`] result type and aggregation helpers
//! - [`module`]: [`ConfigModule`] and its builder
//! - [`sections`]: The five section modules and their typed configs
//! - [`composite`]: Input normalization and the [`Resolver`]
//! - [`builder`]: Incremental construction of composite input
//! - [`source`] / [`sources`]: Input files (JSON, TOML, YAML)
//! - [`template`]: The contract with file renderers
//! - [`mod@env`]: `ConfigEnv` trait and `MockEnv` for testing
//!
//! # Stillwater Integration
//!
//! | Type | Usage |
//! |------|-------|
//! | `Validation<T, E>` | Every validator result |
//! | `NonEmptyVec<T>` | Guaranteed non-empty diagnostics |
//! | `Semigroup` | Accumulating diagnostics across fields |

pub mod builder;
pub mod check;
pub mod composite;
pub mod constants;
pub mod env;
pub mod error;
pub mod merge;
pub mod module;
pub mod prelude;
pub mod pretty;
pub mod sections;
pub mod source;
pub mod sources;
pub mod template;
pub mod text;
pub mod trace;
pub mod validate;
pub mod value;

// Re-exports for convenience
pub use builder::Builder;
pub use check::{Checked, CheckedExt, Passed};
pub use composite::{CompositeInput, InputShape, MinimumInput, Resolved, Resolver};
pub use constants::{Constants, CONFIG_KEY};
pub use env::{ConfigEnv, MockEnv, RealEnv};
pub use error::{group_by_section, DefinitionError, Diagnostic, Diagnostics, ResolveError};
pub use merge::{deep_merge, Layer};
pub use module::{ConfigModule, ModuleBuilder};
pub use pretty::{ColorOption, PrettyPrintOptions, ResolveExt};
pub use sections::{
    BlockConfig, CoreConfig, LicenseInfo, NpmConfig, Person, PhpConfig, Section, WpConfig,
};
pub use source::{InputSource, Source};
pub use template::{render_all, FnTemplate, RenderedFile, Template};
pub use trace::{KeyTrace, MergeTrace};
pub use validate::validators;
pub use validate::{SharedValidator, Validator};
pub use value::{Table, Value};

// Re-export sources
pub use sources::Json;
#[cfg(feature = "toml")]
pub use sources::Toml;
#[cfg(feature = "yaml")]
pub use sources::Yaml;

// Re-export stillwater types that are commonly used
pub use stillwater::{NonEmptyVec, Semigroup, Validation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _: Checked<()> = Validation::Success(Passed {
            value: (),
            message: String::new(),
        });
        assert_eq!(Section::ALL.len(), 5);
    }
}
