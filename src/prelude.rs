//! Convenient re-exports for common build-block usage.
//!
//! # Quick Start
//!
//! ```ignore
//! use build_block::prelude::*;
//!
//! fn main() -> Result<(), ResolveError> {
//!     let env = RealEnv::new();
//!     let resolver = Resolver::with_defaults().expect("section modules are well formed");
//!     let source = InputSource::discover(".", &env)?;
//!     let resolved = resolver.resolve_source(&source, &env)?;
//!
//!     println!("{} -> {}", resolved.block.name, resolved.core.output_directory.display());
//!     Ok(())
//! }
//! ```
//!
//! # Custom Sections
//!
//! ```ignore
//! use build_block::prelude::*;
//! use build_block::validators::StringValidator;
//!
//! let module = ConfigModule::builder("theme")
//!     .required("name")
//!     .validator("name", StringValidator::new().min(3))
//!     .build()?;
//! ```

// ============================================================================
// Stillwater re-exports (core functional programming types)
// ============================================================================

/// Result type with error accumulation. Every validator returns one.
pub use stillwater::Validation;

/// Trait for combining values. `Diagnostics` implements this for accumulation.
pub use stillwater::Semigroup;

/// Guaranteed non-empty collection. Underlying type for `Diagnostics`.
pub use stillwater::NonEmptyVec;

// ============================================================================
// Validation results and errors
// ============================================================================

/// Type alias: `Validation<Passed<T>, Diagnostics>`.
pub use crate::check::Checked;

/// Accessors for checked results.
pub use crate::check::CheckedExt;

/// A passing value with its message.
pub use crate::check::Passed;

pub use crate::error::{DefinitionError, Diagnostic, Diagnostics, ResolveError};

/// Group diagnostics by section for organized reporting.
pub use crate::error::group_by_section;

// ============================================================================
// Validators and modules
// ============================================================================

/// Trait for individual validators. Closures of the right shape qualify.
pub use crate::validate::Validator;

pub use crate::validate::SharedValidator;

/// A section declaration and its builder.
pub use crate::module::{ConfigModule, ModuleBuilder};

/// Built-in validators.
pub mod validators {
    pub use crate::validate::validators::{
        ArrayOf, BooleanValidator, Bounds, LicenseValidator, NumberAllow, NumberValidator,
        PartialPersonValidator, PersonAllowEmpty, PersonValidator, SemVer, StringValidator, Url,
    };
    pub use crate::validate::ObjectShape;
}

// ============================================================================
// Resolution
// ============================================================================

pub use crate::builder::Builder;
pub use crate::composite::{CompositeInput, InputShape, MinimumInput, Resolved, Resolver};
pub use crate::constants::Constants;
pub use crate::sections::{
    BlockConfig, CoreConfig, NpmConfig, PhpConfig, Section, SectionConfig, WpConfig,
};

// ============================================================================
// Sources and environment
// ============================================================================

/// Trait for input sources. Implement for custom sources.
pub use crate::source::Source;

/// A file source picked by extension.
pub use crate::source::InputSource;

/// JSON input source, including `package.json`.
pub use crate::sources::Json;

/// TOML input source (requires `toml` feature).
#[cfg(feature = "toml")]
pub use crate::sources::Toml;

/// YAML input source (requires `yaml` feature).
#[cfg(feature = "yaml")]
pub use crate::sources::Yaml;

pub use crate::env::{ConfigEnv, MockEnv, RealEnv};

// ============================================================================
// Values, templates and output
// ============================================================================

pub use crate::value::{Table, Value};

pub use crate::template::{render_all, FnTemplate, RenderedFile, Template};

pub use crate::pretty::{ColorOption, PrettyPrintOptions, ResolveExt};
