//! Input source implementations, one per document format.

mod json_source;
#[cfg(feature = "toml")]
mod toml_source;
#[cfg(feature = "yaml")]
mod yaml_source;

pub use json_source::Json;
#[cfg(feature = "toml")]
pub use toml_source::Toml;
#[cfg(feature = "yaml")]
pub use yaml_source::Yaml;
