//! Error types for validation and resolution.
//!
//! Validators report problems as [`Diagnostics`]: a non-empty list of
//! [`Diagnostic`] values that integrates with stillwater's `Validation` type
//! and `Semigroup` trait so that composite validators accumulate every
//! failing leaf. Everything above the validator layer (module definition,
//! section resolution, composite resolution, input loading) stops the
//! pipeline with a [`DefinitionError`] or [`ResolveError`] instead.

use std::collections::BTreeMap;
use std::fmt;

use stillwater::{NonEmptyVec, Semigroup};
use thiserror::Error;

use crate::sections::Section;
use crate::value::Value;

/// Marker prefixed to every passing result message.
pub const PASS_PREFIX: &str = "[✅ Passed]";

/// Marker prefixed to every failing result message.
pub const FAIL_PREFIX: &str = "[❌ Failed]";

/// A single failed check, labelled with the field it concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Dotted field label, e.g. `block.supports.interactivity`
    pub label: String,
    /// Human description of what the value must be
    pub description: String,
    /// The received value, rendered as pretty JSON
    pub received: String,
}

impl Diagnostic {
    /// Create a diagnostic for a received value.
    pub fn new(label: impl Into<String>, description: impl Into<String>, received: &Value) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            received: received.to_pretty_json(),
        }
    }

    /// The top-level section a label belongs to (`core` for `core.slug`).
    pub fn section(&self) -> &str {
        self.label.split(['.', ' ']).next().unwrap_or_default()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", FAIL_PREFIX, self.label)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        write!(f, "\nReceived: {}", self.received)
    }
}

/// A non-empty collection of validation diagnostics.
///
/// Uses `NonEmptyVec` from stillwater so a failure always carries at least
/// one message.
#[derive(Debug, Clone)]
pub struct Diagnostics(pub NonEmptyVec<Diagnostic>);

impl Diagnostics {
    /// Create from a single diagnostic.
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self(NonEmptyVec::singleton(diagnostic))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        NonEmptyVec::from_vec(diagnostics).map(Self)
    }

    /// Get the first diagnostic (always exists).
    pub fn first(&self) -> &Diagnostic {
        self.0.head()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Labels of every failing field, in report order.
    pub fn labels(&self) -> Vec<&str> {
        self.iter().map(|d| d.label.as_str()).collect()
    }
}

impl Semigroup for Diagnostics {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::single(diagnostic)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        f.write_str(&joined)
    }
}

impl std::error::Error for Diagnostics {}

/// Group diagnostics by the section their label belongs to.
pub fn group_by_section(diagnostics: &Diagnostics) -> BTreeMap<String, Vec<&Diagnostic>> {
    let mut groups: BTreeMap<String, Vec<&Diagnostic>> = BTreeMap::new();

    for diagnostic in diagnostics.iter() {
        let section = match diagnostic.section() {
            "" => "(general)".to_string(),
            s => s.to_string(),
        };
        groups.entry(section).or_default().push(diagnostic);
    }

    groups
}

/// A module declaration that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The same key was declared in more than one key group.
    #[error("module '{module}': key '{key}' is declared as both {first} and {second}")]
    OverlappingKey {
        module: String,
        key: String,
        first: &'static str,
        second: &'static str,
    },

    /// A declared key has no validator.
    #[error("module '{module}': key '{key}' has no validator")]
    MissingValidator { module: String, key: String },

    /// A validator was registered for a key no group declares.
    #[error("module '{module}': validator registered for undeclared key '{key}'")]
    UndeclaredValidator { module: String, key: String },
}

/// Errors that stop section or composite resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The raw input matched none of the accepted shapes.
    #[error("Failed to normalize unknown input: {reason}")]
    Normalize { reason: String },

    /// A single section failed validation.
    #[error("Configuration Error.\n Invalid input: {diagnostics}")]
    Module {
        section: Section,
        diagnostics: Diagnostics,
    },

    /// A section failure, wrapped by the composite resolver.
    #[error("Failed to resolve full input configuration.\n{source}")]
    Composite {
        #[source]
        source: Box<ResolveError>,
    },

    /// A validated section table did not deserialize into its typed form.
    #[error("resolved '{section}' section has an unexpected shape: {message}")]
    Shape { section: Section, message: String },

    /// Raw input could not be loaded.
    #[error("failed to load input from {source_name}: {message}")]
    Source { source_name: String, message: String },
}

impl ResolveError {
    /// Wrap an error in the composite resolution context.
    pub fn in_composite(self) -> Self {
        match self {
            already @ ResolveError::Composite { .. } => already,
            other => ResolveError::Composite {
                source: Box::new(other),
            },
        }
    }

    /// The section this error is scoped to, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            ResolveError::Module { section, .. } | ResolveError::Shape { section, .. } => {
                Some(*section)
            }
            ResolveError::Composite { source } => source.section(),
            ResolveError::Normalize { .. } | ResolveError::Source { .. } => None,
        }
    }

    /// The validation diagnostics behind this error, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            ResolveError::Module { diagnostics, .. } => Some(diagnostics),
            ResolveError::Composite { source } => source.diagnostics(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(label: &str) -> Diagnostic {
        Diagnostic::new(label, "must be a string", &Value::Integer(1))
    }

    #[test]
    fn test_diagnostic_display_carries_marker_label_and_received() {
        let text = diagnostic("core.slug").to_string();
        assert_eq!(text, "[❌ Failed] (core.slug) must be a string\nReceived: 1");
    }

    #[test]
    fn test_diagnostics_combine_preserves_order() {
        let combined = Diagnostics::single(diagnostic("a")).combine(Diagnostics::single(diagnostic("b")));
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.labels(), vec!["a", "b"]);
        assert_eq!(combined.first().label, "a");
    }

    #[test]
    fn test_diagnostics_from_vec() {
        assert!(Diagnostics::from_vec(vec![]).is_none());
        assert!(Diagnostics::from_vec(vec![diagnostic("a")]).is_some());
    }

    #[test]
    fn test_diagnostics_display_is_newline_joined() {
        let combined = Diagnostics::single(diagnostic("a")).combine(Diagnostics::single(diagnostic("b")));
        let text = combined.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with(FAIL_PREFIX));
    }

    #[test]
    fn test_group_by_section() {
        let diagnostics = Diagnostics::from_vec(vec![
            diagnostic("core.slug"),
            diagnostic("core.title"),
            diagnostic("block.supports.interactivity"),
            diagnostic("tags at index 2"),
        ])
        .unwrap();

        let groups = group_by_section(&diagnostics);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["core"].len(), 2);
        assert_eq!(groups["block"].len(), 1);
        assert_eq!(groups["tags"].len(), 1);
    }

    #[test]
    fn test_composite_wrapping_is_not_repeated() {
        let err = ResolveError::Module {
            section: Section::Npm,
            diagnostics: Diagnostics::single(diagnostic("npm.name")),
        }
        .in_composite()
        .in_composite();

        let text = err.to_string();
        assert_eq!(text.matches("Failed to resolve full input configuration.").count(), 1);
        assert!(text.contains("Configuration Error.\n Invalid input: [❌ Failed] (npm.name)"));
        assert_eq!(err.section(), Some(Section::Npm));
        assert!(err.diagnostics().is_some());
    }
}
