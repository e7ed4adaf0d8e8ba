//! Incremental construction of composite input.

use crate::composite::{CompositeInput, MinimumInput, Resolved, Resolver};
use crate::error::ResolveError;
use crate::merge::deep_merge;
use crate::sections::Section;
use crate::value::{Table, Value};

/// Accumulates section input before one full resolution.
///
/// Each setter deep-merges a partial section into the draft, so later
/// calls refine earlier ones.
///
/// # Example
///
/// ```
/// use build_block::{Constants, MinimumInput, Resolver, Section, Value};
///
/// let resolver = Resolver::new(Constants::with_working_dir("/tmp")).unwrap();
/// let resolved = resolver
///     .builder(MinimumInput::new("my-plugin", "awesome-block", "My Awesome Block"))
///     .set(Section::Block, "category", "media")
///     .set(Section::Npm, "keywords", Value::Array(vec![Value::from("block")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(resolved.block.category, "media");
/// assert_eq!(resolved.npm.keywords, vec!["block"]);
/// ```
#[derive(Debug, Clone)]
pub struct Builder<'r> {
    resolver: &'r Resolver,
    draft: CompositeInput,
}

impl<'r> Builder<'r> {
    pub fn new(resolver: &'r Resolver, minimum: MinimumInput) -> Self {
        Self {
            resolver,
            draft: CompositeInput {
                core: minimum.into_table(),
                ..CompositeInput::default()
            },
        }
    }

    fn merge(mut self, section: Section, patch: &Table) -> Self {
        let merged = deep_merge(self.draft.get(section), patch);
        *self.draft.get_mut(section) = merged;
        self
    }

    pub fn core(self, patch: Table) -> Self {
        self.merge(Section::Core, &patch)
    }

    pub fn block(self, patch: Table) -> Self {
        self.merge(Section::Block, &patch)
    }

    pub fn php(self, patch: Table) -> Self {
        self.merge(Section::Php, &patch)
    }

    pub fn wp(self, patch: Table) -> Self {
        self.merge(Section::Wp, &patch)
    }

    pub fn npm(self, patch: Table) -> Self {
        self.merge(Section::Npm, &patch)
    }

    /// Set a single key of one section.
    pub fn set(self, section: Section, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut patch = Table::new();
        patch.insert(key.into(), value.into());
        self.merge(section, &patch)
    }

    /// The input accumulated so far.
    pub fn draft(&self) -> &CompositeInput {
        &self.draft
    }

    /// Resolve the accumulated input.
    pub fn build(self) -> Result<Resolved, ResolveError> {
        self.resolver.resolve_full(&self.draft)
    }
}
