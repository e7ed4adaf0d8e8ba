//! Composite resolution of all five sections.
//!
//! Raw input arrives in one of several accepted shapes. [`InputShape`]
//! classifies it once at the boundary and normalizes it into a
//! [`CompositeInput`]. The [`Resolver`] then resolves the sections in order:
//!
//! 1. `core` from its own input
//! 2. `block`, with namespace, slug and title forced to the resolved core's
//! 3. `php`, with class and method scopes derived from the core slug unless
//!    given
//! 4. `wp` from its own input
//! 5. `npm`, with the package name defaulting to the core slug
//!
//! The first failing section aborts the whole resolution.
//!
//! # Example
//!
//! ```
//! use build_block::{Constants, Resolver, Value};
//! use serde_json::json;
//!
//! let resolver = Resolver::new(Constants::with_working_dir("/tmp")).unwrap();
//! let resolved = resolver
//!     .resolve_input(&Value::from(json!({
//!         "namespace": "my-plugin",
//!         "slug": "awesome-block",
//!         "title": "My Awesome Block"
//!     })))
//!     .unwrap();
//!
//! assert_eq!(resolved.block.name, "my-plugin/awesome-block");
//! assert_eq!(resolved.npm.name, "awesome-block");
//! ```

use serde::{Deserialize, Serialize};
use stillwater::Validation;
use tracing::debug;

use crate::builder::Builder;
use crate::constants::Constants;
use crate::env::ConfigEnv;
use crate::error::{DefinitionError, ResolveError};
use crate::module::ConfigModule;
use crate::sections::php::{class_scope, method_scope};
use crate::sections::{
    BlockConfig, CoreConfig, Modules, NpmConfig, PhpConfig, Section, SectionConfig, WpConfig,
};
use crate::source::Source;
use crate::value::{Table, Value};

const IDENTITY_KEYS: [&str; 3] = ["namespace", "slug", "title"];

/// Top-level keys the recommended shape lifts out of `core`.
const SHORTCUT_KEYS: [&str; 7] = [
    "blockCategory",
    "npmPackageName",
    "npmPackageUrl",
    "block",
    "php",
    "wp",
    "npm",
];

/// Raw input for every section, keyed by section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeInput {
    pub core: Table,
    #[serde(default)]
    pub block: Table,
    #[serde(default)]
    pub php: Table,
    #[serde(default)]
    pub wp: Table,
    #[serde(default)]
    pub npm: Table,
}

impl CompositeInput {
    pub fn get(&self, section: Section) -> &Table {
        match section {
            Section::Core => &self.core,
            Section::Block => &self.block,
            Section::Php => &self.php,
            Section::Wp => &self.wp,
            Section::Npm => &self.npm,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut Table {
        match section {
            Section::Core => &mut self.core,
            Section::Block => &mut self.block,
            Section::Php => &mut self.php,
            Section::Wp => &mut self.wp,
            Section::Npm => &mut self.npm,
        }
    }

    /// The input as a structured `{ core, block, php, wp, npm }` object.
    pub fn to_value(&self) -> Value {
        Value::Table(
            Section::ALL
                .into_iter()
                .map(|section| (section.as_str().to_string(), Value::Table(self.get(section).clone())))
                .collect(),
        )
    }
}

/// The smallest accepted input: the three identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumInput {
    pub namespace: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MinimumInput {
    pub fn new(namespace: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            slug: slug.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The identity fields as a core input table.
    pub fn into_table(self) -> Table {
        let mut table = Table::new();
        table.insert("namespace".into(), Value::from(self.namespace));
        table.insert("slug".into(), Value::from(self.slug));
        table.insert("title".into(), Value::from(self.title));
        if let Some(description) = self.description {
            table.insert("description".into(), Value::from(description));
        }
        table
    }
}

/// The flat shape with cross-section shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedInput {
    /// Identity fields plus any other core keys
    pub core: Table,
    pub block_category: String,
    pub npm_package_name: Option<Value>,
    pub npm_package_url: Option<Value>,
    pub block: Table,
    pub php: Table,
    pub wp: Table,
    pub npm: Table,
}

/// The accepted whole-configuration input shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    /// Every section present, core carrying the identity fields
    Structured(CompositeInput),
    /// A `core` section carrying the identity fields, other sections optional
    PartialStructured(CompositeInput),
    /// Identity fields at the top level plus a `blockCategory` shortcut
    Recommended(RecommendedInput),
    /// Only the identity fields, at the top level
    Minimum(Table),
}

impl InputShape {
    /// Classify raw input. The first matching shape wins.
    pub fn classify(raw: &Value) -> Result<Self, ResolveError> {
        let Some(table) = raw.as_table() else {
            return Err(normalize_error(format!("expected an object, got {}", raw.type_name())));
        };

        let core_identity = table
            .get("core")
            .and_then(Value::as_table)
            .is_some_and(has_identity);

        if core_identity {
            let structured = Section::ALL
                .into_iter()
                .all(|section| table.contains_key(section.as_str()));
            let input = sections_of(table)?;
            return Ok(if structured {
                InputShape::Structured(input)
            } else {
                InputShape::PartialStructured(input)
            });
        }

        if !has_identity(table) {
            return Err(normalize_error(
                "expected namespace, slug and title strings at the top level or under \"core\"",
            ));
        }

        match table.get("blockCategory") {
            Some(Value::String(category)) => {
                let section = |key: &str| optional_section(table, key);
                let core = table
                    .iter()
                    .filter(|(key, _)| !SHORTCUT_KEYS.contains(&key.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(InputShape::Recommended(RecommendedInput {
                    core,
                    block_category: category.clone(),
                    npm_package_name: table.get("npmPackageName").cloned(),
                    npm_package_url: table.get("npmPackageUrl").cloned(),
                    block: section("block")?,
                    php: section("php")?,
                    wp: section("wp")?,
                    npm: section("npm")?,
                }))
            }
            _ => Ok(InputShape::Minimum(table.clone())),
        }
    }

    /// Short name of the shape, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            InputShape::Structured(_) => "structured",
            InputShape::PartialStructured(_) => "partial-structured",
            InputShape::Recommended(_) => "recommended",
            InputShape::Minimum(_) => "minimum",
        }
    }

    /// Produce the canonical multi-section input.
    pub fn normalize(self) -> CompositeInput {
        match self {
            InputShape::Structured(input) | InputShape::PartialStructured(input) => input,
            InputShape::Minimum(core) => CompositeInput {
                core,
                ..CompositeInput::default()
            },
            InputShape::Recommended(recommended) => {
                let RecommendedInput {
                    core,
                    block_category,
                    npm_package_name,
                    npm_package_url,
                    mut block,
                    php,
                    wp,
                    mut npm,
                } = recommended;

                if !block_category.is_empty() {
                    block.insert("category".into(), Value::from(block_category));
                }
                if let Some(name) = npm_package_name.filter(|name| name.as_str() != Some("")) {
                    npm.insert("name".into(), name);
                }
                if let Some(url) = npm_package_url {
                    npm.insert("url".into(), url);
                }

                CompositeInput {
                    core,
                    block,
                    php,
                    wp,
                    npm,
                }
            }
        }
    }
}

/// Classify and normalize raw input in one step.
pub fn normalize(raw: &Value) -> Result<CompositeInput, ResolveError> {
    let shape = InputShape::classify(raw)?;
    debug!(shape = shape.name(), "normalized composite input");
    Ok(shape.normalize())
}

fn normalize_error(reason: impl Into<String>) -> ResolveError {
    ResolveError::Normalize {
        reason: reason.into(),
    }
}

fn has_identity(table: &Table) -> bool {
    IDENTITY_KEYS
        .iter()
        .all(|key| table.get(*key).and_then(Value::as_str).is_some())
}

fn optional_section(table: &Table, key: &str) -> Result<Table, ResolveError> {
    match table.get(key) {
        None => Ok(Table::new()),
        Some(Value::Table(section)) => Ok(section.clone()),
        Some(other) => Err(normalize_error(format!(
            "section \"{}\" must be an object, got {}",
            key,
            other.type_name()
        ))),
    }
}

fn sections_of(table: &Table) -> Result<CompositeInput, ResolveError> {
    let mut input = CompositeInput::default();
    for section in Section::ALL {
        *input.get_mut(section) = optional_section(table, section.as_str())?;
    }
    Ok(input)
}

/// Every section, resolved and typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub core: CoreConfig,
    pub block: BlockConfig,
    pub php: PhpConfig,
    pub wp: WpConfig,
    pub npm: NpmConfig,
}

impl Resolved {
    /// The resolved configuration as an untyped value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self)
            .map(Value::from)
            .unwrap_or_default()
    }
}

/// Resolves section and composite input against one [`Constants`] value.
#[derive(Debug, Clone)]
pub struct Resolver {
    constants: Constants,
    modules: Modules,
}

impl Resolver {
    /// Define every section module from `constants`.
    pub fn new(constants: Constants) -> Result<Self, DefinitionError> {
        let modules = Modules::new(&constants)?;
        Ok(Self { constants, modules })
    }

    /// A resolver rooted at the current directory.
    pub fn with_defaults() -> Result<Self, DefinitionError> {
        Self::new(Constants::new())
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn modules(&self) -> &Modules {
        &self.modules
    }

    /// The module behind `section`.
    pub fn module(&self, section: Section) -> &ConfigModule {
        self.modules.get(section)
    }

    /// Resolve one section, failing with the section's diagnostics.
    pub fn resolve_module(&self, section: Section, input: &Table) -> Result<Table, ResolveError> {
        debug!(section = %section, keys = input.len(), "resolving section");
        match self
            .module(section)
            .resolve_unknown_input(&Value::Table(input.clone()))
        {
            Validation::Success(passed) => Ok(passed.value),
            Validation::Failure(diagnostics) => {
                debug!(section = %section, failures = diagnostics.len(), "section failed validation");
                Err(ResolveError::Module {
                    section,
                    diagnostics,
                })
            }
        }
    }

    /// Resolve one section into its typed form.
    pub fn resolve_typed<T: SectionConfig>(&self, input: &Table) -> Result<T, ResolveError> {
        let table = self.resolve_module(T::SECTION, input)?;
        T::from_table(&table)
    }

    /// Resolve every section of canonical input, in order.
    pub fn resolve_full(&self, input: &CompositeInput) -> Result<Resolved, ResolveError> {
        self.resolve_sections(input)
            .map_err(ResolveError::in_composite)
    }

    fn resolve_sections(&self, input: &CompositeInput) -> Result<Resolved, ResolveError> {
        let core: CoreConfig = self.resolve_typed(&input.core)?;

        let mut block_input = input.block.clone();
        match block_input.get_mut("supports") {
            Some(Value::Table(supports)) => {
                supports.insert("interactivity".into(), Value::Bool(true));
            }
            Some(_) => {}
            None => {
                let mut supports = Table::new();
                supports.insert("interactivity".into(), Value::Bool(true));
                block_input.insert("supports".into(), Value::Table(supports));
            }
        }
        block_input.insert("namespace".into(), Value::from(core.namespace.as_str()));
        block_input.insert("slug".into(), Value::from(core.slug.as_str()));
        block_input.insert("title".into(), Value::from(core.title.as_str()));
        let block: BlockConfig = self.resolve_typed(&block_input)?;

        let mut php_input = input.php.clone();
        php_input
            .entry("classScope".into())
            .or_insert_with(|| Value::from(class_scope(&core.slug)));
        php_input
            .entry("methodScope".into())
            .or_insert_with(|| Value::from(method_scope(&core.slug)));
        let php: PhpConfig = self.resolve_typed(&php_input)?;

        let wp: WpConfig = self.resolve_typed(&input.wp)?;

        let mut npm_input = input.npm.clone();
        let name_missing = match npm_input.get("name") {
            None | Some(Value::Null) => true,
            Some(Value::String(name)) => name.is_empty(),
            Some(_) => false,
        };
        if name_missing {
            npm_input.insert("name".into(), Value::from(core.slug.as_str()));
        }
        let npm: NpmConfig = self.resolve_typed(&npm_input)?;

        debug!(slug = %core.slug, "resolved full configuration");
        Ok(Resolved {
            core,
            block,
            php,
            wp,
            npm,
        })
    }

    /// Normalize raw input of any accepted shape, then resolve it.
    pub fn resolve_input(&self, raw: &Value) -> Result<Resolved, ResolveError> {
        let input = normalize(raw)?;
        self.resolve_full(&input)
    }

    /// Load raw input from a source, then resolve it.
    pub fn resolve_source(
        &self,
        source: &dyn Source,
        env: &dyn ConfigEnv,
    ) -> Result<Resolved, ResolveError> {
        debug!(source = source.name(), "loading input");
        let raw = source.load(env)?;
        self.resolve_input(&raw)
    }

    /// Start an incremental build from the identity fields.
    pub fn builder(&self, minimum: MinimumInput) -> Builder<'_> {
        Builder::new(self, minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> Resolver {
        Resolver::new(Constants::with_working_dir("/tmp/work")).unwrap()
    }

    fn raw(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn identity() -> serde_json::Value {
        json!({ "namespace": "test-ns", "slug": "test-slug", "title": "Test Title" })
    }

    #[test]
    fn test_classify_shapes() {
        let minimum = InputShape::classify(&raw(identity())).unwrap();
        assert_eq!(minimum.name(), "minimum");

        let mut recommended = identity();
        recommended["blockCategory"] = json!("widgets");
        assert_eq!(InputShape::classify(&raw(recommended)).unwrap().name(), "recommended");

        let partial = json!({ "core": identity(), "npm": { "name": "pkg" } });
        assert_eq!(InputShape::classify(&raw(partial)).unwrap().name(), "partial-structured");

        let structured = json!({ "core": identity(), "block": {}, "php": {}, "wp": {}, "npm": {} });
        assert_eq!(InputShape::classify(&raw(structured)).unwrap().name(), "structured");
    }

    #[test]
    fn test_non_string_category_falls_back_to_minimum() {
        let mut input = identity();
        input["blockCategory"] = json!(3);
        let normalized = normalize(&raw(input)).unwrap();
        assert_eq!(normalized.core.get("blockCategory"), Some(&Value::Integer(3)));
        assert!(normalized.block.is_empty());
    }

    #[test]
    fn test_normalize_rejects_unknown_shapes() {
        for input in [json!(null), json!(42), json!({}), json!({ "core": { "slug": "x" } })] {
            let err = normalize(&raw(input)).unwrap_err();
            assert!(err.to_string().starts_with("Failed to normalize unknown input"));
        }
    }

    #[test]
    fn test_normalize_rejects_non_object_sections() {
        let input = json!({ "core": identity(), "wp": ["tags"] });
        let err = normalize(&raw(input)).unwrap_err();
        assert!(err.to_string().contains("section \"wp\" must be an object"));
    }

    #[test]
    fn test_recommended_shortcuts() {
        let mut input = identity();
        input["description"] = json!("A test description");
        input["blockCategory"] = json!("widgets");
        input["npmPackageName"] = json!("npm-package");
        input["npmPackageUrl"] = json!("https://www.npmjs.com/package/npm-package");
        input["wp"] = json!({ "tags": ["block"] });

        let normalized = normalize(&raw(input)).unwrap();
        assert_eq!(normalized.block.get("category"), Some(&Value::from("widgets")));
        assert_eq!(normalized.npm.get("name"), Some(&Value::from("npm-package")));
        assert!(normalized.npm.contains_key("url"));
        assert_eq!(normalized.core.get("description"), Some(&Value::from("A test description")));
        assert!(!normalized.core.contains_key("wp"));
        assert!(normalized.wp.contains_key("tags"));
    }

    #[test]
    fn test_full_resolution_cross_references() {
        let input = CompositeInput {
            core: raw(json!({ "namespace": "My Plugin", "slug": "Awesome Block", "title": "Awesome" }))
                .into_table()
                .unwrap(),
            ..CompositeInput::default()
        };
        let resolved = resolver().resolve_full(&input).unwrap();
        assert_eq!(resolved.block.namespace, "my-plugin");
        assert_eq!(resolved.block.slug, "awesome-block");
        assert_eq!(resolved.block.title, "Awesome");
        assert_eq!(resolved.php.class_scope, "AwesomeBlock");
        assert_eq!(resolved.php.method_scope, "awesome_block");
        assert_eq!(resolved.npm.name, "awesome-block");
    }

    #[test]
    fn test_explicit_overrides_survive() {
        let input = json!({
            "core": identity(),
            "block": { "category": "custom" },
            "php": { "classScope": "CustomClass" },
            "wp": {},
            "npm": { "name": "custom-name" }
        });
        let resolved = resolver().resolve_input(&raw(input)).unwrap();
        assert_eq!(resolved.block.category, "custom");
        assert_eq!(resolved.php.class_scope, "CustomClass");
        assert_eq!(resolved.php.method_scope, "test_slug");
        assert_eq!(resolved.npm.name, "custom-name");
    }

    #[test]
    fn test_section_failure_is_wrapped() {
        let input = json!({ "core": identity(), "wp": { "tags": [1] } });
        let err = resolver().resolve_input(&raw(input)).unwrap_err();
        assert_eq!(err.section(), Some(Section::Wp));
        let message = err.to_string();
        assert!(message.starts_with("Failed to resolve full input configuration.\nConfiguration Error.\n Invalid input: "));
        assert!(message.contains("(wp.tags at index 0)"));
    }

    #[test]
    fn test_resolve_module_error() {
        let err = resolver()
            .resolve_module(Section::Npm, &Table::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Module { section: Section::Npm, .. }));
        assert_eq!(err.diagnostics().unwrap().labels(), vec!["npm.name"]);
    }

    #[test]
    fn test_resolved_to_value() {
        let resolved = resolver().resolve_input(&raw(identity())).unwrap();
        let value = resolved.to_value();
        assert_eq!(value.get_path("block.apiVersion"), Some(&Value::Integer(3)));
        assert_eq!(value.get_path("core.license.type"), Some(&Value::from("GPLv2+")));
    }
}
