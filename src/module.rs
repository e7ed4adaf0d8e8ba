//! The config-module factory.
//!
//! A [`ConfigModule`] is one named section of configuration: the keys a
//! caller must supply, the optional keys with their defaults, the static
//! keys nobody can configure, a validator for every key, and an optional
//! helper that derives values from the input. Modules are built once with
//! [`ConfigModule::builder`] and never change afterwards.
//!
//! # Example
//!
//! ```
//! use build_block::module::ConfigModule;
//! use build_block::validate::{literal, StringValidator};
//! use build_block::Value;
//! use serde_json::json;
//!
//! let npm = ConfigModule::builder("npm")
//!     .static_value("version", "0.0.0")
//!     .default_value("url", "")
//!     .required("name")
//!     .validator("version", literal("0.0.0"))
//!     .validator("url", StringValidator::new().allow_empty(true))
//!     .validator("name", StringValidator::new())
//!     .build()
//!     .unwrap();
//!
//! let resolved = npm.resolve_unknown_input(&Value::from(json!({ "name": "pkg" })));
//! assert!(resolved.is_success());
//!
//! let missing = npm.resolve_unknown_input(&Value::from(json!({ "url": "" })));
//! assert!(missing.is_failure());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use stillwater::Validation;
use tracing::trace;

use crate::check::{invalid, Checked, Passed};
use crate::error::DefinitionError;
use crate::merge::{merge_layers, merge_layers_traced};
use crate::text::must_be;
use crate::trace::MergeTrace;
use crate::validate::{ObjectShape, SharedValidator, Validator};
use crate::value::{Table, Value};

/// Message tag carried by [`ConfigModule::resolve_input`] results.
pub const NOT_VALIDATED: &str = "[NOT_VALIDATED]";

/// Derives values from `(input, defaults, statics)`.
///
/// Its output overrides the merged defaults and input but never statics.
pub type ResolveHelper = Arc<dyn Fn(&Table, &Table, &Table) -> Table + Send + Sync>;

/// The key groups of a module, computed once at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleKeys {
    /// Keys the caller must supply
    pub required_input: Vec<String>,
    /// Keys with defaults
    pub optional_input: Vec<String>,
    /// Keys injected verbatim
    pub statics: Vec<String>,
    /// Required, optional and static keys
    pub all: Vec<String>,
    /// Required and optional keys
    pub input: Vec<String>,
}

/// A built, immutable configuration module.
#[derive(Clone)]
pub struct ConfigModule {
    name: String,
    statics: Table,
    defaults: Table,
    keys: ModuleKeys,
    validators: BTreeMap<String, SharedValidator>,
    helper: Option<ResolveHelper>,
    input_shape: ObjectShape,
    resolved_shape: ObjectShape,
}

impl fmt::Debug for ConfigModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigModule")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("helper", &self.helper.is_some())
            .finish()
    }
}

impl ConfigModule {
    /// Start declaring a module.
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder::new(name)
    }

    /// The module name; also the root label of its diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statics(&self) -> &Table {
        &self.statics
    }

    pub fn defaults(&self) -> &Table {
        &self.defaults
    }

    pub fn keys(&self) -> &ModuleKeys {
        &self.keys
    }

    /// Merge input without validating anything.
    ///
    /// For callers that already trust the input's shape. The message is
    /// tagged [`NOT_VALIDATED`].
    pub fn resolve_input(&self, input: &Table) -> Checked<Table> {
        Validation::Success(Passed {
            value: self.merge(input),
            message: format!("{}({} input resolver)", NOT_VALIDATED, self.name),
        })
    }

    /// Validate raw input, merge it, then validate the merged result.
    ///
    /// An input-shape failure is returned as is.
    pub fn resolve_unknown_input(&self, raw: &Value) -> Checked<Table> {
        if let Validation::Failure(diagnostics) = self.validate_input_config(raw) {
            return Validation::Failure(diagnostics);
        }
        match raw.as_table() {
            Some(input) => self.resolve_typed_input(input),
            None => invalid(raw, &self.name, must_be("an object")),
        }
    }

    /// Merge input whose shape the caller guarantees, then validate the
    /// merged result.
    pub fn resolve_typed_input(&self, input: &Table) -> Checked<Table> {
        let resolved = self.merge(input);
        self.validate_resolved_config(&Value::Table(resolved.clone()))
            .map(|passed| Passed {
                value: resolved,
                message: passed.message,
            })
    }

    /// Merge input and record which layer supplied each key.
    pub fn resolve_traced(&self, input: &Table) -> (Table, MergeTrace) {
        let helper = self.helper_output(input);
        merge_layers_traced(&self.defaults, input, &helper, &self.statics)
    }

    /// Check raw input: required keys present, present keys valid.
    pub fn validate_input_config(&self, raw: &Value) -> Checked<Value> {
        self.input_shape.validate(raw, &self.name)
    }

    /// Check a resolved table: every key present and valid.
    pub fn validate_resolved_config(&self, raw: &Value) -> Checked<Value> {
        self.resolved_shape.validate(raw, &self.name)
    }

    /// The validator for a single key.
    pub fn prop(&self, key: &str) -> Option<&SharedValidator> {
        self.validators.get(key)
    }

    /// Validate one value against a key's validator, labelled
    /// `"<module>.<key>"`. `None` when the module has no such key.
    pub fn validate_prop(&self, key: &str, value: &Value) -> Option<Checked<Value>> {
        self.prop(key)
            .map(|validator| validator.validate(value, &format!("{}.{}", self.name, key)))
    }

    fn helper_output(&self, input: &Table) -> Table {
        self.helper
            .as_ref()
            .map(|helper| helper(input, &self.defaults, &self.statics))
            .unwrap_or_default()
    }

    fn merge(&self, input: &Table) -> Table {
        let helper = self.helper_output(input);
        let merged = merge_layers(&self.defaults, input, &helper, &self.statics);
        trace!(
            module = %self.name,
            input_keys = input.len(),
            helper_keys = helper.len(),
            resolved_keys = merged.len(),
            "merged module layers"
        );
        merged
    }
}

/// Declares a [`ConfigModule`].
///
/// Keys must be declared in exactly one of the required, optional
/// (`default_value`) and static groups, and every declared key needs a
/// validator; [`ModuleBuilder::build`] rejects anything else.
pub struct ModuleBuilder {
    name: String,
    statics: Table,
    defaults: Table,
    required: Vec<String>,
    validators: BTreeMap<String, SharedValidator>,
    helper: Option<ResolveHelper>,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statics: Table::new(),
            defaults: Table::new(),
            required: Vec::new(),
            validators: BTreeMap::new(),
            helper: None,
        }
    }

    /// Declare a static key.
    pub fn static_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(key.into(), value.into());
        self
    }

    /// Declare an optional key with its default.
    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Declare a required key.
    pub fn required(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    /// Register the validator for `key`.
    pub fn validator(self, key: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.shared_validator(key, Arc::new(validator))
    }

    pub fn shared_validator(mut self, key: impl Into<String>, validator: SharedValidator) -> Self {
        self.validators.insert(key.into(), validator);
        self
    }

    /// Set the helper that derives values from the input.
    pub fn resolve_helper<F>(mut self, helper: F) -> Self
    where
        F: Fn(&Table, &Table, &Table) -> Table + Send + Sync + 'static,
    {
        self.helper = Some(Arc::new(helper));
        self
    }

    /// Check the declaration and build the module.
    pub fn build(self) -> Result<ConfigModule, DefinitionError> {
        let required_input = self.required;
        let optional_input: Vec<String> = self.defaults.keys().cloned().collect();
        let statics: Vec<String> = self.statics.keys().cloned().collect();

        let groups: [(&'static str, &[String]); 3] = [
            ("required", &required_input),
            ("optional", &optional_input),
            ("static", &statics),
        ];
        let mut seen: BTreeMap<&str, &'static str> = BTreeMap::new();
        for (group, keys) in groups {
            for key in keys {
                if let Some(first) = seen.insert(key.as_str(), group) {
                    return Err(DefinitionError::OverlappingKey {
                        module: self.name,
                        key: key.clone(),
                        first,
                        second: group,
                    });
                }
            }
        }

        let declared: BTreeSet<&str> = seen.keys().copied().collect();
        if let Some(key) = declared.iter().find(|k| !self.validators.contains_key(**k)) {
            return Err(DefinitionError::MissingValidator {
                module: self.name,
                key: key.to_string(),
            });
        }
        if let Some(key) = self
            .validators
            .keys()
            .find(|k| !declared.contains(k.as_str()))
        {
            return Err(DefinitionError::UndeclaredValidator {
                module: self.name,
                key: key.clone(),
            });
        }

        let input: Vec<String> = required_input
            .iter()
            .chain(&optional_input)
            .cloned()
            .collect();
        let all: Vec<String> = input.iter().chain(&statics).cloned().collect();

        let input_shape = ObjectShape::from_validators(self.validators.clone())
            .required(required_input.clone())
            .optional(optional_input.clone());
        let resolved_shape = ObjectShape::from_validators(self.validators.clone())
            .required(all.clone())
            .optional(Vec::<String>::new());

        Ok(ConfigModule {
            name: self.name,
            statics: self.statics,
            defaults: self.defaults,
            keys: ModuleKeys {
                required_input,
                optional_input,
                statics,
                all,
                input,
            },
            validators: self.validators,
            helper: self.helper,
            input_shape,
            resolved_shape,
        })
    }
}
