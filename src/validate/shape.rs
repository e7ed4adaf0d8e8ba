//! Object-shape validation over a per-key validator map.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::check::{composite, invalid, valid, Checked, Passed};
use crate::text::must_be;
use crate::validate::{child_label, SharedValidator, Validator};
use crate::value::Value;

/// Validates an object key by key.
///
/// With key lists, exactly the listed keys are checked: a missing required
/// key fails with `"<key> is required"`, a missing optional key passes. With
/// no key lists, every present key that has a validator is checked. Every
/// failing key is reported; child labels are `"<label>.<key>"`.
///
/// ```
/// use build_block::validate::{ObjectShape, StringValidator, Validator};
/// use build_block::Value;
/// use serde_json::json;
///
/// let shape = ObjectShape::new()
///     .field("name", StringValidator::new())
///     .field("url", StringValidator::new().allow_empty(true))
///     .required(["name"])
///     .optional(["url"]);
///
/// let ok = Value::from(json!({ "name": "pkg" }));
/// assert!(shape.validate(&ok, "npm").is_success());
///
/// let missing = Value::from(json!({ "url": "" }));
/// assert!(shape.validate(&missing, "npm").is_failure());
/// ```
#[derive(Clone, Default)]
pub struct ObjectShape {
    validators: BTreeMap<String, SharedValidator>,
    required: Option<Vec<String>>,
    optional: Option<Vec<String>>,
}

impl fmt::Debug for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectShape")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("required", &self.required)
            .field("optional", &self.optional)
            .finish()
    }
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an existing validator map.
    pub fn from_validators(validators: BTreeMap<String, SharedValidator>) -> Self {
        Self {
            validators,
            ..Self::default()
        }
    }

    /// Register the validator for `key`.
    pub fn field(mut self, key: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.validators.insert(key.into(), Arc::new(validator));
        self
    }

    /// Keys that must be present.
    pub fn required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Keys that are checked only when present.
    pub fn optional<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// The validator registered for `key`.
    pub fn validator(&self, key: &str) -> Option<&SharedValidator> {
        self.validators.get(key)
    }

    fn check_key(&self, key: &str, value: &Value, label: &str) -> Checked<Value> {
        let child = child_label(label, key);
        match self.validators.get(key) {
            Some(validator) => validator.validate(value, &child),
            None => valid(value.clone(), &child, ""),
        }
    }
}

impl Validator for ObjectShape {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let Some(table) = value.as_table() else {
            return invalid(value, label, must_be("an object"));
        };

        let checks: Vec<Checked<Value>> = if self.required.is_none() && self.optional.is_none() {
            table
                .iter()
                .filter(|(key, _)| self.validators.contains_key(key.as_str()))
                .map(|(key, v)| self.check_key(key, v, label))
                .collect()
        } else {
            let required = self.required.iter().flatten().map(|key| match table.get(key) {
                Some(v) => self.check_key(key, v, label),
                None => invalid(value, &child_label(label, key), format!("{} is required", key)),
            });
            let optional = self
                .optional
                .iter()
                .flatten()
                .filter_map(|key| table.get(key).map(|v| self.check_key(key, v, label)));
            required.chain(optional).collect()
        };

        composite(checks, label).map(|passed| Passed {
            value: value.clone(),
            message: passed.message,
        })
    }
}
