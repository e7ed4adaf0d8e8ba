//! The validator combinator library.
//!
//! A [`Validator`] takes an untyped [`Value`] and the label of the field it
//! sits under and returns a [`Checked<Value>`]. Validators hold their options
//! as plain data and keep no state between calls, so a module can share one
//! instance across threads behind an [`Arc`].
//!
//! Closures with the right signature are validators too, which is how
//! one-off rules are written:
//!
//! ```
//! use build_block::check::{invalid, valid};
//! use build_block::validate::Validator;
//! use build_block::Value;
//!
//! let even = |value: &Value, label: &str| match value.as_integer() {
//!     Some(n) if n % 2 == 0 => valid(value.clone(), label, ""),
//!     _ => invalid(value, label, "must be an even integer"),
//! };
//!
//! assert!(even.validate(&Value::Integer(4), "count").is_success());
//! assert!(even.validate(&Value::Integer(3), "count").is_failure());
//! ```
//!
//! Nested validators extend the label: object keys append `.key` and array
//! items append ` at index N`, so a failure deep inside a section reads
//! `block.supports.interactivity`.

use std::sync::Arc;

use crate::check::{invalid, valid, Checked};
use crate::text::must_be;
use crate::value::Value;

mod shape;
pub mod validators;

pub use shape::ObjectShape;
pub use validators::{
    ArrayOf, BooleanValidator, Bounds, LicenseValidator, NumberAllow, NumberValidator,
    PartialPersonValidator, PersonAllowEmpty, PersonValidator, SemVer, StringValidator, Url,
};

/// A stateless check of one untyped value.
pub trait Validator: Send + Sync {
    /// Validate `value`, reporting failures under `label`.
    fn validate(&self, value: &Value, label: &str) -> Checked<Value>;
}

impl<F> Validator for F
where
    F: Fn(&Value, &str) -> Checked<Value> + Send + Sync,
{
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        self(value, label)
    }
}

/// A validator shared between module definitions and callers.
pub type SharedValidator = Arc<dyn Validator>;

/// Share a validator.
pub fn shared(validator: impl Validator + 'static) -> SharedValidator {
    Arc::new(validator)
}

/// Extend a parent label with a child key.
pub(crate) fn child_label(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Wraps a boolean predicate as a validator.
pub struct Predicate<F> {
    predicate: F,
    description: String,
}

impl<F> Validator for Predicate<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        if (self.predicate)(value) {
            valid(value.clone(), label, "")
        } else {
            invalid(value, label, self.description.clone())
        }
    }
}

/// Build a validator from a predicate; failures carry `description`.
pub fn from_predicate<F>(description: impl Into<String>, predicate: F) -> Predicate<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    Predicate {
        predicate,
        description: description.into(),
    }
}

/// Accept only a value equal to `expected`.
pub fn literal(expected: impl Into<Value>) -> impl Validator + 'static {
    let expected = expected.into();
    let description = must_be(expected.to_pretty_json());
    from_predicate(description, move |value| *value == expected)
}

/// Accept any object.
pub fn is_table(value: &Value, label: &str) -> Checked<Value> {
    primitive(value, label, value.as_table().is_some(), "an object")
}

/// Accept any string, including the empty string.
pub fn is_string(value: &Value, label: &str) -> Checked<Value> {
    primitive(value, label, value.as_str().is_some(), "a string")
}

/// Accept any integer or float.
pub fn is_number(value: &Value, label: &str) -> Checked<Value> {
    primitive(value, label, value.is_number(), "a number")
}

/// Accept any boolean.
pub fn is_bool(value: &Value, label: &str) -> Checked<Value> {
    primitive(value, label, value.as_bool().is_some(), "a boolean")
}

/// Accept any array, including the empty array.
pub fn is_array(value: &Value, label: &str) -> Checked<Value> {
    primitive(value, label, value.as_array().is_some(), "an array")
}

fn primitive(value: &Value, label: &str, matches: bool, what: &str) -> Checked<Value> {
    if matches {
        valid(value.clone(), label, "")
    } else {
        invalid(value, label, must_be(what))
    }
}
