//! Primitive validators.
//!
//! Each validator is a small options struct whose `Default` is the strict
//! configuration: strings must be non-empty, numbers may be positive,
//! negative or infinite but not NaN, arrays must be non-empty. Options are
//! relaxed with builder-style methods. Checks run in a fixed order and the
//! first failing check decides the message.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::check::{composite, invalid, valid, Checked};
use crate::text::{must_be, must_have, must_not_be};
use crate::validate::{child_label, SharedValidator, Validator};
use crate::value::{Table, Value};

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .unwrap()
});

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .unwrap()
});

/// True when `value` is an http(s) URL with a dot-qualified host.
pub fn is_url(value: &str) -> bool {
    URL.is_match(value)
}

/// True when `value` is a strict semantic version.
pub fn is_semver(value: &str) -> bool {
    SEMVER.is_match(value)
}

/// Inclusive lower and upper limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl Bounds<usize> {
    fn contains(&self, len: usize) -> Result<(), String> {
        if len < self.min {
            Err(must_be(format!("at least {}", self.min)))
        } else if len > self.max {
            Err(must_be(format!("at most {}", self.max)))
        } else {
            Ok(())
        }
    }
}

type StringRule = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Validates strings.
///
/// Order: type, emptiness, length bounds, pattern, custom rule.
#[derive(Clone)]
pub struct StringValidator {
    allow_empty: bool,
    bounds: Bounds<usize>,
    pattern: Option<Regex>,
    should_pass: Option<StringRule>,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self {
            allow_empty: false,
            bounds: Bounds::new(1, usize::MAX),
            pattern: None,
            should_pass: None,
        }
    }
}

impl fmt::Debug for StringValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringValidator")
            .field("allow_empty", &self.allow_empty)
            .field("bounds", &self.bounds)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("should_pass", &self.should_pass.is_some())
            .finish()
    }
}

impl StringValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the empty string (skips the remaining checks).
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Minimum length in characters.
    pub fn min(mut self, min: usize) -> Self {
        self.bounds.min = min;
        self
    }

    /// Maximum length in characters.
    pub fn max(mut self, max: usize) -> Self {
        self.bounds.max = max;
        self
    }

    pub fn bounds(mut self, bounds: Bounds<usize>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Require the whole string to match `pattern`.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// A custom rule evaluated after every other check.
    pub fn should_pass(mut self, rule: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.should_pass = Some(Arc::new(rule));
        self
    }
}

impl Validator for StringValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let Some(s) = value.as_str() else {
            return invalid(value, label, must_be("a string"));
        };

        if s.is_empty() {
            return if self.allow_empty {
                valid(value.clone(), label, "")
            } else {
                invalid(value, label, must_not_be("empty"))
            };
        }

        if let Err(message) = self.bounds.contains(s.chars().count()) {
            return invalid(value, label, format!("{} characters", message));
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                return invalid(
                    value,
                    label,
                    format!("must match the pattern {}", pattern.as_str()),
                );
            }
        }

        if let Some(rule) = &self.should_pass {
            if !rule(s) {
                return invalid(value, label, "must pass the custom validation");
            }
        }

        valid(value.clone(), label, "")
    }
}

/// Which numbers a [`NumberValidator`] admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberAllow {
    pub infinity: bool,
    pub nan: bool,
    pub negative: bool,
    pub positive: bool,
    /// Parse numeric strings before checking.
    pub string_conversion: bool,
}

impl Default for NumberAllow {
    fn default() -> Self {
        Self {
            infinity: true,
            nan: false,
            negative: true,
            positive: true,
            string_conversion: false,
        }
    }
}

/// Validates numbers.
///
/// Disallowing both signs, or bounds with `min > max`, is a configuration
/// mistake and fails for every value. A value equal to `must_match` passes
/// once it has been read as a number, skipping the remaining checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValidator {
    allow: NumberAllow,
    bounds: Bounds<f64>,
    must_match: Option<f64>,
}

impl Default for NumberValidator {
    fn default() -> Self {
        Self {
            allow: NumberAllow::default(),
            bounds: Bounds::new(f64::NEG_INFINITY, f64::INFINITY),
            must_match: None,
        }
    }
}

impl NumberValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, allow: NumberAllow) -> Self {
        self.allow = allow;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.bounds.min = min;
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.bounds.max = max;
        self
    }

    pub fn bounds(mut self, bounds: Bounds<f64>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn must_match(mut self, expected: f64) -> Self {
        self.must_match = Some(expected);
        self
    }

    /// Read `value` as a number, returning it in canonical form.
    fn coerce(&self, value: &Value) -> Option<(f64, Value)> {
        match value {
            Value::Integer(i) => Some((*i as f64, value.clone())),
            Value::Float(f) => Some((*f, value.clone())),
            Value::String(s) if self.allow.string_conversion => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Some((i as f64, Value::Integer(i)));
                }
                // Only numeric literals convert; "inf" and "NaN" words do not.
                let lower = trimmed.to_ascii_lowercase();
                if lower.contains("inf") || lower.contains("nan") {
                    return None;
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .map(|f| (f, Value::Float(f)))
            }
            _ => None,
        }
    }
}

impl Validator for NumberValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let NumberAllow {
            infinity,
            nan,
            negative,
            positive,
            ..
        } = self.allow;
        let Bounds { min, max } = self.bounds;

        if !negative && !positive {
            return invalid(value, label, must_be("either positive or negative"));
        }
        if min > max {
            return invalid(
                value,
                label,
                format!("min value {} is greater than max value {}", min, max),
            );
        }

        let Some((number, canonical)) = self.coerce(value) else {
            return invalid(value, label, must_be("a number"));
        };

        if self.must_match == Some(number) {
            return valid(canonical, label, "");
        }
        if !infinity && number.is_infinite() {
            return invalid(value, label, must_be("a finite number"));
        }
        if !nan && number.is_nan() {
            return invalid(value, label, must_not_be("NaN"));
        }
        if !negative && number < 0.0 {
            return invalid(value, label, must_be("a positive number"));
        }
        if !positive && number > 0.0 {
            return invalid(value, label, must_be("a negative number"));
        }
        if number < min {
            return invalid(value, label, must_be(format!("at least {}", min)));
        }
        if number > max {
            return invalid(value, label, must_be(format!("at most {}", max)));
        }

        valid(canonical, label, "")
    }
}

/// Validates booleans, optionally reading `"true"`/`"false"` strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanValidator {
    allow_string_conversion: bool,
    must_be: Option<bool>,
}

impl BooleanValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept trimmed, case-insensitive `"true"` and `"false"`.
    pub fn allow_string_conversion(mut self, allow: bool) -> Self {
        self.allow_string_conversion = allow;
        self
    }

    /// Require exactly this boolean.
    pub fn must_be(mut self, expected: bool) -> Self {
        self.must_be = Some(expected);
        self
    }
}

impl Validator for BooleanValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if self.allow_string_conversion => {
                match s.trim().to_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                }
            }
            _ => None,
        };

        let Some(b) = parsed else {
            return invalid(value, label, must_be("a boolean"));
        };

        match self.must_be {
            Some(expected) if expected != b => invalid(
                value,
                label,
                format!("is a boolean but {}", must_be(expected.to_string())),
            ),
            _ => valid(Value::Bool(b), label, ""),
        }
    }
}

/// Validates arrays, and every item when an item validator is given.
///
/// Item failures are accumulated; each is labelled `"<label> at index N"`.
#[derive(Clone)]
pub struct ArrayOf {
    item: Option<SharedValidator>,
    allow_empty: bool,
    bounds: Bounds<usize>,
}

impl fmt::Debug for ArrayOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayOf")
            .field("item", &self.item.is_some())
            .field("allow_empty", &self.allow_empty)
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl ArrayOf {
    /// An array whose items must each pass `item`.
    pub fn new(item: impl Validator + 'static) -> Self {
        Self::from_shared(Arc::new(item))
    }

    pub fn from_shared(item: SharedValidator) -> Self {
        Self {
            item: Some(item),
            ..Self::any()
        }
    }

    /// An array with unchecked items.
    pub fn any() -> Self {
        Self {
            item: None,
            allow_empty: false,
            bounds: Bounds::new(0, usize::MAX),
        }
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        self.bounds.min = min;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.bounds.max = max;
        self
    }

    pub fn bounds(mut self, bounds: Bounds<usize>) -> Self {
        self.bounds = bounds;
        self
    }
}

impl Validator for ArrayOf {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let Some(items) = value.as_array() else {
            return invalid(value, label, must_be("an array"));
        };

        if items.is_empty() {
            return if self.allow_empty {
                valid(value.clone(), label, "")
            } else {
                invalid(value, label, must_not_be("empty"))
            };
        }

        if let Err(message) = self.bounds.contains(items.len()) {
            return invalid(value, label, format!("{} items", message));
        }

        match &self.item {
            Some(item) => composite(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, v)| item.validate(v, &format!("{} at index {}", label, index))),
                label,
            )
            .map(|passed| passed.map(Value::Array)),
            None => valid(value.clone(), label, ""),
        }
    }
}

/// Validates http(s) URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Url {
    allow_empty: bool,
}

impl Url {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

impl Validator for Url {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        match value.as_str() {
            None => invalid(value, label, must_be("a string")),
            Some("") if self.allow_empty => valid(value.clone(), label, ""),
            Some("") => invalid(value, label, must_not_be("empty")),
            Some(s) if !is_url(s) => invalid(value, label, must_be("a url")),
            Some(_) => valid(value.clone(), label, ""),
        }
    }
}

/// Validates strict semantic versions, optionally one exact version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemVer {
    must_match: Option<String>,
}

impl SemVer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only this exact version.
    pub fn exact(version: impl Into<String>) -> Self {
        Self {
            must_match: Some(version.into()),
        }
    }
}

impl Validator for SemVer {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let Some(s) = value.as_str() else {
            return invalid(value, label, must_be("a string"));
        };
        if s.is_empty() {
            return invalid(value, label, must_not_be("empty"));
        }
        if !is_semver(s) {
            return invalid(value, label, must_be("a valid semantic version"));
        }
        match &self.must_match {
            Some(expected) if expected != s => invalid(value, label, must_be(expected)),
            _ => valid(value.clone(), label, ""),
        }
    }
}

const PERSON_KEYS: [&str; 3] = ["name", "url", "email"];

/// Which person fields may be empty strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonAllowEmpty {
    pub all: bool,
    pub name: bool,
    pub url: bool,
    pub email: bool,
}

/// Validates a person: an object with exactly the string fields `name`,
/// `url` and `email`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonValidator {
    allow_empty: PersonAllowEmpty,
}

impl PersonValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_empty(mut self, allow_empty: PersonAllowEmpty) -> Self {
        self.allow_empty = allow_empty;
        self
    }
}

impl Validator for PersonValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let Some(table) = value.as_table() else {
            return invalid(value, label, must_be("an object"));
        };

        if let Some(unknown) = table.keys().find(|k| !PERSON_KEYS.contains(&k.as_str())) {
            return invalid(
                value,
                label,
                format!("has unknown property '{}'; {}", unknown, person_keys_message()),
            );
        }

        let mut fields = Vec::with_capacity(PERSON_KEYS.len());
        for key in PERSON_KEYS {
            match table.get(key).map(Value::as_str) {
                Some(Some(s)) => fields.push((key, s)),
                Some(None) => {
                    return invalid(value, label, format!("{} {}", key, must_be("a string")))
                }
                None => return invalid(value, label, person_keys_message()),
            }
        }

        let allow = self.allow_empty;
        if !allow.all {
            for (key, s) in fields {
                let allowed = match key {
                    "name" => allow.name,
                    "url" => allow.url,
                    _ => allow.email,
                };
                if s.is_empty() && !allowed {
                    return invalid(value, label, format!("{} {}", key, must_not_be("empty")));
                }
            }
        }

        valid(value.clone(), label, "")
    }
}

fn person_keys_message() -> String {
    must_have(format!("properties {}", PERSON_KEYS.join(", ")))
}

/// Validates a person where only a non-empty `name` is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialPersonValidator {
    allow_empty_name: bool,
}

impl PartialPersonValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_empty_name(mut self, allow: bool) -> Self {
        self.allow_empty_name = allow;
        self
    }
}

impl Validator for PartialPersonValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let message = must_be("an object with a non-empty name property");
        let Some(table) = value.as_table() else {
            return invalid(value, label, message);
        };

        let keys_ok = table.keys().all(|k| PERSON_KEYS.contains(&k.as_str()));
        let strings_ok = table.values().all(|v| v.as_str().is_some());
        let name_ok = match table.get("name").and_then(Value::as_str) {
            Some(name) => self.allow_empty_name || !name.is_empty(),
            None => false,
        };

        if keys_ok && strings_ok && name_ok {
            valid(value.clone(), label, "")
        } else {
            invalid(value, label, message)
        }
    }
}

/// Validates a license: a non-empty `type` string and a valid `url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LicenseValidator;

impl Validator for LicenseValidator {
    fn validate(&self, value: &Value, label: &str) -> Checked<Value> {
        let table = match value.as_table() {
            Some(t) if t.contains_key("type") && t.contains_key("url") => t,
            _ => {
                return invalid(
                    value,
                    label,
                    must_be("an object with required properties type and url"),
                )
            }
        };

        match table.get("type").map(Value::as_str) {
            Some(Some("")) => return invalid(value, label, format!("type {}", must_not_be("empty"))),
            Some(Some(_)) => {}
            _ => return invalid(value, label, format!("type {}", must_be("a string"))),
        }

        let url = table.get("url").cloned().unwrap_or_default();
        let url_check = Url::new().validate(&url, &child_label(label, "url"));
        if url_check.is_failure() {
            return invalid(value, label, format!("url {}", must_be("a url")));
        }

        valid(value.clone(), label, "")
    }
}

/// Convenience for building a license value.
pub fn license_value(kind: &str, url: &str) -> Value {
    let mut table = Table::new();
    table.insert("type".to_string(), Value::from(kind));
    table.insert("url".to_string(), Value::from(url));
    Value::Table(table)
}
