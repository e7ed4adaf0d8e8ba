//! The outcome type every validator and resolve operation returns.
//!
//! A [`Checked<T>`] is a stillwater `Validation`: either a [`Passed`] value
//! with its pass message, or the [`Diagnostics`] explaining why the value was
//! rejected. Nothing in the validation layer panics or returns `Err`; the
//! `Failure` arm is the error channel.
//!
//! # Example
//!
//! ```
//! use build_block::check::{composite, invalid, valid, CheckedExt};
//! use build_block::Value;
//!
//! let ok = valid(Value::from("a"), "first", "");
//! let bad = invalid::<Value>(&Value::Integer(3), "second", "must be a string");
//!
//! let combined = composite(vec![ok, bad], "pair");
//! assert!(combined.is_failure());
//! assert!(combined.message().contains("(second) must be a string"));
//! ```

use stillwater::{Semigroup, Validation};

use crate::error::{Diagnostic, Diagnostics, PASS_PREFIX};
use crate::value::Value;

/// A value that passed validation, with the message describing the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Passed<T> {
    /// The validated (possibly normalized) value
    pub value: T,
    /// Pass marker, field label and optional extra text
    pub message: String,
}

impl<T> Passed<T> {
    /// Replace the carried value, keeping the pass message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Passed<U> {
        Passed {
            value: f(self.value),
            message: self.message,
        }
    }
}

/// The result of validating or resolving a value.
pub type Checked<T> = Validation<Passed<T>, Diagnostics>;

/// Format the message for a passing check.
pub fn pass_message(label: &str, extra: &str) -> String {
    format!("{}({}) {}", PASS_PREFIX, label, extra).trim().to_string()
}

/// A passing result for `value` under `label`.
pub fn valid<T>(value: T, label: &str, extra: &str) -> Checked<T> {
    Validation::Success(Passed {
        value,
        message: pass_message(label, extra),
    })
}

/// A failing result recording the received value.
pub fn invalid<T>(received: &Value, label: &str, description: impl Into<String>) -> Checked<T> {
    Validation::Failure(Diagnostics::single(Diagnostic::new(
        label,
        description,
        received,
    )))
}

/// Results split by outcome, each side in input order.
#[derive(Debug, Clone)]
pub struct Partitioned<T> {
    pub valid: Vec<Passed<T>>,
    pub invalid: Vec<Diagnostics>,
}

/// Stable, order-preserving split of results into passes and failures.
pub fn partition<T>(results: impl IntoIterator<Item = Checked<T>>) -> Partitioned<T> {
    let mut parts = Partitioned {
        valid: Vec::new(),
        invalid: Vec::new(),
    };
    for result in results {
        match result {
            Validation::Success(passed) => parts.valid.push(passed),
            Validation::Failure(diagnostics) => parts.invalid.push(diagnostics),
        }
    }
    parts
}

/// Concatenate the non-empty messages of `results`, newline separated.
pub fn join_messages<T>(results: &[Checked<T>]) -> String {
    results
        .iter()
        .map(|result| result.message().trim().to_string())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Aggregate results into one: every value when all pass, otherwise every
/// failure accumulated in order. A pass is reported under `label`.
pub fn composite<T>(results: impl IntoIterator<Item = Checked<T>>, label: &str) -> Checked<Vec<T>> {
    let parts = partition(results);
    let failures = parts.invalid.into_iter().reduce(Semigroup::combine);

    match failures {
        Some(diagnostics) => Validation::Failure(diagnostics),
        None => Validation::Success(Passed {
            value: parts.valid.into_iter().map(|p| p.value).collect(),
            message: pass_message(label, ""),
        }),
    }
}

/// Accessors for [`Checked`] results.
pub trait CheckedExt<T> {
    /// The passing value, if any.
    fn value(&self) -> Option<&T>;

    /// Consume the result, keeping the passing value.
    fn into_value(self) -> Option<T>;

    /// The pass message, or every failure message newline-joined.
    fn message(&self) -> String;

    /// Convert into a standard `Result`.
    fn into_result(self) -> Result<Passed<T>, Diagnostics>;
}

impl<T> CheckedExt<T> for Checked<T> {
    fn value(&self) -> Option<&T> {
        match self {
            Validation::Success(passed) => Some(&passed.value),
            Validation::Failure(_) => None,
        }
    }

    fn into_value(self) -> Option<T> {
        match self {
            Validation::Success(passed) => Some(passed.value),
            Validation::Failure(_) => None,
        }
    }

    fn message(&self) -> String {
        match self {
            Validation::Success(passed) => passed.message.clone(),
            Validation::Failure(diagnostics) => diagnostics.to_string(),
        }
    }

    fn into_result(self) -> Result<Passed<T>, Diagnostics> {
        match self {
            Validation::Success(passed) => Ok(passed),
            Validation::Failure(diagnostics) => Err(diagnostics),
        }
    }
}
