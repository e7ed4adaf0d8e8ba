//! Value tracing for layered module resolution.
//!
//! When a resolved key does not hold the value a user expected, the usual
//! cause is that a higher layer replaced it: a static value the user cannot
//! configure, or a helper that derives the key from other input. A
//! [`MergeTrace`] records, for every resolved key, each layer that supplied
//! a value and which one ended up in the output.
//!
//! # Usage
//!
//! ```ignore
//! let (resolved, trace) = module.resolve_traced(&input);
//!
//! if trace.was_overridden("version") {
//!     println!("{}", trace.trace("version").unwrap());
//! }
//!
//! println!("{}", trace.report());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::merge::Layer;
use crate::value::{Table, Value};

/// A value with the layer that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerValue {
    /// The value at this layer
    pub value: Value,
    /// The layer this value came from
    pub layer: Layer,
    /// Whether this layer won
    pub is_final: bool,
}

impl LayerValue {
    pub fn new(value: Value, layer: Layer, is_final: bool) -> Self {
        Self {
            value,
            layer,
            is_final,
        }
    }
}

/// Trace of a single resolved key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTrace {
    /// The resolved value and the highest layer that supplied the key
    pub final_value: LayerValue,
    /// Every layer's value, lowest layer first
    pub history: Vec<LayerValue>,
}

impl KeyTrace {
    /// Create a trace from a layer history, marking the last entry final.
    ///
    /// `resolved` replaces the final entry's value so deep-merged objects
    /// report the merged result rather than the last layer's fragment.
    pub fn new(mut history: Vec<LayerValue>, resolved: Option<&Value>) -> Option<Self> {
        let last = history.last_mut()?;
        last.is_final = true;

        let mut final_value = last.clone();
        if let Some(value) = resolved {
            final_value.value = value.clone();
        }

        Some(Self {
            final_value,
            history,
        })
    }

    /// Check if more than one layer supplied this key.
    pub fn was_overridden(&self) -> bool {
        self.history.len() > 1
    }

    /// Number of layers that supplied this key.
    pub fn source_count(&self) -> usize {
        self.history.len()
    }
}

impl fmt::Display for KeyTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Final: {} (from {})",
            self.final_value.value.to_json(),
            self.final_value.layer
        )?;

        if self.history.len() > 1 {
            writeln!(f, "History:")?;
            for val in &self.history {
                let marker = if val.is_final { "→" } else { " " };
                writeln!(f, "  {} [{}] {}", marker, val.layer, val.value.to_json())?;
            }
        }

        Ok(())
    }
}

/// Per-key layer history of one module resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeTrace {
    traces: BTreeMap<String, KeyTrace>,
}

impl MergeTrace {
    /// Get the trace for a key.
    pub fn trace(&self, key: &str) -> Option<&KeyTrace> {
        self.traces.get(key)
    }

    /// Check if a key was supplied by more than one layer.
    pub fn was_overridden(&self, key: &str) -> bool {
        self.traces
            .get(key)
            .map(KeyTrace::was_overridden)
            .unwrap_or(false)
    }

    /// Keys supplied by more than one layer.
    pub fn overridden_keys(&self) -> impl Iterator<Item = &str> {
        self.traces
            .iter()
            .filter(|(_, t)| t.was_overridden())
            .map(|(k, _)| k.as_str())
    }

    /// Keys whose final value came from `layer`.
    pub fn keys_from(&self, layer: Layer) -> impl Iterator<Item = &str> {
        self.traces
            .iter()
            .filter(move |(_, t)| t.final_value.layer == layer)
            .map(|(k, _)| k.as_str())
    }

    /// All traced keys with their traces.
    pub fn traces(&self) -> impl Iterator<Item = (&str, &KeyTrace)> {
        self.traces.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of traced keys.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Human-readable report of every key.
    pub fn report(&self) -> String {
        let mut report = String::new();

        for (key, trace) in &self.traces {
            report.push_str(&format!("{} = {}\n", key, trace.final_value.value.to_json()));

            for val in &trace.history {
                let marker = if val.is_final { "✓" } else { "○" };
                let override_note = if !val.is_final { " <- overridden" } else { "" };
                report.push_str(&format!(
                    "  {} [{}] {}{}\n",
                    marker,
                    val.layer,
                    val.value.to_json(),
                    override_note
                ));
            }
            report.push('\n');
        }

        report
    }
}

/// Collects layer values while a module resolves.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    values: BTreeMap<String, Vec<LayerValue>>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `layer` supplied `value` for `key`.
    ///
    /// Layers must be added lowest first.
    pub fn add_value(&mut self, key: String, value: Value, layer: Layer) {
        self.values
            .entry(key)
            .or_default()
            .push(LayerValue::new(value, layer, false));
    }

    /// Finish the trace against the resolved table.
    pub fn build(self, resolved: &Table) -> MergeTrace {
        let traces = self
            .values
            .into_iter()
            .filter_map(|(key, history)| {
                KeyTrace::new(history, resolved.get(&key)).map(|trace| (key, trace))
            })
            .collect();
        MergeTrace { traces }
    }
}
