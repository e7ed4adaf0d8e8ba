//! Layered merging of module defaults, input, helper output and statics.
//!
//! The override order is fixed: statics beat helper output, helper output
//! beats input, input beats defaults. Defaults and input are merged deeply
//! (nested objects merge key by key, arrays are replaced wholesale); helper
//! output and statics are overlaid key by key on top of that.

use std::fmt;

use crate::trace::{MergeTrace, TraceBuilder};
use crate::value::{Table, Value};

/// One of the four layers a resolved key can come from, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Default,
    Input,
    Helper,
    Static,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Default => "default",
            Layer::Input => "input",
            Layer::Helper => "helper",
            Layer::Static => "static",
        };
        f.write_str(name)
    }
}

/// Merge `overlay` into `base`, recursing where both sides hold an object.
pub fn deep_merge(base: &Table, overlay: &Table) -> Table {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match (merged.get(key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                Value::Table(deep_merge(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Resolve the four layers into one table.
///
/// ```
/// use build_block::merge::merge_layers;
/// use build_block::{Table, Value};
///
/// let mut defaults = Table::new();
/// defaults.insert("url".into(), Value::from(""));
/// let mut input = Table::new();
/// input.insert("version".into(), Value::from("9.9.9"));
/// let mut statics = Table::new();
/// statics.insert("version".into(), Value::from("0.0.0"));
///
/// let resolved = merge_layers(&defaults, &input, &Table::new(), &statics);
/// assert_eq!(resolved["version"], Value::from("0.0.0"));
/// assert_eq!(resolved["url"], Value::from(""));
/// ```
pub fn merge_layers(defaults: &Table, input: &Table, helper: &Table, statics: &Table) -> Table {
    let mut merged = deep_merge(defaults, input);
    merged.extend(helper.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged.extend(statics.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// [`merge_layers`], also recording which layers supplied each key.
pub fn merge_layers_traced(
    defaults: &Table,
    input: &Table,
    helper: &Table,
    statics: &Table,
) -> (Table, MergeTrace) {
    let merged = merge_layers(defaults, input, helper, statics);

    let mut builder = TraceBuilder::new();
    for (layer, table) in [
        (Layer::Default, defaults),
        (Layer::Input, input),
        (Layer::Helper, helper),
        (Layer::Static, statics),
    ] {
        for (key, value) in table {
            builder.add_value(key.clone(), value.clone(), layer);
        }
    }

    (merged.clone(), builder.build(&merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(json: serde_json::Value) -> Table {
        Value::from(json).into_table().unwrap()
    }

    #[test]
    fn test_override_order() {
        let defaults = table(json!({ "a": "default", "b": "default", "c": "default", "d": "default" }));
        let input = table(json!({ "b": "input", "c": "input", "d": "input" }));
        let helper = table(json!({ "c": "helper", "d": "helper" }));
        let statics = table(json!({ "d": "static" }));

        let merged = merge_layers(&defaults, &input, &helper, &statics);
        assert_eq!(
            merged,
            table(json!({ "a": "default", "b": "input", "c": "helper", "d": "static" }))
        );
    }

    #[test]
    fn test_defaults_and_input_merge_deeply() {
        let defaults = table(json!({
            "supports": { "html": false, "color": { "text": true, "link": true } },
            "keywords": ["a", "b"]
        }));
        let input = table(json!({
            "supports": { "color": { "link": false } },
            "keywords": ["c"]
        }));

        let merged = merge_layers(&defaults, &input, &Table::new(), &Table::new());
        assert_eq!(
            merged,
            table(json!({
                "supports": { "html": false, "color": { "text": true, "link": false } },
                "keywords": ["c"]
            }))
        );
    }

    #[test]
    fn test_helper_and_statics_replace_whole_values() {
        let input = table(json!({ "supports": { "html": true, "align": true } }));
        let helper = table(json!({ "supports": { "interactivity": true } }));
        let merged = merge_layers(&Table::new(), &input, &helper, &Table::new());
        assert_eq!(merged, table(json!({ "supports": { "interactivity": true } })));
    }

    #[test]
    fn test_input_object_replaces_default_scalar() {
        let defaults = table(json!({ "example": "" }));
        let input = table(json!({ "example": { "attributes": {} } }));
        let merged = merge_layers(&defaults, &input, &Table::new(), &Table::new());
        assert_eq!(merged["example"], Value::from(json!({ "attributes": {} })));
    }

    #[test]
    fn test_traced_merge_records_layers() {
        let defaults = table(json!({ "url": "", "version": "1.0.0" }));
        let input = table(json!({ "name": "pkg", "version": "2.0.0" }));
        let statics = table(json!({ "version": "0.0.0" }));

        let (merged, trace) = merge_layers_traced(&defaults, &input, &Table::new(), &statics);
        assert_eq!(merged["version"], Value::from("0.0.0"));

        let version = trace.trace("version").unwrap();
        assert_eq!(version.final_value.layer, Layer::Static);
        assert_eq!(version.source_count(), 3);
        assert!(trace.was_overridden("version"));
        assert!(!trace.was_overridden("name"));
        assert_eq!(trace.trace("url").unwrap().final_value.layer, Layer::Default);
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(Layer::Helper.to_string(), "helper");
        assert!(Layer::Static > Layer::Helper);
    }
}
