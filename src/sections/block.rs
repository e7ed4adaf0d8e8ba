//! The `block` section: block.json metadata.
//!
//! Identity fields are copied from the resolved core section by the
//! composite resolver. File entries and API versions are static; the block
//! is always interactive.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Section, SectionConfig};
use crate::check::{invalid, valid, Checked};
use crate::constants::{Constants, Limits};
use crate::error::DefinitionError;
use crate::merge::deep_merge;
use crate::module::ConfigModule;
use crate::text::must_be;
use crate::validate::{is_string, is_table, literal, ArrayOf, StringValidator, Validator};
use crate::value::{Table, Value};

/// Static block.json file entries.
pub const FILES: [(&str, &str); 5] = [
    ("editorScript", "file:./index.js"),
    ("editorStyle", "file:./index.css"),
    ("style", "file:./styles.css"),
    ("render", "file:./render.php"),
    ("viewScriptModule", "file:./view.js"),
];

/// A resolved `block` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub namespace: String,
    pub slug: String,
    pub title: String,
    /// `namespace/slug`
    pub name: String,
    pub textdomain: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub supports: Table,
    pub attributes: Table,
    pub example: Table,
    pub ancestor: Vec<String>,
    pub parent: Vec<String>,
    pub provides_context: Table,
    pub styles: Vec<Table>,
    pub uses_context: Vec<String>,
    pub version: String,
    pub api_version: i64,
    pub editor_script: String,
    pub editor_style: String,
    pub style: String,
    pub render: String,
    pub view_script_module: String,
}

impl SectionConfig for BlockConfig {
    const SECTION: Section = Section::Block;
}

fn default_supports() -> Value {
    Value::from(json!({
        "interactivity": true,
        "align": true,
        "anchor": true,
        "className": true,
        "customClassName": true,
        "html": false,
        "inserter": true,
        "multiple": false,
        "reusable": false,
        "color": { "background": true, "text": true, "link": true },
        "spacing": { "blockGap": true, "margin": true, "padding": true }
    }))
}

fn default_attributes() -> Value {
    Value::from(json!({
        "content": { "type": "string", "default": "" },
        "alignment": { "type": "string", "default": "left" },
        "backgroundColor": { "type": "string", "default": "#ffffff" },
        "showDetails": { "type": "boolean", "default": false }
    }))
}

/// Validates a `namespace/slug` block name.
pub fn block_name(limits: Limits) -> impl Fn(&Value, &str) -> Checked<Value> + Clone + Send + Sync {
    move |value: &Value, label: &str| {
        let whole = StringValidator::new()
            .min(limits.min_block_name())
            .validate(value, label);
        if whole.is_failure() {
            return whole;
        }
        let name = value.as_str().unwrap_or_default();
        match name.split('/').collect::<Vec<_>>().as_slice() {
            [namespace, slug] if !namespace.is_empty() && !slug.is_empty() => {
                if namespace.chars().count() < limits.min_namespace {
                    invalid(
                        value,
                        label,
                        format!(
                            "namespace part {}",
                            must_be(format!("at least {} characters", limits.min_namespace))
                        ),
                    )
                } else {
                    valid(value.clone(), label, "")
                }
            }
            _ => invalid(
                value,
                label,
                must_be("a string with a single forward slash. eg namespace/slug"),
            ),
        }
    }
}

/// Accepts a supports object with `interactivity` set to `true`.
fn interactive_supports(value: &Value, label: &str) -> Checked<Value> {
    match value.get_path("interactivity") {
        Some(Value::Bool(true)) if value.as_table().is_some() => valid(value.clone(), label, ""),
        _ => invalid(value, label, must_be("an object with interactivity set to true")),
    }
}

/// Define the `block` module.
pub fn module(constants: &Constants) -> Result<ConfigModule, DefinitionError> {
    let limits = constants.limits;
    let string_list = || ArrayOf::new(StringValidator::new()).allow_empty(true);

    let mut builder = ConfigModule::builder(Section::Block.as_str())
        .static_value("version", constants.versions.base.as_str())
        .static_value("apiVersion", constants.versions.wp_block_api)
        .required("namespace")
        .required("slug")
        .required("title")
        .default_value("name", "")
        .default_value("textdomain", "")
        .default_value("supports", default_supports())
        .default_value("attributes", default_attributes())
        .default_value("icon", "block-default")
        .default_value("category", "widgets")
        .default_value("description", "")
        .default_value("example", Value::table())
        .default_value("providesContext", Value::table())
        .default_value("keywords", Value::Array(vec![]))
        .default_value("ancestor", Value::Array(vec![]))
        .default_value("parent", Value::Array(vec![]))
        .default_value("styles", Value::Array(vec![]))
        .default_value("usesContext", Value::Array(vec![]))
        .validator("version", literal(constants.versions.base.as_str()))
        .validator("apiVersion", literal(constants.versions.wp_block_api))
        .validator("namespace", StringValidator::new().min(limits.min_namespace))
        .validator("slug", StringValidator::new().min(limits.min_slug))
        .validator("title", StringValidator::new())
        .validator("name", block_name(limits))
        .validator("textdomain", is_string)
        .validator("supports", interactive_supports)
        .validator("attributes", is_table)
        .validator("icon", is_string)
        .validator("category", is_string)
        .validator("description", is_string)
        .validator("example", is_table)
        .validator("providesContext", is_table)
        .validator("keywords", string_list())
        .validator("ancestor", ArrayOf::new(block_name(limits)).allow_empty(true))
        .validator("parent", string_list())
        .validator("styles", ArrayOf::new(is_table).allow_empty(true))
        .validator("usesContext", string_list());

    for (key, file) in FILES {
        builder = builder.static_value(key, file).validator(key, literal(file));
    }

    builder.resolve_helper(derive_block).build()
}

/// Derive `name`, `textdomain` and interactive `supports` from the input.
fn derive_block(input: &Table, defaults: &Table, _statics: &Table) -> Table {
    let mut derived = Table::new();

    let namespace = input.get("namespace").and_then(Value::as_str);
    let slug = input.get("slug").and_then(Value::as_str);
    if let (Some(namespace), Some(slug)) = (namespace, slug) {
        derived.insert("name".into(), Value::from(format!("{}/{}", namespace, slug)));
    }
    if let Some(slug) = slug {
        derived.insert("textdomain".into(), Value::from(slug));
    }

    let base = defaults
        .get("supports")
        .and_then(Value::as_table)
        .cloned()
        .unwrap_or_default();
    let mut supports = match input.get("supports").and_then(Value::as_table) {
        Some(overrides) => deep_merge(&base, overrides),
        None => base,
    };
    supports.insert("interactivity".into(), Value::Bool(true));
    derived.insert("supports".into(), Value::Table(supports));

    derived
}
