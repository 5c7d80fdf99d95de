#![deny(missing_docs)]

//! # Model Reference Resolution
//!
//! Rewrites `{{model: Name}}` markers inside a model schema into
//! `Fn::Join` expressions pointing at the API Gateway model URL, and records
//! the referenced model resources as dependencies of the owning resource.

use crate::template::Resource;
use indexmap::IndexSet;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Property name that carries model markers.
pub const REF_KEY: &str = "$ref";

const MODELS_BASE_URL: &str = "https://apigateway.amazonaws.com/restapis";

fn model_marker() -> &'static Regex {
    static MODEL_RE: OnceLock<Regex> = OnceLock::new();
    MODEL_RE.get_or_init(|| Regex::new(r"\{\{model:\s*([-\w]+)\}\}").expect("Invalid regex"))
}

/// Returns the model name of a `{{model: Name}}` marker, if `value` contains one.
pub fn parse_model_marker(value: &str) -> Option<&str> {
    model_marker()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The join expression resolving to the URL of model `name` under `rest_api_id`.
pub fn model_url_expression(rest_api_id: &Value, name: &str) -> Value {
    json!({
        "Fn::Join": [
            "/",
            [MODELS_BASE_URL, rest_api_id, "models", name]
        ]
    })
}

/// Resolves every model marker in the resource's `Schema` property.
///
/// A resource without a schema, or with an empty one, is left untouched.
/// A model referencing itself gets its marker rewritten but no dependency on
/// itself.
pub fn resolve_model_refs(rest_api_id: &Value, resource: &mut Resource) {
    let own_name = resource
        .properties
        .get("Name")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let Some(schema) = resource.properties.get_mut("Schema") else {
        return;
    };
    if is_empty_schema(schema) {
        return;
    }

    let mut found = IndexSet::new();
    replace_refs(rest_api_id, schema, &mut found);

    for name in found {
        if own_name.as_deref() == Some(name.as_str()) {
            continue;
        }
        resource.depends_on.insert(format!("{name}Model"));
    }
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn replace_refs(rest_api_id: &Value, value: &mut Value, found: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key == REF_KEY {
                    if let Value::String(marker) = v {
                        if let Some(name) = parse_model_marker(marker).map(str::to_owned) {
                            *v = model_url_expression(rest_api_id, &name);
                            found.insert(name);
                            continue;
                        }
                    }
                }
                replace_refs(rest_api_id, v, found);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                replace_refs(rest_api_id, v, found);
            }
        }
        _ => {}
    }
}
