#![deny(missing_docs)]

//! # Documentation Inputs
//!
//! Read-only inputs of a compile pass: model descriptors and the per-endpoint
//! documentation attached to `http` events. Field names follow the
//! camelCase keys used in service configuration files.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A documented data-shape model, compiled into one `AWS::ApiGateway::Model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Model name, unique per pass.
    pub name: String,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content type, e.g. `application/json`.
    pub content_type: String,
    /// JSON schema; may contain `{{model: Name}}` markers under `$ref` keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Reference from an endpoint to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelRef {
    /// A model built in this pass, by name.
    Direct(String),
    /// A model provisioned outside this pass, by its external identifier.
    Imported {
        /// External model identifier.
        import: String,
    },
}

impl ModelRef {
    /// Creates an imported reference.
    pub fn imported(identifier: impl Into<String>) -> Self {
        ModelRef::Imported {
            import: identifier.into(),
        }
    }

    /// The value written into the method resource: the model name for direct
    /// references, the external identifier for imports.
    pub fn target(&self) -> &str {
        match self {
            ModelRef::Direct(name) => name,
            ModelRef::Imported { import } => import,
        }
    }

    /// Logical name of the model resource this reference depends on, if any.
    pub fn dependency(&self) -> Option<String> {
        match self {
            ModelRef::Direct(name) => Some(format!("{name}Model")),
            ModelRef::Imported { .. } => None,
        }
    }
}

/// Content type to model reference.
pub type ModelMap = IndexMap<String, ModelRef>;

/// A documented request or response parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A documented method response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    /// Status code, normalised to its string form.
    #[serde(deserialize_with = "deserialize_status_code")]
    pub status_code: String,
    /// Headers the method passes through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<Param>>,
    /// Response body models by content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_models: Option<ModelMap>,
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(code) => Ok(code),
        Value::Number(code) => Ok(code.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "statusCode must be a string or a number, got {other}"
        ))),
    }
}

/// Documentation attached to a single endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointDocumentation {
    /// Short summary of the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description of the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documented request headers.
    pub request_headers: Vec<Param>,
    /// Documented path parameters.
    pub path_params: Vec<Param>,
    /// Documented query string parameters.
    pub query_params: Vec<Param>,
    /// Request body models by content type.
    pub request_models: ModelMap,
    /// Documented responses.
    pub method_responses: Vec<MethodResponse>,
    /// Documentation keys this pass does not interpret (tags, bodies, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EndpointDocumentation {
    /// Iterates over every model reference made by this endpoint.
    pub fn model_refs(&self) -> impl Iterator<Item = &ModelRef> {
        self.request_models.values().chain(
            self.method_responses
                .iter()
                .filter_map(|r| r.response_models.as_ref())
                .flat_map(|models| models.values()),
        )
    }
}

/// An `http` event of a function: the endpoint whose method resource gets documented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpEndpoint {
    /// Resource path, with or without a leading slash.
    pub path: String,
    /// HTTP verb.
    pub method: String,
    /// Attached documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<EndpointDocumentation>,
}
