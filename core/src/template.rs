#![deny(missing_docs)]

//! # Template Model
//!
//! The slice of a CloudFormation template the compile pass reads and mutates:
//! the `Resources` section (an insertion-ordered [`ResourceGraph`]) and the
//! `Outputs` section. Unknown top-level keys are carried through untouched so
//! the template round-trips.

use crate::error::AppResult;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Resource type of an API Gateway model.
pub const MODEL_RESOURCE_TYPE: &str = "AWS::ApiGateway::Model";

/// Resource type of an API Gateway method.
pub const METHOD_RESOURCE_TYPE: &str = "AWS::ApiGateway::Method";

/// Ordered mapping from logical resource name to resource.
pub type ResourceGraph = IndexMap<String, Resource>;

/// A single entry of the template's `Resources` section.
///
/// An explicitly empty `Properties` object read from the input is written
/// back; one that was absent is only written once something is added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawResource", into = "RawResource")]
pub struct Resource {
    /// CloudFormation resource type (e.g. `AWS::ApiGateway::Model`).
    pub kind: String,

    /// Resource properties, in template order.
    pub properties: Map<String, Value>,

    /// Logical names this resource must be created after.
    pub depends_on: IndexSet<String>,

    /// Any other resource attribute (`Condition`, `DeletionPolicy`, ...).
    pub extra: Map<String, Value>,

    properties_declared: bool,
}

impl Resource {
    /// Creates a resource of the given type with no properties.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Returns true for API Gateway model resources.
    pub fn is_model(&self) -> bool {
        self.kind == MODEL_RESOURCE_TYPE
    }
}

/// Wire shape of [`Resource`].
#[derive(Serialize, Deserialize)]
struct RawResource {
    #[serde(rename = "Type")]
    kind: String,

    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    properties: Option<Map<String, Value>>,

    #[serde(
        rename = "DependsOn",
        default,
        deserialize_with = "deserialize_depends_on",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    depends_on: IndexSet<String>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawResource> for Resource {
    fn from(raw: RawResource) -> Self {
        Self {
            kind: raw.kind,
            properties_declared: raw.properties.is_some(),
            properties: raw.properties.unwrap_or_default(),
            depends_on: raw.depends_on,
            extra: raw.extra,
        }
    }
}

impl From<Resource> for RawResource {
    fn from(resource: Resource) -> Self {
        let keep = resource.properties_declared || !resource.properties.is_empty();
        Self {
            kind: resource.kind,
            properties: keep.then_some(resource.properties),
            depends_on: resource.depends_on,
            extra: resource.extra,
        }
    }
}

/// CloudFormation accepts `DependsOn` as either a single name or a list.
fn deserialize_depends_on<'de, D>(deserializer: D) -> Result<IndexSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => IndexSet::new(),
        Some(OneOrMany::One(name)) => IndexSet::from([name]),
        Some(OneOrMany::Many(names)) => names.into_iter().collect(),
    })
}

/// A partially built infrastructure template.
///
/// Like [`Resource`], an explicitly empty `Outputs` section survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTemplate", into = "RawTemplate")]
pub struct Template {
    /// The `Resources` section.
    pub resources: ResourceGraph,

    /// The `Outputs` section.
    pub outputs: Map<String, Value>,

    /// Remaining top-level keys (`AWSTemplateFormatVersion`, `Description`, ...).
    pub extra: Map<String, Value>,

    outputs_declared: bool,
}

/// Wire shape of [`Template`].
#[derive(Serialize, Deserialize)]
struct RawTemplate {
    #[serde(rename = "Resources", default)]
    resources: ResourceGraph,

    #[serde(rename = "Outputs", default, skip_serializing_if = "Option::is_none")]
    outputs: Option<Map<String, Value>>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawTemplate> for Template {
    fn from(raw: RawTemplate) -> Self {
        Self {
            resources: raw.resources,
            outputs_declared: raw.outputs.is_some(),
            outputs: raw.outputs.unwrap_or_default(),
            extra: raw.extra,
        }
    }
}

impl From<Template> for RawTemplate {
    fn from(template: Template) -> Self {
        let keep = template.outputs_declared || !template.outputs.is_empty();
        Self {
            resources: template.resources,
            outputs: keep.then_some(template.outputs),
            extra: template.extra,
        }
    }
}

impl Template {
    /// Parses a template from its JSON representation.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the template as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
