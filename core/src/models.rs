//! # Model Resources
//!
//! Turns model descriptors into `AWS::ApiGateway::Model` resources.

use crate::documentation::ModelDescriptor;
use crate::refs::resolve_model_refs;
use crate::template::{Resource, MODEL_RESOURCE_TYPE};
use serde_json::{Map, Value};

/// Logical resource name of the model called `name`.
pub fn model_logical_id(name: &str) -> String {
    format!("{name}Model")
}

/// Builds model resources bound to one REST API.
#[derive(Debug, Clone)]
pub struct ModelResourceBuilder {
    rest_api_id: Value,
}

impl ModelResourceBuilder {
    /// Creates a builder for the given REST API identifier or expression.
    pub fn new(rest_api_id: Value) -> Self {
        Self { rest_api_id }
    }

    /// Builds the resource for one descriptor, returning it with its logical name.
    pub fn build(&self, descriptor: &ModelDescriptor) -> (String, Resource) {
        let mut resource = Resource::new(MODEL_RESOURCE_TYPE);
        let props = &mut resource.properties;
        props.insert("RestApiId".into(), self.rest_api_id.clone());
        props.insert(
            "ContentType".into(),
            Value::String(descriptor.content_type.clone()),
        );
        props.insert("Name".into(), Value::String(descriptor.name.clone()));
        props.insert(
            "Schema".into(),
            descriptor
                .schema
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
        );
        if let Some(description) = &descriptor.description {
            props.insert("Description".into(), Value::String(description.clone()));
        }

        resolve_model_refs(&self.rest_api_id, &mut resource);
        tracing::debug!(
            model = %descriptor.name,
            dependencies = resource.depends_on.len(),
            "built model resource"
        );

        (model_logical_id(&descriptor.name), resource)
    }

    /// Builds every descriptor, preserving input order.
    pub fn build_all<'a, I>(&self, descriptors: I) -> Vec<(String, Resource)>
    where
        I: IntoIterator<Item = &'a ModelDescriptor>,
    {
        descriptors.into_iter().map(|d| self.build(d)).collect()
    }
}
