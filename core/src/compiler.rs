#![deny(missing_docs)]

//! # Compile Pass
//!
//! Runs the whole pass against one template:
//!
//! 1. **Validate**: model names are unique and no import shadows a declared model.
//! 2. **Models**: one `AWS::ApiGateway::Model` per descriptor.
//! 3. **Methods**: documentation merged into each documented method resource.
//! 4. **Chunking**: independent models chained, when enabled.
//! 5. **Outputs**: the REST API id exported as `AwsDocApiId`.
//!
//! All inputs are explicit; the template is borrowed mutably for the duration
//! of the pass and nothing else is read.

use crate::chunking::{ChunkingConfig, DependencyChunker};
use crate::documentation::{HttpEndpoint, ModelDescriptor, ModelRef};
use crate::error::{AppError, AppResult};
use crate::methods::augment_method;
use crate::models::ModelResourceBuilder;
use crate::naming::method_logical_id;
use crate::template::Template;
use serde_json::{json, Value};
use std::collections::HashSet;

/// Name of the output exporting the REST API id.
pub const API_ID_OUTPUT: &str = "AwsDocApiId";

/// The REST API reference used when none is configured.
pub fn default_rest_api_id() -> Value {
    json!({ "Ref": "ApiGatewayRestApi" })
}

/// Everything one compile pass reads.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// REST API identifier or expression the models are attached to.
    pub rest_api_id: Value,
    /// Models to create.
    pub models: Vec<ModelDescriptor>,
    /// Endpoints whose method resources get documented.
    pub endpoints: Vec<HttpEndpoint>,
    /// Model chaining settings.
    pub chunking: ChunkingConfig,
    /// Leave method request parameters alone.
    pub safe_mode: bool,
}

impl Default for CompileInput {
    fn default() -> Self {
        Self {
            rest_api_id: default_rest_api_id(),
            models: Vec::new(),
            endpoints: Vec::new(),
            chunking: ChunkingConfig::default(),
            safe_mode: false,
        }
    }
}

/// What a compile pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Model resources added.
    pub models_built: usize,
    /// Method resources augmented.
    pub methods_augmented: usize,
    /// Models given a chaining dependency.
    pub models_chained: usize,
}

/// Compiles `input` into `template`.
///
/// Validation runs before any mutation, so on error the template is untouched.
pub fn compile(template: &mut Template, input: &CompileInput) -> AppResult<CompileReport> {
    validate(template, input)?;

    let mut report = CompileReport::default();

    let builder = ModelResourceBuilder::new(input.rest_api_id.clone());
    for (name, resource) in builder.build_all(&input.models) {
        template.resources.insert(name, resource);
        report.models_built += 1;
    }

    for endpoint in &input.endpoints {
        let Some(documentation) = &endpoint.documentation else {
            tracing::warn!(
                path = %endpoint.path,
                method = %endpoint.method,
                "endpoint has no documentation, skipped"
            );
            continue;
        };
        let logical_id = method_logical_id(&endpoint.path, &endpoint.method);
        if let Some(resource) = template.resources.get_mut(&logical_id) {
            augment_method(resource, documentation, input.safe_mode);
            tracing::debug!(method = %logical_id, "augmented method resource");
            report.methods_augmented += 1;
        }
    }

    if input.chunking.enabled {
        report.models_chained =
            DependencyChunker::new(input.chunking.width).apply(&mut template.resources);
    }

    template.outputs.insert(
        API_ID_OUTPUT.to_string(),
        json!({ "Description": "API ID", "Value": input.rest_api_id }),
    );

    tracing::info!(
        models = report.models_built,
        methods = report.methods_augmented,
        chained = report.models_chained,
        "documentation compiled"
    );
    Ok(report)
}

fn validate(template: &Template, input: &CompileInput) -> AppResult<()> {
    if input.chunking.enabled && input.chunking.width == 0 {
        return Err(AppError::InvalidChunkWidth(input.chunking.width));
    }

    let mut declared = HashSet::new();
    for model in &input.models {
        if !declared.insert(model.name.as_str()) {
            return Err(AppError::DuplicateModel(model.name.clone()));
        }
    }

    for endpoint in &input.endpoints {
        let Some(documentation) = &endpoint.documentation else {
            continue;
        };
        for model_ref in documentation.model_refs() {
            if let ModelRef::Imported { import } = model_ref {
                if declared.contains(import.as_str()) {
                    return Err(AppError::ImportConflict(import.clone()));
                }
            }
        }

        let logical_id = method_logical_id(&endpoint.path, &endpoint.method);
        if !template.resources.contains_key(&logical_id) {
            return Err(AppError::MissingMethodResource(logical_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documentation::EndpointDocumentation;
    use crate::template::{Resource, METHOD_RESOURCE_TYPE};
    use pretty_assertions::assert_eq;

    fn descriptor(name: &str) -> ModelDescriptor {
        ModelDescriptor {
            name: name.into(),
            description: None,
            content_type: "application/json".into(),
            schema: None,
        }
    }

    fn template_with_method(logical_id: &str) -> Template {
        let mut template = Template::default();
        template
            .resources
            .insert(logical_id.into(), Resource::new(METHOD_RESOURCE_TYPE));
        template
    }

    #[test]
    fn test_compile_adds_models_and_output() {
        let mut template = Template::default();
        let input = CompileInput {
            models: vec![descriptor("Pet"), descriptor("Owner")],
            ..CompileInput::default()
        };

        let report = compile(&mut template, &input).unwrap();

        assert_eq!(report.models_built, 2);
        assert!(template.resources.contains_key("PetModel"));
        assert!(template.resources.contains_key("OwnerModel"));
        assert_eq!(
            template.outputs[API_ID_OUTPUT],
            json!({ "Description": "API ID", "Value": { "Ref": "ApiGatewayRestApi" } })
        );
    }

    #[test]
    fn test_compile_skips_undocumented_endpoints() {
        let mut template = Template::default();
        let input = CompileInput {
            endpoints: vec![HttpEndpoint {
                path: "pets".into(),
                method: "get".into(),
                documentation: None,
            }],
            ..CompileInput::default()
        };

        let report = compile(&mut template, &input).unwrap();
        assert_eq!(report.methods_augmented, 0);
    }

    #[test]
    fn test_compile_missing_method_fails_before_mutation() {
        let mut template = Template::default();
        let input = CompileInput {
            models: vec![descriptor("Pet")],
            endpoints: vec![HttpEndpoint {
                path: "pets".into(),
                method: "get".into(),
                documentation: Some(EndpointDocumentation::default()),
            }],
            ..CompileInput::default()
        };

        let err = compile(&mut template, &input).unwrap_err();

        assert!(matches!(err, AppError::MissingMethodResource(ref id) if id == "ApiGatewayMethodPetsGet"));
        assert!(template.resources.is_empty());
        assert!(template.outputs.is_empty());
    }

    #[test]
    fn test_compile_rejects_duplicate_models() {
        let mut template = Template::default();
        let input = CompileInput {
            models: vec![descriptor("Pet"), descriptor("Pet")],
            ..CompileInput::default()
        };

        let err = compile(&mut template, &input).unwrap_err();
        assert!(matches!(err, AppError::DuplicateModel(ref name) if name == "Pet"));
    }

    #[test]
    fn test_compile_rejects_import_of_declared_model() {
        let mut template = template_with_method("ApiGatewayMethodPetsPost");
        let mut documentation = EndpointDocumentation::default();
        documentation
            .request_models
            .insert("application/json".into(), ModelRef::imported("Pet"));
        let input = CompileInput {
            models: vec![descriptor("Pet")],
            endpoints: vec![HttpEndpoint {
                path: "/pets".into(),
                method: "POST".into(),
                documentation: Some(documentation),
            }],
            ..CompileInput::default()
        };

        let err = compile(&mut template, &input).unwrap_err();
        assert!(matches!(err, AppError::ImportConflict(ref name) if name == "Pet"));
    }

    #[test]
    fn test_compile_rejects_import_of_declared_response_model() {
        let mut template = template_with_method("ApiGatewayMethodPetsIdVarGet");
        let documentation: EndpointDocumentation = serde_json::from_value(json!({
            "methodResponses": [
                { "statusCode": 200, "responseModels": { "application/json": "Pet" } },
                { "statusCode": 404, "responseModels": { "application/json": { "import": "Error" } } }
            ]
        }))
        .unwrap();
        let input = CompileInput {
            models: vec![descriptor("Pet"), descriptor("Error")],
            endpoints: vec![HttpEndpoint {
                path: "pets/{id}".into(),
                method: "get".into(),
                documentation: Some(documentation),
            }],
            ..CompileInput::default()
        };

        let err = compile(&mut template, &input).unwrap_err();

        assert!(matches!(err, AppError::ImportConflict(ref name) if name == "Error"));
        assert_eq!(template.resources.len(), 1);
        assert!(template.outputs.is_empty());
    }

    #[test]
    fn test_compile_rejects_zero_width() {
        let mut template = Template::default();
        let input = CompileInput {
            chunking: ChunkingConfig {
                enabled: true,
                width: 0,
            },
            ..CompileInput::default()
        };

        let err = compile(&mut template, &input).unwrap_err();
        assert!(matches!(err, AppError::InvalidChunkWidth(0)));
    }

    #[test]
    fn test_compile_uses_configured_rest_api_id() {
        let mut template = Template::default();
        let input = CompileInput {
            rest_api_id: json!("xyz789"),
            models: vec![descriptor("Pet")],
            ..CompileInput::default()
        };

        compile(&mut template, &input).unwrap();

        assert_eq!(template.resources["PetModel"].properties["RestApiId"], json!("xyz789"));
        assert_eq!(template.outputs[API_ID_OUTPUT]["Value"], json!("xyz789"));
    }
}
