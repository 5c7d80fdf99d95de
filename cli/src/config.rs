#![deny(missing_docs)]

//! # Service Configuration
//!
//! Reads the parts of a serverless-style service file the compiler needs:
//!
//! - `custom.documentation.models`: model descriptors.
//! - `provider.documentation.splitModels` / `splitModelsLimit`: model chaining.
//! - `provider.apiGateway.restApiId`: REST API the models attach to.
//! - `functions.*.events[].http`: documented endpoints.
//!
//! Shape validation happens upstream; unknown keys are ignored.

use crate::error::CliResult;
use apidoc_core::{
    default_rest_api_id, ChunkingConfig, CompileInput, HttpEndpoint, ModelDescriptor,
    DEFAULT_CHUNK_WIDTH,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Root of the service file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// `custom` section.
    #[serde(default)]
    pub custom: CustomSection,
    /// `provider` section.
    #[serde(default)]
    pub provider: ProviderSection,
    /// Functions by name, in file order.
    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,
}

/// `custom` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomSection {
    /// Documentation settings; absent means nothing to compile.
    pub documentation: Option<DocumentationSection>,
}

/// `custom.documentation`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentationSection {
    /// Declared models.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

/// `provider` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSection {
    /// `provider.documentation`.
    pub documentation: Option<ProviderDocumentation>,
    /// `provider.apiGateway`.
    pub api_gateway: Option<ApiGatewaySection>,
}

/// `provider.documentation`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDocumentation {
    /// Enables model chaining.
    pub split_models: Option<bool>,
    /// Chain width.
    pub split_models_limit: Option<usize>,
}

/// `provider.apiGateway`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewaySection {
    /// Identifier or intrinsic expression of an existing REST API.
    pub rest_api_id: Option<Value>,
}

/// One function of the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionConfig {
    /// Function events; only `http` events matter here.
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

/// A function event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventConfig {
    /// The `http` event, if this is one.
    pub http: Option<HttpEventConfig>,
}

/// An `http` event in long (`{ path, method, documentation }`) or short (`GET pets`) form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HttpEventConfig {
    /// Long form.
    Full(HttpEndpoint),
    /// Short form: `<METHOD> <path>`.
    Short(String),
}

impl HttpEventConfig {
    fn into_endpoint(self) -> Option<HttpEndpoint> {
        match self {
            HttpEventConfig::Full(endpoint) => Some(endpoint),
            HttpEventConfig::Short(spec) => {
                let (method, path) = spec.trim().split_once(char::is_whitespace)?;
                Some(HttpEndpoint {
                    path: path.trim().to_string(),
                    method: method.to_string(),
                    documentation: None,
                })
            }
        }
    }
}

/// Command line settings that take precedence over the service file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Force model chaining on or off; `None` defers to the service file.
    pub split_models: Option<bool>,
    /// Chain width.
    pub split_models_limit: Option<usize>,
    /// Leave method request parameters alone.
    pub safe_mode: bool,
}

impl ServiceConfig {
    /// Parses a service file from YAML.
    pub fn from_yaml_str(yaml: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a service file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            functions = config.functions.len(),
            "loaded service config"
        );
        Ok(config)
    }

    /// Builds the compile input, or `None` when no documentation is configured.
    pub fn compile_input(&self, overrides: &Overrides) -> Option<CompileInput> {
        let documentation = self.custom.documentation.as_ref()?;
        let provider_docs = self.provider.documentation.clone().unwrap_or_default();

        let chunking = ChunkingConfig {
            enabled: overrides
                .split_models
                .or(provider_docs.split_models)
                .unwrap_or(false),
            width: overrides
                .split_models_limit
                .or(provider_docs.split_models_limit.filter(|w| *w > 0))
                .unwrap_or(DEFAULT_CHUNK_WIDTH),
        };

        let rest_api_id = self
            .provider
            .api_gateway
            .as_ref()
            .and_then(|gw| gw.rest_api_id.clone())
            .unwrap_or_else(default_rest_api_id);

        Some(CompileInput {
            rest_api_id,
            models: documentation.models.clone(),
            endpoints: self.http_endpoints(),
            chunking,
            safe_mode: overrides.safe_mode,
        })
    }

    /// All `http` events across functions, in file order.
    pub fn http_endpoints(&self) -> Vec<HttpEndpoint> {
        self.functions
            .values()
            .flat_map(|f| f.events.iter())
            .filter_map(|e| e.http.clone())
            .filter_map(HttpEventConfig::into_endpoint)
            .collect()
    }
}
