#![deny(missing_docs)]

//! # apidoc core
//!
//! Compiles API documentation (models and per-endpoint metadata) into API
//! Gateway resources on an existing CloudFormation template, and keeps the
//! resulting dependency graph within the backend's creation rate limit.

/// Shared error types.
pub mod error;

/// Template resources and serialization.
pub mod template;

/// Documentation inputs (models, endpoint metadata).
pub mod documentation;

/// `{{model: Name}}` reference resolution.
pub mod refs;

/// Model resource construction.
pub mod models;

/// Method resource augmentation.
pub mod methods;

/// Dependency chaining for rate-limited model creation.
pub mod chunking;

/// Logical id naming of method resources.
pub mod naming;

/// The compile pass.
pub mod compiler;

pub use chunking::{ChunkingConfig, DependencyChunker, DEFAULT_CHUNK_WIDTH};
pub use compiler::{compile, default_rest_api_id, CompileInput, CompileReport};
pub use documentation::{
    EndpointDocumentation, HttpEndpoint, MethodResponse, ModelDescriptor, ModelRef, Param,
};
pub use error::{tolerate_existing_version, AppError, AppResult};
pub use methods::{add_method_responses, add_request_models, add_request_parameters, augment_method};
pub use models::ModelResourceBuilder;
pub use refs::resolve_model_refs;
pub use template::{Resource, ResourceGraph, Template};
