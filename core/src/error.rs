//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! The compile pass itself is total over well-formed input; the variants below
//! cover the fail-fast checks run by the orchestrator and the I/O that
//! surrounds it.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for template (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Two model descriptors share the same name.
    #[from(ignore)]
    #[display("Duplicate model declared: {_0}")]
    DuplicateModel(String),

    /// An imported model identifier collides with a model declared in the same pass.
    #[from(ignore)]
    #[display("Model '{_0}' is both declared and referenced as an import")]
    ImportConflict(String),

    /// An endpoint carries documentation but the template has no method resource for it.
    #[from(ignore)]
    #[display("Method resource not found: {_0}")]
    MissingMethodResource(String),

    /// Chunking was enabled with a width below one.
    #[from(ignore)]
    #[display("Invalid chunk width: {_0}")]
    InvalidChunkWidth(usize),

    /// The documentation version being uploaded already exists remotely.
    #[from(ignore)]
    #[display("documentation version already exists, skipping upload")]
    DocumentationVersionExists,

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Treats an already-existing documentation version as a successful upload.
///
/// Returns `Ok(None)` for `DocumentationVersionExists`; every other error is
/// propagated unchanged.
pub fn tolerate_existing_version<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::DocumentationVersionExists) => {
            tracing::info!("documentation version already exists, skipping upload");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
