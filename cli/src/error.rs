#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use apidoc_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Service configuration could not be parsed.
    #[display("Config Error: {}", _0)]
    Yaml(serde_yaml::Error),

    /// Template could not be parsed or written.
    #[display("Template Error: {}", _0)]
    Json(serde_json::Error),

    /// The compile pass failed.
    #[display("{}", _0)]
    Core(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display_is_passed_through() {
        let err: CliError = AppError::DuplicateModel("Pet".into()).into();
        assert_eq!(err.to_string(), "Duplicate model declared: Pet");
    }

    #[test]
    fn test_string_converts_to_general() {
        let err: CliError = String::from("boom").into();
        assert!(matches!(err, CliError::General(_)));
    }
}
