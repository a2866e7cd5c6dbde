//! # Report Error Types
//!
//! Error types for loading inventory documents, reading configuration and
//! producing reports.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Source      │  │       Output            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  SourceRead     │  │  SerializationFailed    │ │
//! │  │  ConfigLoad     │  │  InvalidDocument│  │                         │ │
//! │  │  ConfigSave     │  │  EmptySource    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The metrics themselves never fail. Everything here happens around them.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Report error type covering every failure outside the pure metrics.
#[derive(Debug, Error)]
pub enum ReportError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsed but holds an unusable value.
    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Source Errors
    // =========================================================================
    /// The inventory document could not be read.
    #[error("Failed to read inventory source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    /// The inventory document is not a list of product records.
    #[error("Invalid inventory document: {0}")]
    InvalidDocument(String),

    /// The source holds no records at all.
    #[error("Inventory source '{0}' contains no records")]
    EmptySource(String),

    // =========================================================================
    // Output Errors
    // =========================================================================
    /// Report could not be serialized.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Strict validation rejected the input.
    #[error(transparent)]
    Core(#[from] tally_core::CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for ReportError {
    fn from(err: toml::de::Error) -> Self {
        ReportError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ReportError {
    fn from(err: toml::ser::Error) -> Self {
        ReportError::ConfigSaveFailed(err.to_string())
    }
}

impl From<tally_core::ValidationError> for ReportError {
    fn from(err: tally_core::ValidationError) -> Self {
        ReportError::InvalidConfig(err.to_string())
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error category, stable across message wording changes.
///
/// Presentation layers switch on this rather than parsing messages:
/// ```json
/// { "code": "INVALID_DOCUMENT", "message": "Invalid inventory document: ..." }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigError,
    SourceUnavailable,
    InvalidDocument,
    NoProducts,
    ValidationError,
    Internal,
}

/// Serializable error payload for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl ReportError {
    /// Returns the category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReportError::InvalidConfig(_)
            | ReportError::ConfigLoadFailed(_)
            | ReportError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
            ReportError::SourceRead { .. } => ErrorCode::SourceUnavailable,
            ReportError::InvalidDocument(_) => ErrorCode::InvalidDocument,
            ReportError::EmptySource(_) => ErrorCode::NoProducts,
            ReportError::Core(_) => ErrorCode::ValidationError,
            ReportError::SerializationFailed(_) => ErrorCode::Internal,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        self.code() == ErrorCode::ConfigError
    }

    /// Converts to the payload shown to a presentation layer.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ReportError::InvalidConfig("bad".into()).code(),
            ErrorCode::ConfigError
        );
        assert!(ReportError::ConfigLoadFailed("x".into()).is_config_error());
        assert_eq!(
            ReportError::EmptySource("today.json".into()).code(),
            ErrorCode::NoProducts
        );
        assert!(!ReportError::InvalidDocument("x".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = ReportError::SourceRead {
            path: PathBuf::from("/tmp/missing.json"),
            reason: "No such file".into(),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
        assert!(err.to_string().contains("No such file"));
    }

    #[test]
    fn test_payload_serialization() {
        let payload = ReportError::EmptySource("today.json".into()).to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["code"], "NO_PRODUCTS");
        assert_eq!(
            json["message"],
            "Inventory source 'today.json' contains no records"
        );
    }

    #[test]
    fn test_validation_error_is_config_error() {
        let err: ReportError = tally_core::ValidationError::not_allowed("sort", &["name"]).into();
        assert!(err.is_config_error());
    }
}
