//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  normalize / aggregate / rollup   → NEVER fail (numeric defaults)       │
//! │                                                                         │
//! │  tally-core errors (this file)                                          │
//! │  ├── ValidationError  - strict form-entry checks, option parsing        │
//! │  └── CoreError        - a whole record rejected by strict checks        │
//! │                                                                         │
//! │  tally-report errors (separate crate)                                   │
//! │  └── ReportError      - file, config and parse failures                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Metrics are computed for display robustness: bad data produces a number,
//! not an error. These types only exist for the collaborators that choose to
//! validate records before accepting them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised when a collaborator asks for strict record checking.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record failed strict validation.
    ///
    /// Carries the record id so the form layer can point at the right row.
    #[error("Record '{id}' is invalid: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error outside the context of a specific record.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set (sort keys, policies, granularities).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Final count is larger than what was available to count.
    #[error("final quantity {final_quantity} exceeds available {available}")]
    FinalExceedsAvailable { final_quantity: i64, available: i64 },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::NotAllowed`] from a static list.
    pub fn not_allowed(field: &str, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::FinalExceedsAvailable {
            final_quantity: 20,
            available: 14,
        };
        assert_eq!(err.to_string(), "final quantity 20 exceeds available 14");

        let err = ValidationError::not_allowed("sort", &["name", "final"]);
        assert_eq!(err.to_string(), "sort must be one of: [\"name\", \"final\"]");
    }

    #[test]
    fn test_invalid_record_message() {
        let err = CoreError::InvalidRecord {
            id: "p-7".to_string(),
            source: ValidationError::Required {
                field: "name".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Record 'p-7' is invalid: name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
