//! # Validation Module
//!
//! Two kinds of checking, for two kinds of callers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Form entry (before a record exists)                                    │
//! │  └── validate_* / validate_record: strict, returns ValidationError      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Inventory store                                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Reports (records already stored, possibly dirty)                       │
//! │  └── inspect / inspect_all: tolerant, lists DataQualityIssue            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  normalize / aggregate: never fail, whatever inspect found              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::RawProductRecord;
use crate::{MAX_COUNT_QUANTITY, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Data-quality inspection
// =============================================================================

/// A problem found in a stored record. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityIssue {
    /// A cost, price or quantity below zero.
    NegativeValue { field: String, value: i64 },

    /// More units counted at the end than were available to count.
    FinalExceedsAvailable { final_quantity: i64, available: i64 },

    /// More units written off than were ever stocked.
    LossesExceedStock { losses: i64, stocked: i64 },

    /// Product has no name to show.
    MissingName,
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::NegativeValue { field, value } => {
                write!(f, "{} is negative ({})", field, value)
            }
            DataQualityIssue::FinalExceedsAvailable {
                final_quantity,
                available,
            } => write!(
                f,
                "final quantity {} exceeds available {}",
                final_quantity, available
            ),
            DataQualityIssue::LossesExceedStock { losses, stocked } => {
                write!(f, "losses {} exceed stocked quantity {}", losses, stocked)
            }
            DataQualityIssue::MissingName => write!(f, "name is empty"),
        }
    }
}

/// An issue tied to the record it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordIssue {
    pub record_id: String,
    pub record_name: String,
    pub issue: DataQualityIssue,
}

/// Lists the data-quality problems of one record.
///
/// ```rust
/// use tally_core::validation::{inspect, DataQualityIssue};
/// use tally_core::RawProductRecord;
///
/// let record = RawProductRecord {
///     name: "Cola".into(),
///     initial_quantity: 5,
///     final_quantity: Some(8),
///     ..Default::default()
/// };
/// assert_eq!(
///     inspect(&record),
///     vec![DataQualityIssue::FinalExceedsAvailable { final_quantity: 8, available: 5 }]
/// );
/// ```
pub fn inspect(record: &RawProductRecord) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    if record.name.trim().is_empty() {
        issues.push(DataQualityIssue::MissingName);
    }

    let numeric = [
        ("cost", record.cost_cents),
        ("price", record.price_cents),
        ("initial_quantity", record.initial_quantity),
        ("incoming_quantity", record.incoming_quantity),
        ("losses", record.losses),
    ];
    for (field, value) in numeric {
        if value < 0 {
            issues.push(DataQualityIssue::NegativeValue {
                field: field.to_string(),
                value,
            });
        }
    }

    if let Some(final_quantity) = record.final_quantity {
        if final_quantity < 0 {
            issues.push(DataQualityIssue::NegativeValue {
                field: "final_quantity".to_string(),
                value: final_quantity,
            });
        }
    }

    if record.losses > record.stocked() {
        issues.push(DataQualityIssue::LossesExceedStock {
            losses: record.losses,
            stocked: record.stocked(),
        });
    }

    if let Some(final_quantity) = record.final_quantity {
        if final_quantity > record.available() {
            issues.push(DataQualityIssue::FinalExceedsAvailable {
                final_quantity,
                available: record.available(),
            });
        }
    }

    issues
}

/// Inspects every record, keeping input order.
pub fn inspect_all(records: &[RawProductRecord]) -> Vec<RecordIssue> {
    records
        .iter()
        .flat_map(|record| {
            inspect(record).into_iter().map(move |issue| RecordIssue {
                record_id: record.id.clone(),
                record_name: record.name.clone(),
                issue,
            })
        })
        .collect()
}

// =============================================================================
// Strict validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most MAX_NAME_LENGTH characters
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coca-Cola 330ml").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a business code (SKU).
///
/// Letters, digits, hyphens and underscores only; at most 50 characters.
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a counted quantity: 0 to MAX_COUNT_QUANTITY inclusive.
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_COUNT_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_COUNT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a cost or price in cents. Zero is allowed (free items).
///
/// ```rust
/// use tally_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price", 1099).is_ok());
/// assert!(validate_price_cents("price", 0).is_ok());
/// assert!(validate_price_cents("cost", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Strict check of a whole record, as a form would run before saving.
///
/// Stops at the first problem.
pub fn validate_record(record: &RawProductRecord) -> CoreResult<()> {
    check_record(record).map_err(|source| CoreError::InvalidRecord {
        id: record.id.clone(),
        source,
    })
}

fn check_record(record: &RawProductRecord) -> ValidationResult<()> {
    validate_product_name(&record.name)?;
    if let Some(code) = &record.code {
        validate_code(code)?;
    }
    validate_price_cents("cost", record.cost_cents)?;
    validate_price_cents("price", record.price_cents)?;
    validate_quantity("initial_quantity", record.initial_quantity)?;
    validate_quantity("incoming_quantity", record.incoming_quantity)?;
    validate_quantity("losses", record.losses)?;

    if let Some(final_quantity) = record.final_quantity {
        validate_quantity("final_quantity", final_quantity)?;
        if final_quantity > record.available() {
            return Err(ValidationError::FinalExceedsAvailable {
                final_quantity,
                available: record.available(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
