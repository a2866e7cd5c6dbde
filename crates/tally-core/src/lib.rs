//! # tally-core: Pure Inventory Metrics
//!
//! This crate turns stock count records into the sales, profit and loss
//! figures shown on Tally's report screens. Every function is pure: no I/O,
//! no shared state, same input gives the same output.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (browser tables, printouts)           │   │
//! │  │     Report table ── Summary screen ── Survey ── Period report   │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │ JSON / TypeScript bindings             │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │           tally-report (config, sources, report documents)      │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ normalize │─►│ aggregate │─►│  rollup   │  │ ordering  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │validation │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Raw records and derived metrics
//! - [`money`] - Integer money (cents)
//! - [`normalize`] - Per-item sold/revenue/profit/loss figures
//! - [`aggregate`] - Totals and the per-item average sold percentage
//! - [`rollup`] - Per-period aggregation and grand totals
//! - [`ordering`] - Locale-aware name sort, final-quantity sort
//! - [`validation`] - Data-quality inspection and strict form validators
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{aggregate, normalize_all, RawProductRecord};
//!
//! let records = vec![
//!     RawProductRecord {
//!         name: "Cola".into(),
//!         cost_cents: 1000,
//!         price_cents: 2000,
//!         initial_quantity: 10,
//!         incoming_quantity: 5,
//!         losses: 1,
//!         final_quantity: Some(6),
//!         ..Default::default()
//!     },
//!     RawProductRecord {
//!         name: "Agua".into(),
//!         initial_quantity: 4,
//!         ..Default::default()
//!     },
//! ];
//!
//! let items = normalize_all(&records);
//! assert_eq!(items[0].name, "Agua");
//!
//! let totals = aggregate(&items);
//! assert_eq!(totals.total_revenue.cents(), 16000);
//! assert!((totals.average_sold_percentage - 28.571).abs() < 0.001);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod money;
pub mod normalize;
pub mod ordering;
pub mod rollup;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, aggregate_records, aggregate_summaries};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use normalize::{normalize, normalize_all, normalize_all_with, normalize_with, NormalizeOptions, SoldPolicy};
pub use ordering::{sort_items, SortKey};
pub use rollup::{group_by_period, rollup, rollup_with, PeriodGranularity};
pub use types::*;
pub use validation::{inspect, inspect_all, DataQualityIssue, RecordIssue};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Label of the period collecting records that carry no timestamp.
pub const UNDATED_PERIOD_LABEL: &str = "undated";

/// Largest quantity a strict form check accepts for a single count field.
///
/// Catches typos such as an extra zero or a barcode typed into a quantity box.
pub const MAX_COUNT_QUANTITY: i64 = 1_000_000;

/// Maximum product name length, in characters.
pub const MAX_NAME_LENGTH: usize = 200;
