//! # tally-report: Report Generation
//!
//! Everything around the pure metrics: configuration, record sources,
//! report documents and their text/JSON rendering. The `tally` binary is a
//! thin clap front-end over this library.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tally.toml + TALLY_* ──► ReportConfig ──► ReportContext / options      │
//! │                                                  │                      │
//! │  inventory.json ──► JsonFileSource ──► records ──┤                      │
//! │                                                  ▼                      │
//! │                                  report::build_* (tally-core inside)    │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                  render::render_*_text / to_json        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML config with environment overrides
//! - [`context`] - Store, operator and timestamp stamped on reports
//! - [`source`] - Inventory record sources
//! - [`report`] - Report documents
//! - [`render`] - Text tables and JSON output
//! - [`error`] - Error types and stable error codes

pub mod config;
pub mod context;
pub mod error;
pub mod render;
pub mod report;
pub mod source;

pub use config::{ReportConfig, ReportSettings, StoreConfig};
pub use context::ReportContext;
pub use error::{ErrorCode, ErrorPayload, ReportError, ReportResult};
pub use render::{OutputFormat, TextStyle};
pub use report::{
    build_inventory_report, build_period_report, build_period_report_from, build_quality_report,
    validate_strict, InventoryReport, PeriodReport, QualityReport,
};
pub use source::{parse_document, InventorySource, JsonFileSource, StaticSource};
