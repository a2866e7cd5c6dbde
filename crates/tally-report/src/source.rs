//! # Inventory Sources
//!
//! Where raw product records come from. The metrics never fetch anything;
//! a source hands over records that have already arrived.
//!
//! ```text
//! ┌──────────────────┐      ┌───────────────────┐      ┌──────────────────┐
//! │  JsonFileSource  │──┐   │                   │      │                  │
//! │  (export file)   │  ├──►│  InventorySource  │─────►│ Vec<RawProduct   │
//! │  StaticSource    │──┘   │      ::load()     │      │     Record>      │
//! │  (in memory)     │      │                   │      │                  │
//! └──────────────────┘      └───────────────────┘      └──────────────────┘
//! ```
//!
//! ## Accepted document shapes
//! ```json
//! [ { "name": "Cola", "initial_quantity": 10, ... }, ... ]
//! { "records": [ ... ] }
//! { "products": [ ... ] }
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tally_core::RawProductRecord;

use crate::error::{ReportError, ReportResult};

/// Anything that can produce the records of one stock count.
pub trait InventorySource {
    /// Human-readable name for logs and error messages.
    fn describe(&self) -> String;

    /// Loads every record. An empty list is a valid answer.
    fn load(&self) -> ReportResult<Vec<RawProductRecord>>;

    /// Loads records, failing with [`ReportError::EmptySource`] when none exist.
    fn load_non_empty(&self) -> ReportResult<Vec<RawProductRecord>> {
        let records = self.load()?;
        if records.is_empty() {
            return Err(ReportError::EmptySource(self.describe()));
        }
        Ok(records)
    }
}

// =============================================================================
// JSON File Source
// =============================================================================

/// Records exported from the inventory store as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> ReportResult<Vec<RawProductRecord>> {
        debug!(path = ?self.path, "Reading inventory document");
        let contents = std::fs::read_to_string(&self.path).map_err(|e| ReportError::SourceRead {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let records = parse_document(&contents)?;
        info!(path = ?self.path, count = records.len(), "Inventory records loaded");
        Ok(records)
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// Records already held in memory (tests, embedding callers).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    records: Vec<RawProductRecord>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<RawProductRecord>) -> Self {
        StaticSource {
            name: name.into(),
            records,
        }
    }
}

impl InventorySource for StaticSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> ReportResult<Vec<RawProductRecord>> {
        Ok(self.records.clone())
    }
}

// =============================================================================
// Document Parsing
// =============================================================================

/// Keys under which a wrapped document may hold its records.
const RECORD_KEYS: [&str; 3] = ["records", "products", "items"];

/// Parses an inventory JSON document in any of the accepted shapes.
///
/// Individual records are read leniently; only a document that is not JSON,
/// or has no record list at all, is rejected.
pub fn parse_document(contents: &str) -> ReportResult<Vec<RawProductRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| ReportError::InvalidDocument(e.to_string()))?;

    let list = match value {
        serde_json::Value::Array(list) => serde_json::Value::Array(list),
        serde_json::Value::Object(mut map) => RECORD_KEYS
            .iter()
            .find_map(|key| map.remove(*key))
            .ok_or_else(|| {
                ReportError::InvalidDocument(
                    "expected an array of product records or an object with a \"records\" array"
                        .into(),
                )
            })?,
        other => {
            return Err(ReportError::InvalidDocument(format!(
                "expected an array or object, found {}",
                json_kind(&other)
            )))
        }
    };

    serde_json::from_value(list).map_err(|e| ReportError::InvalidDocument(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
