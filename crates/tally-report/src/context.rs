//! # Report Context
//!
//! Who and when a report is generated for. Passed explicitly to every report
//! builder instead of living in a global session store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;

/// Session details stamped onto a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContext {
    pub store_name: String,
    pub operator: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(store_name: impl Into<String>, operator: Option<String>) -> Self {
        ReportContext {
            store_name: store_name.into(),
            operator,
            generated_at: Utc::now(),
        }
    }

    /// Context for the configured store, stamped with the current time.
    pub fn from_config(config: &ReportConfig) -> Self {
        ReportContext::new(config.store.name.clone(), config.store.operator.clone())
    }

    /// Replaces the generation time (reproducible output in tests and reprints).
    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_config() {
        let mut config = ReportConfig::default();
        config.store.name = "Harbor Bar".to_string();
        config.store.operator = Some("Night shift".to_string());

        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let context = ReportContext::from_config(&config).at(stamp);

        assert_eq!(context.store_name, "Harbor Bar");
        assert_eq!(context.operator.as_deref(), Some("Night shift"));
        assert_eq!(context.generated_at, stamp);
    }
}
