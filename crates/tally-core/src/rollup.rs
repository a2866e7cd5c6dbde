//! # Period Rollup
//!
//! Multi-day reports: aggregate each period on its own, then aggregate the
//! period results into a grand total.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Period "2024-03-01" ──► normalize ──► aggregate ──► 55% avg  ─┐        │
//! │  Period "2024-03-02" ──► normalize ──► aggregate ──► 25% avg  ─┼─► 40%  │
//! │                                                                │        │
//! │  grand total = sums of period totals,                          │        │
//! │                mean of period averages ◄───────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The grand total averages the per-period averages, mirroring the per-item
//! mean used inside a period. It is not weighted by items or volume.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::aggregate::{aggregate_records, aggregate_summaries};
use crate::error::ValidationError;
use crate::normalize::SoldPolicy;
use crate::types::{Period, PeriodSummary, RawProductRecord, Rollup};
use crate::UNDATED_PERIOD_LABEL;

/// Rolls up periods with the default [`SoldPolicy`].
pub fn rollup(periods: &[Period]) -> Rollup {
    rollup_with(periods, SoldPolicy::default())
}

/// Rolls up periods. Period order is preserved in the output.
pub fn rollup_with(periods: &[Period], policy: SoldPolicy) -> Rollup {
    let summaries: Vec<PeriodSummary> = periods
        .iter()
        .map(|period| PeriodSummary {
            label: period.label.clone(),
            metrics: aggregate_records(&period.records, policy),
        })
        .collect();

    let grand_total = aggregate_summaries(summaries.iter().map(|s| &s.metrics));

    Rollup {
        periods: summaries,
        grand_total,
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// Length of a reporting period when grouping by count timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGranularity {
    /// One period per calendar day (UTC), labelled `YYYY-MM-DD`.
    #[default]
    Day,
    /// One period per calendar month (UTC), labelled `YYYY-MM`.
    Month,
}

impl PeriodGranularity {
    /// Label of the period containing `at`.
    pub fn label(&self, at: &DateTime<Utc>) -> String {
        match self {
            PeriodGranularity::Day => at.format("%Y-%m-%d").to_string(),
            PeriodGranularity::Month => format!("{:04}-{:02}", at.year(), at.month()),
        }
    }
}

impl fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodGranularity::Day => write!(f, "day"),
            PeriodGranularity::Month => write!(f, "month"),
        }
    }
}

impl FromStr for PeriodGranularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(PeriodGranularity::Day),
            "month" | "monthly" => Ok(PeriodGranularity::Month),
            _ => Err(ValidationError::not_allowed("period", &["day", "month"])),
        }
    }
}

/// Groups records into periods by their `created_at` timestamp.
///
/// Periods come out in ascending label order; records keep their input order
/// inside a period. Records without a timestamp go to a final period labelled
/// [`UNDATED_PERIOD_LABEL`].
pub fn group_by_period(records: &[RawProductRecord], granularity: PeriodGranularity) -> Vec<Period> {
    let mut dated: BTreeMap<String, Vec<RawProductRecord>> = BTreeMap::new();
    let mut undated = Vec::new();

    for record in records {
        match &record.created_at {
            Some(at) => dated
                .entry(granularity.label(at))
                .or_default()
                .push(record.clone()),
            None => undated.push(record.clone()),
        }
    }

    let mut periods: Vec<Period> = dated
        .into_iter()
        .map(|(label, records)| Period::new(label, records))
        .collect();

    if !undated.is_empty() {
        periods.push(Period::new(UNDATED_PERIOD_LABEL, undated));
    }

    periods
}

// =============================================================================
// Unit Tests
// =============================================================================
