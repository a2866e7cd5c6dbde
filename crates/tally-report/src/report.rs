//! # Report Documents
//!
//! Builds the documents the presentation layer renders: one stock count
//! (item table + totals), a multi-period rollup, and a data-quality list.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records ──► inspect_all ──► warn! per issue ──┐                        │
//! │     │                                          │                        │
//! │     ├──► normalize_all_with ──► aggregate ─────┼──► InventoryReport     │
//! │     │                                          │                        │
//! │     └──► group_by_period ──► rollup_with ──────┴──► PeriodReport        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Issues are logged and attached to the document; they never stop a report.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tally_core::aggregate::{closing_stock_value, weighted_sold_percentage};
use tally_core::validation::validate_record;
use tally_core::{
    aggregate, group_by_period, inspect_all, normalize_all_with, rollup_with, AggregateMetrics,
    Money, NormalizeOptions, NormalizedItem, Period, PeriodGranularity, RawProductRecord,
    RecordIssue, Rollup, SoldPolicy, SortKey,
};

use crate::context::ReportContext;
use crate::error::ReportResult;

// =============================================================================
// Inventory Report
// =============================================================================

/// Report for a single stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub context: ReportContext,
    pub sort: SortKey,
    pub sold_policy: SoldPolicy,
    pub items: Vec<NormalizedItem>,
    pub totals: AggregateMetrics,
    /// Total sold over total available, shown next to the per-item average.
    pub weighted_sold_percentage: f64,
    /// Cost value of what is left on the shelf.
    pub closing_stock_value: Money,
    pub issues: Vec<RecordIssue>,
}

/// Builds the report for one stock count.
pub fn build_inventory_report(
    context: ReportContext,
    records: &[RawProductRecord],
    options: &NormalizeOptions,
) -> InventoryReport {
    let issues = inspect_all(records);
    log_issues(&issues);

    let items = normalize_all_with(records, options);
    let totals = aggregate(&items);

    info!(
        store = %context.store_name,
        items = items.len(),
        issues = issues.len(),
        sort = %options.sort,
        sold_policy = %options.sold_policy,
        revenue = %totals.total_revenue,
        "Inventory report built"
    );

    InventoryReport {
        context,
        sort: options.sort,
        sold_policy: options.sold_policy,
        weighted_sold_percentage: weighted_sold_percentage(&items),
        closing_stock_value: closing_stock_value(&items),
        items,
        totals,
        issues,
    }
}

// =============================================================================
// Period Report
// =============================================================================

/// Report over several periods with a grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub context: ReportContext,
    /// `None` when the caller supplied the periods directly.
    pub granularity: Option<PeriodGranularity>,
    pub sold_policy: SoldPolicy,
    pub rollup: Rollup,
    pub issues: Vec<RecordIssue>,
}

/// Groups records by count timestamp and rolls the periods up.
pub fn build_period_report(
    context: ReportContext,
    records: &[RawProductRecord],
    granularity: PeriodGranularity,
    policy: SoldPolicy,
) -> PeriodReport {
    let periods = group_by_period(records, granularity);
    let mut report = build_period_report_from(context, &periods, policy);
    report.granularity = Some(granularity);
    report
}

/// Rolls up periods that the caller has already grouped.
pub fn build_period_report_from(
    context: ReportContext,
    periods: &[Period],
    policy: SoldPolicy,
) -> PeriodReport {
    let issues: Vec<RecordIssue> = periods
        .iter()
        .flat_map(|period| inspect_all(&period.records))
        .collect();
    log_issues(&issues);

    let rollup = rollup_with(periods, policy);

    info!(
        store = %context.store_name,
        periods = rollup.periods.len(),
        issues = issues.len(),
        revenue = %rollup.grand_total.total_revenue,
        "Period report built"
    );

    PeriodReport {
        context,
        granularity: None,
        sold_policy: policy,
        rollup,
        issues,
    }
}

// =============================================================================
// Data-quality Report
// =============================================================================

/// Result of checking records without computing metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub context: ReportContext,
    pub records_checked: usize,
    pub issues: Vec<RecordIssue>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Lists the data-quality issues of a record set.
pub fn build_quality_report(context: ReportContext, records: &[RawProductRecord]) -> QualityReport {
    let issues = inspect_all(records);
    log_issues(&issues);

    QualityReport {
        context,
        records_checked: records.len(),
        issues,
    }
}

/// Strict form-entry validation of every record.
///
/// Unlike [`build_quality_report`] this stops at the first invalid record
/// and returns it as an error.
pub fn validate_strict(records: &[RawProductRecord]) -> ReportResult<()> {
    for record in records {
        validate_record(record)?;
    }
    info!(records = records.len(), "Strict validation passed");
    Ok(())
}

fn log_issues(issues: &[RecordIssue]) {
    for found in issues {
        warn!(
            record_id = %found.record_id,
            record_name = %found.record_name,
            issue = %found.issue,
            "Data-quality issue"
        );
    }
}
