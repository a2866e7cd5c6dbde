//! # Rendering
//!
//! Turns report documents into text for a terminal or printer, or into JSON
//! for the browser tables. Money formatting and percentage precision live
//! here, never in the metrics.

use serde::Serialize;
use std::fmt::Write;

use tally_core::{AggregateMetrics, Money};

use crate::config::ReportSettings;
use crate::error::{ReportError, ReportResult};
use crate::report::{InventoryReport, PeriodReport, QualityReport};

/// Output format of the `tally` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Display settings for text output.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub currency_symbol: String,
    pub percentage_decimals: usize,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle::from(&ReportSettings::default())
    }
}

impl From<&ReportSettings> for TextStyle {
    fn from(settings: &ReportSettings) -> Self {
        TextStyle {
            currency_symbol: settings.currency_symbol.clone(),
            percentage_decimals: settings.percentage_decimals as usize,
        }
    }
}

impl TextStyle {
    /// `$-12.50` style: symbol first, sign kept on the amount.
    pub fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }

    pub fn percentage(&self, value: f64) -> String {
        format!("{:.*}%", self.percentage_decimals, value)
    }
}

/// Pretty-printed JSON for any report document.
pub fn to_json<T: Serialize>(document: &T) -> ReportResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| ReportError::SerializationFailed(e.to_string()))
}

// =============================================================================
// Text rendering
// =============================================================================

/// Renders a single-count report as a text table followed by totals.
pub fn render_inventory_text(report: &InventoryReport, style: &TextStyle) -> String {
    let mut out = String::new();
    write_header(&mut out, "Inventory report", report);

    let rows: Vec<[String; 9]> = report
        .items
        .iter()
        .map(|item| {
            [
                item.name.clone(),
                item.unit.clone(),
                item.available.to_string(),
                item.final_quantity
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                item.sold.to_string(),
                style.money(item.revenue),
                style.money(item.loss_value),
                style.money(item.net_profit),
                style.percentage(item.sold_percentage),
            ]
        })
        .collect();

    let headers = [
        "Product", "Unit", "Avail", "Final", "Sold", "Revenue", "Losses", "Net", "Sold %",
    ];
    write_table(&mut out, &headers, &rows);

    out.push('\n');
    write_totals(&mut out, &report.totals, style);
    let _ = writeln!(
        out,
        "{:<22}{}",
        "Weighted sold %:",
        style.percentage(report.weighted_sold_percentage)
    );
    let _ = writeln!(
        out,
        "{:<22}{}",
        "Closing stock value:",
        style.money(report.closing_stock_value)
    );

    if !report.issues.is_empty() {
        let _ = writeln!(out, "\n{} data-quality issue(s); run `tally check` for details", report.issues.len());
    }

    out
}

/// Renders a period rollup: one row per period, then the grand total.
pub fn render_period_text(report: &PeriodReport, style: &TextStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Period report - {}", report.context.store_name);
    if let Some(granularity) = report.granularity {
        let _ = writeln!(out, "Grouped by {}", granularity);
    }
    let _ = writeln!(
        out,
        "Generated {}\n",
        report.context.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let rows: Vec<[String; 6]> = report
        .rollup
        .periods
        .iter()
        .map(|period| {
            let m = &period.metrics;
            [
                period.label.clone(),
                m.item_count.to_string(),
                style.money(m.total_revenue),
                style.money(m.total_losses),
                style.money(m.total_net_profit),
                style.percentage(m.average_sold_percentage),
            ]
        })
        .collect();

    let headers = ["Period", "Items", "Revenue", "Losses", "Net", "Avg sold %"];
    write_table(&mut out, &headers, &rows);

    out.push('\n');
    let _ = writeln!(out, "Grand total over {} period(s)", report.rollup.grand_total.item_count);
    write_totals(&mut out, &report.rollup.grand_total, style);
    out
}

/// Renders the data-quality list.
pub fn render_quality_text(report: &QualityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Checked {} record(s) for {}",
        report.records_checked, report.context.store_name
    );

    if report.is_clean() {
        out.push_str("No data-quality issues found\n");
        return out;
    }

    for found in &report.issues {
        let name = if found.record_name.trim().is_empty() {
            "<unnamed>"
        } else {
            found.record_name.as_str()
        };
        let _ = writeln!(out, "  [{}] {}: {}", found.record_id, name, found.issue);
    }
    out
}

fn write_header(out: &mut String, title: &str, report: &InventoryReport) {
    let _ = writeln!(out, "{} - {}", title, report.context.store_name);
    if let Some(operator) = &report.context.operator {
        let _ = writeln!(out, "Operator: {}", operator);
    }
    let _ = writeln!(
        out,
        "Generated {} (sort: {}, sold: {})\n",
        report.context.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.sort,
        report.sold_policy
    );
}

fn write_totals(out: &mut String, totals: &AggregateMetrics, style: &TextStyle) {
    let lines = [
        ("Revenue:", style.money(totals.total_revenue)),
        ("Cash:", style.money(totals.total_cash)),
        ("Cost of goods:", style.money(totals.total_cost)),
        ("Losses:", style.money(totals.total_losses)),
        ("Gross profit:", style.money(totals.total_gross_profit)),
        ("Net profit:", style.money(totals.total_net_profit)),
        ("Average sold %:", style.percentage(totals.average_sold_percentage)),
    ];
    for (label, value) in lines {
        let _ = writeln!(out, "{:<22}{}", label, value);
    }
}

/// First column left-aligned, the rest right-aligned.
fn write_table<const N: usize>(out: &mut String, headers: &[&str; N], rows: &[[String; N]]) {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header_cells, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);

    for row in rows {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let pad = width.saturating_sub(cell.chars().count());
        if i == 0 {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        } else {
            line.push_str("  ");
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ReportContext;
    use crate::report::{build_inventory_report, build_period_report_from, build_quality_report};
    use chrono::{TimeZone, Utc};
    use tally_core::{NormalizeOptions, Period, RawProductRecord, SoldPolicy};

    fn context() -> ReportContext {
        ReportContext::new("Kiosk", Some("Ana".to_string()))
            .at(Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap())
    }

    fn cola() -> RawProductRecord {
        RawProductRecord {
            id: "p-1".to_string(),
            name: "Cola".to_string(),
            unit: "can".to_string(),
            cost_cents: 1000,
            price_cents: 2000,
            initial_quantity: 10,
            incoming_quantity: 5,
            losses: 1,
            final_quantity: Some(6),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_style() {
        let style = TextStyle {
            currency_symbol: "€".to_string(),
            percentage_decimals: 1,
        };
        assert_eq!(style.money(Money::from_cents(-1250)), "€-12.50");
        assert_eq!(style.percentage(57.142857), "57.1%");
    }

    #[test]
    fn test_inventory_text() {
        let report = build_inventory_report(context(), &[cola()], &NormalizeOptions::default());
        let text = render_inventory_text(&report, &TextStyle::default());

        assert!(text.starts_with("Inventory report - Kiosk\nOperator: Ana\n"));
        assert!(text.contains("Product"));
        assert!(text.contains("$160.00"));
        assert!(text.contains("57.14%"));
        assert!(text.contains("Net profit:           $70.00"));
        assert!(!text.contains("data-quality"));
    }

    #[test]
    fn test_table_alignment() {
        let mut out = String::new();
        let rows = vec![["Cola".to_string(), "5".to_string()], ["Agua mineral".to_string(), "12".to_string()]];
        write_table(&mut out, &["Product", "Qty"], &rows);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Product       Qty");
        assert_eq!(lines[1], "------------  ---");
        assert_eq!(lines[2], "Cola            5");
        assert_eq!(lines[3], "Agua mineral   12");
    }

    #[test]
    fn test_period_text() {
        let periods = vec![Period::new("2024-03-01", vec![cola()])];
        let report = build_period_report_from(context(), &periods, SoldPolicy::AsCounted);
        let text = render_period_text(&report, &TextStyle::default());

        assert!(text.contains("2024-03-01"));
        assert!(text.contains("Grand total over 1 period(s)"));
    }

    #[test]
    fn test_quality_text() {
        let bad = RawProductRecord {
            final_quantity: Some(30),
            ..cola()
        };
        let text = render_quality_text(&build_quality_report(context(), &[bad]));
        assert!(text.contains("[p-1] Cola: final quantity 30 exceeds available 14"));

        let clean = render_quality_text(&build_quality_report(context(), &[cola()]));
        assert!(clean.contains("No data-quality issues found"));
    }

    #[test]
    fn test_to_json() {
        let report = build_inventory_report(context(), &[cola()], &NormalizeOptions::default());
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"store_name\": \"Kiosk\""));
    }
}
