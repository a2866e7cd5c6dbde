//! End-to-end: inventory export file → source → report → rendered output.

use std::io::Write;

use chrono::{TimeZone, Utc};
use tally_core::{Money, NormalizeOptions, PeriodGranularity, SoldPolicy, SortKey};
use tally_report::render::{render_inventory_text, render_period_text, to_json};
use tally_report::{
    build_inventory_report, build_period_report, build_quality_report, parse_document,
    validate_strict, ErrorCode, InventorySource, JsonFileSource, ReportConfig, ReportContext,
    TextStyle,
};

const EXPORT: &str = r#"{
  "products": [
    {
      "id": "p-1", "name": "Zumo", "unit": "bottle",
      "cost_cents": 1000, "price_cents": 2000,
      "initial": 10, "incoming": 5, "losses": 1, "final": 6,
      "created_at": "2024-03-01T20:00:00Z"
    },
    {
      "id": "p-2", "name": "Ácido", "unit": "kg",
      "costCents": "500", "priceCents": 900.0,
      "initialQuantity": 4, "incomingQuantity": null, "loss": 0, "finalQuantity": 1,
      "created_at": "2024-03-01T21:00:00Z"
    },
    {
      "id": "p-3", "name": "agua", "unit": "bottle",
      "cost_cents": 300, "price_cents": 700,
      "initial_quantity": 20, "incoming_quantity": 0, "losses": 0,
      "created_at": "2024-04-02T09:00:00Z"
    }
  ]
}"#;

fn write_export() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

fn context() -> ReportContext {
    ReportContext::new("Harbor Bar", None).at(Utc.with_ymd_and_hms(2024, 4, 3, 8, 0, 0).unwrap())
}

#[test]
fn summary_from_export_file() {
    let file = write_export();
    let records = JsonFileSource::new(file.path()).load_non_empty().unwrap();
    assert_eq!(records.len(), 3);

    let report = build_inventory_report(context(), &records, &NormalizeOptions::default());

    let names: Vec<_> = report.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Ácido", "agua", "Zumo"]);

    // Zumo: 8 sold × 20.00; Ácido: 3 sold × 9.00; agua: not counted, nothing sold
    assert_eq!(report.totals.total_revenue, Money::from_cents(16000 + 2700));
    assert_eq!(report.totals.item_count, 3);
    assert!(report.issues.is_empty());

    let text = render_inventory_text(&report, &TextStyle::default());
    assert!(text.contains("Harbor Bar"));
    assert!(text.contains("$187.00"));
}

#[test]
fn summary_sorted_by_final_quantity_and_clamped() {
    let file = write_export();
    let records = JsonFileSource::new(file.path()).load().unwrap();

    let options = NormalizeOptions::default()
        .with_sort(SortKey::FinalQuantity)
        .with_sold_policy(SoldPolicy::ClampToZero);
    let report = build_inventory_report(context(), &records, &options);

    let finals: Vec<_> = report.items.iter().map(|i| i.effective_final).collect();
    assert_eq!(finals, vec![1, 6, 20]);
}

#[test]
fn periods_by_month() {
    let file = write_export();
    let records = JsonFileSource::new(file.path()).load().unwrap();

    let report = build_period_report(context(), &records, PeriodGranularity::Month, SoldPolicy::AsCounted);
    let labels: Vec<_> = report.rollup.periods.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-03", "2024-04"]);
    assert_eq!(report.rollup.grand_total.item_count, 2);

    let text = render_period_text(&report, &TextStyle::default());
    assert!(text.contains("Grouped by month"));
}

#[test]
fn check_flags_bad_counts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{ "id": "x", "name": "", "initial": 2, "final": 5 }}]"#
    )
    .unwrap();

    let records = JsonFileSource::new(file.path()).load().unwrap();
    let report = build_quality_report(context(), &records);
    assert_eq!(report.issues.len(), 2);

    let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
    assert_eq!(json["records_checked"], 1);
    assert_eq!(json["issues"][0]["record_id"], "x");
}

#[test]
fn empty_export_is_no_products_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "records": [] }}"#).unwrap();

    let err = JsonFileSource::new(file.path()).load_non_empty().unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoProducts);

    let payload = serde_json::to_value(err.to_payload()).unwrap();
    assert_eq!(payload["code"], "NO_PRODUCTS");
}

#[test]
fn config_file_drives_report_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.toml");
    std::fs::write(
        &path,
        "[store]\nname = \"Kiosk\"\n\n[report]\nsort = \"input\"\nsold_policy = \"clamp_to_zero\"\n",
    )
    .unwrap();

    let config = ReportConfig::load(Some(path)).unwrap();
    let options = config.normalize_options();
    assert_eq!(options.sort, SortKey::Input);
    assert_eq!(options.sold_policy, SoldPolicy::ClampToZero);
    assert_eq!(ReportContext::from_config(&config).store_name, "Kiosk");
}

#[test]
fn survey_export_with_major_unit_prices_and_plain_dates() {
    let records = parse_document(
        r#"[
            { "id": "s-1", "name": "Cola", "price": 20, "cost": 10,
              "initial": 10, "incoming": 5, "losses": 1, "final": 6,
              "created_at": "2024-03-01" },
            { "id": "s-2", "name": "Pan", "unitPrice": "2.50", "unitCost": 1.2,
              "initial": 4, "final": 0, "created_at": "03/01/2024" }
        ]"#,
    )
    .unwrap();

    let report = build_inventory_report(context(), &records, &NormalizeOptions::default());
    // Cola 8 × 20.00, Pan 4 × 2.50
    assert_eq!(report.totals.total_revenue, Money::from_cents(16000 + 1000));
    assert_eq!(report.totals.total_net_profit, Money::from_cents(7000 + 520));

    let periods = build_period_report(context(), &records, PeriodGranularity::Day, SoldPolicy::AsCounted);
    let labels: Vec<_> = periods.rollup.periods.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-03-01", "undated"]);
}

#[test]
fn strict_check_rejects_first_invalid_record() {
    let file = write_export();
    let records = JsonFileSource::new(file.path()).load().unwrap();
    assert!(validate_strict(&records).is_ok());

    let bad = parse_document(r#"[{ "id": "x", "name": "Cola", "initial": 2, "final": 5 }]"#).unwrap();
    let err = validate_strict(&bad).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.to_payload().code, ErrorCode::ValidationError);
}
