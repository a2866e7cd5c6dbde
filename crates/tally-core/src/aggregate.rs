//! # Aggregator
//!
//! Reduces normalized items to report totals.
//!
//! Sums are plain additions. The sold percentage is averaged per item:
//!
//! ```text
//!   item A: available 100, sold 10  →  10%
//!   item B: available  10, sold 10  → 100%
//!
//!   average_sold_percentage = (10 + 100) / 2 = 55%
//!   (NOT 20 / 110 = 18.2%)
//! ```
//!
//! Every screen that shows a sold percentage has always reported this
//! per-item mean, and the rollup repeats it one level up.

use crate::money::Money;
use crate::normalize::{normalize_with, SoldPolicy};
use crate::types::{AggregateMetrics, NormalizedItem, RawProductRecord};

/// Aggregates a collection of normalized items.
///
/// Empty input yields all-zero metrics.
///
/// ```rust
/// use tally_core::aggregate::aggregate;
///
/// let metrics = aggregate(&[]);
/// assert!(metrics.total_revenue.is_zero());
/// assert_eq!(metrics.average_sold_percentage, 0.0);
/// ```
pub fn aggregate(items: &[NormalizedItem]) -> AggregateMetrics {
    let mut metrics = AggregateMetrics {
        item_count: items.len(),
        ..Default::default()
    };
    let mut percentage_sum = 0.0;

    for item in items {
        metrics.total_revenue += item.revenue;
        metrics.total_cost += item.cost_of_goods;
        metrics.total_losses += item.loss_value;
        metrics.total_gross_profit += item.gross_profit;
        metrics.total_net_profit += item.net_profit;
        metrics.total_cash += item.cash();
        percentage_sum += item.sold_percentage;
    }

    metrics.average_sold_percentage = mean(percentage_sum, items.len());
    metrics
}

/// Normalizes and aggregates raw records in one step.
///
/// Order is irrelevant for totals, so no sorting happens here.
pub fn aggregate_records(records: &[RawProductRecord], policy: SoldPolicy) -> AggregateMetrics {
    let items: Vec<NormalizedItem> = records
        .iter()
        .map(|record| normalize_with(record, policy))
        .collect();
    aggregate(&items)
}

/// Combines already-aggregated metrics (one per period) into a grand total.
///
/// Totals add up; `average_sold_percentage` is the mean of the inputs'
/// averages, and `item_count` becomes the number of inputs averaged over.
pub fn aggregate_summaries<'a, I>(summaries: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a AggregateMetrics>,
{
    let mut total = AggregateMetrics::default();
    let mut percentage_sum = 0.0;

    for metrics in summaries {
        total.item_count += 1;
        total.total_revenue += metrics.total_revenue;
        total.total_cost += metrics.total_cost;
        total.total_losses += metrics.total_losses;
        total.total_gross_profit += metrics.total_gross_profit;
        total.total_net_profit += metrics.total_net_profit;
        total.total_cash += metrics.total_cash;
        percentage_sum += metrics.average_sold_percentage;
    }

    total.average_sold_percentage = mean(percentage_sum, total.item_count);
    total
}

/// Volume-weighted sold percentage (total sold / total available).
///
/// Not used for `average_sold_percentage`; offered so a report can show both
/// figures side by side.
pub fn weighted_sold_percentage(items: &[NormalizedItem]) -> f64 {
    let sold = items.iter().fold(0i64, |acc, i| acc.saturating_add(i.sold));
    let available = items
        .iter()
        .fold(0i64, |acc, i| acc.saturating_add(i.available.max(0)));
    crate::normalize::sold_percentage(sold, available)
}

/// Total value of the stock still on the shelf: cost × effective final.
pub fn closing_stock_value(items: &[NormalizedItem]) -> Money {
    items
        .iter()
        .map(|i| i.cost.multiply_quantity(i.effective_final))
        .sum()
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::ordering::{sort_items, SortKey};

    fn record(name: &str, initial: i64, final_quantity: Option<i64>) -> RawProductRecord {
        RawProductRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            initial_quantity: initial,
            final_quantity,
            price_cents: 500,
            cost_cents: 300,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_is_all_zero() {
        let metrics = aggregate(&[]);
        assert_eq!(metrics, AggregateMetrics::default());
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_average_is_per_item_not_weighted() {
        let items = vec![
            normalize(&record("A", 100, Some(90))), // 10%
            normalize(&record("B", 10, Some(0))),   // 100%
        ];
        let metrics = aggregate(&items);

        assert!((metrics.average_sold_percentage - 55.0).abs() < 1e-9);
        assert!((weighted_sold_percentage(&items) - 18.1818).abs() < 1e-3);
    }

    #[test]
    fn test_totals() {
        let example = RawProductRecord {
            initial_quantity: 10,
            incoming_quantity: 5,
            losses: 1,
            final_quantity: Some(6),
            price_cents: 2000,
            cost_cents: 1000,
            ..Default::default()
        };
        let items = vec![normalize(&example), normalize(&record("B", 10, Some(4)))];
        let metrics = aggregate(&items);

        // second item: sold 6, revenue 30.00, cogs 30.00, margin 2.00 × 6
        assert_eq!(metrics.item_count, 2);
        assert_eq!(metrics.total_revenue, Money::from_cents(16000 + 3000));
        assert_eq!(metrics.total_cash, metrics.total_revenue);
        assert_eq!(metrics.total_cost, Money::from_cents(15000 + 3000));
        assert_eq!(metrics.total_losses, Money::from_cents(1000));
        assert_eq!(metrics.total_gross_profit, Money::from_cents(8000 + 1200));
        assert_eq!(metrics.total_net_profit, Money::from_cents(7000 + 1200));
    }

    #[test]
    fn test_sorting_does_not_change_totals() {
        let mut items: Vec<_> = [
            record("Pan", 20, Some(3)),
            record("Agua", 50, None),
            record("Leche", 12, Some(12)),
            record("Cafe", 8, Some(1)),
        ]
        .iter()
        .map(normalize)
        .collect();

        let by_name = {
            sort_items(&mut items, SortKey::Name);
            aggregate(&items)
        };
        let by_final = {
            sort_items(&mut items, SortKey::FinalQuantity);
            aggregate(&items)
        };
        assert_eq!(by_name, by_final);
    }

    #[test]
    fn test_aggregate_records_matches_normalize_then_aggregate() {
        let records = vec![record("X", 9, Some(20)), record("Y", 4, Some(1))];
        let items: Vec<_> = records.iter().map(normalize).collect();

        assert_eq!(aggregate_records(&records, SoldPolicy::AsCounted), aggregate(&items));

        let clamped = aggregate_records(&records, SoldPolicy::ClampToZero);
        assert_eq!(clamped.total_revenue, Money::from_cents(1500));
    }

    #[test]
    fn test_aggregate_summaries_averages_averages() {
        let day1 = aggregate(&[
            normalize(&record("A", 100, Some(90))),
            normalize(&record("B", 10, Some(0))),
        ]); // 55%
        let day2 = aggregate(&[normalize(&record("C", 4, Some(3)))]); // 25%

        let total = aggregate_summaries([&day1, &day2]);
        assert_eq!(total.item_count, 2);
        assert!((total.average_sold_percentage - 40.0).abs() < 1e-9);
        assert_eq!(total.total_revenue, day1.total_revenue + day2.total_revenue);

        assert_eq!(
            aggregate_summaries(Vec::<&AggregateMetrics>::new()),
            AggregateMetrics::default()
        );
    }

    #[test]
    fn test_closing_stock_value() {
        let items = vec![
            normalize(&record("A", 10, Some(4))),
            normalize(&record("B", 3, None)),
        ];
        assert_eq!(closing_stock_value(&items), Money::from_cents(300 * 7));
    }
}
