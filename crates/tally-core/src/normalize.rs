//! # Metrics Normalizer
//!
//! Turns raw stock count records into per-item sales, profit and loss
//! figures. One parameterized implementation serves the report, summary and
//! survey screens.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RawProductRecord                                                       │
//! │       │                                                                 │
//! │       ├─ 1. available     = initial + incoming - losses                 │
//! │       ├─ 2. final         = final_quantity ?? available                 │
//! │       ├─ 3. sold          = available - final                           │
//! │       ├─ 4. unit_margin   = price - cost                                │
//! │       ├─ 5. cost_of_goods = cost × (initial + incoming)                 │
//! │       ├─ 6. loss_value    = losses × cost                               │
//! │       ├─ 7. revenue       = price × sold                                │
//! │       ├─ 8. gross_profit  = unit_margin × sold                          │
//! │       ├─ 9. net_profit    = gross_profit - loss_value                   │
//! │       └─ 10. sold_pct     = available > 0 ? sold / available × 100 : 0  │
//! │       ▼                                                                 │
//! │  NormalizedItem                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here returns an error. An uncounted product (`final_quantity`
//! absent) counts as fully on the shelf: zero sold. Inconsistent input, such
//! as a final count above what was available, still yields numbers.
//!
//! ## Example
//! ```rust
//! use tally_core::normalize::normalize;
//! use tally_core::RawProductRecord;
//!
//! let record = RawProductRecord {
//!     name: "Cola".into(),
//!     cost_cents: 1000,
//!     price_cents: 2000,
//!     initial_quantity: 10,
//!     incoming_quantity: 5,
//!     losses: 1,
//!     final_quantity: Some(6),
//!     ..Default::default()
//! };
//!
//! let item = normalize(&record);
//! assert_eq!(item.sold, 8);
//! assert_eq!(item.revenue.cents(), 16000);
//! assert_eq!(item.net_profit.cents(), 7000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::ordering::{sort_items, SortKey};
use crate::types::{NormalizedItem, RawProductRecord};

// =============================================================================
// Options
// =============================================================================

/// What to do when a count says more units remain than were available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoldPolicy {
    /// `sold = available - final`, negative results included.
    #[default]
    AsCounted,

    /// Negative `sold` becomes 0, so bad rows cannot pull revenue below zero.
    ClampToZero,
}

impl fmt::Display for SoldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoldPolicy::AsCounted => write!(f, "as_counted"),
            SoldPolicy::ClampToZero => write!(f, "clamp_to_zero"),
        }
    }
}

impl FromStr for SoldPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "as_counted" | "as-counted" | "raw" => Ok(SoldPolicy::AsCounted),
            "clamp_to_zero" | "clamp-to-zero" | "clamp" => Ok(SoldPolicy::ClampToZero),
            _ => Err(ValidationError::not_allowed(
                "sold_policy",
                &["as_counted", "clamp_to_zero"],
            )),
        }
    }
}

/// Parameters for [`normalize_all_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeOptions {
    #[serde(default)]
    pub sold_policy: SoldPolicy,
    #[serde(default)]
    pub sort: SortKey,
}

impl NormalizeOptions {
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_sold_policy(mut self, sold_policy: SoldPolicy) -> Self {
        self.sold_policy = sold_policy;
        self
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalizes one record with the default [`SoldPolicy`].
pub fn normalize(record: &RawProductRecord) -> NormalizedItem {
    normalize_with(record, SoldPolicy::default())
}

/// Normalizes one record.
pub fn normalize_with(record: &RawProductRecord, policy: SoldPolicy) -> NormalizedItem {
    let cost = record.cost();
    let price = record.price();

    let available = record.available();
    let effective_final = record.final_quantity.unwrap_or(available);
    let sold = match policy {
        SoldPolicy::AsCounted => available.saturating_sub(effective_final),
        SoldPolicy::ClampToZero => available.saturating_sub(effective_final).max(0),
    };

    let unit_margin = price - cost;
    let cost_of_goods = cost.multiply_quantity(record.stocked());
    let loss_value = cost.multiply_quantity(record.losses);
    let revenue = price.multiply_quantity(sold);
    let gross_profit = unit_margin.multiply_quantity(sold);
    let net_profit = gross_profit - loss_value;

    NormalizedItem {
        id: record.id.clone(),
        code: record.code.clone(),
        name: record.name.clone(),
        unit: record.unit.clone(),
        final_quantity: record.final_quantity,
        cost,
        price,
        available,
        effective_final,
        sold,
        unit_margin,
        revenue,
        cost_of_goods,
        loss_value,
        gross_profit,
        net_profit,
        sold_percentage: sold_percentage(sold, available),
    }
}

/// Normalizes every record, ordered by ascending name.
pub fn normalize_all(records: &[RawProductRecord]) -> Vec<NormalizedItem> {
    normalize_all_with(records, &NormalizeOptions::default())
}

/// Normalizes every record with explicit options.
pub fn normalize_all_with(
    records: &[RawProductRecord],
    options: &NormalizeOptions,
) -> Vec<NormalizedItem> {
    let mut items: Vec<NormalizedItem> = records
        .iter()
        .map(|record| normalize_with(record, options.sold_policy))
        .collect();
    sort_items(&mut items, options.sort);
    items
}

/// `sold / available × 100`, or 0 when nothing was available.
///
/// Always finite.
pub fn sold_percentage(sold: i64, available: i64) -> f64 {
    if available > 0 {
        sold as f64 / available as f64 * 100.0
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use proptest::prelude::*;

    fn record(
        initial: i64,
        incoming: i64,
        losses: i64,
        final_quantity: Option<i64>,
        price_cents: i64,
        cost_cents: i64,
    ) -> RawProductRecord {
        RawProductRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Cola".to_string(),
            unit: "bottle".to_string(),
            initial_quantity: initial,
            incoming_quantity: incoming,
            losses,
            final_quantity,
            price_cents,
            cost_cents,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let item = normalize(&record(10, 5, 1, Some(6), 2000, 1000));

        assert_eq!(item.available, 14);
        assert_eq!(item.effective_final, 6);
        assert_eq!(item.sold, 8);
        assert_eq!(item.unit_margin, Money::from_cents(1000));
        assert_eq!(item.revenue, Money::from_cents(16000));
        assert_eq!(item.cost_of_goods, Money::from_cents(15000));
        assert_eq!(item.loss_value, Money::from_cents(1000));
        assert_eq!(item.gross_profit, Money::from_cents(8000));
        assert_eq!(item.net_profit, Money::from_cents(7000));
        assert!((item.sold_percentage - 57.142857).abs() < 1e-4);
    }

    #[test]
    fn test_empty_uncounted_record() {
        let item = normalize(&record(0, 0, 0, None, 2000, 1000));

        assert_eq!(item.available, 0);
        assert_eq!(item.sold, 0);
        assert_eq!(item.sold_percentage, 0.0);
        assert!(item.revenue.is_zero());
    }

    #[test]
    fn test_uncounted_means_nothing_sold() {
        let item = normalize(&record(40, 12, 2, None, 350, 200));

        assert_eq!(item.effective_final, 50);
        assert_eq!(item.sold, 0);
        assert!(item.revenue.is_zero());
        assert_eq!(item.sold_percentage, 0.0);
        // losses still cost money
        assert_eq!(item.net_profit, Money::from_cents(-400));
    }

    #[test]
    fn test_identity_fields_carried_through() {
        let mut raw = record(3, 0, 0, Some(1), 100, 50);
        raw.code = Some("COLA-330".to_string());
        let item = normalize(&raw);

        assert_eq!(item.id, raw.id);
        assert_eq!(item.code.as_deref(), Some("COLA-330"));
        assert_eq!(item.name, "Cola");
        assert_eq!(item.unit, "bottle");
        assert_eq!(item.final_quantity, Some(1));
        assert_eq!(item.cash(), item.revenue);
    }

    #[test]
    fn test_final_above_available_as_counted() {
        let item = normalize(&record(5, 0, 0, Some(8), 1000, 400));

        assert_eq!(item.sold, -3);
        assert_eq!(item.revenue, Money::from_cents(-3000));
        assert!((item.sold_percentage + 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_final_above_available_clamped() {
        let item = normalize_with(&record(5, 0, 0, Some(8), 1000, 400), SoldPolicy::ClampToZero);

        assert_eq!(item.effective_final, 8);
        assert_eq!(item.sold, 0);
        assert!(item.revenue.is_zero());
        assert_eq!(item.sold_percentage, 0.0);
    }

    #[test]
    fn test_clamp_leaves_consistent_rows_alone() {
        let raw = record(10, 5, 1, Some(6), 2000, 1000);
        assert_eq!(
            normalize_with(&raw, SoldPolicy::ClampToZero),
            normalize_with(&raw, SoldPolicy::AsCounted)
        );
    }

    #[test]
    fn test_losses_exceeding_stock() {
        let item = normalize(&record(2, 0, 5, Some(0), 1000, 400));

        assert_eq!(item.available, -3);
        assert_eq!(item.sold_percentage, 0.0);
        assert_eq!(item.loss_value, Money::from_cents(2000));
    }

    #[test]
    fn test_normalize_all_sorts_by_name() {
        let mut b = record(1, 0, 0, None, 0, 0);
        b.name = "Bread".to_string();
        let mut a = record(1, 0, 0, None, 0, 0);
        a.name = "apple".to_string();

        let items = normalize_all(&[b, a]);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Bread"]);
    }

    #[test]
    fn test_normalize_all_with_options() {
        let mut b = record(10, 0, 0, Some(2), 0, 0);
        b.name = "Bread".to_string();
        let mut a = record(10, 0, 0, Some(9), 0, 0);
        a.name = "Apple".to_string();

        let options = NormalizeOptions::default().with_sort(SortKey::FinalQuantity);
        let items = normalize_all_with(&[a, b], &options);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bread", "Apple"]);
    }

    #[test]
    fn test_sold_policy_parsing() {
        assert_eq!("clamp".parse::<SoldPolicy>().unwrap(), SoldPolicy::ClampToZero);
        assert_eq!("as_counted".parse::<SoldPolicy>().unwrap(), SoldPolicy::AsCounted);
        assert!("round".parse::<SoldPolicy>().is_err());
        assert_eq!(SoldPolicy::ClampToZero.to_string(), "clamp_to_zero");
    }

    proptest! {
        #[test]
        fn prop_sold_percentage_is_finite(
            initial in -1_000i64..1_000_000,
            incoming in -1_000i64..1_000_000,
            losses in -1_000i64..1_000_000,
            final_quantity in proptest::option::of(-1_000i64..2_000_000),
        ) {
            let item = normalize(&record(initial, incoming, losses, final_quantity, 100, 50));
            prop_assert!(item.sold_percentage.is_finite());
            if item.available <= 0 {
                prop_assert_eq!(item.sold_percentage, 0.0);
            }
        }

        #[test]
        fn prop_extreme_values_never_panic(
            initial in any::<i64>(),
            incoming in any::<i64>(),
            losses in any::<i64>(),
            final_quantity in proptest::option::of(any::<i64>()),
            price in any::<i64>(),
            cost in any::<i64>(),
        ) {
            let raw = record(initial, incoming, losses, final_quantity, price, cost);
            for policy in [SoldPolicy::AsCounted, SoldPolicy::ClampToZero] {
                let item = normalize_with(&raw, policy);
                prop_assert!(item.sold_percentage.is_finite());
                let totals = crate::aggregate::aggregate(&[item.clone(), item]);
                prop_assert!(totals.average_sold_percentage.is_finite());
            }
        }

        #[test]
        fn prop_uncounted_sells_nothing(
            initial in 0i64..100_000,
            incoming in 0i64..100_000,
            losses in 0i64..100_000,
        ) {
            let item = normalize(&record(initial, incoming, losses, None, 100, 50));
            prop_assert_eq!(item.sold, 0);
            prop_assert!(item.revenue.is_zero());
        }
    }
}
