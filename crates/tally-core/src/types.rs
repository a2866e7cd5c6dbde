//! # Domain Types
//!
//! The records flowing through a stock count report.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ RawProductRecord │──►│  NormalizedItem  │──►│ AggregateMetrics │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  counts entered  │   │  available, sold │   │  totals, average │    │
//! │  │  cost, price     │   │  revenue, profit │   │  sold percentage │    │
//! │  └──────────────────┘   └──────────────────┘   └────────┬─────────┘    │
//! │                                                          │              │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌────────▼─────────┐    │
//! │  │      Period      │──►│  PeriodSummary   │──►│      Rollup      │    │
//! │  │  label, records  │   │  label, metrics  │   │  + grand total   │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `RawProductRecord` is read-only input. Everything to its right is derived
//! fresh on every call and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Raw Product Record
// =============================================================================

/// One product line of a stock count, as produced by the inventory store.
///
/// Reading is lenient (see [`RawProductWire`]): numeric fields that are
/// absent, `null` or unreadable become 0, and an unreadable `created_at`
/// becomes `None`. `final_quantity` is the exception among the numbers:
/// absent means "not counted yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct RawProductRecord {
    /// Identifier assigned by the inventory store.
    pub id: String,

    /// Business code (SKU / short code), when the store has one.
    pub code: Option<String>,

    pub name: String,

    /// Unit of measure shown next to quantities ("kg", "bottle", ...).
    pub unit: String,

    /// Unit cost in cents.
    pub cost_cents: i64,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Stock on hand when the period opened.
    pub initial_quantity: i64,

    /// Stock received during the period.
    pub incoming_quantity: i64,

    /// Units written off (breakage, spoilage, shrinkage).
    pub losses: i64,

    /// Units left unsold at period end. `None` until counted.
    pub final_quantity: Option<i64>,

    /// When the count was recorded.
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input shape of a [`RawProductRecord`].
///
/// The report, summary and survey screens each named these fields a little
/// differently; the aliases accept all of those spellings. Money comes either
/// in cents (`cost_cents`, `costCents`) or in major units (`cost`,
/// `unitCost`); the cents field wins when both are present.
#[derive(Debug, Default, Deserialize)]
struct RawProductWire {
    #[serde(default, deserialize_with = "lenient::text")]
    id: String,

    #[serde(default, alias = "sku")]
    code: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    name: String,

    #[serde(default, deserialize_with = "lenient::text")]
    unit: String,

    #[serde(default, alias = "costCents", deserialize_with = "lenient::opt_int")]
    cost_cents: Option<i64>,

    #[serde(default, alias = "unitCost", deserialize_with = "lenient::opt_major_cents")]
    cost: Option<i64>,

    #[serde(default, alias = "priceCents", deserialize_with = "lenient::opt_int")]
    price_cents: Option<i64>,

    #[serde(default, alias = "unitPrice", deserialize_with = "lenient::opt_major_cents")]
    price: Option<i64>,

    #[serde(
        default,
        alias = "initial",
        alias = "initialQuantity",
        deserialize_with = "lenient::int"
    )]
    initial_quantity: i64,

    #[serde(
        default,
        alias = "incoming",
        alias = "incomingQuantity",
        deserialize_with = "lenient::int"
    )]
    incoming_quantity: i64,

    #[serde(default, alias = "loss", deserialize_with = "lenient::int")]
    losses: i64,

    #[serde(
        default,
        alias = "final",
        alias = "finalQuantity",
        deserialize_with = "lenient::opt_int"
    )]
    final_quantity: Option<i64>,

    #[serde(default, alias = "createdAt", deserialize_with = "lenient::opt_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl From<RawProductWire> for RawProductRecord {
    fn from(wire: RawProductWire) -> Self {
        RawProductRecord {
            id: wire.id,
            code: wire.code,
            name: wire.name,
            unit: wire.unit,
            cost_cents: wire.cost_cents.or(wire.cost).unwrap_or(0),
            price_cents: wire.price_cents.or(wire.price).unwrap_or(0),
            initial_quantity: wire.initial_quantity,
            incoming_quantity: wire.incoming_quantity,
            losses: wire.losses,
            final_quantity: wire.final_quantity,
            created_at: wire.created_at,
        }
    }
}

impl<'de> Deserialize<'de> for RawProductRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawProductWire::deserialize(deserializer).map(RawProductRecord::from)
    }
}

impl RawProductRecord {
    /// Unit cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Quantity eligible for sale: initial + incoming - losses.
    #[inline]
    pub fn available(&self) -> i64 {
        self.stocked().saturating_sub(self.losses)
    }

    /// Quantity that was on the shelf at some point: initial + incoming.
    #[inline]
    pub fn stocked(&self) -> i64 {
        self.initial_quantity.saturating_add(self.incoming_quantity)
    }

    /// True once a final count has been entered.
    #[inline]
    pub fn is_counted(&self) -> bool {
        self.final_quantity.is_some()
    }
}

// =============================================================================
// Normalized Item
// =============================================================================

/// Per-product metrics derived from one [`RawProductRecord`].
///
/// Identifying fields are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalizedItem {
    pub id: String,
    pub code: Option<String>,
    pub name: String,
    pub unit: String,

    /// Final count exactly as entered (`None` when not counted).
    pub final_quantity: Option<i64>,

    /// Unit cost and price, carried for display and cash totals.
    pub cost: Money,
    pub price: Money,

    /// initial + incoming - losses.
    pub available: i64,
    /// The final count used in the math: entered value, or `available`.
    pub effective_final: i64,
    /// available - effective_final (see `SoldPolicy` for negative results).
    pub sold: i64,

    /// price - cost.
    pub unit_margin: Money,
    /// price × sold.
    pub revenue: Money,
    /// cost × (initial + incoming).
    pub cost_of_goods: Money,
    /// losses × cost.
    pub loss_value: Money,
    /// unit_margin × sold.
    pub gross_profit: Money,
    /// gross_profit - loss_value.
    pub net_profit: Money,
    /// sold / available × 100, or 0 when nothing was available.
    pub sold_percentage: f64,
}

impl NormalizedItem {
    /// Cash taken for this item: price × sold.
    #[inline]
    pub fn cash(&self) -> Money {
        self.price.multiply_quantity(self.sold)
    }
}

// =============================================================================
// Aggregate Metrics
// =============================================================================

/// Totals over a collection of [`NormalizedItem`]s.
///
/// `average_sold_percentage` is the mean of each item's own percentage,
/// not total sold over total available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregateMetrics {
    /// Number of items (or periods, for a rollup grand total) averaged over.
    #[ts(type = "number")]
    pub item_count: usize,
    pub total_revenue: Money,
    pub total_cost: Money,
    pub total_losses: Money,
    pub total_gross_profit: Money,
    pub total_net_profit: Money,
    pub total_cash: Money,
    pub average_sold_percentage: f64,
}

impl AggregateMetrics {
    /// True when nothing was aggregated.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

// =============================================================================
// Periods
// =============================================================================

/// The records of one reporting period (typically one count per day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub label: String,
    pub records: Vec<RawProductRecord>,
}

impl Period {
    pub fn new(label: impl Into<String>, records: Vec<RawProductRecord>) -> Self {
        Period {
            label: label.into(),
            records,
        }
    }
}

/// Aggregate metrics for one labelled period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodSummary {
    pub label: String,
    pub metrics: AggregateMetrics,
}

/// Per-period summaries plus the grand total across them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rollup {
    pub periods: Vec<PeriodSummary>,
    pub grand_total: AggregateMetrics,
}

// =============================================================================
// Lenient numeric parsing
// =============================================================================

/// Deserializers that never fail on sloppy numbers.
///
/// Front-end forms hand over integers, floats (`5.0`), numeric strings
/// (`"5"`) and `null` interchangeably. Anything unreadable becomes 0.
mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    impl Number {
        fn to_i64(&self) -> Option<i64> {
            match self {
                Number::Int(n) => Some(*n),
                Number::Float(f) => float_to_i64(*f),
                Number::Text(s) => {
                    let s = s.trim();
                    s.parse::<i64>()
                        .ok()
                        .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
                }
                Number::Other(_) => None,
            }
        }

        /// Reads a major-unit amount (`19.99`) as cents (`1999`).
        fn to_cents(&self) -> Option<i64> {
            match self {
                Number::Int(n) => Some(n.saturating_mul(100)),
                Number::Float(f) => float_to_i64(f * 100.0),
                Number::Text(s) => {
                    let s = s.trim();
                    s.parse::<i64>()
                        .ok()
                        .map(|n| n.saturating_mul(100))
                        .or_else(|| s.parse::<f64>().ok().and_then(|f| float_to_i64(f * 100.0)))
                }
                Number::Other(_) => None,
            }
        }
    }

    /// `as` saturates at the `i64` bounds.
    fn float_to_i64(f: f64) -> Option<i64> {
        f.is_finite().then(|| f.round() as i64)
    }

    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Number>::deserialize(deserializer)?;
        Ok(value.and_then(|n| n.to_i64()).unwrap_or(0))
    }

    /// Like [`int`], but `null`, empty and unreadable values stay `None`.
    pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Number>::deserialize(deserializer)?;
        Ok(value.and_then(|n| n.to_i64()))
    }

    pub fn opt_major_cents<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Number>::deserialize(deserializer)?;
        Ok(value.and_then(|n| n.to_cents()))
    }

    /// Strings as-is, numbers as their decimal text, anything else empty.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Text {
            Str(String),
            Int(i64),
            Float(f64),
            Other(IgnoredAny),
        }

        Ok(match Option::<Text>::deserialize(deserializer)? {
            Some(Text::Str(s)) => s,
            Some(Text::Int(n)) => n.to_string(),
            Some(Text::Float(f)) => f.to_string(),
            Some(Text::Other(_)) | None => String::new(),
        })
    }

    pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stamp {
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match Option::<Stamp>::deserialize(deserializer)? {
            Some(Stamp::Text(s)) => parse_timestamp(&s),
            Some(Stamp::Other(_)) | None => None,
        })
    }

    /// RFC 3339, then naive date-times and plain dates taken as UTC.
    pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Some(at.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
