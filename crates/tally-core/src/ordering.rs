//! # Ordering
//!
//! Presentation ordering for normalized items. Sorting happens after
//! normalization and never changes any total: sums don't care about order.
//!
//! Name comparison follows the way a browser's `localeCompare` orders
//! product names: accents and case are ignored first (`"Água"` sits with the
//! other `a`s), and only break ties afterwards, lowercase before uppercase.
//! All sorts are stable.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::NormalizedItem;

/// How a list of items is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending product name, locale-aware.
    #[default]
    Name,

    /// Ascending final count (effective final), ties by name.
    FinalQuantity,

    /// Keep the order the records arrived in.
    Input,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::FinalQuantity => write!(f, "final_quantity"),
            SortKey::Input => write!(f, "input"),
        }
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "final" | "final_quantity" | "final-quantity" => Ok(SortKey::FinalQuantity),
            "input" | "none" => Ok(SortKey::Input),
            _ => Err(ValidationError::not_allowed(
                "sort",
                &["name", "final_quantity", "input"],
            )),
        }
    }
}

/// Sorts items in place by the given key. Stable.
pub fn sort_items(items: &mut [NormalizedItem], key: SortKey) {
    match key {
        SortKey::Name => items.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::FinalQuantity => items.sort_by(|a, b| {
            a.effective_final
                .cmp(&b.effective_final)
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortKey::Input => {}
    }
}

/// Locale-aware comparison of two product names.
///
/// Three levels, each consulted only when the previous one ties:
/// 1. base letters (case and accents folded away),
/// 2. accents (unaccented first),
/// 3. case (lowercase first).
///
/// ```rust
/// use std::cmp::Ordering;
/// use tally_core::ordering::compare_names;
///
/// assert_eq!(compare_names("água", "Azeite"), Ordering::Less);
/// assert_eq!(compare_names("cafe", "café"), Ordering::Less);
/// assert_eq!(compare_names("pan", "Pan"), Ordering::Less);
/// ```
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
}

fn primary_key(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}

fn secondary_key(s: &str) -> String {
    s.trim().chars().flat_map(char::to_lowercase).collect()
}

fn tertiary_key(s: &str) -> Vec<bool> {
    s.trim().chars().map(char::is_uppercase).collect()
}

/// Strips the diacritic from common Latin letters.
fn fold_char(c: char) -> String {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' => "a",
        'é' | 'è' | 'ê' | 'ë' | 'ē' => "e",
        'í' | 'ì' | 'î' | 'ï' | 'ī' => "i",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' => "o",
        'ú' | 'ù' | 'û' | 'ü' | 'ū' => "u",
        'ý' | 'ÿ' => "y",
        'ñ' => "n",
        'ç' => "c",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return c.to_string(),
    };
    folded.to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
