//! # Report Configuration
//!
//! Configuration management for report generation.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the binary)       │
//! │     --sort final --clamp-sold                                          │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TALLY_SORT=final_quantity                                          │
//! │     TALLY_SOLD_POLICY=clamp_to_zero                                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     sort by name, sold as counted, daily periods                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! [store]
//! name = "Downtown Kiosk"
//! operator = "Morning shift"
//!
//! [report]
//! sort = "name"                 # name | final_quantity | input
//! sold_policy = "as_counted"    # as_counted | clamp_to_zero
//! period = "day"                # day | month
//! currency_symbol = "$"
//! percentage_decimals = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tally_core::{NormalizeOptions, PeriodGranularity, SoldPolicy, SortKey};

use crate::error::{ReportError, ReportResult};

/// Largest accepted `percentage_decimals`.
const MAX_PERCENTAGE_DECIMALS: u8 = 6;

// =============================================================================
// Store Configuration
// =============================================================================

/// Who the reports are for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name printed in report headers.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Operator or shift running the count, if any.
    #[serde(default)]
    pub operator: Option<String>,
}

fn default_store_name() -> String {
    "My Store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            operator: None,
        }
    }
}

// =============================================================================
// Report Settings
// =============================================================================

/// How reports are computed and displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Item order in tables.
    #[serde(default)]
    pub sort: SortKey,

    /// Handling of counts above the available quantity.
    #[serde(default)]
    pub sold_policy: SoldPolicy,

    /// Period length for multi-day reports.
    #[serde(default)]
    pub period: PeriodGranularity,

    /// Symbol placed before money amounts in text output.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places for percentages in text output.
    #[serde(default = "default_percentage_decimals")]
    pub percentage_decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_percentage_decimals() -> u8 {
    2
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            sort: SortKey::default(),
            sold_policy: SoldPolicy::default(),
            period: PeriodGranularity::default(),
            currency_symbol: default_currency_symbol(),
            percentage_decimals: default_percentage_decimals(),
        }
    }
}

impl ReportSettings {
    /// Normalizer options derived from these settings.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::default()
            .with_sort(self.sort)
            .with_sold_policy(self.sold_policy)
    }

    /// Applies command-line flags on top of the loaded settings.
    ///
    /// Absent flags leave the configured value alone. `--clamp-sold` can only
    /// switch clamping on.
    pub fn apply_flags(
        &mut self,
        sort: Option<SortKey>,
        period: Option<PeriodGranularity>,
        clamp_sold: bool,
    ) {
        if let Some(sort) = sort {
            self.sort = sort;
        }
        if let Some(period) = period {
            self.period = period;
        }
        if clamp_sold {
            self.sold_policy = SoldPolicy::ClampToZero;
        }
    }
}

// =============================================================================
// Main Report Configuration
// =============================================================================

/// Complete report configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub report: ReportSettings,
}

impl ReportConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the default location may not.
    pub fn load(config_path: Option<PathBuf>) -> ReportResult<Self> {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                info!(?path, "Loading report config from file");
                config = Self::read_file(&path)?;
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading report config from file");
                    config = Self::read_file(&path)?;
                }
                Some(path) => debug!(?path, "Config file not found, using defaults"),
                None => debug!("No config directory available, using defaults"),
            },
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load report config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ReportResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ReportError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReportError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ReportError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Report config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ReportResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        if self.report.percentage_decimals > MAX_PERCENTAGE_DECIMALS {
            return Err(ReportError::InvalidConfig(format!(
                "report.percentage_decimals must be at most {}",
                MAX_PERCENTAGE_DECIMALS
            )));
        }

        Ok(())
    }

    fn read_file(path: &Path) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReportError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable enum values are rejected rather than silently ignored.
    fn apply_env_overrides(&mut self) -> ReportResult<()> {
        if let Ok(name) = std::env::var("TALLY_STORE_NAME") {
            debug!(store = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Ok(operator) = std::env::var("TALLY_OPERATOR") {
            self.store.operator = Some(operator);
        }

        if let Ok(sort) = std::env::var("TALLY_SORT") {
            debug!(sort = %sort, "Overriding sort key from environment");
            self.report.sort = sort.parse()?;
        }

        if let Ok(policy) = std::env::var("TALLY_SOLD_POLICY") {
            debug!(policy = %policy, "Overriding sold policy from environment");
            self.report.sold_policy = policy.parse()?;
        }

        if let Ok(period) = std::env::var("TALLY_PERIOD") {
            self.report.period = period.parse()?;
        }

        if let Ok(symbol) = std::env::var("TALLY_CURRENCY_SYMBOL") {
            self.report.currency_symbol = symbol;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }

    /// Normalizer options for the configured report settings.
    pub fn normalize_options(&self) -> NormalizeOptions {
        self.report.normalize_options()
    }
}
