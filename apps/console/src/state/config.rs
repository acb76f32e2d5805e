//! # Configuration State
//!
//! Stores shell configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PINCORP_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use pincorp_core::money::group_thousands;
use pincorp_core::production::ConsumptionPolicy;
use pincorp_core::{Money, Rate, DEFAULT_PAGE_SIZE, LOW_MARGIN_BPS};
use pincorp_store::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Snapshot file name inside the data directory.
const SNAPSHOT_FILE: &str = "pincorp.json";

/// Vietnam, UTC+7.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 420;

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shop name (displayed on receipts)
    pub shop_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Digit group separator
    pub thousands_separator: char,

    /// Rows per page in list output
    pub page_size: usize,

    /// Margins below this are flagged on the product editor
    /// e.g., 2000 = 20%
    pub low_margin_bps: i64,

    /// When production orders take materials out of stock
    pub consumption: ConsumptionPolicy,

    /// Report time zone as minutes east of UTC
    pub utc_offset_minutes: i32,

    /// Snapshot file
    pub data_path: PathBuf,
}

impl Default for ConfigState {
    /// Returns the configuration of a single Vietnamese workshop.
    ///
    /// ## Default Values
    /// - Currency: đồng (₫), no decimals, `.` separator
    /// - Page size: 10
    /// - Low margin: 20%
    /// - Consumption: on create
    /// - Reports: UTC+7
    fn default() -> Self {
        ConfigState {
            shop_name: "PinCorp".to_string(),
            currency_symbol: "₫".to_string(),
            currency_decimals: 0,
            thousands_separator: '.',
            page_size: DEFAULT_PAGE_SIZE,
            low_margin_bps: LOW_MARGIN_BPS,
            consumption: ConsumptionPolicy::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            data_path: default_data_path(),
        }
    }
}

/// Platform data directory, or the working directory when none exists.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.pincorp.workshop/pincorp.json`
/// - **Windows**: `%APPDATA%\pincorp\workshop\data\pincorp.json`
/// - **Linux**: `~/.local/share/workshop/pincorp.json`
fn default_data_path() -> PathBuf {
    ProjectDirs::from("com", "pincorp", "workshop")
        .map(|dirs| dirs.data_dir().join(SNAPSHOT_FILE))
        .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILE))
}

/// Reads and parses `key`, warning about (and ignoring) bad values.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = %key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PINCORP_SHOP_NAME`: Shop name
    /// - `PINCORP_DATA_PATH`: Snapshot file
    /// - `PINCORP_PAGE_SIZE`: Rows per page
    /// - `PINCORP_LOW_MARGIN`: Low-margin threshold in percent (e.g., "20")
    /// - `PINCORP_CONSUMPTION`: `on_create` or `on_complete`
    /// - `PINCORP_UTC_OFFSET`: Report offset in minutes east of UTC
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(shop_name) = std::env::var("PINCORP_SHOP_NAME") {
            config.shop_name = shop_name;
        }

        if let Ok(path) = std::env::var("PINCORP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }

        if let Some(size) = env_parse::<usize>("PINCORP_PAGE_SIZE").filter(|s| *s > 0) {
            config.page_size = size;
        }

        if let Some(percent) = env_parse::<f64>("PINCORP_LOW_MARGIN") {
            config.low_margin_bps = (percent * 100.0).round() as i64;
        }

        if let Some(policy) = env_parse::<ConsumptionPolicy>("PINCORP_CONSUMPTION") {
            config.consumption = policy;
        }

        if let Some(minutes) = env_parse::<i32>("PINCORP_UTC_OFFSET") {
            config.utc_offset_minutes = minutes;
        }

        config
    }

    /// Low-margin threshold as a rate.
    pub fn low_margin(&self) -> Rate {
        Rate::from_bps(self.low_margin_bps)
    }

    /// Report time zone. Out-of-range offsets fall back to UTC+7.
    pub fn report_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Store settings derived from this configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_path).consumption(self.consumption)
    }

    /// Formats an amount in the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use pincorp_console::state::ConfigState;
    /// use pincorp_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_minor(1_250_000)), "1.250.000 ₫");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor();
        let divisor = 10_u64.pow(u32::from(self.currency_decimals));
        let whole = minor.unsigned_abs() / divisor;
        let frac = minor.unsigned_abs() % divisor;
        let sign = if minor < 0 { "-" } else { "" };
        let grouped = group_thousands(whole, self.thousands_separator);

        if self.currency_decimals > 0 {
            let decimal_mark = if self.thousands_separator == '.' { ',' } else { '.' };
            format!(
                "{sign}{grouped}{decimal_mark}{frac:0width$} {}",
                self.currency_symbol,
                width = usize::from(self.currency_decimals)
            )
        } else {
            format!("{sign}{grouped} {}", self.currency_symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_dong() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_minor(90_000)), "90.000 ₫");
        assert_eq!(config.format_currency(Money::from_minor(0)), "0 ₫");
        assert_eq!(config.format_currency(Money::from_minor(-1_500)), "-1.500 ₫");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            thousands_separator: ',',
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::from_minor(123_456_789)), "1,234,567.89 $");
        assert_eq!(config.format_currency(Money::from_minor(5)), "0.05 $");
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.low_margin().bps(), 2_000);
        assert_eq!(config.consumption, ConsumptionPolicy::OnCreate);
        assert_eq!(config.report_offset().local_minus_utc(), 7 * 3600);
        assert!(config.data_path.ends_with("pincorp.json"));
    }

    #[test]
    fn test_bad_offset_falls_back() {
        let config = ConfigState {
            utc_offset_minutes: 100_000,
            ..ConfigState::default()
        };
        assert_eq!(config.report_offset().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_store_config_carries_policy() {
        let config = ConfigState {
            consumption: ConsumptionPolicy::OnComplete,
            data_path: PathBuf::from("/tmp/shop.json"),
            ..ConfigState::default()
        };
        let store_config = config.store_config();
        assert_eq!(store_config.consumption, ConsumptionPolicy::OnComplete);
        assert_eq!(store_config.snapshot_path, Some(PathBuf::from("/tmp/shop.json")));
    }
}
