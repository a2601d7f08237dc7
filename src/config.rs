//! TOML service configuration: server, calendar, seed readings, price
//! plans and accounts.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{PricePlan, PricePlanCatalog};
use crate::io::series_span;
use crate::pricing::Calendar;
use crate::store::AccountDirectory;

/// Top-level service configuration parsed from TOML.
///
/// Every section has defaults reproducing the demo data set: three price
/// plans and five smart meters. Load from TOML with
/// [`ServiceConfig::from_toml_file`] or use [`ServiceConfig::demo`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Timezone used for day and week boundaries.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// How the reading store is populated at startup.
    #[serde(default)]
    pub readings: ReadingsConfig,
    /// Price plan catalog, in ranking tie-break order.
    #[serde(default = "default_price_plans")]
    pub price_plans: Vec<PricePlan>,
    /// Meter id → subscribed price plan id.
    #[serde(default = "default_accounts")]
    pub accounts: BTreeMap<String, String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `"127.0.0.1:8080"`.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Calendar settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    /// Fixed offset east of UTC, in minutes (within ±18h).
    pub utc_offset_minutes: i32,
}

/// Startup reading sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadingsConfig {
    /// Seed for the demo reading generator.
    pub seed: u64,
    /// Generated readings per account (0 disables generation, else ≥ 2).
    pub per_meter: usize,
    /// Seconds between generated readings.
    pub interval_secs: u32,
    /// Optional CSV file imported on top of the generated readings.
    pub csv_path: Option<PathBuf>,
}

impl Default for ReadingsConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            per_meter: 20,
            interval_secs: 10,
            csv_path: None,
        }
    }
}

fn default_price_plans() -> Vec<PricePlan> {
    vec![
        PricePlan::new("price-plan-0", "Dr Evil's Dark Energy", Decimal::TEN),
        PricePlan::new("price-plan-1", "The Green Eco", Decimal::TWO),
        PricePlan::new("price-plan-2", "Power for Everyone", Decimal::ONE),
    ]
}

fn default_accounts() -> BTreeMap<String, String> {
    [
        ("smart-meter-0", "price-plan-0"),
        ("smart-meter-1", "price-plan-1"),
        ("smart-meter-2", "price-plan-0"),
        ("smart-meter-3", "price-plan-2"),
        ("smart-meter-4", "price-plan-1"),
    ]
    .into_iter()
    .map(|(meter, plan)| (meter.to_string(), plan.to_string()))
    .collect()
}

/// Largest accepted calendar offset, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"price_plans[1].unit_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::demo()
    }
}

impl ServiceConfig {
    /// Returns the built-in demo configuration.
    pub fn demo() -> Self {
        Self {
            server: ServerConfig::default(),
            calendar: CalendarConfig::default(),
            readings: ReadingsConfig::default(),
            price_plans: default_price_plans(),
            accounts: default_accounts(),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            errors.push(ConfigError::new(
                "server.bind_addr",
                format!("\"{}\" is not a socket address", self.server.bind_addr),
            ));
        }

        if self.calendar.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            errors.push(ConfigError::new(
                "calendar.utc_offset_minutes",
                format!("must be within ±{MAX_OFFSET_MINUTES}"),
            ));
        }

        if self.readings.per_meter == 1 {
            errors.push(ConfigError::new(
                "readings.per_meter",
                "must be 0 or >= 2 (a single reading has no elapsed time)",
            ));
        }
        if self.readings.interval_secs == 0 {
            errors.push(ConfigError::new("readings.interval_secs", "must be > 0"));
        } else if self.readings.per_meter > 0 {
            let interval = TimeDelta::seconds(i64::from(self.readings.interval_secs));
            let fits = series_span(self.readings.per_meter, interval)
                .and_then(|span| Utc::now().checked_sub_signed(span))
                .is_some();
            if !fits {
                errors.push(ConfigError::new(
                    "readings",
                    "per_meter × interval_secs reaches past the earliest representable time",
                ));
            }
        }

        if self.price_plans.is_empty() {
            errors.push(ConfigError::new("price_plans", "at least one plan is required"));
        }
        let mut seen = HashSet::new();
        for (i, plan) in self.price_plans.iter().enumerate() {
            if plan.id.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("price_plans[{i}].id"),
                    "must not be blank",
                ));
            }
            if !seen.insert(plan.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("price_plans[{i}].id"),
                    format!("duplicate plan id \"{}\"", plan.id),
                ));
            }
            if plan.unit_rate <= Decimal::ZERO {
                errors.push(ConfigError::new(
                    format!("price_plans[{i}].unit_rate"),
                    "must be > 0",
                ));
            }
        }

        for (meter, plan_id) in &self.accounts {
            if !seen.contains(plan_id.as_str()) {
                errors.push(ConfigError::new(
                    format!("accounts.{meter}"),
                    format!("unknown price plan \"{plan_id}\""),
                ));
            }
        }

        errors
    }

    /// Builds the immutable plan catalog.
    pub fn catalog(&self) -> PricePlanCatalog {
        PricePlanCatalog::new(self.price_plans.clone())
    }

    /// Builds the immutable account directory.
    pub fn account_directory(&self) -> AccountDirectory {
        self.accounts
            .iter()
            .map(|(meter, plan)| (meter.clone(), plan.clone()))
            .collect()
    }

    /// Calendar for the configured offset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the offset is out of range.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        Calendar::with_offset_minutes(self.calendar.utc_offset_minutes).ok_or_else(|| {
            ConfigError::new("calendar.utc_offset_minutes", "offset out of range")
        })
    }

    /// Parsed listener address.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_addr.parse().map_err(|e| {
            ConfigError::new(
                "server.bind_addr",
                format!("\"{}\": {e}", self.server.bind_addr),
            )
        })
    }
}
