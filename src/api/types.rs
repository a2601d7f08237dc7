//! API response, request and query types.
//!
//! Field names follow the public JSON contract (`pricePlanId`,
//! `smartMeterId`, ...), not the Rust field names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DayOfWeek, Reading};
use crate::pricing::PlanCosts;

/// Error body for 400-class errors: `{"Message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Subscribed plan plus the cost under every plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareAllResponse {
    pub price_plan_id: String,
    pub price_plan_comparisons: PlanCosts,
}

/// Today's cost so far under the subscribed plan.
#[derive(Debug, Serialize)]
pub struct DayOfWeekCostResponse {
    /// `null` when today has no meaningful cost yet.
    pub consumptions: Option<Decimal>,
    #[serde(rename = "pricePlanId")]
    pub price_plan_id: String,
    pub day_of_week: DayOfWeek,
}

/// Optional `?limit=N` for the recommendation endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Body of `POST /readings/store`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReadingsRequest {
    pub smart_meter_id: String,
    pub electricity_readings: Vec<Reading>,
}

impl StoreReadingsRequest {
    /// Checks the request before anything is written.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.smart_meter_id.trim().is_empty() {
            return Err("smartMeterId must not be blank".to_string());
        }
        if self.electricity_readings.is_empty() {
            return Err("electricityReadings must not be empty".to_string());
        }
        if let Some(r) = self
            .electricity_readings
            .iter()
            .find(|r| r.reading < Decimal::ZERO)
        {
            return Err(format!(
                "reading at {} is negative ({})",
                r.time.to_rfc3339(),
                r.reading
            ));
        }
        Ok(())
    }
}
