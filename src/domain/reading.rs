use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sample reported by a smart meter.
///
/// `reading` is the averaged consumption (kW) reported at `time`; it is
/// never negative once accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Instant the sample was taken.
    pub time: DateTime<Utc>,
    /// Reported quantity.
    pub reading: Decimal,
}

impl Reading {
    pub fn new(time: DateTime<Utc>, reading: Decimal) -> Self {
        Self { time, reading }
    }
}
