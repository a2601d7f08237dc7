use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::Reading;

/// Thread-safe in-memory reading history keyed by meter id.
///
/// A single `RwLock` guards the whole map. Readers copy the meter's
/// readings out and release the lock before doing any computation.
#[derive(Debug, Default)]
pub struct ReadingStore {
    by_meter: RwLock<HashMap<String, Vec<Reading>>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the meter's readings; empty for an unknown meter.
    ///
    /// No ordering is guaranteed.
    pub fn readings(&self, meter_id: &str) -> Vec<Reading> {
        let map = self.by_meter.read().unwrap_or_else(PoisonError::into_inner);
        map.get(meter_id).cloned().unwrap_or_default()
    }

    /// Appends readings to the meter's history, creating it if needed.
    pub fn store(&self, meter_id: &str, readings: impl IntoIterator<Item = Reading>) {
        let mut map = self.by_meter.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(meter_id.to_string()).or_default().extend(readings);
    }

    /// Total number of readings across all meters.
    pub fn total_readings(&self) -> usize {
        let map = self.by_meter.read().unwrap_or_else(PoisonError::into_inner);
        map.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<Reading>)> for ReadingStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Reading>)>>(iter: I) -> Self {
        let store = Self::new();
        for (meter_id, readings) in iter {
            store.store(&meter_id, readings);
        }
        store
    }
}
