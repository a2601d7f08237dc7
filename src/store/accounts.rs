use std::collections::HashMap;

/// Maps a smart meter to the price plan its owner is subscribed to.
///
/// Loaded once from configuration; there is no update path.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    plans_by_meter: HashMap<String, String>,
}

impl AccountDirectory {
    pub fn new(plans_by_meter: HashMap<String, String>) -> Self {
        Self { plans_by_meter }
    }

    /// Returns the subscribed plan id, or `None` when the meter is unknown.
    pub fn price_plan_id(&self, meter_id: &str) -> Option<&str> {
        self.plans_by_meter.get(meter_id).map(String::as_str)
    }

    /// Meter ids with an account, sorted for deterministic iteration.
    pub fn meter_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.plans_by_meter.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.plans_by_meter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans_by_meter.is_empty()
    }
}

impl FromIterator<(String, String)> for AccountDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
