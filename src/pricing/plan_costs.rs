use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Costs keyed by plan id, in a meaningful order.
///
/// Serializes as a JSON object whose keys appear in list order, so a
/// ranked result stays ranked on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCosts {
    entries: Vec<(String, Decimal)>,
}

impl PlanCosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plan_id: impl Into<String>, cost: Decimal) {
        self.entries.push((plan_id.into(), cost));
    }

    pub fn get(&self, plan_id: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(id, _)| id == plan_id)
            .map(|(_, cost)| *cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(id, cost)| (id.as_str(), *cost))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts ascending by cost, then keeps at most `limit` entries.
    ///
    /// The sort is stable: equal costs keep their current relative order.
    /// `None` keeps every entry.
    pub fn cheapest(mut self, limit: Option<usize>) -> Self {
        self.entries.sort_by(|a, b| a.1.cmp(&b.1));
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self
    }
}

impl FromIterator<(String, Decimal)> for PlanCosts {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PlanCosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, cost) in &self.entries {
            map.serialize_entry(id, cost)?;
        }
        map.end()
    }
}
