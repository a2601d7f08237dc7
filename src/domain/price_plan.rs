use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A flat-rate electricity tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricePlan {
    /// Unique plan identifier, e.g. `"price-plan-0"`.
    pub id: String,
    /// Energy supplier offering the plan.
    #[serde(default)]
    pub supplier: String,
    /// Price per unit of consumption (must be > 0).
    pub unit_rate: Decimal,
}

impl PricePlan {
    pub fn new(id: impl Into<String>, supplier: impl Into<String>, unit_rate: Decimal) -> Self {
        Self {
            id: id.into(),
            supplier: supplier.into(),
            unit_rate,
        }
    }
}

/// Immutable, ordered list of the plans offered to customers.
///
/// Built once at startup and shared read-only. Iteration order is the
/// configured order, which is also the tie-break order when ranking.
#[derive(Debug, Clone, Default)]
pub struct PricePlanCatalog {
    plans: Vec<PricePlan>,
}

impl PricePlanCatalog {
    pub fn new(plans: Vec<PricePlan>) -> Self {
        Self { plans }
    }

    /// Looks up a plan by id.
    pub fn get(&self, id: &str) -> Option<&PricePlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePlan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
