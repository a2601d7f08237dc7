//! Cost aggregation: average-rate cost per plan, calendar windows and
//! plan ranking.

pub mod calendar;
pub mod clock;
pub mod comparator;
pub mod cost;
pub mod plan_costs;

use thiserror::Error;

pub use calendar::{Calendar, TimeWindow};
pub use clock::{Clock, FixedClock, SystemClock};
pub use comparator::PricePlanComparator;
pub use cost::cost;
pub use plan_costs::PlanCosts;

/// Reasons a cost could not be produced for a set of readings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    /// The filtered reading set is empty.
    #[error("no readings in the requested window")]
    NoReadings,
    /// All readings share one instant, so no time has elapsed.
    #[error("readings span zero elapsed time")]
    DegenerateWindow,
    /// Decimal arithmetic left the representable range.
    #[error("cost computation overflowed")]
    Overflow,
    /// An account points at a plan that is not in the catalog.
    #[error("unknown price plan `{0}`")]
    UnknownPlan(String),
}

impl CostError {
    /// True when the readings simply yield no meaningful cost.
    ///
    /// Endpoints that tolerate empty windows substitute zero (or `null`)
    /// for these; the rest answer 404.
    pub fn is_no_cost(&self) -> bool {
        matches!(self, Self::NoReadings | Self::DegenerateWindow | Self::Overflow)
    }

    /// Replaces a no-cost failure with `fallback`; other errors pass through.
    pub fn or_fallback<T>(result: Result<T, Self>, fallback: T) -> Result<T, Self> {
        match result {
            Err(e) if e.is_no_cost() => Ok(fallback),
            other => other,
        }
    }
}
