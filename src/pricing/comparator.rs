//! Window selection and plan comparison on top of [`cost`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::calendar::Calendar;
use super::cost::cost;
use super::plan_costs::PlanCosts;
use super::CostError;
use crate::domain::{DayOfWeek, PricePlan, PricePlanCatalog, Reading};
use crate::store::ReadingStore;

/// Answers the cost questions the API exposes for one meter at a time.
///
/// Every call takes a fresh snapshot of the meter's readings; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct PricePlanComparator {
    readings: Arc<ReadingStore>,
    catalog: Arc<PricePlanCatalog>,
    calendar: Calendar,
}

impl PricePlanComparator {
    pub fn new(
        readings: Arc<ReadingStore>,
        catalog: Arc<PricePlanCatalog>,
        calendar: Calendar,
    ) -> Self {
        Self {
            readings,
            catalog,
            calendar,
        }
    }

    pub fn catalog(&self) -> &PricePlanCatalog {
        &self.catalog
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Cost of the meter's whole history under every plan, in catalog order.
    ///
    /// # Errors
    ///
    /// Fails with a no-cost [`CostError`] when the meter has no usable
    /// readings.
    pub fn cost_for_each_plan(&self, meter_id: &str) -> Result<PlanCosts, CostError> {
        let readings = self.readings.readings(meter_id);
        debug!(meter_id, readings = readings.len(), "comparing all plans");
        self.catalog
            .iter()
            .map(|plan| cost(&readings, plan).map(|c| (plan.id.clone(), c)))
            .collect()
    }

    /// All-plans cost ranked cheapest first, truncated to `limit` if given.
    pub fn recommend(&self, meter_id: &str, limit: Option<usize>) -> Result<PlanCosts, CostError> {
        Ok(self.cost_for_each_plan(meter_id)?.cheapest(limit))
    }

    /// Cost under `plan_id` of the readings from the previous calendar week.
    pub fn cost_last_week(
        &self,
        meter_id: &str,
        plan_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CostError> {
        let plan = self.plan(plan_id)?;
        let window = self.calendar.last_week(now);
        let readings = window.select(&self.readings.readings(meter_id));
        debug!(meter_id, plan_id, readings = readings.len(), "last week window");
        cost(&readings, plan)
    }

    /// Cost under `plan_id` of today's readings up to `now`.
    pub fn cost_today(
        &self,
        meter_id: &str,
        plan_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CostError> {
        let plan = self.plan(plan_id)?;
        let window = self.calendar.today_so_far(now);
        let readings = window.select(&self.readings.readings(meter_id));
        debug!(meter_id, plan_id, readings = readings.len(), "today window");
        cost(&readings, plan)
    }

    /// Cost under `plan_id` for each day from Monday through today.
    ///
    /// Days without a meaningful cost report zero, so the map always holds
    /// one entry per elapsed weekday.
    ///
    /// # Errors
    ///
    /// Only [`CostError::UnknownPlan`].
    pub fn cost_days_of_week(
        &self,
        meter_id: &str,
        plan_id: &str,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<DayOfWeek, Decimal>, CostError> {
        let plan = self.plan(plan_id)?;
        let readings = self.readings.readings(meter_id);

        let mut by_day = BTreeMap::new();
        for (day, date) in self.calendar.week_so_far(now) {
            let day_readings = self.calendar.day_window(date).select(&readings);
            let day_cost = CostError::or_fallback(cost(&day_readings, plan), Decimal::ZERO)?;
            by_day.insert(day, day_cost);
        }
        Ok(by_day)
    }

    /// Every plan's cost for each day from Monday through today.
    ///
    /// Each day's plans are ranked cheapest first and truncated to `limit`
    /// if given. Plans without a meaningful cost on a day are left out of
    /// that day; the day itself is always present.
    pub fn cost_days_of_week_per_plan(
        &self,
        meter_id: &str,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> BTreeMap<DayOfWeek, PlanCosts> {
        let readings = self.readings.readings(meter_id);

        self.calendar
            .week_so_far(now)
            .into_iter()
            .map(|(day, date)| {
                let day_readings = self.calendar.day_window(date).select(&readings);
                (day, self.rank_plans(&day_readings, limit))
            })
            .collect()
    }

    fn rank_plans(&self, readings: &[Reading], limit: Option<usize>) -> PlanCosts {
        self.catalog
            .iter()
            .filter_map(|plan| cost(readings, plan).ok().map(|c| (plan.id.clone(), c)))
            .collect::<PlanCosts>()
            .cheapest(limit)
    }

    fn plan(&self, plan_id: &str) -> Result<&PricePlan, CostError> {
        self.catalog
            .get(plan_id)
            .ok_or_else(|| CostError::UnknownPlan(plan_id.to_string()))
    }
}
