//! Average-rate cost of a set of readings under one price plan.

use rust_decimal::{Decimal, RoundingStrategy};

use super::CostError;
use crate::domain::{PricePlan, Reading};

/// Decimal places kept in a reported cost (currency minor unit).
pub const COST_DECIMAL_PLACES: u32 = 2;

const SECONDS_PER_HOUR: i64 = 3600;

/// Computes the cost of `readings` under `plan`.
///
/// The average reading is divided by the hours elapsed between the
/// earliest and the latest reading, multiplied by the plan's unit rate and
/// rounded half-up to [`COST_DECIMAL_PLACES`].
///
/// # Errors
///
/// * [`CostError::NoReadings`] if `readings` is empty
/// * [`CostError::DegenerateWindow`] if no whole second elapses between
///   the earliest and latest reading
/// * [`CostError::Overflow`] if the decimal arithmetic overflows
pub fn cost(readings: &[Reading], plan: &PricePlan) -> Result<Decimal, CostError> {
    let average = average_reading(readings)?;
    let hours = elapsed_hours(readings)?;

    let cost = average
        .checked_div(hours)
        .and_then(|rate| rate.checked_mul(plan.unit_rate))
        .ok_or(CostError::Overflow)?;

    Ok(cost.round_dp_with_strategy(COST_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Arithmetic mean of the reported quantities.
pub fn average_reading(readings: &[Reading]) -> Result<Decimal, CostError> {
    if readings.is_empty() {
        return Err(CostError::NoReadings);
    }

    let sum = readings
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.reading))
        .ok_or(CostError::Overflow)?;

    sum.checked_div(Decimal::from(readings.len()))
        .ok_or(CostError::Overflow)
}

/// Hours between the earliest and the latest reading.
pub fn elapsed_hours(readings: &[Reading]) -> Result<Decimal, CostError> {
    let first = readings
        .iter()
        .map(|r| r.time)
        .min()
        .ok_or(CostError::NoReadings)?;
    let last = readings
        .iter()
        .map(|r| r.time)
        .max()
        .ok_or(CostError::NoReadings)?;

    let seconds = (last - first).num_seconds();
    if seconds == 0 {
        return Err(CostError::DegenerateWindow);
    }

    Ok(Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap()
    }

    fn reading(secs_before: i64, value: Decimal) -> Reading {
        Reading::new(t0() - TimeDelta::seconds(secs_before), value)
    }

    fn plan(rate: i64) -> PricePlan {
        PricePlan::new("plan", "supplier", Decimal::from(rate))
    }

    #[test]
    fn averages_over_elapsed_hours() {
        let readings = vec![
            reading(3600, Decimal::from(15)),
            reading(0, Decimal::from(5)),
        ];
        assert_eq!(cost(&readings, &plan(10)), Ok(Decimal::from(100)));
        assert_eq!(cost(&readings, &plan(1)), Ok(Decimal::from(10)));
        assert_eq!(cost(&readings, &plan(2)), Ok(Decimal::from(20)));
    }

    #[test]
    fn order_of_readings_does_not_matter() {
        let forward = vec![
            reading(1800, Decimal::from(35)),
            reading(0, Decimal::from(3)),
        ];
        let backward: Vec<Reading> = forward.iter().rev().cloned().collect();
        assert_eq!(cost(&forward, &plan(1)), cost(&backward, &plan(1)));
        assert_eq!(cost(&forward, &plan(1)), Ok(Decimal::from(38)));
    }

    #[test]
    fn rounds_half_up_to_minor_unit() {
        // average 12.5 over 0.75h = 16.666..
        let readings = vec![
            reading(2700, Decimal::from(5)),
            reading(0, Decimal::from(20)),
        ];
        assert_eq!(cost(&readings, &plan(1)), Ok(Decimal::new(1667, 2)));

        // average 0.005 over 1h = 0.005 -> 0.01
        let readings = vec![
            reading(3600, Decimal::new(4, 3)),
            reading(0, Decimal::new(6, 3)),
        ];
        assert_eq!(cost(&readings, &plan(1)), Ok(Decimal::new(1, 2)));
    }

    #[test]
    fn scales_linearly_with_unit_rate() {
        let readings = vec![
            reading(5400, Decimal::new(123, 2)),
            reading(600, Decimal::new(877, 2)),
            reading(0, Decimal::new(42, 1)),
        ];
        let single = cost(&readings, &plan(3)).unwrap();
        let double = cost(&readings, &plan(6)).unwrap();
        assert!(single >= Decimal::ZERO);
        assert!((double - single * Decimal::TWO).abs() <= Decimal::new(1, 2));
    }

    #[test]
    fn empty_set_has_no_cost() {
        assert_eq!(cost(&[], &plan(1)), Err(CostError::NoReadings));
    }

    #[test]
    fn single_instant_is_degenerate() {
        let one = vec![reading(0, Decimal::ONE)];
        assert_eq!(cost(&one, &plan(1)), Err(CostError::DegenerateWindow));

        let same_instant = vec![reading(60, Decimal::ONE), reading(60, Decimal::TWO)];
        assert_eq!(
            cost(&same_instant, &plan(1)),
            Err(CostError::DegenerateWindow)
        );
    }

    #[test]
    fn zero_readings_cost_nothing() {
        let readings = vec![reading(3600, Decimal::ZERO), reading(0, Decimal::ZERO)];
        assert_eq!(cost(&readings, &plan(10)), Ok(Decimal::ZERO));
    }
}
