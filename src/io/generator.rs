use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::Reading;
use crate::store::ReadingStore;

/// Upper bound of a generated reading, in thousandths.
const MAX_READING_MILLIS: i64 = 1000;

/// The requested series does not fit in the representable time range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{per_meter} readings {interval_secs}s apart cannot end at {end}")]
pub struct SpanOutOfRange {
    pub per_meter: usize,
    pub interval_secs: i64,
    pub end: DateTime<Utc>,
}

/// Total time covered by `per_meter` readings spaced `interval` apart,
/// or `None` if it overflows.
pub fn series_span(per_meter: usize, interval: TimeDelta) -> Option<TimeDelta> {
    i32::try_from(per_meter)
        .ok()
        .and_then(|n| interval.checked_mul(n))
}

/// Deterministic generator of demo meter readings.
///
/// Produces evenly spaced readings ending at a given instant, with values
/// drawn uniformly from `[0.000, 1.000]`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use tariff_compare::io::ReadingsGenerator;
///
/// let mut generator = ReadingsGenerator::new(5, 10, 42);
/// let readings = generator.generate(Utc::now()).unwrap();
/// assert_eq!(readings.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ReadingsGenerator {
    /// Number of readings generated per meter
    pub per_meter: usize,

    /// Spacing between consecutive readings
    pub interval: TimeDelta,

    rng: StdRng,
}

impl ReadingsGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    ///
    /// * `per_meter` - Readings to produce per call to [`generate`](Self::generate)
    /// * `interval_secs` - Seconds between consecutive readings
    /// * `seed` - Random seed for reproducible values
    pub fn new(per_meter: usize, interval_secs: u32, seed: u64) -> Self {
        Self {
            per_meter,
            interval: TimeDelta::seconds(i64::from(interval_secs)),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates readings in ascending time order, the last one at `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SpanOutOfRange`] if the first reading would fall before
    /// the earliest representable instant.
    pub fn generate(&mut self, end: DateTime<Utc>) -> Result<Vec<Reading>, SpanOutOfRange> {
        let mut time = series_span(self.per_meter, self.interval)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| SpanOutOfRange {
                per_meter: self.per_meter,
                interval_secs: self.interval.num_seconds(),
                end,
            })?;

        let mut readings = Vec::with_capacity(self.per_meter);
        for _ in 0..self.per_meter {
            time += self.interval;
            let value = self.rng.random_range(0..=MAX_READING_MILLIS);
            readings.push(Reading::new(time, Decimal::new(value, 3)));
        }
        Ok(readings)
    }

    /// Fills `store` with a fresh series for each of `meter_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`SpanOutOfRange`] before writing anything if the series
    /// does not fit.
    pub fn seed_store<'a>(
        &mut self,
        store: &ReadingStore,
        meter_ids: impl IntoIterator<Item = &'a str>,
        end: DateTime<Utc>,
    ) -> Result<(), SpanOutOfRange> {
        for meter_id in meter_ids {
            let readings = self.generate(end)?;
            store.store(meter_id, readings);
        }
        Ok(())
    }
}
