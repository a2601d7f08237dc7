//! CSV import of meter readings.
//!
//! Expected columns: `meter_id,time,reading`, with `time` in RFC 3339.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Reading;

#[derive(Debug, Deserialize)]
struct ReadingRow {
    meter_id: String,
    time: DateTime<Utc>,
    reading: Decimal,
}

/// Failure while importing readings.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: negative reading {reading} for meter \"{meter_id}\"")]
    NegativeReading {
        row: usize,
        meter_id: String,
        reading: Decimal,
    },
    #[error("row {row}: empty meter id")]
    EmptyMeterId { row: usize },
}

/// Loads readings from a CSV file, grouped by meter id.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read, a row does not
/// parse, or a row carries a negative reading.
pub fn load_readings(path: &Path) -> Result<BTreeMap<String, Vec<Reading>>, ImportError> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    collect_rows(rdr)
}

/// Reads CSV readings from any reader, grouped by meter id.
pub fn read_readings(reader: impl Read) -> Result<BTreeMap<String, Vec<Reading>>, ImportError> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_rows(rdr)
}

fn collect_rows<R: Read>(
    mut rdr: csv::Reader<R>,
) -> Result<BTreeMap<String, Vec<Reading>>, ImportError> {
    let mut by_meter: BTreeMap<String, Vec<Reading>> = BTreeMap::new();

    for (idx, row) in rdr.deserialize::<ReadingRow>().enumerate() {
        let row_no = idx + 1;
        let row = row?;
        if row.meter_id.is_empty() {
            return Err(ImportError::EmptyMeterId { row: row_no });
        }
        if row.reading < Decimal::ZERO {
            return Err(ImportError::NegativeReading {
                row: row_no,
                meter_id: row.meter_id,
                reading: row.reading,
            });
        }
        by_meter
            .entry(row.meter_id)
            .or_default()
            .push(Reading::new(row.time, row.reading));
    }

    Ok(by_meter)
}
