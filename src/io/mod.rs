//! Reading sources used to populate the store at startup.

pub mod generator;
pub mod readings_csv;

pub use generator::{ReadingsGenerator, SpanOutOfRange, series_span};
pub use readings_csv::{ImportError, load_readings, read_readings};
