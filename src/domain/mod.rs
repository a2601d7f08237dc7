//! Core value types shared by the stores, the aggregator and the API.

pub mod day;
pub mod price_plan;
pub mod reading;

pub use day::DayOfWeek;
pub use price_plan::{PricePlan, PricePlanCatalog};
pub use reading::Reading;
