//! Smart-meter price plan comparison service.
//!
//! Compares the projected electricity cost of a meter's readings across
//! flat-rate price plans and recommends the cheapest ones, over the whole
//! history or over calendar windows (today, this week by day, last week).

/// HTTP routes, handlers and response types.
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
/// Startup reading sources: demo generator and CSV import.
pub mod io;
pub mod observability;
pub mod pricing;
/// In-memory reading store and account directory.
pub mod store;
