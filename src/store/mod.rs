//! In-memory stores: meter readings and meter → plan accounts.

pub mod accounts;
pub mod readings;

pub use accounts::AccountDirectory;
pub use readings::ReadingStore;
