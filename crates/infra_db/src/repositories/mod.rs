//! Row-level repositories

pub mod claims;

pub use claims::{ClaimRow, ClaimsRepository, StatusHistoryRow};
