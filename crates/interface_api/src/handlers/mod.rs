//! Request handlers

pub mod claims;
pub mod eligibility;
pub mod health;
