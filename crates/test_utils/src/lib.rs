//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the flight claims
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pinned flights, passengers and amounts
//! - `builders`: Claims at any lifecycle status
//! - `database`: PostgreSQL containers with migrations applied
//! - `assertions`: Invariant checks for decisions and claim histories
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
