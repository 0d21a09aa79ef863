//! Port adapters
//!
//! Implementations of domain port traits backed by PostgreSQL.

pub mod claims;

pub use claims::PostgresClaimAdapter;
