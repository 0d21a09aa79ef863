//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for compensation claims using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. [`repositories::ClaimsRepository`]
//! works with raw rows; [`adapters::PostgresClaimAdapter`] implements the
//! domain's `ClaimRepository` port on top of it and owns the row/domain
//! translation.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/flight_claims")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresClaimAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::PostgresClaimAdapter;
