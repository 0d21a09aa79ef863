//! Claims Domain Ports
//!
//! The claims layer never touches storage directly. `ClaimRepository` is the
//! sole persistence collaborator, injected into [`crate::ClaimService`]:
//!
//! - **Internal Adapter**: PostgreSQL (`infra_db::adapters::PostgresClaimAdapter`)
//! - **Mock Adapter**: in-memory, for tests (`mock` feature)
//!
//! ```rust,ignore
//! let repository: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimAdapter::new(pool));
//! let service = ClaimService::new(repository, EligibilityEngine::eu261());
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::ClaimRecord;
use crate::status::ClaimStatus;

/// Query parameters for listing claims
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    /// Filter by status
    pub status: Option<ClaimStatus>,
    /// Limit results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

impl ClaimQuery {
    /// Creates a query filtered by status
    pub fn by_status(status: ClaimStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Adds pagination to the query
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Storage port for claim records
#[async_trait]
pub trait ClaimRepository: DomainPort + HealthCheckable {
    /// Loads a claim by id
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` if no claim has this id.
    async fn get(&self, id: ClaimId) -> Result<ClaimRecord, PortError>;

    /// Stores a newly created claim
    ///
    /// # Errors
    ///
    /// Returns `PortError::Conflict` if the id or claim number is taken.
    async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError>;

    /// Replaces a stored claim, provided nobody changed it since it was loaded
    ///
    /// `expected_updated_at` is the `updated_at` the caller read. The write
    /// and any new history entries are applied atomically.
    ///
    /// # Errors
    ///
    /// Returns `PortError::Conflict` if the stored claim has moved on and
    /// `PortError::NotFound` if it does not exist.
    async fn update(
        &self,
        claim: &ClaimRecord,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PortError>;

    /// Lists claims, newest first
    async fn list(&self, query: ClaimQuery) -> Result<Vec<ClaimRecord>, PortError>;

    /// Counts stored claims per status; statuses with no claims may be absent
    async fn count_by_status(&self) -> Result<BTreeMap<ClaimStatus, u64>, PortError>;
}

/// In-memory implementation of ClaimRepository for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory claim store
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimRepository {
        claims: Arc<RwLock<HashMap<ClaimId, ClaimRecord>>>,
    }

    impl MockClaimRepository {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        /// Returns true when nothing is stored
        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }
    }

    impl DomainPort for MockClaimRepository {}

    #[async_trait]
    impl HealthCheckable for MockClaimRepository {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claim-repository".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimRepository for MockClaimRepository {
        async fn get(&self, id: ClaimId) -> Result<ClaimRecord, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if claims.contains_key(&claim.id) {
                return Err(PortError::conflict(format!("claim {} already exists", claim.id)));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn update(
            &self,
            claim: &ClaimRecord,
            expected_updated_at: DateTime<Utc>,
        ) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let stored = claims
                .get_mut(&claim.id)
                .ok_or_else(|| PortError::not_found("Claim", claim.id))?;

            if stored.updated_at != expected_updated_at {
                return Err(PortError::conflict(format!(
                    "claim {} was modified concurrently",
                    claim.id
                )));
            }
            *stored = claim.clone();
            Ok(())
        }

        async fn list(&self, query: ClaimQuery) -> Result<Vec<ClaimRecord>, PortError> {
            let claims = self.claims.read().await;
            let mut results: Vec<ClaimRecord> = claims
                .values()
                .filter(|c| query.status.map_or(true, |status| c.status == status))
                .cloned()
                .collect();

            results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            let offset = query.offset.unwrap_or(0) as usize;
            let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
            Ok(results.into_iter().skip(offset).take(limit).collect())
        }

        async fn count_by_status(&self) -> Result<BTreeMap<ClaimStatus, u64>, PortError> {
            let mut counts = BTreeMap::new();
            for claim in self.claims.read().await.values() {
                *counts.entry(claim.status).or_insert(0) += 1;
            }
            Ok(counts)
        }
    }
}
