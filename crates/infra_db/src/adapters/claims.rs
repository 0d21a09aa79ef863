//! PostgreSQL Claim Adapter
//!
//! Implements the `ClaimRepository` port from `domain_claims` on top of
//! [`ClaimsRepository`]. Rows are translated to and from `ClaimRecord`
//! here so the row types never leave this crate.
//!
//! ```rust,ignore
//! let adapter = PostgresClaimAdapter::new(pool);
//! let repository: Arc<dyn ClaimRepository> = Arc::new(adapter);
//! let service = ClaimService::new(repository, EligibilityEngine::eu261());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, ClaimId, Currency, DomainPort, HealthCheckResult, HealthCheckable, Money,
    PortError, StatusChangeId,
};
use domain_claims::{ClaimEvent, ClaimQuery, ClaimRecord, ClaimRepository, ClaimStatus, StatusChange};

use crate::error::DatabaseError;
use crate::repositories::claims::{ClaimRow, ClaimsRepository, StatusHistoryRow};

const ADAPTER_ID: &str = "postgres-claim-adapter";

/// PostgreSQL-backed implementation of the ClaimRepository port
///
/// Database errors are translated to `PortError` variants through
/// `From<DatabaseError> for PortError`.
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    /// Creates a new PostgreSQL claim adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying row repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ClaimRepository for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get(&self, id: ClaimId) -> Result<ClaimRecord, PortError> {
        let uuid = Uuid::from(id);
        let row = self.repository.get_by_id(uuid).await.map_err(|e| match e {
            DatabaseError::NotFound { .. } => PortError::not_found("Claim", id),
            other => other.into(),
        })?;
        let history = self.repository.history(uuid).await?;

        row_to_claim(row, history)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id, status = %claim.status))]
    async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError> {
        let (row, history) = claim_to_rows(claim)?;
        self.repository.insert(&row, &history).await?;
        Ok(())
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id, status = %claim.status))]
    async fn update(
        &self,
        claim: &ClaimRecord,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PortError> {
        let (row, history) = claim_to_rows(claim)?;
        self.repository
            .update(&row, &history, expected_updated_at)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => PortError::not_found("Claim", claim.id),
                other => other.into(),
            })
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ClaimQuery) -> Result<Vec<ClaimRecord>, PortError> {
        let status = query.status.map(|s| s.as_str());
        let rows = self
            .repository
            .list(
                status,
                query.limit.map(i64::from),
                i64::from(query.offset.unwrap_or(0)),
            )
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.claim_id).collect();
        let mut histories: HashMap<Uuid, Vec<StatusHistoryRow>> = HashMap::new();
        for entry in self.repository.history_for(&ids).await? {
            histories.entry(entry.claim_id).or_default().push(entry);
        }

        debug!(count = rows.len(), "Loaded claims");
        rows.into_iter()
            .map(|row| {
                let history = histories.remove(&row.claim_id).unwrap_or_default();
                row_to_claim(row, history)
            })
            .collect()
    }

    async fn count_by_status(&self) -> Result<BTreeMap<ClaimStatus, u64>, PortError> {
        self.repository
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| {
                let status = parse_column::<ClaimStatus>("status", &status)?;
                let count = u64::try_from(count)
                    .map_err(|e| PortError::transformation(format!("count: {}", e)))?;
                Ok((status, count))
            })
            .collect()
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn to_json<T: Serialize>(column: &str, value: &T) -> Result<Value, PortError> {
    serde_json::to_value(value)
        .map_err(|e| PortError::transformation(format!("column '{}': {}", column, e)))
}

fn from_json<T: DeserializeOwned>(column: &str, value: Value) -> Result<T, PortError> {
    serde_json::from_value(value)
        .map_err(|e| PortError::transformation(format!("column '{}': {}", column, e)))
}

fn parse_column<T>(column: &str, value: &str) -> Result<T, PortError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| PortError::transformation(format!("column '{}': {}", column, e)))
}

/// Converts a domain claim to its row and history rows
fn claim_to_rows(claim: &ClaimRecord) -> Result<(ClaimRow, Vec<StatusHistoryRow>), PortError> {
    let claim_id = Uuid::from(claim.id);

    let row = ClaimRow {
        claim_id,
        claim_number: claim.claim_number.clone(),
        status: claim.status.as_str().to_string(),
        flight_number: claim.flight.flight_number.clone(),
        flight_date: claim.flight.flight_date,
        flight: to_json("flight", &claim.flight)?,
        passenger: to_json("passenger", &claim.passenger)?,
        consent: to_json("consent", &claim.consent)?,
        eligibility: claim
            .eligibility
            .as_ref()
            .map(|decision| to_json("eligibility", decision))
            .transpose()?,
        delay_minutes: claim.delay_minutes,
        eligible_amount: claim.eligible_amount.map(|m| m.amount()),
        final_amount: claim.final_amount.map(|m| m.amount()),
        final_currency: claim.final_amount.map(|m| m.currency().code().to_string()),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
        submitted_at: claim.submitted_at,
        paid_at: claim.paid_at,
    };

    let history = claim
        .history
        .iter()
        .map(|change| StatusHistoryRow {
            change_id: Uuid::from(change.id),
            claim_id,
            from_status: change.from.as_str().to_string(),
            to_status: change.to.as_str().to_string(),
            event: change.event.as_str().to_string(),
            note: change.note.clone(),
            changed_at: change.changed_at,
        })
        .collect();

    Ok((row, history))
}

/// Converts a claim row and its history rows to a domain claim
fn row_to_claim(row: ClaimRow, history: Vec<StatusHistoryRow>) -> Result<ClaimRecord, PortError> {
    let final_amount = match (row.final_amount, row.final_currency.as_deref()) {
        (Some(amount), Some(code)) => {
            Some(Money::new(amount, parse_column::<Currency>("final_currency", code)?))
        }
        (Some(amount), None) => Some(Money::new(amount, Currency::EUR)),
        (None, _) => None,
    };

    let history = history
        .into_iter()
        .map(|entry| {
            Ok(StatusChange {
                id: StatusChangeId::from(entry.change_id),
                from: parse_column::<ClaimStatus>("from_status", &entry.from_status)?,
                to: parse_column::<ClaimStatus>("to_status", &entry.to_status)?,
                event: parse_column::<ClaimEvent>("event", &entry.event)?,
                note: entry.note,
                changed_at: entry.changed_at,
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;

    Ok(ClaimRecord {
        id: ClaimId::from(row.claim_id),
        claim_number: row.claim_number,
        status: parse_column("status", &row.status)?,
        flight: from_json("flight", row.flight)?,
        passenger: from_json("passenger", row.passenger)?,
        consent: from_json("consent", row.consent)?,
        eligibility: row
            .eligibility
            .map(|value| from_json("eligibility", value))
            .transpose()?,
        delay_minutes: row.delay_minutes,
        eligible_amount: row.eligible_amount.map(|amount| Money::new(amount, Currency::EUR)),
        final_amount,
        history,
        created_at: row.created_at,
        updated_at: row.updated_at,
        submitted_at: row.submitted_at,
        paid_at: row.paid_at,
    })
}
