//! Claims repository implementation
//!
//! Row-level access to the `claims` and `claim_status_history` tables.
//! Nested claim data (flight, passenger, consent, eligibility decision) is
//! stored as JSONB; columns that are filtered or ordered on are scalar.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = r#"
    claim_id, claim_number, status, flight_number, flight_date,
    flight, passenger, consent, eligibility, delay_minutes,
    eligible_amount, final_amount, final_currency,
    created_at, updated_at, submitted_at, paid_at
"#;

/// Repository for claim rows and their status history
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim row by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        let query = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1");

        sqlx::query_as::<_, ClaimRow>(&query)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Lists claim rows newest first, optionally filtered by status
    ///
    /// A `None` limit returns every matching row.
    pub async fn list(
        &self,
        status: Option<&str>,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<ClaimRow>, DatabaseError> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, claim_id DESC
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, ClaimRow>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves the status history of one claim, oldest first
    pub async fn history(&self, claim_id: Uuid) -> Result<Vec<StatusHistoryRow>, DatabaseError> {
        self.history_for(&[claim_id]).await
    }

    /// Retrieves status history for several claims, oldest first per claim
    pub async fn history_for(&self, claim_ids: &[Uuid]) -> Result<Vec<StatusHistoryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, StatusHistoryRow>(
            r#"
            SELECT change_id, claim_id, from_status, to_status, event, note, changed_at
            FROM claim_status_history
            WHERE claim_id = ANY($1)
            ORDER BY claim_id, changed_at, change_id
            "#,
        )
        .bind(claim_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new claim row with its initial history
    ///
    /// A claim id or claim number that already exists is a
    /// `DatabaseError::DuplicateEntry`.
    pub async fn insert(
        &self,
        claim: &ClaimRow,
        history: &[StatusHistoryRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, claim_number, status, flight_number, flight_date,
                flight, passenger, consent, eligibility, delay_minutes,
                eligible_amount, final_amount, final_currency,
                created_at, updated_at, submitted_at, paid_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
            )
            "#,
        )
        .bind(claim.claim_id)
        .bind(&claim.claim_number)
        .bind(&claim.status)
        .bind(&claim.flight_number)
        .bind(claim.flight_date)
        .bind(&claim.flight)
        .bind(&claim.passenger)
        .bind(&claim.consent)
        .bind(&claim.eligibility)
        .bind(claim.delay_minutes)
        .bind(claim.eligible_amount)
        .bind(claim.final_amount)
        .bind(&claim.final_currency)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .bind(claim.submitted_at)
        .bind(claim.paid_at)
        .execute(&mut *tx)
        .await?;

        insert_history(&mut *tx, history).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(claim_id = %claim.claim_id, status = %claim.status, "Claim row inserted");
        Ok(())
    }

    /// Replaces a claim row if it still carries `expected_updated_at`
    ///
    /// New history entries are appended in the same transaction. If another
    /// writer got there first nothing is written and the result is
    /// `DatabaseError::StaleWrite`.
    pub async fn update(
        &self,
        claim: &ClaimRow,
        history: &[StatusHistoryRow],
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE claims SET
                status = $2,
                flight_number = $3,
                flight_date = $4,
                flight = $5,
                passenger = $6,
                consent = $7,
                eligibility = $8,
                delay_minutes = $9,
                eligible_amount = $10,
                final_amount = $11,
                final_currency = $12,
                updated_at = $13,
                submitted_at = $14,
                paid_at = $15
            WHERE claim_id = $1 AND updated_at = $16
            "#,
        )
        .bind(claim.claim_id)
        .bind(&claim.status)
        .bind(&claim.flight_number)
        .bind(claim.flight_date)
        .bind(&claim.flight)
        .bind(&claim.passenger)
        .bind(&claim.consent)
        .bind(&claim.eligibility)
        .bind(claim.delay_minutes)
        .bind(claim.eligible_amount)
        .bind(claim.final_amount)
        .bind(&claim.final_currency)
        .bind(claim.updated_at)
        .bind(claim.submitted_at)
        .bind(claim.paid_at)
        .bind(expected_updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM claims WHERE claim_id = $1)",
            )
            .bind(claim.claim_id)
            .fetch_one(&mut *tx)
            .await?;

            return Err(if exists {
                DatabaseError::StaleWrite {
                    entity: "Claim",
                    id: claim.claim_id.to_string(),
                }
            } else {
                DatabaseError::not_found("Claim", claim.claim_id)
            });
        }

        insert_history(&mut *tx, history).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(claim_id = %claim.claim_id, status = %claim.status, "Claim row updated");
        Ok(())
    }

    /// Counts claims per stored status value
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM claims GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Appends history entries, skipping ones already stored
async fn insert_history(
    conn: &mut PgConnection,
    history: &[StatusHistoryRow],
) -> Result<(), DatabaseError> {
    for entry in history {
        sqlx::query(
            r#"
            INSERT INTO claim_status_history (
                change_id, claim_id, from_status, to_status, event, note, changed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (change_id) DO NOTHING
            "#,
        )
        .bind(entry.change_id)
        .bind(entry.claim_id)
        .bind(&entry.from_status)
        .bind(&entry.to_status)
        .bind(&entry.event)
        .bind(&entry.note)
        .bind(entry.changed_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub status: String,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub flight: Value,
    pub passenger: Value,
    pub consent: Value,
    pub eligibility: Option<Value>,
    pub delay_minutes: Option<i64>,
    /// Always euros
    pub eligible_amount: Option<Decimal>,
    pub final_amount: Option<Decimal>,
    pub final_currency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Database row for one status change
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusHistoryRow {
    pub change_id: Uuid,
    pub claim_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub event: String,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}
