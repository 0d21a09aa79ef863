//! Claim lifecycle driver
//!
//! `ClaimService` loads a claim through the repository port, applies a
//! lifecycle step, and writes it back conditioned on the `updated_at` it
//! loaded. A failed step leaves the stored claim untouched, and a step that
//! races another writer fails with a conflict instead of overwriting it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, Money};
use domain_eligibility::EligibilityEngine;

use crate::claim::{ClaimRecord, NewClaim};
use crate::error::ClaimError;
use crate::lifecycle::{ClaimEvent, IllegalTransition};
use crate::ports::{ClaimQuery, ClaimRepository};
use crate::status::ClaimStatus;

/// Claim counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: u64,
    pub by_status: BTreeMap<ClaimStatus, u64>,
}

impl StatusSummary {
    /// Count for one status
    pub fn count(&self, status: ClaimStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Application service driving claims through their lifecycle
#[derive(Clone)]
pub struct ClaimService {
    repository: Arc<dyn ClaimRepository>,
    engine: EligibilityEngine,
}

impl ClaimService {
    /// Creates a service over the given repository and engine
    pub fn new(repository: Arc<dyn ClaimRepository>, engine: EligibilityEngine) -> Self {
        Self { repository, engine }
    }

    /// Returns the eligibility engine
    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Returns the repository port
    pub fn repository(&self) -> &Arc<dyn ClaimRepository> {
        &self.repository
    }

    /// Validates intake data, records a preliminary decision, and stores a NEW claim
    #[instrument(skip(self, new_claim), fields(flight = %new_claim.flight.flight_number))]
    pub async fn submit_claim(&self, new_claim: NewClaim) -> Result<ClaimRecord, ClaimError> {
        let mut claim = ClaimRecord::intake(new_claim)?;
        let decision = self.engine.evaluate(&claim.flight.facts);
        claim.record_decision(decision);

        self.repository.insert(&claim).await?;
        info!(
            claim_id = %claim.id,
            claim_number = %claim.claim_number,
            eligible = claim.eligible_amount.is_some(),
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Loads a claim
    pub async fn get_claim(&self, id: ClaimId) -> Result<ClaimRecord, ClaimError> {
        Ok(self.repository.get(id).await?)
    }

    /// Lists claims, newest first
    pub async fn list_claims(&self, query: ClaimQuery) -> Result<Vec<ClaimRecord>, ClaimError> {
        Ok(self.repository.list(query).await?)
    }

    /// Re-evaluates a claim's facts and moves it accordingly
    ///
    /// A NEW claim is first moved to IN_REVIEW. A not-eligible decision
    /// rejects the claim from any non-terminal status. An eligible decision
    /// moves an IN_REVIEW claim to ELIGIBILITY_CHECKED; at later statuses it
    /// is only recorded.
    #[instrument(skip(self))]
    pub async fn check_eligibility(&self, id: ClaimId) -> Result<ClaimRecord, ClaimError> {
        let mut claim = self.repository.get(id).await?;
        let loaded_at = claim.updated_at;
        let decision = self.engine.evaluate(&claim.flight.facts);
        let event = ClaimEvent::from_decision(&decision);

        if claim.status.is_terminal() {
            warn!(claim_id = %id, status = %claim.status, "Eligibility check on closed claim");
            return Err(IllegalTransition { from: claim.status, event }.into());
        }

        if claim.status == ClaimStatus::New {
            claim.apply(ClaimEvent::StartReview, None)?;
        }

        let note = Some(decision.reason.clone());
        claim.record_decision(decision);

        if event == ClaimEvent::EligibilityNegative || claim.status == ClaimStatus::InReview {
            claim.apply(event, note)?;
        }

        self.repository.update(&claim, loaded_at).await?;
        info!(claim_id = %id, status = %claim.status, "Eligibility checked");
        Ok(claim)
    }

    /// Applies a lifecycle event to a stored claim
    #[instrument(skip(self, note))]
    pub async fn apply_event(
        &self,
        id: ClaimId,
        event: ClaimEvent,
        note: Option<String>,
    ) -> Result<ClaimRecord, ClaimError> {
        let mut claim = self.repository.get(id).await?;
        let loaded_at = claim.updated_at;

        if let Err(illegal) = claim.apply(event, note) {
            warn!(claim_id = %id, error = %illegal, "Rejected status change");
            return Err(illegal.into());
        }

        self.repository.update(&claim, loaded_at).await?;
        info!(claim_id = %id, status = %claim.status, "Claim status changed");
        Ok(claim)
    }

    /// Records an airline's settlement offer and moves the claim to SETTLEMENT_OFFERED
    #[instrument(skip(self, note))]
    pub async fn offer_settlement(
        &self,
        id: ClaimId,
        amount: Money,
        note: Option<String>,
    ) -> Result<ClaimRecord, ClaimError> {
        let amount = amount.ensure_positive()?;
        let mut claim = self.repository.get(id).await?;
        let loaded_at = claim.updated_at;

        claim.apply(ClaimEvent::SettlementOffered, note)?;
        claim.set_final_amount(amount);

        self.repository.update(&claim, loaded_at).await?;
        info!(claim_id = %id, amount = %amount, "Settlement offered");
        Ok(claim)
    }

    /// Counts claims per status, listing every status
    pub async fn status_summary(&self) -> Result<StatusSummary, ClaimError> {
        let counts = self.repository.count_by_status().await?;
        let by_status: BTreeMap<ClaimStatus, u64> = ClaimStatus::ALL
            .into_iter()
            .map(|status| (status, counts.get(&status).copied().unwrap_or(0)))
            .collect();

        Ok(StatusSummary {
            total: by_status.values().sum(),
            by_status,
        })
    }
}
