//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, Currency, Money};
use domain_claims::{
    allowed_events, ClaimEvent, ClaimRecord, ClaimStatus, FlightDetails, NewClaim,
    PassengerDetails, StatusChange,
};
use domain_eligibility::{DisruptionFacts, EligibilityDecision};

use crate::error::ApiError;

/// Claim intake
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(min = 3, max = 8, message = "flight number must be 3-8 characters"))]
    pub flight_number: String,
    #[validate(length(min = 1, message = "airline is required"))]
    pub airline: String,
    pub flight_date: NaiveDate,
    pub disruption: DisruptionFacts,
    #[validate(nested)]
    pub passenger: PassengerDetails,
    #[serde(default)]
    pub gdpr_consent: bool,
    #[serde(default)]
    pub poa_signed: bool,
}

impl From<CreateClaimRequest> for NewClaim {
    fn from(request: CreateClaimRequest) -> Self {
        NewClaim {
            flight: FlightDetails {
                flight_number: request.flight_number,
                airline: request.airline,
                flight_date: request.flight_date,
                facts: request.disruption,
            },
            passenger: request.passenger,
            gdpr_consent: request.gdpr_consent,
            poa_signed: request.poa_signed,
        }
    }
}

/// Page size used when the caller gives no `limit`
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Query string for listing claims
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListClaimsParams {
    pub status: Option<String>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListClaimsParams {
    /// Parses the status filter
    pub fn status(&self) -> Result<Option<ClaimStatus>, ApiError> {
        self.status
            .as_deref()
            .map(|s| s.parse::<ClaimStatus>().map_err(|e| ApiError::BadRequest(e.to_string())))
            .transpose()
    }

    /// Requested page size, bounded when absent
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Lifecycle event to apply
#[derive(Debug, Deserialize)]
pub struct ApplyEventRequest {
    pub event: String,
    pub note: Option<String>,
}

impl ApplyEventRequest {
    /// Parses the event name
    pub fn event(&self) -> Result<ClaimEvent, ApiError> {
        self.event
            .parse()
            .map_err(|e: domain_claims::lifecycle::UnknownEvent| ApiError::BadRequest(e.to_string()))
    }
}

/// Settlement offered by the airline
#[derive(Debug, Deserialize)]
pub struct SettlementRequest {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    pub note: Option<String>,
}

fn default_currency() -> Currency {
    Currency::EUR
}

impl SettlementRequest {
    pub fn money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }
}

/// Full view of a claim
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub claim_number: String,
    pub status: ClaimStatus,
    /// Events the claim accepts in its current status
    pub allowed_events: Vec<ClaimEvent>,
    pub flight_number: String,
    pub airline: String,
    pub flight_date: NaiveDate,
    pub passenger_name: String,
    pub passenger_email: String,
    pub eligibility: Option<EligibilityDecision>,
    pub delay_minutes: Option<i64>,
    pub eligible_amount: Option<Money>,
    pub final_amount: Option<Money>,
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<ClaimRecord> for ClaimResponse {
    fn from(claim: ClaimRecord) -> Self {
        Self {
            id: claim.id,
            allowed_events: allowed_events(claim.status),
            claim_number: claim.claim_number,
            status: claim.status,
            passenger_name: claim.passenger.full_name(),
            passenger_email: claim.passenger.email,
            flight_number: claim.flight.flight_number,
            airline: claim.flight.airline,
            flight_date: claim.flight.flight_date,
            eligibility: claim.eligibility,
            delay_minutes: claim.delay_minutes,
            eligible_amount: claim.eligible_amount,
            final_amount: claim.final_amount,
            history: claim.history,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
            submitted_at: claim.submitted_at,
            paid_at: claim.paid_at,
        }
    }
}

/// Row in a claim listing
#[derive(Debug, Serialize)]
pub struct ClaimSummaryResponse {
    pub id: ClaimId,
    pub claim_number: String,
    pub status: ClaimStatus,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub passenger_name: String,
    pub eligible_amount: Option<Money>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClaimRecord> for ClaimSummaryResponse {
    fn from(claim: ClaimRecord) -> Self {
        Self {
            id: claim.id,
            passenger_name: claim.passenger.full_name(),
            claim_number: claim.claim_number,
            status: claim.status,
            flight_number: claim.flight.flight_number,
            flight_date: claim.flight.flight_date,
            eligible_amount: claim.eligible_amount,
            updated_at: claim.updated_at,
        }
    }
}
