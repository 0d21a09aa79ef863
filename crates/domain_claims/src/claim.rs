//! Claim record aggregate

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, Money, StatusChangeId};
use domain_eligibility::{DisruptionFacts, EligibilityDecision};

use crate::error::ClaimError;
use crate::lifecycle::{transition, ClaimEvent, IllegalTransition};
use crate::status::ClaimStatus;

/// Flight the claim is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FlightDetails {
    /// Marketing flight number, e.g. "LH1234"
    #[validate(length(min = 3, max = 8, message = "flight number must be 3-8 characters"))]
    pub flight_number: String,
    /// Operating airline
    #[validate(length(min = 1, message = "airline is required"))]
    pub airline: String,
    /// Local date of the scheduled departure
    pub flight_date: NaiveDate,
    /// Disruption facts as reported at intake
    pub facts: DisruptionFacts,
}

/// Passenger making the claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PassengerDetails {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[validate(length(equal = 2, message = "country must be a two-letter code"))]
    pub country: Option<String>,
}

impl PassengerDetails {
    /// Returns "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Consents given at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// Consent to processing personal data
    pub gdpr_consent: bool,
    pub gdpr_consent_at: Option<DateTime<Utc>>,
    /// Authorization to act on the passenger's behalf (power of attorney)
    pub poa_signed: bool,
    pub poa_signed_at: Option<DateTime<Utc>>,
}

/// Input for creating a claim
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewClaim {
    #[validate(nested)]
    pub flight: FlightDetails,
    #[validate(nested)]
    pub passenger: PassengerDetails,
    pub gdpr_consent: bool,
    pub poa_signed: bool,
}

/// One entry of a claim's status history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: StatusChangeId,
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub event: ClaimEvent,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// A passenger's compensation claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-facing claim number
    pub claim_number: String,
    /// Current status
    pub status: ClaimStatus,
    /// Flight and disruption facts
    pub flight: FlightDetails,
    /// Passenger identity
    pub passenger: PassengerDetails,
    /// Consents given at intake
    pub consent: ConsentRecord,
    /// Last eligibility decision
    pub eligibility: Option<EligibilityDecision>,
    /// Arrival delay from the last decision
    pub delay_minutes: Option<i64>,
    /// Compensation the regulation entitles the passenger to
    pub eligible_amount: Option<Money>,
    /// Amount agreed with or paid by the airline
    pub final_amount: Option<Money>,
    /// Status history, oldest first
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    /// Strictly increases with every mutation
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl ClaimRecord {
    /// Creates a NEW claim from validated intake data
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` if fields fail validation or either
    /// consent is missing.
    pub fn intake(new_claim: NewClaim) -> Result<Self, ClaimError> {
        new_claim
            .validate()
            .map_err(|e| ClaimError::Validation(e.to_string()))?;

        if !new_claim.gdpr_consent {
            return Err(ClaimError::Validation(
                "data processing consent is required".to_string(),
            ));
        }
        if !new_claim.poa_signed {
            return Err(ClaimError::Validation(
                "representation authorization is required".to_string(),
            ));
        }

        let now = now_micros();
        let id = ClaimId::new_v7();

        Ok(Self {
            id,
            claim_number: claim_number(&id, now),
            status: ClaimStatus::New,
            flight: new_claim.flight,
            passenger: new_claim.passenger,
            consent: ConsentRecord {
                gdpr_consent: true,
                gdpr_consent_at: Some(now),
                poa_signed: true,
                poa_signed_at: Some(now),
            },
            eligibility: None,
            delay_minutes: None,
            eligible_amount: None,
            final_amount: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
            paid_at: None,
        })
    }

    /// Applies a lifecycle event
    ///
    /// On error the record is left unchanged.
    pub fn apply(&mut self, event: ClaimEvent, note: Option<String>) -> Result<ClaimStatus, IllegalTransition> {
        let from = self.status;
        let to = transition(from, event)?;
        let now = self.touch();

        self.status = to;
        self.history.push(StatusChange {
            id: StatusChangeId::new_v7(),
            from,
            to,
            event,
            note,
            changed_at: now,
        });

        match to {
            ClaimStatus::SubmittedToAirline => self.submitted_at = Some(now),
            ClaimStatus::Paid => {
                self.paid_at = Some(now);
                if self.final_amount.is_none() {
                    self.final_amount = self.eligible_amount;
                }
            }
            _ => {}
        }

        Ok(to)
    }

    /// Stores an eligibility decision on the claim
    pub fn record_decision(&mut self, decision: EligibilityDecision) {
        self.delay_minutes = decision.delay_minutes;
        self.eligible_amount = decision.compensation();
        self.eligibility = Some(decision);
        self.touch();
    }

    /// Records the settlement amount offered by the airline
    pub fn set_final_amount(&mut self, amount: Money) {
        self.final_amount = Some(amount);
        self.touch();
    }

    /// Advances `updated_at`, keeping it strictly increasing
    fn touch(&mut self) -> DateTime<Utc> {
        let now = now_micros();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
        self.updated_at
    }
}

/// Current time at the precision PostgreSQL stores
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Formats "CLM-YYYY-NNNNNNN" from the id's random tail and creation year
fn claim_number(id: &ClaimId, created_at: DateTime<Utc>) -> String {
    let (_, _, _, tail) = id.as_uuid().as_fields();
    format!("CLM-{}-{:07}", created_at.format("%Y"), u64::from_be_bytes(*tail) % 10_000_000)
}
