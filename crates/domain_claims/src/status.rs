//! Claim status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a compensation claim
///
/// Serialized with the upper-case wire names (`"SUBMITTED_TO_AIRLINE"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Claim received, nothing checked yet
    New,
    /// A case handler is reviewing the claim
    InReview,
    /// Eligibility confirmed
    EligibilityChecked,
    /// Claim letter sent to the airline
    SubmittedToAirline,
    /// Airline has answered
    AirlineResponseReceived,
    /// Airline refused to pay
    AirlineRejected,
    /// Escalated to the enforcement body
    EscalationSent,
    /// Negotiating with the airline
    Negotiation,
    /// Airline offered a settlement
    SettlementOffered,
    /// Compensation paid out
    Paid,
    /// Withdrawn or closed without payment
    Closed,
    /// Claim found ineligible
    Rejected,
}

impl ClaimStatus {
    /// Every status, in lifecycle order
    pub const ALL: [ClaimStatus; 12] = [
        ClaimStatus::New,
        ClaimStatus::InReview,
        ClaimStatus::EligibilityChecked,
        ClaimStatus::SubmittedToAirline,
        ClaimStatus::AirlineResponseReceived,
        ClaimStatus::AirlineRejected,
        ClaimStatus::EscalationSent,
        ClaimStatus::Negotiation,
        ClaimStatus::SettlementOffered,
        ClaimStatus::Paid,
        ClaimStatus::Closed,
        ClaimStatus::Rejected,
    ];

    /// Returns true for statuses that accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Paid | ClaimStatus::Closed | ClaimStatus::Rejected)
    }

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::New => "NEW",
            ClaimStatus::InReview => "IN_REVIEW",
            ClaimStatus::EligibilityChecked => "ELIGIBILITY_CHECKED",
            ClaimStatus::SubmittedToAirline => "SUBMITTED_TO_AIRLINE",
            ClaimStatus::AirlineResponseReceived => "AIRLINE_RESPONSE_RECEIVED",
            ClaimStatus::AirlineRejected => "AIRLINE_REJECTED",
            ClaimStatus::EscalationSent => "ESCALATION_SENT",
            ClaimStatus::Negotiation => "NEGOTIATION",
            ClaimStatus::SettlementOffered => "SETTLEMENT_OFFERED",
            ClaimStatus::Paid => "PAID",
            ClaimStatus::Closed => "CLOSED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown claim status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ClaimStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
