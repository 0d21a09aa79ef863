//! Claim lifecycle state machine
//!
//! [`transition`] is the single authority on which status follows which.
//! It is a pure function over `(status, event)`; applying the result to a
//! stored claim is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use domain_eligibility::EligibilityDecision;
use crate::status::ClaimStatus;

/// Events that move a claim through its lifecycle
///
/// Serialized in kebab-case (`"eligibility-negative"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimEvent {
    /// A case handler picks up a new claim
    StartReview,
    /// The eligibility engine found the claim eligible
    EligibilityConfirmed,
    /// The eligibility engine found the claim not eligible
    EligibilityNegative,
    /// The claim letter was sent to the airline
    SubmitToAirline,
    /// The airline answered
    AirlineResponded,
    /// The airline did not answer before the response deadline
    ResponseDeadlineElapsed,
    /// The airline refused the claim
    AirlineRejected,
    /// The airline opened negotiation
    NegotiationOpened,
    /// The airline offered a settlement
    SettlementOffered,
    /// The claim is escalated to the enforcement body
    Escalate,
    /// The passenger accepted the settlement and it was paid
    SettlementAccepted,
    /// The passenger withdrew the claim
    Withdraw,
}

impl ClaimEvent {
    /// Every event
    pub const ALL: [ClaimEvent; 12] = [
        ClaimEvent::StartReview,
        ClaimEvent::EligibilityConfirmed,
        ClaimEvent::EligibilityNegative,
        ClaimEvent::SubmitToAirline,
        ClaimEvent::AirlineResponded,
        ClaimEvent::ResponseDeadlineElapsed,
        ClaimEvent::AirlineRejected,
        ClaimEvent::NegotiationOpened,
        ClaimEvent::SettlementOffered,
        ClaimEvent::Escalate,
        ClaimEvent::SettlementAccepted,
        ClaimEvent::Withdraw,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimEvent::StartReview => "start-review",
            ClaimEvent::EligibilityConfirmed => "eligibility-confirmed",
            ClaimEvent::EligibilityNegative => "eligibility-negative",
            ClaimEvent::SubmitToAirline => "submit-to-airline",
            ClaimEvent::AirlineResponded => "airline-responded",
            ClaimEvent::ResponseDeadlineElapsed => "response-deadline-elapsed",
            ClaimEvent::AirlineRejected => "airline-rejected",
            ClaimEvent::NegotiationOpened => "negotiation-opened",
            ClaimEvent::SettlementOffered => "settlement-offered",
            ClaimEvent::Escalate => "escalate",
            ClaimEvent::SettlementAccepted => "settlement-accepted",
            ClaimEvent::Withdraw => "withdraw",
        }
    }

    /// Maps an eligibility decision to the event it triggers
    pub fn from_decision(decision: &EligibilityDecision) -> ClaimEvent {
        if decision.is_eligible {
            ClaimEvent::EligibilityConfirmed
        } else {
            ClaimEvent::EligibilityNegative
        }
    }
}

impl fmt::Display for ClaimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown claim event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for ClaimEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// The event is not valid from the claim's current status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("Illegal transition: event {event} is not allowed from status {from}")]
pub struct IllegalTransition {
    pub from: ClaimStatus,
    pub event: ClaimEvent,
}

/// Computes the status that follows `current` when `event` occurs
///
/// # Errors
///
/// Returns `IllegalTransition` when the event is not valid from `current`.
/// Terminal statuses reject every event.
pub fn transition(current: ClaimStatus, event: ClaimEvent) -> Result<ClaimStatus, IllegalTransition> {
    use ClaimEvent as E;
    use ClaimStatus as S;

    let illegal = IllegalTransition { from: current, event };
    if current.is_terminal() {
        return Err(illegal);
    }

    let next = match (current, event) {
        (_, E::EligibilityNegative) => S::Rejected,
        (_, E::Withdraw) => S::Closed,
        (S::New, E::StartReview) => S::InReview,
        (S::InReview, E::EligibilityConfirmed) => S::EligibilityChecked,
        (S::EligibilityChecked, E::SubmitToAirline) => S::SubmittedToAirline,
        (S::SubmittedToAirline, E::AirlineResponded) => S::AirlineResponseReceived,
        (S::SubmittedToAirline, E::ResponseDeadlineElapsed) => S::EscalationSent,
        (S::AirlineResponseReceived, E::AirlineRejected) => S::AirlineRejected,
        (S::AirlineResponseReceived, E::NegotiationOpened) => S::Negotiation,
        (S::AirlineResponseReceived, E::SettlementOffered) => S::SettlementOffered,
        (S::AirlineRejected, E::Escalate) => S::EscalationSent,
        (S::Negotiation, E::Escalate) => S::EscalationSent,
        (S::SettlementOffered, E::SettlementAccepted) => S::Paid,
        _ => return Err(illegal),
    };

    Ok(next)
}

/// Lists the events valid from a status
pub fn allowed_events(current: ClaimStatus) -> Vec<ClaimEvent> {
    ClaimEvent::ALL
        .into_iter()
        .filter(|event| transition(current, *event).is_ok())
        .collect()
}
