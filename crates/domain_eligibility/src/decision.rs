//! Eligibility decisions and their structured reasons

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;
use crate::error::ScheduleError;

/// Fixed compensation amounts in euros
///
/// Serialized as the bare number (`250`, `400`, `600`); any other number is
/// rejected on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CompensationAmount {
    Eur250,
    Eur400,
    Eur600,
}

impl CompensationAmount {
    /// All amounts, ascending
    pub const ALL: [CompensationAmount; 3] = [
        CompensationAmount::Eur250,
        CompensationAmount::Eur400,
        CompensationAmount::Eur600,
    ];

    /// Returns the amount in whole euros
    pub fn euros(self) -> u32 {
        match self {
            CompensationAmount::Eur250 => 250,
            CompensationAmount::Eur400 => 400,
            CompensationAmount::Eur600 => 600,
        }
    }

    /// Converts to a EUR money value
    pub fn to_money(self) -> Money {
        Money::eur(i64::from(self.euros()))
    }
}

impl TryFrom<u32> for CompensationAmount {
    type Error = ScheduleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            250 => Ok(CompensationAmount::Eur250),
            400 => Ok(CompensationAmount::Eur400),
            600 => Ok(CompensationAmount::Eur600),
            other => Err(ScheduleError::UnsupportedAmount(other)),
        }
    }
}

impl From<CompensationAmount> for u32 {
    fn from(amount: CompensationAmount) -> u32 {
        amount.euros()
    }
}

impl fmt::Display for CompensationAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{}", self.euros())
    }
}

/// Coarse classification of the branch an evaluation took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonKind {
    Extraordinary,
    Cancelled,
    Eligible,
    DelayInsufficient,
    NoMeasurableDelay,
    DistanceUnavailable,
}

/// Machine-readable reason for a decision
///
/// Callers should branch on this, not on the prose in
/// [`EligibilityDecision::reason`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    /// Extraordinary circumstances void liability
    Extraordinary { circumstance: String },
    /// Cancelled flight on a route of known length
    Cancelled {
        distance_km: u32,
        amount: CompensationAmount,
    },
    /// Arrival delay meets the band threshold
    DelayEligible {
        delay_minutes: i64,
        required_minutes: i64,
        distance_km: u32,
        amount: CompensationAmount,
    },
    /// Arrival delay is below the band threshold
    DelayInsufficient {
        delay_minutes: i64,
        required_minutes: i64,
        distance_km: u32,
    },
    /// Delay unknown, zero, or negative (early arrival)
    NoMeasurableDelay { delay_minutes: Option<i64> },
    /// Route distance unknown or zero
    DistanceUnavailable { cancelled: bool },
}

impl DecisionReason {
    /// Returns the coarse branch this reason belongs to
    pub fn kind(&self) -> ReasonKind {
        match self {
            DecisionReason::Extraordinary { .. } => ReasonKind::Extraordinary,
            DecisionReason::Cancelled { .. } => ReasonKind::Cancelled,
            DecisionReason::DelayEligible { .. } => ReasonKind::Eligible,
            DecisionReason::DelayInsufficient { .. } => ReasonKind::DelayInsufficient,
            DecisionReason::NoMeasurableDelay { .. } => ReasonKind::NoMeasurableDelay,
            DecisionReason::DistanceUnavailable { .. } => ReasonKind::DistanceUnavailable,
        }
    }

    /// Returns the compensation this reason grants, if any
    pub fn amount(&self) -> Option<CompensationAmount> {
        match self {
            DecisionReason::Cancelled { amount, .. }
            | DecisionReason::DelayEligible { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::Extraordinary { circumstance } => {
                write!(f, "Flight affected by extraordinary circumstances: {}", circumstance)
            }
            DecisionReason::Cancelled { distance_km, amount } => {
                write!(f, "Flight cancelled - eligible for {} ({} km route)", amount, distance_km)
            }
            DecisionReason::DelayEligible {
                delay_minutes,
                required_minutes,
                distance_km,
                amount,
            } => write!(
                f,
                "Flight delayed {} minutes - eligible for {} ({} km route, ≥{} min delay)",
                delay_minutes, amount, distance_km, required_minutes
            ),
            DecisionReason::DelayInsufficient {
                delay_minutes,
                required_minutes,
                distance_km,
            } => write!(
                f,
                "Flight delayed {} minutes - not eligible (requires ≥{} min delay for a {} km route)",
                delay_minutes, required_minutes, distance_km
            ),
            DecisionReason::NoMeasurableDelay { .. } => {
                write!(f, "No delay or delay not yet calculated")
            }
            DecisionReason::DistanceUnavailable { .. } => {
                write!(f, "Flight distance not available - cannot determine eligibility")
            }
        }
    }
}

/// Outcome of evaluating a set of disruption facts
///
/// Eligible decisions always carry an amount; extraordinary decisions are
/// never eligible and never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub is_eligible: bool,
    pub compensation_amount: Option<CompensationAmount>,
    /// Human-readable explanation rendered from `reason_detail`
    pub reason: String,
    pub reason_detail: DecisionReason,
    pub delay_minutes: Option<i64>,
    pub is_extraordinary: bool,
    pub extraordinary_reason: Option<String>,
}

impl EligibilityDecision {
    /// Builds a decision from its structured reason
    pub(crate) fn from_reason(
        reason_detail: DecisionReason,
        delay_minutes: Option<i64>,
        extraordinary_reason: Option<String>,
    ) -> Self {
        let compensation_amount = reason_detail.amount();
        let is_extraordinary = reason_detail.kind() == ReasonKind::Extraordinary;
        Self {
            is_eligible: compensation_amount.is_some(),
            compensation_amount,
            reason: reason_detail.to_string(),
            reason_detail,
            delay_minutes,
            is_extraordinary,
            extraordinary_reason,
        }
    }

    /// Returns the coarse branch taken
    pub fn kind(&self) -> ReasonKind {
        self.reason_detail.kind()
    }

    /// Returns the compensation as money, if eligible
    pub fn compensation(&self) -> Option<Money> {
        self.compensation_amount.map(CompensationAmount::to_money)
    }

    /// Compares two decisions ignoring the prose reason
    pub fn same_outcome(&self, other: &EligibilityDecision) -> bool {
        self.is_eligible == other.is_eligible
            && self.compensation_amount == other.compensation_amount
            && self.reason_detail == other.reason_detail
            && self.delay_minutes == other.delay_minutes
            && self.is_extraordinary == other.is_extraordinary
            && self.extraordinary_reason == other.extraordinary_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_serializes_as_number() {
        let json = serde_json::to_string(&CompensationAmount::Eur400).unwrap();
        assert_eq!(json, "400");
    }

    #[test]
    fn test_amount_rejects_unknown_number() {
        let result: Result<CompensationAmount, _> = serde_json::from_str("300");
        assert!(result.is_err());
    }

    #[test]
    fn test_reason_tagging() {
        let reason = DecisionReason::DistanceUnavailable { cancelled: true };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "distance_unavailable");
        assert_eq!(reason.kind(), ReasonKind::DistanceUnavailable);
    }
}
