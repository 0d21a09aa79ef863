//! The eligibility engine
//!
//! Maps disruption facts to a decision. Checks run in strict precedence:
//! extraordinary circumstances, then cancellation, then the arrival delay.
//! The distance gate applies on both the cancellation and the delay path.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::decision::{DecisionReason, EligibilityDecision};
use crate::facts::DisruptionFacts;
use crate::schedule::CompensationSchedule;

const DEFAULT_EXTRAORDINARY_REASON: &str = "Extraordinary circumstances";

/// Computes the arrival delay in whole minutes, rounding toward negative infinity
///
/// Returns `None` when the actual arrival is not yet known. Early arrivals
/// yield negative values.
pub fn calculate_delay(scheduled_arrival: DateTime<Utc>, actual_arrival: Option<DateTime<Utc>>) -> Option<i64> {
    let actual = actual_arrival?;
    let millis = actual.signed_duration_since(scheduled_arrival).num_milliseconds();
    Some(millis.div_euclid(60_000))
}

/// Evaluates facts against the EU261 schedule
pub fn evaluate(facts: &DisruptionFacts) -> EligibilityDecision {
    EligibilityEngine::eu261().evaluate(facts)
}

/// Stateless evaluator bound to a compensation schedule
///
/// Safe to share across threads; evaluation only reads the schedule.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    schedule: CompensationSchedule,
}

impl EligibilityEngine {
    /// Creates an engine for the given schedule
    pub fn new(schedule: CompensationSchedule) -> Self {
        Self { schedule }
    }

    /// Creates an engine using EU Regulation 261/2004 thresholds
    pub fn eu261() -> Self {
        Self::new(CompensationSchedule::eu261())
    }

    /// Returns the schedule in use
    pub fn schedule(&self) -> &CompensationSchedule {
        &self.schedule
    }

    /// Evaluates the facts. Never fails.
    pub fn evaluate(&self, facts: &DisruptionFacts) -> EligibilityDecision {
        if facts.is_extraordinary {
            let circumstance = facts
                .extraordinary_reason
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXTRAORDINARY_REASON.to_string());

            debug!(circumstance = %circumstance, "Extraordinary circumstances, no compensation");
            return EligibilityDecision::from_reason(
                DecisionReason::Extraordinary {
                    circumstance: circumstance.clone(),
                },
                None,
                Some(circumstance),
            );
        }

        let delay_minutes = calculate_delay(facts.scheduled_arrival, facts.actual_arrival);
        let distance_km = facts.normalized_distance_km();
        let reason = self.decide(facts.is_cancelled, delay_minutes, distance_km);

        debug!(
            schedule = %self.schedule.name(),
            cancelled = facts.is_cancelled,
            distance_km,
            delay_minutes = ?delay_minutes,
            kind = ?reason.kind(),
            "Evaluated disruption"
        );

        EligibilityDecision::from_reason(reason, delay_minutes, facts.extraordinary_reason.clone())
    }

    fn decide(&self, is_cancelled: bool, delay_minutes: Option<i64>, distance_km: u32) -> DecisionReason {
        if is_cancelled {
            return match self.schedule.band_for(distance_km) {
                Some(band) => DecisionReason::Cancelled {
                    distance_km,
                    amount: band.amount,
                },
                None => DecisionReason::DistanceUnavailable { cancelled: true },
            };
        }

        let delay = match delay_minutes {
            Some(delay) if delay > 0 => delay,
            other => return DecisionReason::NoMeasurableDelay { delay_minutes: other },
        };

        let Some(band) = self.schedule.band_for(distance_km) else {
            return DecisionReason::DistanceUnavailable { cancelled: false };
        };

        if delay >= band.min_delay_minutes {
            DecisionReason::DelayEligible {
                delay_minutes: delay,
                required_minutes: band.min_delay_minutes,
                distance_km,
                amount: band.amount,
            }
        } else {
            DecisionReason::DelayInsufficient {
                delay_minutes: delay,
                required_minutes: band.min_delay_minutes,
                distance_km,
            }
        }
    }
}
