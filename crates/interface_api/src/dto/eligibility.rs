//! Eligibility DTOs

use serde::Serialize;

use core_kernel::Money;
use domain_eligibility::EligibilityDecision;

/// Decision returned by the stateless eligibility check
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    #[serde(flatten)]
    pub decision: EligibilityDecision,
    /// Compensation as a money value, if eligible
    pub compensation: Option<Money>,
    /// Name of the schedule that produced the decision
    pub schedule: String,
}

impl EligibilityResponse {
    pub fn new(decision: EligibilityDecision, schedule: &str) -> Self {
        Self {
            compensation: decision.compensation(),
            decision,
            schedule: schedule.to_string(),
        }
    }
}
