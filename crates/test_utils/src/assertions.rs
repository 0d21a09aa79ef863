//! Custom Test Assertions
//!
//! Invariant checks for decisions and claims with messages that name the
//! violated rule.

use core_kernel::Money;
use domain_claims::{transition, ClaimRecord, ClaimStatus};
use domain_eligibility::{CompensationAmount, EligibilityDecision, ReasonKind};

/// Asserts the invariants every eligibility decision must satisfy
///
/// # Panics
///
/// Panics if eligibility and amount disagree, an extraordinary decision is
/// eligible, or the reason kind contradicts the outcome.
pub fn assert_decision_consistent(decision: &EligibilityDecision) {
    assert_eq!(
        decision.is_eligible,
        decision.compensation_amount.is_some(),
        "eligible decisions carry an amount and only they do: {:?}",
        decision
    );

    if decision.is_extraordinary {
        assert!(!decision.is_eligible, "extraordinary decision is eligible: {:?}", decision);
        assert_eq!(decision.kind(), ReasonKind::Extraordinary);
        assert_eq!(decision.delay_minutes, None);
    }

    if let Some(amount) = decision.compensation_amount {
        assert!(
            CompensationAmount::ALL.contains(&amount),
            "unexpected amount {:?}",
            amount
        );
        assert!(matches!(decision.kind(), ReasonKind::Eligible | ReasonKind::Cancelled));
    }

    assert_eq!(decision.reason, decision.reason_detail.to_string());
}

/// Asserts a decision is eligible for exactly `euros`
pub fn assert_eligible_for(decision: &EligibilityDecision, euros: u32) {
    assert!(decision.is_eligible, "expected eligible decision, got: {}", decision.reason);
    assert_eq!(
        decision.compensation_amount.map(CompensationAmount::euros),
        Some(euros),
        "wrong compensation: {}",
        decision.reason
    );
}

/// Asserts a decision is not eligible for the given reason kind
pub fn assert_not_eligible(decision: &EligibilityDecision, kind: ReasonKind) {
    assert!(!decision.is_eligible, "expected ineligible decision, got: {}", decision.reason);
    assert_eq!(decision.kind(), kind, "wrong reason: {}", decision.reason);
}

/// Asserts a claim's history replays from NEW to its current status
///
/// # Panics
///
/// Panics if an entry does not chain from the previous one, is not a legal
/// transition, or is timestamped before its predecessor.
pub fn assert_history_replays(claim: &ClaimRecord) {
    let mut status = ClaimStatus::New;
    let mut previous_at = claim.created_at;

    for (index, change) in claim.history.iter().enumerate() {
        assert_eq!(change.from, status, "history entry {} does not chain", index);
        assert_eq!(
            transition(change.from, change.event),
            Ok(change.to),
            "history entry {} is not a legal transition",
            index
        );
        assert!(
            change.changed_at >= previous_at,
            "history entry {} goes back in time",
            index
        );
        status = change.to;
        previous_at = change.changed_at;
    }

    assert_eq!(status, claim.status, "history does not end at the current status");
    assert!(claim.updated_at >= previous_at);
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(money.is_positive(), "Expected positive money, got {}", money);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestClaimBuilder;
    use crate::fixtures::FactsFixtures;
    use domain_eligibility::evaluate;

    #[test]
    fn test_fixture_decisions_are_consistent() {
        for facts in [
            FactsFixtures::short_haul_delayed(200),
            FactsFixtures::long_haul_delayed(100),
            FactsFixtures::cancelled_short_haul(),
            FactsFixtures::extraordinary_delay(),
            FactsFixtures::unknown_distance(),
        ] {
            assert_decision_consistent(&evaluate(&facts));
        }
    }

    #[test]
    fn test_built_claims_replay() {
        for status in ClaimStatus::ALL {
            assert_history_replays(&TestClaimBuilder::new().at_status(status).build());
        }
    }

    #[test]
    #[should_panic(expected = "does not end at the current status")]
    fn test_tampered_status_is_caught() {
        let mut claim = TestClaimBuilder::new().build();
        claim.status = ClaimStatus::Paid;
        assert_history_replays(&claim);
    }
}
