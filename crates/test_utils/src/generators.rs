//! Property-Based Test Generators
//!
//! Proptest strategies for disruption facts, lifecycle values and money.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_claims::{ClaimEvent, ClaimStatus};
use domain_eligibility::DisruptionFacts;

/// Strategy for any route distance, including zero
pub fn distance_strategy() -> impl Strategy<Value = u32> {
    0u32..=15_000u32
}

/// Strategy for distances within one kilometre of a band boundary
pub fn boundary_distance_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(0u32),
        Just(1),
        Just(1499),
        Just(1500),
        Just(1501),
        Just(3499),
        Just(3500),
        Just(3501),
    ]
}

/// Strategy for arrival delays in minutes, including early arrivals
pub fn delay_minutes_strategy() -> impl Strategy<Value = i64> {
    -180i64..=1_440i64
}

/// Strategy for delays within one minute of a threshold
pub fn threshold_delay_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(179i64), Just(180), Just(181), Just(239), Just(240), Just(241)]
}

/// Strategy for scheduled arrivals across two years
pub fn scheduled_arrival_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    (0i64..(2 * 365 * 24 * 60)).prop_map(move |minutes| base + Duration::minutes(minutes))
}

/// Strategy for arbitrary disruption facts
///
/// Distance and actual arrival are each absent some of the time.
pub fn facts_strategy() -> impl Strategy<Value = DisruptionFacts> {
    (
        scheduled_arrival_strategy(),
        proptest::option::weighted(0.9, distance_strategy()),
        proptest::option::weighted(0.9, delay_minutes_strategy()),
        any::<bool>(),
        proptest::option::weighted(0.2, "[a-z ]{3,30}"),
    )
        .prop_map(|(scheduled, distance, delay, is_cancelled, extraordinary)| {
            let mut facts = DisruptionFacts::new(scheduled);
            facts.distance_km = distance;
            facts.actual_arrival = delay.map(|minutes| scheduled + Duration::minutes(minutes));
            facts.is_cancelled = is_cancelled;
            if let Some(reason) = extraordinary {
                facts = facts.extraordinary(reason);
            }
            facts
        })
}

/// Strategy for any claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for any lifecycle event
pub fn claim_event_strategy() -> impl Strategy<Value = ClaimEvent> {
    prop::sample::select(ClaimEvent::ALL.to_vec())
}

/// Strategy for event sequences applied to a fresh claim
pub fn event_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<ClaimEvent>> {
    prop::collection::vec(claim_event_strategy(), 0..=max_len)
}

/// Strategy for supported settlement currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CHF),
        Just(Currency::SEK),
        Just(Currency::DKK),
        Just(Currency::NOK),
        Just(Currency::PLN),
    ]
}

/// Strategy for positive settlement amounts with cents
pub fn settlement_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..10_000_000i64, currency_strategy())
        .prop_map(|(cents, currency)| Money::new(Decimal::new(cents, 2), currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::{assert_decision_consistent, assert_history_replays};
    use crate::builders::TestClaimBuilder;
    use domain_claims::transition;
    use domain_eligibility::evaluate;

    proptest! {
        #[test]
        fn thresholds_decide_eligibility_at_band_edges(
            distance in boundary_distance_strategy(),
            delay in threshold_delay_strategy()
        ) {
            let base = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
            let facts = DisruptionFacts::new(base)
                .with_distance_km(distance)
                .arriving_late_by(delay);

            let decision = evaluate(&facts);

            assert_decision_consistent(&decision);
            let required = if distance > 3500 { 240 } else { 180 };
            prop_assert_eq!(decision.is_eligible, distance > 0 && delay >= required);
        }

        #[test]
        fn random_event_walks_keep_history_replayable(events in event_sequence_strategy(12)) {
            let mut claim = TestClaimBuilder::new().build();

            for event in events {
                let before = claim.status;
                match claim.apply(event, None) {
                    Ok(to) => prop_assert_eq!(transition(before, event), Ok(to)),
                    Err(_) => prop_assert_eq!(claim.status, before),
                }
            }

            assert_history_replays(&claim);
        }

        #[test]
        fn settlement_amounts_are_positive(money in settlement_money_strategy()) {
            prop_assert!(money.is_positive());
        }

        #[test]
        fn generated_arrivals_match_delay(facts in facts_strategy()) {
            if let Some(actual) = facts.actual_arrival {
                let minutes = (actual - facts.scheduled_arrival).num_minutes();
                prop_assert!((-180..=1_440).contains(&minutes));
            }
        }
    }
}
