//! Tests for the eligibility engine and compensation schedules

use chrono::{DateTime, Duration, TimeZone, Utc};

use domain_eligibility::{
    evaluate, CompensationAmount, CompensationSchedule, DecisionReason, DisruptionFacts,
    DistanceBand, EligibilityDecision, EligibilityEngine, ReasonKind, ScheduleError,
};

fn scheduled_arrival() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
}

fn delayed(distance_km: u32, delay_minutes: i64) -> DisruptionFacts {
    DisruptionFacts::new(scheduled_arrival())
        .with_distance_km(distance_km)
        .arriving_late_by(delay_minutes)
}

fn assert_invariants(decision: &EligibilityDecision) {
    if decision.is_eligible {
        assert!(matches!(
            decision.compensation_amount,
            Some(CompensationAmount::Eur250 | CompensationAmount::Eur400 | CompensationAmount::Eur600)
        ));
    } else {
        assert_eq!(decision.compensation_amount, None);
    }
    if decision.is_extraordinary {
        assert!(!decision.is_eligible);
        assert_eq!(decision.compensation_amount, None);
    }
}

// ============================================================================
// Delay thresholds
// ============================================================================

mod delay_thresholds {
    use super::*;

    #[test]
    fn test_179_minutes_short_haul_not_eligible() {
        let decision = evaluate(&delayed(1000, 179));
        assert!(!decision.is_eligible);
        assert_eq!(
            decision.reason_detail,
            DecisionReason::DelayInsufficient {
                delay_minutes: 179,
                required_minutes: 180,
                distance_km: 1000,
            }
        );
    }

    #[test]
    fn test_180_minutes_short_haul_eligible_for_250() {
        let decision = evaluate(&delayed(1000, 180));
        assert!(decision.is_eligible);
        assert_eq!(decision.compensation_amount, Some(CompensationAmount::Eur250));
        assert_eq!(decision.kind(), ReasonKind::Eligible);
    }

    #[test]
    fn test_239_minutes_long_haul_not_eligible() {
        let decision = evaluate(&delayed(4000, 239));
        assert!(!decision.is_eligible);
        assert_eq!(decision.kind(), ReasonKind::DelayInsufficient);
    }

    #[test]
    fn test_240_minutes_long_haul_eligible_for_600() {
        let decision = evaluate(&delayed(4000, 240));
        assert!(decision.is_eligible);
        assert_eq!(decision.compensation_amount, Some(CompensationAmount::Eur600));
    }

    #[test]
    fn test_long_haul_insufficient_does_not_fall_back_to_lower_band() {
        // 200 minutes would satisfy the 180 minute bands, but not this one
        let decision = evaluate(&delayed(5000, 200));
        assert!(!decision.is_eligible);
        assert_eq!(decision.compensation_amount, None);
    }

    #[test]
    fn test_reason_prose_cites_delay_and_threshold() {
        let decision = evaluate(&delayed(4000, 239));
        assert!(decision.reason.contains("239"));
        assert!(decision.reason.contains("240"));
    }
}

// ============================================================================
// Distance band boundaries
// ============================================================================

mod distance_bands {
    use super::*;

    #[test]
    fn test_1500_km_is_short_haul() {
        assert_eq!(
            evaluate(&delayed(1500, 180)).compensation_amount,
            Some(CompensationAmount::Eur250)
        );
    }

    #[test]
    fn test_1501_km_is_medium_haul() {
        assert_eq!(
            evaluate(&delayed(1501, 180)).compensation_amount,
            Some(CompensationAmount::Eur400)
        );
    }

    #[test]
    fn test_3500_km_is_medium_haul_with_three_hour_threshold() {
        assert_eq!(
            evaluate(&delayed(3500, 180)).compensation_amount,
            Some(CompensationAmount::Eur400)
        );
    }

    #[test]
    fn test_3501_km_needs_four_hours() {
        assert!(!evaluate(&delayed(3501, 180)).is_eligible);
        assert_eq!(
            evaluate(&delayed(3501, 240)).compensation_amount,
            Some(CompensationAmount::Eur600)
        );
    }

    #[test]
    fn test_missing_distance_on_delay_path() {
        let facts = DisruptionFacts::new(scheduled_arrival()).arriving_late_by(500);
        let decision = evaluate(&facts);
        assert!(!decision.is_eligible);
        assert_eq!(
            decision.reason_detail,
            DecisionReason::DistanceUnavailable { cancelled: false }
        );
        assert_eq!(decision.delay_minutes, Some(500));
    }
}

// ============================================================================
// Cancellation
// ============================================================================

mod cancellation {
    use super::*;

    #[test]
    fn test_cancelled_with_zero_distance_not_eligible() {
        let facts = DisruptionFacts::new(scheduled_arrival())
            .with_distance_km(0)
            .cancelled(Some("Crew shortage".to_string()));
        let decision = evaluate(&facts);
        assert!(!decision.is_eligible);
        assert_eq!(decision.kind(), ReasonKind::DistanceUnavailable);
    }

    #[test]
    fn test_cancelled_with_unknown_distance_not_eligible() {
        let facts = DisruptionFacts::new(scheduled_arrival()).cancelled(None);
        assert_eq!(evaluate(&facts).kind(), ReasonKind::DistanceUnavailable);
    }

    #[test]
    fn test_cancelled_medium_haul_even_when_early() {
        let facts = delayed(2500, -20).cancelled(None);
        let decision = evaluate(&facts);
        assert_eq!(decision.compensation_amount, Some(CompensationAmount::Eur400));
        assert_eq!(decision.delay_minutes, Some(-20));
    }
}

// ============================================================================
// No measurable delay
// ============================================================================

mod no_measurable_delay {
    use super::*;

    #[test]
    fn test_unknown_arrival() {
        let facts = DisruptionFacts::new(scheduled_arrival()).with_distance_km(1000);
        let decision = evaluate(&facts);
        assert_eq!(
            decision.reason_detail,
            DecisionReason::NoMeasurableDelay { delay_minutes: None }
        );
        assert_eq!(decision.delay_minutes, None);
    }

    #[test]
    fn test_early_arrival_keeps_negative_delay() {
        let decision = evaluate(&delayed(1000, -15));
        assert_eq!(decision.kind(), ReasonKind::NoMeasurableDelay);
        assert_eq!(decision.delay_minutes, Some(-15));
    }

    #[test]
    fn test_sub_minute_early_arrival_floors_to_minus_one() {
        let mut facts = DisruptionFacts::new(scheduled_arrival()).with_distance_km(1000);
        facts.actual_arrival = Some(scheduled_arrival() - Duration::seconds(10));
        assert_eq!(evaluate(&facts).delay_minutes, Some(-1));
    }
}

// ============================================================================
// Schedules
// ============================================================================

mod schedules {
    use super::*;

    const CUSTOM: &str = r#"{
        "name": "regional",
        "bands": [
            { "max_distance_km": 800, "min_delay_minutes": 120, "amount": 250 },
            { "max_distance_km": null, "min_delay_minutes": 180, "amount": 400 }
        ]
    }"#;

    #[test]
    fn test_custom_schedule_from_json() {
        let schedule = CompensationSchedule::from_json(CUSTOM).unwrap();
        assert_eq!(schedule.name(), "regional");

        let engine = EligibilityEngine::new(schedule);
        let decision = engine.evaluate(&delayed(700, 120));
        assert_eq!(decision.compensation_amount, Some(CompensationAmount::Eur250));

        let decision = engine.evaluate(&delayed(9000, 179));
        assert!(!decision.is_eligible);
    }

    #[test]
    fn test_empty_schedule_rejected() {
        assert_eq!(
            CompensationSchedule::new("empty", vec![]),
            Err(ScheduleError::EmptySchedule)
        );
    }

    #[test]
    fn test_bounded_last_band_rejected() {
        let bands = vec![DistanceBand {
            max_distance_km: Some(1500),
            min_delay_minutes: 180,
            amount: CompensationAmount::Eur250,
        }];
        assert_eq!(
            CompensationSchedule::new("bad", bands),
            Err(ScheduleError::MissingOpenBand)
        );
    }

    #[test]
    fn test_non_increasing_bounds_rejected() {
        let bands = vec![
            DistanceBand {
                max_distance_km: Some(3500),
                min_delay_minutes: 180,
                amount: CompensationAmount::Eur400,
            },
            DistanceBand {
                max_distance_km: Some(1500),
                min_delay_minutes: 180,
                amount: CompensationAmount::Eur250,
            },
            DistanceBand {
                max_distance_km: None,
                min_delay_minutes: 240,
                amount: CompensationAmount::Eur600,
            },
        ];
        assert_eq!(
            CompensationSchedule::new("bad", bands),
            Err(ScheduleError::NonIncreasingBound {
                index: 1,
                previous: 3500,
                current: 1500,
            })
        );
    }

    #[test]
    fn test_open_band_in_middle_rejected() {
        let bands = vec![
            DistanceBand {
                max_distance_km: None,
                min_delay_minutes: 180,
                amount: CompensationAmount::Eur250,
            },
            DistanceBand {
                max_distance_km: None,
                min_delay_minutes: 240,
                amount: CompensationAmount::Eur600,
            },
        ];
        assert_eq!(
            CompensationSchedule::new("bad", bands),
            Err(ScheduleError::UnboundedBandNotLast { index: 0 })
        );
    }

    #[test]
    fn test_unsupported_amount_in_json_rejected() {
        let json = r#"{"name":"x","bands":[{"max_distance_km":null,"min_delay_minutes":0,"amount":300}]}"#;
        assert!(matches!(
            CompensationSchedule::from_json(json),
            Err(ScheduleError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            CompensationSchedule::from_file("/nonexistent/schedule.json"),
            Err(ScheduleError::Io(_))
        ));
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serialization {
    use super::*;

    #[test]
    fn test_decision_round_trip_matches_reevaluation() {
        let facts = delayed(2200, 195).with_route("LHR", "ATH");
        let decision = evaluate(&facts);

        let json = serde_json::to_string(&decision).unwrap();
        let restored: EligibilityDecision = serde_json::from_str(&json).unwrap();

        assert!(restored.same_outcome(&evaluate(&facts)));
        assert_eq!(restored, decision);
    }

    #[test]
    fn test_facts_accept_minimal_json() {
        let facts: DisruptionFacts = serde_json::from_str(
            r#"{"scheduled_arrival":"2024-03-15T09:30:00Z","distance_km":1200,"is_cancelled":true}"#,
        )
        .unwrap();
        assert_eq!(evaluate(&facts).compensation_amount, Some(CompensationAmount::Eur250));
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn expected_amount(distance_km: u32) -> CompensationAmount {
        if distance_km <= 1500 {
            CompensationAmount::Eur250
        } else if distance_km <= 3500 {
            CompensationAmount::Eur400
        } else {
            CompensationAmount::Eur600
        }
    }

    fn threshold(distance_km: u32) -> i64 {
        if distance_km <= 3500 { 180 } else { 240 }
    }

    proptest! {
        #[test]
        fn extraordinary_is_never_eligible(
            distance in proptest::option::of(0u32..20_000),
            delay in proptest::option::of(-600i64..2_000),
            cancelled in any::<bool>(),
        ) {
            let mut facts = DisruptionFacts::new(scheduled_arrival()).extraordinary("Severe weather");
            facts.distance_km = distance;
            facts.is_cancelled = cancelled;
            facts.actual_arrival = delay.map(|d| scheduled_arrival() + Duration::minutes(d));

            let decision = evaluate(&facts);
            prop_assert!(!decision.is_eligible);
            prop_assert_eq!(decision.compensation_amount, None);
            prop_assert_eq!(decision.kind(), ReasonKind::Extraordinary);
        }

        #[test]
        fn delay_path_matches_band_table(distance in 1u32..20_000, delay in -600i64..2_000) {
            let decision = evaluate(&delayed(distance, delay));
            assert_invariants(&decision);

            let should_pay = delay > 0 && delay >= threshold(distance);
            prop_assert_eq!(decision.is_eligible, should_pay);
            if should_pay {
                prop_assert_eq!(decision.compensation_amount, Some(expected_amount(distance)));
            }
        }

        #[test]
        fn cancellation_pays_by_distance_regardless_of_delay(
            distance in 1u32..20_000,
            delay in proptest::option::of(-600i64..2_000),
        ) {
            let mut facts = DisruptionFacts::new(scheduled_arrival())
                .with_distance_km(distance)
                .cancelled(None);
            facts.actual_arrival = delay.map(|d| scheduled_arrival() + Duration::minutes(d));

            let decision = evaluate(&facts);
            prop_assert_eq!(decision.compensation_amount, Some(expected_amount(distance)));
        }

        #[test]
        fn cancellation_at_1200_km_always_pays_250(delay in proptest::option::of(-600i64..2_000)) {
            let mut facts = DisruptionFacts::new(scheduled_arrival())
                .with_distance_km(1200)
                .cancelled(None);
            facts.actual_arrival = delay.map(|d| scheduled_arrival() + Duration::minutes(d));

            prop_assert_eq!(evaluate(&facts).compensation_amount, Some(CompensationAmount::Eur250));
        }

        #[test]
        fn cancellation_without_distance_never_pays(
            distance in prop_oneof![Just(None), Just(Some(0u32))],
            delay in proptest::option::of(-600i64..2_000),
        ) {
            let mut facts = DisruptionFacts::new(scheduled_arrival()).cancelled(None);
            facts.distance_km = distance;
            facts.actual_arrival = delay.map(|d| scheduled_arrival() + Duration::minutes(d));

            prop_assert!(!evaluate(&facts).is_eligible);
        }

        #[test]
        fn serde_round_trip_preserves_outcome(
            distance in proptest::option::of(0u32..20_000),
            delay in proptest::option::of(-600i64..2_000),
            cancelled in any::<bool>(),
        ) {
            let mut facts = DisruptionFacts::new(scheduled_arrival());
            facts.distance_km = distance;
            facts.is_cancelled = cancelled;
            facts.actual_arrival = delay.map(|d| scheduled_arrival() + Duration::minutes(d));

            let decision = evaluate(&facts);
            let json = serde_json::to_string(&decision).unwrap();
            let restored: EligibilityDecision = serde_json::from_str(&json).unwrap();
            prop_assert!(restored.same_outcome(&evaluate(&facts)));
        }
    }
}
