//! Pre-built Test Fixtures
//!
//! Fixed, predictable flights, passengers and amounts. Every instant is
//! pinned so that delays computed from fixtures are exact.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_claims::{FlightDetails, NewClaim, PassengerDetails};
use domain_eligibility::{CompensationSchedule, DisruptionFacts};

/// The default schedule, built once
pub static EU261_SCHEDULE: Lazy<CompensationSchedule> = Lazy::new(CompensationSchedule::eu261);

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn eur_250() -> Money {
        Money::eur(250)
    }

    pub fn eur_400() -> Money {
        Money::eur(400)
    }

    pub fn eur_600() -> Money {
        Money::eur(600)
    }

    /// A negotiated settlement below the regulated amount
    pub fn eur_settlement() -> Money {
        Money::new(dec!(320.00), Currency::EUR)
    }

    /// A settlement paid in the carrier's local currency
    pub fn dkk_settlement() -> Money {
        Money::new(dec!(2950.00), Currency::DKK)
    }
}

/// Fixture for fixed instants
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Scheduled arrival shared by all fixture flights
    pub fn scheduled_arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 17, 45, 0).unwrap()
    }

    /// Local date of the fixture flights
    pub fn flight_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
    }
}

/// Fixture for disruption facts, one per schedule band
pub struct FactsFixtures;

impl FactsFixtures {
    /// 1100 km route, arriving `minutes` late
    pub fn short_haul_delayed(minutes: i64) -> DisruptionFacts {
        DisruptionFacts::new(TemporalFixtures::scheduled_arrival())
            .with_route("BCN", "FCO")
            .with_distance_km(1100)
            .arriving_late_by(minutes)
    }

    /// 2300 km route, arriving `minutes` late
    pub fn medium_haul_delayed(minutes: i64) -> DisruptionFacts {
        DisruptionFacts::new(TemporalFixtures::scheduled_arrival())
            .with_route("DUB", "ATH")
            .with_distance_km(2300)
            .arriving_late_by(minutes)
    }

    /// 6200 km route, arriving `minutes` late
    pub fn long_haul_delayed(minutes: i64) -> DisruptionFacts {
        DisruptionFacts::new(TemporalFixtures::scheduled_arrival())
            .with_route("FRA", "JFK")
            .with_distance_km(6200)
            .arriving_late_by(minutes)
    }

    /// Cancelled 1100 km flight
    pub fn cancelled_short_haul() -> DisruptionFacts {
        DisruptionFacts::new(TemporalFixtures::scheduled_arrival())
            .with_route("BCN", "FCO")
            .with_distance_km(1100)
            .cancelled(Some("technical fault".to_string()))
    }

    /// Six-hour delay caused by weather
    pub fn extraordinary_delay() -> DisruptionFacts {
        Self::medium_haul_delayed(360).extraordinary("severe weather at destination")
    }

    /// Delayed flight whose route distance was never captured
    pub fn unknown_distance() -> DisruptionFacts {
        DisruptionFacts::new(TemporalFixtures::scheduled_arrival()).arriving_late_by(300)
    }
}

/// Fixture for claim intake data
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn passenger() -> PassengerDetails {
        PassengerDetails {
            first_name: "Ines".to_string(),
            last_name: "Moreau".to_string(),
            email: "ines.moreau@example.com".to_string(),
            phone: Some("+33612345678".to_string()),
            address: Some("12 Rue de la Paix".to_string()),
            city: Some("Paris".to_string()),
            postal_code: Some("75002".to_string()),
            country: Some("FR".to_string()),
        }
    }

    pub fn flight(facts: DisruptionFacts) -> FlightDetails {
        FlightDetails {
            flight_number: "VY6104".to_string(),
            airline: "Vueling".to_string(),
            flight_date: TemporalFixtures::flight_date(),
            facts,
        }
    }

    /// Consented intake for the given facts
    pub fn new_claim(facts: DisruptionFacts) -> NewClaim {
        NewClaim {
            flight: Self::flight(facts),
            passenger: Self::passenger(),
            gdpr_consent: true,
            poa_signed: true,
        }
    }
}
