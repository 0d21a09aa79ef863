//! Test Data Builders
//!
//! Builders that specify only the fields a test cares about. Passenger
//! identities are randomized with `fake` unless pinned.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use domain_claims::{ClaimEvent, ClaimRecord, ClaimStatus, NewClaim, PassengerDetails};
use domain_eligibility::{evaluate, DisruptionFacts};

use crate::fixtures::{ClaimFixtures, FactsFixtures};

/// Events that walk a claim from NEW to each reachable status
fn path_to(status: ClaimStatus) -> &'static [ClaimEvent] {
    use ClaimEvent as E;

    match status {
        ClaimStatus::New => &[],
        ClaimStatus::InReview => &[E::StartReview],
        ClaimStatus::EligibilityChecked => &[E::StartReview, E::EligibilityConfirmed],
        ClaimStatus::SubmittedToAirline => {
            &[E::StartReview, E::EligibilityConfirmed, E::SubmitToAirline]
        }
        ClaimStatus::AirlineResponseReceived => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::AirlineResponded,
        ],
        ClaimStatus::AirlineRejected => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::AirlineResponded,
            E::AirlineRejected,
        ],
        ClaimStatus::EscalationSent => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::ResponseDeadlineElapsed,
        ],
        ClaimStatus::Negotiation => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::AirlineResponded,
            E::NegotiationOpened,
        ],
        ClaimStatus::SettlementOffered => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::AirlineResponded,
            E::SettlementOffered,
        ],
        ClaimStatus::Paid => &[
            E::StartReview,
            E::EligibilityConfirmed,
            E::SubmitToAirline,
            E::AirlineResponded,
            E::SettlementOffered,
            E::SettlementAccepted,
        ],
        ClaimStatus::Closed => &[E::StartReview, E::Withdraw],
        ClaimStatus::Rejected => &[E::StartReview, E::EligibilityNegative],
    }
}

/// Builder for claims at any lifecycle status
pub struct TestClaimBuilder {
    facts: DisruptionFacts,
    passenger: Option<PassengerDetails>,
    status: ClaimStatus,
    gdpr_consent: bool,
    poa_signed: bool,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Eligible medium-haul claim at NEW with a random passenger
    pub fn new() -> Self {
        Self {
            facts: FactsFixtures::medium_haul_delayed(200),
            passenger: None,
            status: ClaimStatus::New,
            gdpr_consent: true,
            poa_signed: true,
        }
    }

    pub fn with_facts(mut self, facts: DisruptionFacts) -> Self {
        self.facts = facts;
        self
    }

    pub fn with_passenger(mut self, passenger: PassengerDetails) -> Self {
        self.passenger = Some(passenger);
        self
    }

    /// Walks the built claim to `status` through legal events
    pub fn at_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn without_consent(mut self) -> Self {
        self.gdpr_consent = false;
        self
    }

    /// Builds the intake payload
    pub fn build_new_claim(&self) -> NewClaim {
        let mut new_claim = ClaimFixtures::new_claim(self.facts.clone());
        new_claim.passenger = self.passenger.clone().unwrap_or_else(random_passenger);
        new_claim.gdpr_consent = self.gdpr_consent;
        new_claim.poa_signed = self.poa_signed;
        new_claim
    }

    /// Builds an evaluated claim at the requested status
    ///
    /// # Panics
    ///
    /// Panics if the intake is invalid (e.g. built `without_consent`).
    pub fn build(self) -> ClaimRecord {
        let mut claim = ClaimRecord::intake(self.build_new_claim())
            .expect("builder produced an invalid intake");
        claim.record_decision(evaluate(&claim.flight.facts));

        for event in path_to(self.status) {
            claim
                .apply(*event, None)
                .expect("builder path contains an illegal transition");
        }
        claim
    }
}

/// A passenger with random, valid identity fields
pub fn random_passenger() -> PassengerDetails {
    PassengerDetails {
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: SafeEmail().fake(),
        phone: None,
        address: None,
        city: None,
        postal_code: None,
        country: Some("DE".to_string()),
    }
}
