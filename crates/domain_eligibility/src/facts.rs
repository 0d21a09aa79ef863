//! Disruption facts - the input to an eligibility evaluation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Facts about a single flight disruption
///
/// Distance and arrival times are supplied by the caller; nothing here is
/// looked up. An absent `actual_arrival` means the delay is not yet known,
/// and an absent `distance_km` means the route length is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionFacts {
    /// Great-circle route distance in kilometers
    #[serde(default)]
    pub distance_km: Option<u32>,
    /// Scheduled arrival instant
    pub scheduled_arrival: DateTime<Utc>,
    /// Actual arrival instant
    #[serde(default)]
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Whether the flight was cancelled
    #[serde(default)]
    pub is_cancelled: bool,
    /// Whether extraordinary circumstances applied
    #[serde(default)]
    pub is_extraordinary: bool,
    /// Free-text description of the extraordinary circumstance
    #[serde(default)]
    pub extraordinary_reason: Option<String>,
    /// IATA code of the departure airport
    #[serde(default)]
    pub departure_airport: Option<String>,
    /// IATA code of the arrival airport
    #[serde(default)]
    pub arrival_airport: Option<String>,
    /// Scheduled departure instant
    #[serde(default)]
    pub scheduled_departure: Option<DateTime<Utc>>,
    /// Actual departure instant
    #[serde(default)]
    pub actual_departure: Option<DateTime<Utc>>,
    /// Reason given by the airline for a cancellation
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl DisruptionFacts {
    /// Creates facts for a flight with only its scheduled arrival known
    pub fn new(scheduled_arrival: DateTime<Utc>) -> Self {
        Self {
            distance_km: None,
            scheduled_arrival,
            actual_arrival: None,
            is_cancelled: false,
            is_extraordinary: false,
            extraordinary_reason: None,
            departure_airport: None,
            arrival_airport: None,
            scheduled_departure: None,
            actual_departure: None,
            cancellation_reason: None,
        }
    }

    /// Sets the route distance
    pub fn with_distance_km(mut self, distance_km: u32) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    /// Sets the actual arrival instant
    pub fn with_actual_arrival(mut self, actual_arrival: DateTime<Utc>) -> Self {
        self.actual_arrival = Some(actual_arrival);
        self
    }

    /// Sets the actual arrival relative to the scheduled one
    ///
    /// An offset that leaves chrono's representable range clears the actual
    /// arrival, so the delay reads as unknown.
    pub fn arriving_late_by(mut self, minutes: i64) -> Self {
        self.actual_arrival = Duration::try_minutes(minutes)
            .and_then(|offset| self.scheduled_arrival.checked_add_signed(offset));
        self
    }

    /// Marks the flight as cancelled
    pub fn cancelled(mut self, reason: Option<String>) -> Self {
        self.is_cancelled = true;
        self.cancellation_reason = reason;
        self
    }

    /// Marks the disruption as caused by extraordinary circumstances
    pub fn extraordinary(mut self, reason: impl Into<String>) -> Self {
        self.is_extraordinary = true;
        self.extraordinary_reason = Some(reason.into());
        self
    }

    /// Sets the route endpoints
    pub fn with_route(mut self, departure: impl Into<String>, arrival: impl Into<String>) -> Self {
        self.departure_airport = Some(departure.into());
        self.arrival_airport = Some(arrival.into());
        self
    }

    /// Returns the distance with unknown normalized to zero
    pub fn normalized_distance_km(&self) -> u32 {
        self.distance_km.unwrap_or(0)
    }
}
