//! Compensation schedules
//!
//! A schedule is an ordered list of distance bands. Each band covers the
//! distances above the previous band's bound up to and including its own
//! bound, and names the arrival delay required for compensation plus the
//! amount paid. The last band is open-ended.
//!
//! Schedules can be loaded from JSON so thresholds are configuration rather
//! than code:
//!
//! ```json
//! {
//!   "name": "EU261",
//!   "bands": [
//!     { "max_distance_km": 1500, "min_delay_minutes": 180, "amount": 250 },
//!     { "max_distance_km": 3500, "min_delay_minutes": 180, "amount": 400 },
//!     { "max_distance_km": null, "min_delay_minutes": 240, "amount": 600 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::decision::CompensationAmount;
use crate::error::ScheduleError;

/// One distance band of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceBand {
    /// Inclusive upper bound; `None` for the open-ended last band
    pub max_distance_km: Option<u32>,
    /// Minimum arrival delay (inclusive) on the delay path
    pub min_delay_minutes: i64,
    /// Compensation paid for this band
    pub amount: CompensationAmount,
}

impl DistanceBand {
    /// Returns true if a positive distance falls at or below this band's bound
    fn covers(&self, distance_km: u32) -> bool {
        self.max_distance_km.map_or(true, |max| distance_km <= max)
    }
}

/// Unvalidated schedule as it appears in configuration
#[derive(Debug, Clone, Deserialize)]
struct ScheduleDefinition {
    name: String,
    bands: Vec<DistanceBand>,
}

/// A validated, ordered set of distance bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleDefinition")]
pub struct CompensationSchedule {
    name: String,
    bands: Vec<DistanceBand>,
}

impl CompensationSchedule {
    /// Creates a schedule, validating band ordering
    ///
    /// # Errors
    ///
    /// Returns a `ScheduleError` if there are no bands, bounds are not strictly
    /// increasing, the last band is bounded, an earlier band is unbounded, or a
    /// delay threshold is negative.
    pub fn new(name: impl Into<String>, bands: Vec<DistanceBand>) -> Result<Self, ScheduleError> {
        validate_bands(&bands)?;
        Ok(Self {
            name: name.into(),
            bands,
        })
    }

    /// The EU Regulation 261/2004 schedule
    pub fn eu261() -> Self {
        Self {
            name: "EU261".to_string(),
            bands: vec![
                DistanceBand {
                    max_distance_km: Some(1500),
                    min_delay_minutes: 180,
                    amount: CompensationAmount::Eur250,
                },
                DistanceBand {
                    max_distance_km: Some(3500),
                    min_delay_minutes: 180,
                    amount: CompensationAmount::Eur400,
                },
                DistanceBand {
                    max_distance_km: None,
                    min_delay_minutes: 240,
                    amount: CompensationAmount::Eur600,
                },
            ],
        }
    }

    /// Parses and validates a schedule from JSON
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let definition: ScheduleDefinition =
            serde_json::from_str(json).map_err(|e| ScheduleError::Parse(e.to_string()))?;
        Self::try_from(definition)
    }

    /// Reads a JSON schedule from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScheduleError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Returns the schedule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bands in ascending distance order
    pub fn bands(&self) -> &[DistanceBand] {
        &self.bands
    }

    /// Finds the band for a distance; zero distance has no band
    pub fn band_for(&self, distance_km: u32) -> Option<&DistanceBand> {
        if distance_km == 0 {
            return None;
        }
        self.bands.iter().find(|band| band.covers(distance_km))
    }
}

impl Default for CompensationSchedule {
    fn default() -> Self {
        Self::eu261()
    }
}

impl TryFrom<ScheduleDefinition> for CompensationSchedule {
    type Error = ScheduleError;

    fn try_from(definition: ScheduleDefinition) -> Result<Self, Self::Error> {
        Self::new(definition.name, definition.bands)
    }
}

fn validate_bands(bands: &[DistanceBand]) -> Result<(), ScheduleError> {
    if bands.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }

    let last = bands.len() - 1;
    let mut previous: Option<u32> = None;

    for (index, band) in bands.iter().enumerate() {
        if band.min_delay_minutes < 0 {
            return Err(ScheduleError::NegativeDelayThreshold {
                index,
                minutes: band.min_delay_minutes,
            });
        }

        match band.max_distance_km {
            None if index != last => return Err(ScheduleError::UnboundedBandNotLast { index }),
            None => {}
            Some(_) if index == last => return Err(ScheduleError::MissingOpenBand),
            Some(0) => return Err(ScheduleError::ZeroUpperBound { index }),
            Some(current) => {
                if let Some(previous) = previous {
                    if current <= previous {
                        return Err(ScheduleError::NonIncreasingBound {
                            index,
                            previous,
                            current,
                        });
                    }
                }
                previous = Some(current);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eu261_band_lookup() {
        let schedule = CompensationSchedule::eu261();
        assert_eq!(schedule.band_for(1500).unwrap().amount, CompensationAmount::Eur250);
        assert_eq!(schedule.band_for(1501).unwrap().amount, CompensationAmount::Eur400);
        assert_eq!(schedule.band_for(3500).unwrap().amount, CompensationAmount::Eur400);
        assert_eq!(schedule.band_for(3501).unwrap().amount, CompensationAmount::Eur600);
        assert!(schedule.band_for(0).is_none());
    }

    #[test]
    fn test_eu261_is_valid() {
        assert!(validate_bands(CompensationSchedule::eu261().bands()).is_ok());
    }

    #[test]
    fn test_single_open_band_is_valid() {
        let schedule = CompensationSchedule::new(
            "flat",
            vec![DistanceBand {
                max_distance_km: None,
                min_delay_minutes: 120,
                amount: CompensationAmount::Eur250,
            }],
        )
        .unwrap();
        assert_eq!(schedule.band_for(10_000).unwrap().min_delay_minutes, 120);
    }
}
