//! Compensation Eligibility Domain
//!
//! This crate decides whether a flight disruption qualifies for compensation
//! under a distance-banded schedule (EU Regulation 261/2004 by default).
//!
//! # Decision Order
//!
//! ```text
//! extraordinary? -> not eligible
//! cancelled?     -> distance known? -> amount by band
//! delay known and positive? -> distance known? -> delay >= band threshold?
//! ```
//!
//! Evaluation is a total function: missing distance or arrival time produce a
//! not-eligible decision with a structured reason, never an error.

pub mod facts;
pub mod decision;
pub mod schedule;
pub mod engine;
pub mod error;

pub use facts::DisruptionFacts;
pub use decision::{CompensationAmount, DecisionReason, EligibilityDecision, ReasonKind};
pub use schedule::{CompensationSchedule, DistanceBand};
pub use engine::{calculate_delay, evaluate, EligibilityEngine};
pub use error::ScheduleError;
