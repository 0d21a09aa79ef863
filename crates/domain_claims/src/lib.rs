//! Claims Domain
//!
//! This crate tracks a passenger's compensation claim from intake to
//! resolution. The lifecycle is an explicit state machine: every status
//! change goes through [`lifecycle::transition`], so a claim can never be
//! moved to a status the business does not allow.
//!
//! # Claim Lifecycle
//!
//! ```text
//! NEW -> IN_REVIEW -> ELIGIBILITY_CHECKED -> SUBMITTED_TO_AIRLINE
//!   SUBMITTED_TO_AIRLINE -> AIRLINE_RESPONSE_RECEIVED | ESCALATION_SENT
//!   AIRLINE_RESPONSE_RECEIVED -> AIRLINE_REJECTED | NEGOTIATION | SETTLEMENT_OFFERED
//!   AIRLINE_REJECTED | NEGOTIATION -> ESCALATION_SENT
//!   SETTLEMENT_OFFERED -> PAID
//!   any non-terminal -> REJECTED | CLOSED
//! ```

pub mod status;
pub mod lifecycle;
pub mod claim;
pub mod ports;
pub mod service;
pub mod error;

pub use status::ClaimStatus;
pub use lifecycle::{allowed_events, transition, ClaimEvent, IllegalTransition};
pub use claim::{ClaimRecord, ConsentRecord, FlightDetails, NewClaim, PassengerDetails, StatusChange};
pub use ports::{ClaimQuery, ClaimRepository};
pub use service::{ClaimService, StatusSummary};
pub use error::ClaimError;
