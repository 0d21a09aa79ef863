//! Claims domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};
use crate::lifecycle::IllegalTransition;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    #[error("Invalid claim data: {0}")]
    Validation(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    #[error("Claim storage failed: {0}")]
    Repository(PortError),
}

impl From<PortError> for ClaimError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { id, .. } => ClaimError::ClaimNotFound(id),
            PortError::Validation { message } => ClaimError::Validation(message),
            other => ClaimError::Repository(other),
        }
    }
}
