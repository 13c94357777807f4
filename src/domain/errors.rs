//! # Domain Errors
//!
//! Business rule violations raised by the chargeback model.
//!
//! # Examples
//!
//! ```
//! use chargeback_api::domain::errors::DomainError;
//! use chargeback_api::domain::value_objects::ChargebackStatus;
//!
//! let err = DomainError::invalid_transition(ChargebackStatus::Approved, ChargebackStatus::Rejected);
//! assert!(err.to_string().contains("approved"));
//! ```

use crate::domain::value_objects::ChargebackStatus;
use thiserror::Error;

/// Error raised when a domain invariant would be violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Status change not permitted by the lifecycle.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: ChargebackStatus,
        /// Requested status.
        to: ChargebackStatus,
    },

    /// The record already carries an identifier.
    #[error("chargeback identifier already assigned: {0}")]
    IdentifierAlreadyAssigned(String),

    /// Card number cannot be masked.
    #[error("invalid card number: {0}")]
    InvalidCardNumber(String),

    /// Amount is zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Text does not name a known enumerant.
    #[error("invalid {kind} '{value}'. Valid options: {options}")]
    InvalidEnumValue {
        /// Enumeration name.
        kind: &'static str,
        /// Rejected input.
        value: String,
        /// Comma-separated accepted values.
        options: &'static str,
    },
}

impl DomainError {
    /// Creates an invalid status transition error.
    #[must_use]
    pub fn invalid_transition(from: ChargebackStatus, to: ChargebackStatus) -> Self {
        Self::InvalidStatusTransition { from, to }
    }

    /// Creates an invalid card number error.
    #[must_use]
    pub fn invalid_card_number(reason: impl Into<String>) -> Self {
        Self::InvalidCardNumber(reason.into())
    }

    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount(reason.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
