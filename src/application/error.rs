//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution:
//! rejected input, business rule violations and persistence failures.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(ValidationErrors)   - Every input violation found
//! ├── DuplicateTransaction(String)   - Transaction already disputed
//! ├── Domain(DomainError)            - Business rule violations
//! └── Repository(RepositoryError)    - Persistence failures
//! ```
//!
//! # Examples
//!
//! ```
//! use chargeback_api::application::error::{ApplicationError, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! errors.push("transaction_id is required");
//! errors.push("merchant_id is required");
//!
//! let err = ApplicationError::from(errors);
//! assert!(err.is_validation());
//! assert_eq!(
//!     err.to_string(),
//!     "validation errors: transaction_id is required, merchant_id is required"
//! );
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use std::fmt;
use thiserror::Error;

/// Every violation found while validating one request, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the recorded messages.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation errors: {}", self.0.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// One or more input fields were rejected.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// A chargeback already exists for the transaction.
    #[error("chargeback for transaction {0} already exists")]
    DuplicateTransaction(String),

    /// Domain rule violation.
    #[error("failed to create chargeback entity: {0}")]
    Domain(#[from] DomainError),

    /// Persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    /// Creates a duplicate transaction error.
    #[must_use]
    pub fn duplicate_transaction(transaction_id: impl Into<String>) -> Self {
        Self::DuplicateTransaction(transaction_id.into())
    }

    /// Returns true if the caller sent bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Domain(_))
    }

    /// Returns true if the request conflicts with stored state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::DuplicateTransaction(_) => true,
            Self::Repository(e) => e.is_duplicate() || e.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::traits::CHARGEBACK_ENTITY;

    mod validation_errors {
        use super::*;

        #[test]
        fn new_set_is_empty() {
            assert!(ValidationErrors::new().is_empty());
        }

        #[test]
        fn keeps_every_message_in_order() {
            let mut errors = ValidationErrors::new();
            errors.push("a is required");
            errors.push("b is required");
            assert_eq!(errors.messages(), ["a is required", "b is required"]);
            assert_eq!(
                errors.to_string(),
                "validation errors: a is required, b is required"
            );
        }
    }

    #[test]
    fn single_validation_message() {
        let mut errors = ValidationErrors::new();
        errors.push("amount must be greater than 0");
        let err = ApplicationError::from(errors);
        assert!(err.is_validation());
        assert!(!err.is_conflict());
        assert!(err.to_string().starts_with("validation errors"));
    }

    #[test]
    fn duplicate_transaction_is_conflict() {
        let err = ApplicationError::duplicate_transaction("txn-1");
        assert!(err.is_conflict());
        assert!(err.to_string().contains("already exists"));
        assert!(err.to_string().contains("txn-1"));
    }

    #[test]
    fn domain_error_is_bad_input() {
        let err: ApplicationError = DomainError::invalid_amount("amount must be positive").into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("failed to create chargeback entity"));
    }

    #[test]
    fn repository_duplicate_is_conflict() {
        let err: ApplicationError = RepositoryError::duplicate(CHARGEBACK_ENTITY, "cb_1").into();
        assert!(err.is_conflict());
        assert!(!err.is_validation());
    }

    #[test]
    fn repository_store_failure_is_neither() {
        let err: ApplicationError = RepositoryError::store("save", "throttled").into();
        assert!(!err.is_conflict());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "failed to save chargeback: throttled");
    }
}
