//! # Repository Traits
//!
//! Port definition for chargeback persistence.
//!
//! [`ChargebackRepository`] is the only seam between the application and
//! storage. Production uses the DynamoDB adapter; tests use the in-memory
//! adapter.
//!
//! # Existence guards
//!
//! Writes are guarded by the store, never by a read-then-write pair:
//!
//! | operation | precondition | failure |
//! |---|---|---|
//! | `save` | id absent | [`RepositoryError::Duplicate`] |
//! | `update` | id present | [`RepositoryError::NotFound`] |
//! | `delete` | id present | [`RepositoryError::NotFound`] |
//!
//! Reads report a missing record as `Ok(None)` or an empty list.
//!
//! # Examples
//!
//! ```ignore
//! use chargeback_api::infrastructure::persistence::ChargebackRepository;
//!
//! async fn pending_count(repo: &dyn ChargebackRepository) -> usize {
//!     repo.find_by_status(ChargebackStatus::Pending).await?.len()
//! }
//! ```

use crate::domain::entities::Chargeback;
use crate::domain::value_objects::{ChargebackId, ChargebackStatus};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// The store rejected or failed the request.
    #[error("failed to {operation} chargeback: {message}")]
    Store {
        /// Repository operation that failed.
        operation: &'static str,
        /// Underlying cause.
        message: String,
    },

    /// The store call exceeded its deadline.
    #[error("timed out during {operation}: {message}")]
    Timeout {
        /// Repository operation that timed out.
        operation: &'static str,
        /// Underlying cause.
        message: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a store error for the named operation.
    #[must_use]
    pub fn store(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Store {
            operation,
            message: message.into(),
        }
    }

    /// Creates a timeout error for the named operation.
    #[must_use]
    pub fn timeout(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            operation,
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Entity name used in repository errors.
pub const CHARGEBACK_ENTITY: &str = "Chargeback";

/// Repository for chargeback records.
///
/// Every call may block on store I/O. Dropping the returned future cancels
/// the in-flight request; adapters bound each store call with a timeout.
#[async_trait]
pub trait ChargebackRepository: Send + Sync + fmt::Debug {
    /// Persists a new chargeback.
    ///
    /// Generates an identifier first if the record has none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if a record with the same
    /// identifier already exists, or a store error.
    async fn save(&self, chargeback: &mut Chargeback) -> RepositoryResult<()>;

    /// Gets a chargeback by identifier.
    ///
    /// Returns `None` if the record does not exist.
    async fn find_by_id(&self, id: &ChargebackId) -> RepositoryResult<Option<Chargeback>>;

    /// Gets the chargeback opened for a transaction.
    ///
    /// Returns the first match if the index holds more than one.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Chargeback>>;

    /// Finds every chargeback for a merchant, in store order.
    async fn find_by_merchant_id(&self, merchant_id: &str) -> RepositoryResult<Vec<Chargeback>>;

    /// Finds every chargeback in a status, in store order.
    async fn find_by_status(&self, status: ChargebackStatus) -> RepositoryResult<Vec<Chargeback>>;

    /// Replaces an existing chargeback.
    ///
    /// Refreshes `updated_at` before writing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this identifier.
    async fn update(&self, chargeback: &mut Chargeback) -> RepositoryResult<()>;

    /// Deletes a chargeback.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this identifier.
    async fn delete(&self, id: &ChargebackId) -> RepositoryResult<()>;

    /// Lists up to `limit` chargebacks after skipping `offset` of them.
    ///
    /// Order is whatever the underlying sweep yields. An `offset` past the
    /// end returns an empty list.
    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Chargeback>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repository_error {
        use super::*;

        #[test]
        fn not_found_error() {
            let err = RepositoryError::not_found(CHARGEBACK_ENTITY, "cb_123");
            assert!(err.is_not_found());
            assert!(!err.is_duplicate());
            assert!(err.to_string().contains("not found"));
            assert!(err.to_string().contains("Chargeback"));
            assert!(err.to_string().contains("cb_123"));
        }

        #[test]
        fn duplicate_error() {
            let err = RepositoryError::duplicate(CHARGEBACK_ENTITY, "cb_456");
            assert!(!err.is_not_found());
            assert!(err.is_duplicate());
            assert!(err.to_string().contains("already exists"));
        }

        #[test]
        fn store_error_names_operation() {
            let err = RepositoryError::store("save", "throughput exceeded");
            assert_eq!(
                err.to_string(),
                "failed to save chargeback: throughput exceeded"
            );
        }

        #[test]
        fn timeout_error() {
            let err = RepositoryError::timeout("scan", "operation timeout");
            assert!(matches!(err, RepositoryError::Timeout { operation: "scan", .. }));
            assert!(err.to_string().contains("scan"));
        }

        #[test]
        fn connection_error() {
            let err = RepositoryError::connection("Connection refused");
            assert!(err.to_string().contains("Connection"));
            assert!(err.to_string().contains("refused"));
        }

        #[test]
        fn serialization_error() {
            let err = RepositoryError::serialization("missing attribute id");
            assert!(err.to_string().contains("Serialization"));
        }

        #[test]
        fn internal_error() {
            let err = RepositoryError::internal("Unexpected state");
            assert!(err.to_string().contains("Internal"));
        }
    }
}
