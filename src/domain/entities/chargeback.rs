//! # Chargeback Aggregate
//!
//! The chargeback record: a cardholder dispute against one transaction.
//!
//! # State Machine
//!
//! ```text
//! Pending → Approved
//!    ↓
//!    └────→ Rejected
//! ```
//!
//! # Examples
//!
//! ```
//! use chargeback_api::domain::entities::ChargebackBuilder;
//! use chargeback_api::domain::value_objects::{
//!     CardNumber, ChargebackReason, ChargebackStatus, Timestamp,
//! };
//! use rust_decimal::Decimal;
//!
//! let mut chargeback = ChargebackBuilder::new(
//!     "txn-1",
//!     "merchant-1",
//!     Decimal::new(9999, 2),
//!     "USD",
//!     CardNumber::mask("4111111111111234").unwrap(),
//!     ChargebackReason::Fraud,
//!     Timestamp::now(),
//! )
//! .build()
//! .unwrap();
//!
//! assert_eq!(chargeback.status(), ChargebackStatus::Pending);
//! chargeback.approve().unwrap();
//! assert!(chargeback.reject().is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    CardNumber, ChargebackId, ChargebackReason, ChargebackStatus, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chargeback aggregate root.
///
/// # Invariants
///
/// - `id` never changes once assigned
/// - `amount` is positive for records opened through [`ChargebackBuilder`]
/// - status moves only from `Pending` to `Approved` or `Rejected`
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chargeback {
    id: ChargebackId,
    transaction_id: String,
    merchant_id: String,
    amount: Decimal,
    currency: String,
    card_number: CardNumber,
    reason: ChargebackReason,
    status: ChargebackStatus,
    description: Option<String>,
    transaction_date: Timestamp,
    chargeback_date: Timestamp,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Raw field set used to rebuild a [`Chargeback`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargebackParts {
    /// Record identifier.
    pub id: ChargebackId,
    /// Disputed transaction.
    pub transaction_id: String,
    /// Merchant that processed the transaction.
    pub merchant_id: String,
    /// Disputed amount.
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// Masked card number.
    pub card_number: CardNumber,
    /// Dispute reason.
    pub reason: ChargebackReason,
    /// Review status.
    pub status: ChargebackStatus,
    /// Free-text description.
    pub description: Option<String>,
    /// When the disputed transaction happened.
    pub transaction_date: Timestamp,
    /// When the chargeback was opened.
    pub chargeback_date: Timestamp,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Chargeback {
    /// Rebuilds a record from storage without validation.
    #[must_use]
    pub fn from_parts(parts: ChargebackParts) -> Self {
        Self {
            id: parts.id,
            transaction_id: parts.transaction_id,
            merchant_id: parts.merchant_id,
            amount: parts.amount,
            currency: parts.currency,
            card_number: parts.card_number,
            reason: parts.reason,
            status: parts.status,
            description: parts.description,
            transaction_date: parts.transaction_date,
            chargeback_date: parts.chargeback_date,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    /// Assigns the identifier of a record that has none yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdentifierAlreadyAssigned` if the record
    /// already has an identifier.
    pub fn assign_id(&mut self, id: ChargebackId) -> DomainResult<()> {
        if !self.id.is_empty() {
            return Err(DomainError::IdentifierAlreadyAssigned(self.id.to_string()));
        }
        self.id = id;
        Ok(())
    }

    /// Marks the dispute as accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless pending.
    pub fn approve(&mut self) -> DomainResult<()> {
        self.transition_to(ChargebackStatus::Approved)
    }

    /// Marks the dispute as refused.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless pending.
    pub fn reject(&mut self) -> DomainResult<()> {
        self.transition_to(ChargebackStatus::Rejected)
    }

    /// Moves `updated_at` strictly forward to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now_after(&self.updated_at);
    }

    fn transition_to(&mut self, target: ChargebackStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition(self.status, target));
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    /// Returns the identifier (empty until saved).
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ChargebackId {
        &self.id
    }

    /// Returns the disputed transaction identifier.
    #[inline]
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Returns the merchant identifier.
    #[inline]
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Returns the disputed amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the masked card number.
    #[inline]
    #[must_use]
    pub fn card_number(&self) -> &CardNumber {
        &self.card_number
    }

    /// Returns the dispute reason.
    #[inline]
    #[must_use]
    pub fn reason(&self) -> ChargebackReason {
        self.reason
    }

    /// Returns the review status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ChargebackStatus {
        self.status
    }

    /// Returns the description, if any.
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns when the disputed transaction happened.
    #[inline]
    #[must_use]
    pub fn transaction_date(&self) -> Timestamp {
        self.transaction_date
    }

    /// Returns when the chargeback was opened.
    #[inline]
    #[must_use]
    pub fn chargeback_date(&self) -> Timestamp {
        self.chargeback_date
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the last modification time.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl fmt::Display for Chargeback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chargeback(id={}, txn={}, amount={} {}, status={})",
            self.id, self.transaction_id, self.amount, self.currency, self.status
        )
    }
}

/// Builder for newly opened chargebacks.
///
/// The built record is pending, has no identifier and carries the current
/// time in all server-assigned timestamps.
#[derive(Debug, Clone)]
pub struct ChargebackBuilder {
    transaction_id: String,
    merchant_id: String,
    amount: Decimal,
    currency: String,
    card_number: CardNumber,
    reason: ChargebackReason,
    description: Option<String>,
    transaction_date: Timestamp,
}

impl ChargebackBuilder {
    /// Starts a builder with every required field.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        merchant_id: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        card_number: CardNumber,
        reason: ChargebackReason,
        transaction_date: Timestamp,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            merchant_id: merchant_id.into(),
            amount,
            currency: currency.into(),
            card_number,
            reason,
            description: None,
            transaction_date,
        }
    }

    /// Sets the description. Empty strings are treated as absent.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Builds the pending record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the amount is not positive.
    pub fn build(self) -> DomainResult<Chargeback> {
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::invalid_amount("amount must be positive"));
        }
        let now = Timestamp::now();
        Ok(Chargeback {
            id: ChargebackId::unassigned(),
            transaction_id: self.transaction_id,
            merchant_id: self.merchant_id,
            amount: self.amount,
            currency: self.currency,
            card_number: self.card_number,
            reason: self.reason,
            status: ChargebackStatus::Pending,
            description: self.description,
            transaction_date: self.transaction_date,
            chargeback_date: now,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn builder() -> ChargebackBuilder {
        ChargebackBuilder::new(
            "txn-456",
            "merchant-789",
            Decimal::new(9999, 2),
            "USD",
            CardNumber::mask("4111111111111234").unwrap(),
            ChargebackReason::Fraud,
            Timestamp::parse_rfc3339("2023-01-15T10:30:00Z").unwrap(),
        )
    }

    mod construction {
        use super::*;

        #[test]
        fn build_opens_pending_record() {
            let cb = builder().description("Test chargeback").build().unwrap();
            assert!(cb.id().is_empty());
            assert_eq!(cb.status(), ChargebackStatus::Pending);
            assert_eq!(cb.description(), Some("Test chargeback"));
            assert_eq!(cb.created_at(), cb.updated_at());
            assert_eq!(cb.created_at(), cb.chargeback_date());
        }

        #[test]
        fn empty_description_is_absent() {
            let cb = builder().description("").build().unwrap();
            assert_eq!(cb.description(), None);
        }

        #[test]
        fn non_positive_amount_rejected() {
            let mut b = builder();
            b.amount = Decimal::ZERO;
            assert!(matches!(b.build(), Err(DomainError::InvalidAmount(_))));
        }
    }

    mod identity {
        use super::*;

        #[test]
        fn assign_id_once() {
            let mut cb = builder().build().unwrap();
            cb.assign_id(ChargebackId::new("cb_1")).unwrap();
            assert_eq!(cb.id().as_str(), "cb_1");
        }

        #[test]
        fn assigned_id_is_immutable() {
            let mut cb = builder().build().unwrap();
            cb.assign_id(ChargebackId::new("cb_1")).unwrap();
            let err = cb.assign_id(ChargebackId::new("cb_2")).unwrap_err();
            assert!(matches!(err, DomainError::IdentifierAlreadyAssigned(_)));
            assert_eq!(cb.id().as_str(), "cb_1");
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn approve_from_pending() {
            let mut cb = builder().build().unwrap();
            let before = cb.updated_at();
            cb.approve().unwrap();
            assert_eq!(cb.status(), ChargebackStatus::Approved);
            assert!(cb.updated_at().is_after(&before));
        }

        #[test]
        fn reject_from_pending() {
            let mut cb = builder().build().unwrap();
            cb.reject().unwrap();
            assert_eq!(cb.status(), ChargebackStatus::Rejected);
        }

        #[test]
        fn terminal_states_refuse_transitions() {
            let mut cb = builder().build().unwrap();
            cb.reject().unwrap();
            assert!(cb.approve().is_err());
            assert!(cb.reject().is_err());
            assert_eq!(cb.status(), ChargebackStatus::Rejected);
        }

        #[test]
        fn touch_keeps_updated_after_created() {
            let mut cb = builder().build().unwrap();
            cb.touch();
            cb.touch();
            assert!(cb.updated_at().is_after(&cb.created_at()));
        }
    }

    #[test]
    fn display_mentions_transaction() {
        let cb = builder().build().unwrap();
        let text = cb.to_string();
        assert!(text.contains("txn-456"));
        assert!(text.contains("pending"));
    }
}
