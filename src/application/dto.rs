//! # Data Transfer Objects
//!
//! Public views of chargeback records.

use crate::domain::entities::Chargeback;
use crate::domain::value_objects::{ChargebackReason, ChargebackStatus, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Public JSON view of a chargeback.
///
/// The card number is always the masked form. `amount` is rendered as a
/// JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargebackView {
    /// Record identifier.
    pub id: String,
    /// Disputed transaction.
    pub transaction_id: String,
    /// Merchant.
    pub merchant_id: String,
    /// Disputed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Masked card number.
    pub card_number: String,
    /// Dispute reason.
    pub reason: ChargebackReason,
    /// Review status.
    pub status: ChargebackStatus,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
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

impl From<&Chargeback> for ChargebackView {
    fn from(chargeback: &Chargeback) -> Self {
        Self {
            id: chargeback.id().to_string(),
            transaction_id: chargeback.transaction_id().to_string(),
            merchant_id: chargeback.merchant_id().to_string(),
            amount: chargeback.amount(),
            currency: chargeback.currency().to_string(),
            card_number: chargeback.card_number().to_string(),
            reason: chargeback.reason(),
            status: chargeback.status(),
            description: chargeback.description().map(str::to_string),
            transaction_date: chargeback.transaction_date(),
            chargeback_date: chargeback.chargeback_date(),
            created_at: chargeback.created_at(),
            updated_at: chargeback.updated_at(),
        }
    }
}
