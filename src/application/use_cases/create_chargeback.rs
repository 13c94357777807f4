//! # Create Chargeback Use Case
//!
//! Opens a chargeback for a disputed transaction.
//!
//! # Flow
//!
//! 1. Validate the request, collecting every violation
//! 2. Reject the request if the transaction already has a chargeback
//! 3. Mask the card number and build a pending record
//! 4. Persist it and return the public view
//!
//! The duplicate check and the save are separate store calls, so two
//! concurrent requests for the same transaction can both succeed.

use crate::application::dto::ChargebackView;
use crate::application::error::{ApplicationError, ApplicationResult, ValidationErrors};
use crate::domain::entities::ChargebackBuilder;
use crate::domain::value_objects::{CardNumber, ChargebackReason, Timestamp};
use crate::infrastructure::persistence::ChargebackRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Input for opening a chargeback.
///
/// `reason` is kept as raw text so that an unknown value is reported
/// together with every other violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChargebackRequest {
    /// Disputed transaction.
    pub transaction_id: String,
    /// Merchant that processed the transaction.
    pub merchant_id: String,
    /// Disputed amount.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Raw card number.
    pub card_number: String,
    /// Dispute reason wire name.
    pub reason: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the disputed transaction happened.
    pub transaction_date: Timestamp,
}

impl CreateChargebackRequest {
    /// Checks every field and returns the parsed reason.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in field order.
    pub fn validate(&self) -> Result<ChargebackReason, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.transaction_id.trim().is_empty() {
            errors.push("transaction_id is required");
        }
        if self.merchant_id.trim().is_empty() {
            errors.push("merchant_id is required");
        }
        if self.amount <= Decimal::ZERO {
            errors.push("amount must be greater than 0");
        }
        if self.currency.trim().is_empty() {
            errors.push("currency is required");
        }
        if !CardNumber::is_maskable(&self.card_number) {
            errors.push("card_number must contain at least 4 digits");
        }
        match self.reason.parse::<ChargebackReason>() {
            Ok(reason) if errors.is_empty() => Ok(reason),
            Ok(_) => Err(errors),
            Err(e) => {
                errors.push(e.to_string());
                Err(errors)
            }
        }
    }
}

/// Use case for opening chargebacks.
#[derive(Debug, Clone)]
pub struct CreateChargebackUseCase {
    repository: Arc<dyn ChargebackRepository>,
}

impl CreateChargebackUseCase {
    /// Creates the use case over a repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ChargebackRepository>) -> Self {
        Self { repository }
    }

    /// Opens a chargeback.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Validation` with every input violation
    /// - `ApplicationError::DuplicateTransaction` if the transaction already
    ///   has a chargeback
    /// - `ApplicationError::Domain` if the record cannot be built
    /// - `ApplicationError::Repository` if the store fails
    pub async fn execute(
        &self,
        request: CreateChargebackRequest,
    ) -> ApplicationResult<ChargebackView> {
        let reason = request.validate().map_err(|errors| {
            tracing::info!(
                transaction_id = %request.transaction_id,
                violations = ?errors.messages(),
                "chargeback request rejected"
            );
            errors
        })?;

        if self
            .repository
            .find_by_transaction_id(&request.transaction_id)
            .await?
            .is_some()
        {
            tracing::info!(
                transaction_id = %request.transaction_id,
                "chargeback already exists for transaction"
            );
            return Err(ApplicationError::duplicate_transaction(
                request.transaction_id,
            ));
        }

        let card_number = CardNumber::mask(&request.card_number)?;
        let mut builder = ChargebackBuilder::new(
            request.transaction_id,
            request.merchant_id,
            request.amount,
            request.currency,
            card_number,
            reason,
            request.transaction_date,
        );
        if let Some(description) = request.description {
            builder = builder.description(description);
        }
        let mut chargeback = builder.build()?;

        self.repository.save(&mut chargeback).await?;

        tracing::info!(
            chargeback_id = %chargeback.id(),
            transaction_id = %chargeback.transaction_id(),
            merchant_id = %chargeback.merchant_id(),
            reason = %chargeback.reason(),
            "chargeback created"
        );
        Ok(ChargebackView::from(&chargeback))
    }
}
