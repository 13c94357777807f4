//! # Card Number
//!
//! Masked primary account number. Only the last four digits survive
//! masking; the raw number never reaches storage or responses.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replacement for every digit group but the last.
pub const MASK_PREFIX: &str = "****-****-****-";

/// Minimum digits a card number must carry to be masked.
const VISIBLE_DIGITS: usize = 4;

/// A masked card number such as `****-****-****-1234`.
///
/// # Examples
///
/// ```
/// use chargeback_api::domain::value_objects::CardNumber;
///
/// let card = CardNumber::mask("4111 1111 1111 1234").unwrap();
/// assert_eq!(card.as_str(), "****-****-****-1234");
/// assert_eq!(card.last_four(), "1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    /// Masks a raw (or already masked) card number.
    ///
    /// Non-digit characters are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCardNumber` if fewer than four digits
    /// are present.
    pub fn mask(raw: &str) -> DomainResult<Self> {
        let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < VISIBLE_DIGITS {
            return Err(DomainError::invalid_card_number(format!(
                "card_number must contain at least {VISIBLE_DIGITS} digits"
            )));
        }
        let last_four: String = digits
            .iter()
            .skip(digits.len() - VISIBLE_DIGITS)
            .collect();
        Ok(Self(format!("{MASK_PREFIX}{last_four}")))
    }

    /// Rebuilds a card number read back from storage without re-masking.
    #[must_use]
    pub fn from_masked(masked: impl Into<String>) -> Self {
        Self(masked.into())
    }

    /// Returns true if `raw` carries enough digits to be masked.
    #[must_use]
    pub fn is_maskable(raw: &str) -> bool {
        raw.chars().filter(char::is_ascii_digit).count() >= VISIBLE_DIGITS
    }

    /// Returns the visible trailing digits.
    #[must_use]
    pub fn last_four(&self) -> &str {
        self.0
            .get(self.0.len().saturating_sub(VISIBLE_DIGITS)..)
            .unwrap_or_default()
    }

    /// Returns the masked representation.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
