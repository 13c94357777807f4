//! # Domain Enums
//!
//! Enumeration types for chargeback records.
//!
//! - [`ChargebackReason`] - Why the cardholder disputes the transaction
//! - [`ChargebackStatus`] - Review lifecycle state
//!
//! Both enums implement `Display`, `FromStr` and Serde using the snake_case
//! wire names that are also persisted in the store.

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reason a chargeback was opened.
///
/// This is the single accepted vocabulary for both the HTTP layer and the
/// persisted records.
///
/// # Examples
///
/// ```
/// use chargeback_api::domain::value_objects::ChargebackReason;
///
/// let reason: ChargebackReason = "FRAUD".parse().unwrap();
/// assert_eq!(reason, ChargebackReason::Fraud);
/// assert_eq!(reason.to_string(), "fraud");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargebackReason {
    /// Cardholder did not authorize the transaction.
    Fraud,
    /// Transaction was processed without a valid authorization.
    AuthorizationError,
    /// Acquirer or issuer processing mistake.
    ProcessingError,
    /// Cardholder disputes the goods or services.
    ConsumerDispute,
}

impl ChargebackReason {
    /// Comma-separated list of accepted wire values.
    pub const VALID_OPTIONS: &'static str =
        "fraud, authorization_error, processing_error, consumer_dispute";

    /// All reasons, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Fraud,
        Self::AuthorizationError,
        Self::ProcessingError,
        Self::ConsumerDispute,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fraud => "fraud",
            Self::AuthorizationError => "authorization_error",
            Self::ProcessingError => "processing_error",
            Self::ConsumerDispute => "consumer_dispute",
        }
    }
}

impl fmt::Display for ChargebackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargebackReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fraud" => Ok(Self::Fraud),
            "authorization_error" => Ok(Self::AuthorizationError),
            "processing_error" => Ok(Self::ProcessingError),
            "consumer_dispute" => Ok(Self::ConsumerDispute),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "reason",
                value: s.to_string(),
                options: Self::VALID_OPTIONS,
            }),
        }
    }
}

/// Review state of a chargeback.
///
/// # State Machine
///
/// ```text
/// Pending → Approved
///    ↓
///    └────→ Rejected
/// ```
///
/// `Pending` is the only initial state; `Approved` and `Rejected` are terminal.
///
/// # Examples
///
/// ```
/// use chargeback_api::domain::value_objects::ChargebackStatus;
///
/// assert!(ChargebackStatus::Pending.can_transition_to(ChargebackStatus::Approved));
/// assert!(!ChargebackStatus::Approved.can_transition_to(ChargebackStatus::Rejected));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargebackStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Dispute accepted (terminal).
    Approved,
    /// Dispute refused (terminal).
    Rejected,
}

impl ChargebackStatus {
    /// Comma-separated list of accepted wire values.
    pub const VALID_OPTIONS: &'static str = "pending, approved, rejected";

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further transitions are allowed.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns true if the lifecycle allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for ChargebackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargebackStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "status",
                value: s.to_string(),
                options: Self::VALID_OPTIONS,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod reason {
        use super::*;

        #[test]
        fn parses_every_wire_name() {
            for reason in ChargebackReason::ALL {
                assert_eq!(reason.as_str().parse::<ChargebackReason>().unwrap(), reason);
            }
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(
                "Consumer_Dispute".parse::<ChargebackReason>().unwrap(),
                ChargebackReason::ConsumerDispute
            );
        }

        #[test]
        fn invalid_reason_lists_options() {
            let err = "invalid_reason".parse::<ChargebackReason>().unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("invalid_reason"));
            assert!(msg.contains(ChargebackReason::VALID_OPTIONS));
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&ChargebackReason::AuthorizationError).unwrap();
            assert_eq!(json, "\"authorization_error\"");
        }
    }

    mod status {
        use super::*;

        #[test]
        fn default_is_pending() {
            assert_eq!(ChargebackStatus::default(), ChargebackStatus::Pending);
        }

        #[test]
        fn pending_moves_to_terminal_states() {
            assert!(ChargebackStatus::Pending.can_transition_to(ChargebackStatus::Approved));
            assert!(ChargebackStatus::Pending.can_transition_to(ChargebackStatus::Rejected));
            assert!(!ChargebackStatus::Pending.can_transition_to(ChargebackStatus::Pending));
        }

        #[test]
        fn terminal_states_are_final() {
            for from in [ChargebackStatus::Approved, ChargebackStatus::Rejected] {
                assert!(from.is_terminal());
                for to in [
                    ChargebackStatus::Pending,
                    ChargebackStatus::Approved,
                    ChargebackStatus::Rejected,
                ] {
                    assert!(!from.can_transition_to(to));
                }
            }
        }

        #[test]
        fn round_trips_through_text() {
            for status in [
                ChargebackStatus::Pending,
                ChargebackStatus::Approved,
                ChargebackStatus::Rejected,
            ] {
                assert_eq!(status.to_string().parse::<ChargebackStatus>().unwrap(), status);
            }
        }

        #[test]
        fn unknown_status_rejected() {
            assert!("closed".parse::<ChargebackStatus>().is_err());
        }
    }
}
