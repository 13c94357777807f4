//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`ChargebackId`]: record identifier and its generator
//! - [`CardNumber`]: masked card number
//! - [`ChargebackReason`], [`ChargebackStatus`]: enumerations
//! - [`Timestamp`]: nanosecond UTC timestamp

pub mod card_number;
pub mod enums;
pub mod ids;
pub mod timestamp;

pub use card_number::CardNumber;
pub use enums::{ChargebackReason, ChargebackStatus};
pub use ids::ChargebackId;
pub use timestamp::Timestamp;
