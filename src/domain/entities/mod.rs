//! # Domain Entities
//!
//! - [`Chargeback`]: the dispute record aggregate

pub mod chargeback;

pub use chargeback::{Chargeback, ChargebackBuilder, ChargebackParts};
