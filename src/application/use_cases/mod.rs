//! # Use Cases
//!
//! Application workflows over the chargeback repository.

pub mod create_chargeback;

pub use create_chargeback::{CreateChargebackRequest, CreateChargebackUseCase};
