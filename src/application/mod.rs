//! # Application Layer
//!
//! Workflows that sit between the REST API and the repository port.
//!
//! - [`use_cases`]: chargeback workflows
//! - [`dto`]: public record views
//! - [`error`]: application error taxonomy

pub mod dto;
pub mod error;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
