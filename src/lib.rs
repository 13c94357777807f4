//! # Chargeback API
//!
//! REST service that opens and stores chargeback dispute records in
//! Amazon DynamoDB.
//!
//! # Architecture
//!
//! ```text
//! api::rest ──▶ application::use_cases ──▶ ChargebackRepository
//!                                            ├── dynamodb   (production)
//!                                            └── in_memory  (tests)
//! ```
//!
//! - [`domain`]: chargeback entity, value objects, domain errors
//! - [`application`]: creation workflow, public views, error taxonomy
//! - [`infrastructure`]: repository port, DynamoDB and in-memory adapters
//! - [`api`]: axum router and handlers
//! - [`config`]: environment-driven configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
