//! # Persistence Layer
//!
//! Chargeback repository port and its implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`ChargebackRepository`]: persistence for chargeback records
//!
//! ## Implementations
//!
//! - `dynamodb`: DynamoDB table with three secondary indexes
//! - `in_memory`: in-memory implementation for testing
//!
//! Both implementations serve `list` through the shared sweep in
//! [`pagination`].

pub mod dynamodb;
pub mod in_memory;
pub mod pagination;
pub mod traits;

pub use traits::{ChargebackRepository, RepositoryError, RepositoryResult};
