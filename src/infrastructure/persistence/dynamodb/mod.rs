//! # DynamoDB Persistence
//!
//! Production implementation of the chargeback repository.
//!
//! - [`schema`]: attribute and index names, table provisioning
//! - [`item`]: record to item conversion
//! - [`client`]: SDK client construction
//! - [`repository`]: [`DynamoDbChargebackRepository`]

pub mod client;
pub mod item;
pub mod repository;
pub mod schema;

pub use client::{build_client, verify_table};
pub use repository::DynamoDbChargebackRepository;
pub use schema::create_table;
