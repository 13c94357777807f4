//! # Domain Layer
//!
//! The chargeback record model: entity, value objects and business errors.
//! Nothing in here knows about HTTP or DynamoDB.

pub mod entities;
pub mod errors;
pub mod value_objects;
