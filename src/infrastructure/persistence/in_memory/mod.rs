//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! - [`InMemoryChargebackRepository`]: chargeback persistence
//!
//! ## Thread Safety
//!
//! Storage sits behind `Arc<RwLock<..>>`; clones share the same records.

pub mod chargeback_repository;

pub use chargeback_repository::InMemoryChargebackRepository;
