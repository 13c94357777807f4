//! # Infrastructure Layer
//!
//! Adapters to external systems.

pub mod persistence;
