//! # Identifiers
//!
//! String identifier for chargeback records and its generator.
//!
//! Generated identifiers are `cb_` followed by the Unix time in nanoseconds.
//! Within one process the generator never issues the same value twice and
//! values grow with creation order.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Prefix of every generated chargeback identifier.
pub const CHARGEBACK_ID_PREFIX: &str = "cb_";

static LAST_ISSUED_NANOS: AtomicI64 = AtomicI64::new(0);

/// Unique identifier of a chargeback record.
///
/// An empty identifier means "not yet assigned"; the repository assigns one
/// on save.
///
/// # Examples
///
/// ```
/// use chargeback_api::domain::value_objects::ChargebackId;
///
/// let id = ChargebackId::generate();
/// assert!(id.as_str().starts_with("cb_"));
/// assert!(ChargebackId::unassigned().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargebackId(String);

impl ChargebackId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the placeholder for a record that has not been saved yet.
    #[must_use]
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Generates a fresh identifier.
    ///
    /// Strictly increasing within the process, even when the wall clock
    /// does not advance between calls.
    #[must_use]
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut last = LAST_ISSUED_NANOS.load(Ordering::Relaxed);
        loop {
            let next = now.max(last.saturating_add(1));
            match LAST_ISSUED_NANOS.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(format!("{CHARGEBACK_ID_PREFIX}{next}")),
                Err(observed) => last = observed,
            }
        }
    }

    /// Returns true if no identifier has been assigned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargebackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChargebackId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChargebackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn numeric_part(id: &ChargebackId) -> i64 {
        id.as_str()
            .strip_prefix(CHARGEBACK_ID_PREFIX)
            .unwrap()
            .parse()
            .unwrap()
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = ChargebackId::generate();
        assert!(id.as_str().starts_with(CHARGEBACK_ID_PREFIX));
        assert!(!id.is_empty());
    }

    #[test]
    fn generated_ids_strictly_increase() {
        let ids: Vec<ChargebackId> = (0..1_000).map(|_| ChargebackId::generate()).collect();
        for pair in ids.windows(2) {
            assert!(numeric_part(&pair[0]) < numeric_part(&pair[1]));
        }
    }

    #[test]
    fn generated_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..500)
                        .map(|_| ChargebackId::generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 2_000);
    }

    #[test]
    fn unassigned_is_empty() {
        assert!(ChargebackId::unassigned().is_empty());
        assert_eq!(ChargebackId::default(), ChargebackId::unassigned());
    }

    #[test]
    fn serde_is_transparent() {
        let id = ChargebackId::new("cb_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cb_42\"");
    }

    proptest! {
        #[test]
        fn display_matches_input(raw in "[a-z0-9_]{1,32}") {
            let id = ChargebackId::new(raw.clone());
            prop_assert_eq!(id.to_string(), raw);
        }
    }
}
