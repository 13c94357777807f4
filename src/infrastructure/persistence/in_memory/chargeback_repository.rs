//! # In-Memory Chargeback Repository
//!
//! In-memory implementation of [`ChargebackRepository`] for testing.
//!
//! Existence guards are evaluated under the write lock, so concurrent
//! writers see the same conditional-write behaviour as against the real
//! store. Full-table sweeps are served in pages capped at
//! [`InMemoryChargebackRepository::with_max_page_size`] items to exercise
//! multi-page listing.

use crate::domain::entities::Chargeback;
use crate::domain::value_objects::{ChargebackId, ChargebackStatus};
use crate::infrastructure::persistence::pagination::{offset_window, PagedSweep, SweepPage};
use crate::infrastructure::persistence::traits::{
    ChargebackRepository, RepositoryError, RepositoryResult, CHARGEBACK_ENTITY,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ChargebackRepository`].
///
/// Records are kept in identifier order; sweeps walk that order.
#[derive(Debug, Clone)]
pub struct InMemoryChargebackRepository {
    storage: Arc<RwLock<BTreeMap<ChargebackId, Chargeback>>>,
    max_page_size: usize,
}

impl InMemoryChargebackRepository {
    /// Creates a new empty in-memory chargeback repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            max_page_size: usize::MAX,
        }
    }

    /// Caps how many records a single sweep page may carry.
    #[must_use]
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    /// Returns the number of chargebacks in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all chargebacks from the repository.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Chargeback>
    where
        F: Fn(&Chargeback) -> bool,
    {
        let storage = self.storage.read().await;
        storage.values().filter(|c| predicate(c)).cloned().collect()
    }
}

impl Default for InMemoryChargebackRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PagedSweep for InMemoryChargebackRepository {
    type Item = Chargeback;
    type Cursor = ChargebackId;

    async fn fetch_page(
        &self,
        cursor: Option<ChargebackId>,
        page_size: usize,
    ) -> RepositoryResult<SweepPage<Chargeback, ChargebackId>> {
        let storage = self.storage.read().await;
        let lower = cursor.map_or(Bound::Unbounded, Bound::Excluded);
        let items: Vec<Chargeback> = storage
            .range((lower, Bound::Unbounded))
            .take(page_size.min(self.max_page_size))
            .map(|(_, c)| c.clone())
            .collect();

        let next = items.last().and_then(|last| {
            storage
                .range((Bound::Excluded(last.id().clone()), Bound::Unbounded))
                .next()
                .map(|_| last.id().clone())
        });
        Ok(SweepPage { items, next })
    }
}

#[async_trait]
impl ChargebackRepository for InMemoryChargebackRepository {
    async fn save(&self, chargeback: &mut Chargeback) -> RepositoryResult<()> {
        if chargeback.id().is_empty() {
            chargeback
                .assign_id(ChargebackId::generate())
                .map_err(|e| RepositoryError::internal(e.to_string()))?;
        }

        let mut storage = self.storage.write().await;
        if storage.contains_key(chargeback.id()) {
            return Err(RepositoryError::duplicate(
                CHARGEBACK_ENTITY,
                chargeback.id().as_str(),
            ));
        }
        storage.insert(chargeback.id().clone(), chargeback.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChargebackId) -> RepositoryResult<Option<Chargeback>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Chargeback>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .find(|c| c.transaction_id() == transaction_id)
            .cloned())
    }

    async fn find_by_merchant_id(&self, merchant_id: &str) -> RepositoryResult<Vec<Chargeback>> {
        Ok(self.filtered(|c| c.merchant_id() == merchant_id).await)
    }

    async fn find_by_status(&self, status: ChargebackStatus) -> RepositoryResult<Vec<Chargeback>> {
        Ok(self.filtered(|c| c.status() == status).await)
    }

    async fn update(&self, chargeback: &mut Chargeback) -> RepositoryResult<()> {
        chargeback.touch();

        let mut storage = self.storage.write().await;
        match storage.get_mut(chargeback.id()) {
            Some(existing) => {
                *existing = chargeback.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(
                CHARGEBACK_ENTITY,
                chargeback.id().as_str(),
            )),
        }
    }

    async fn delete(&self, id: &ChargebackId) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(CHARGEBACK_ENTITY, id.as_str()))
    }

    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Chargeback>> {
        offset_window(self, offset, limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::ChargebackBuilder;
    use crate::domain::value_objects::{CardNumber, ChargebackReason, Timestamp};
    use rust_decimal::Decimal;

    fn create_test_chargeback(transaction_id: &str, merchant_id: &str) -> Chargeback {
        ChargebackBuilder::new(
            transaction_id,
            merchant_id,
            Decimal::new(9999, 2),
            "USD",
            CardNumber::mask("4111111111111234").unwrap(),
            ChargebackReason::Fraud,
            Timestamp::parse_rfc3339("2023-01-15T10:30:00Z").unwrap(),
        )
        .description("Test chargeback")
        .build()
        .unwrap()
    }

    async fn seeded(repo: &InMemoryChargebackRepository, count: usize) -> Vec<ChargebackId> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let mut cb = create_test_chargeback(&format!("txn-{i}"), "merchant-1");
            repo.save(&mut cb).await.unwrap();
            ids.push(cb.id().clone());
        }
        ids
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryChargebackRepository::new();
        assert!(repo.is_empty());
        assert!(repo.list(0, 10).await.unwrap().is_empty());
    }

    #[test]
    fn len_tracks_saved_records() {
        let repo = InMemoryChargebackRepository::new();
        tokio_test::block_on(seeded(&repo, 3));
        assert_eq!(repo.len(), 3);
        assert!(!repo.is_empty());
    }

    mod save {
        use super::*;

        #[tokio::test]
        async fn generates_id_when_missing() {
            let repo = InMemoryChargebackRepository::new();
            let mut cb = create_test_chargeback("txn-1", "merchant-1");
            assert!(cb.id().is_empty());

            repo.save(&mut cb).await.unwrap();

            assert!(cb.id().as_str().starts_with("cb_"));
            assert_eq!(repo.len(), 1);
        }

        #[tokio::test]
        async fn keeps_existing_id() {
            let repo = InMemoryChargebackRepository::new();
            let mut cb = create_test_chargeback("txn-1", "merchant-1");
            cb.assign_id(ChargebackId::new("chargeback-123")).unwrap();

            repo.save(&mut cb).await.unwrap();

            assert_eq!(cb.id().as_str(), "chargeback-123");
        }

        #[tokio::test]
        async fn same_id_twice_is_duplicate() {
            let repo = InMemoryChargebackRepository::new();
            let mut first = create_test_chargeback("txn-1", "merchant-1");
            repo.save(&mut first).await.unwrap();

            let mut second = first.clone();
            let err = repo.save(&mut second).await.unwrap_err();

            assert!(err.is_duplicate());
            assert_eq!(repo.len(), 1);
        }
    }

    mod find {
        use super::*;

        #[tokio::test]
        async fn by_id_round_trips() {
            let repo = InMemoryChargebackRepository::new();
            let mut cb = create_test_chargeback("txn-1", "merchant-1");
            repo.save(&mut cb).await.unwrap();

            let found = repo.find_by_id(cb.id()).await.unwrap();
            assert_eq!(found, Some(cb));
        }

        #[tokio::test]
        async fn unknown_id_is_none() {
            let repo = InMemoryChargebackRepository::new();
            let found = repo.find_by_id(&ChargebackId::new("cb_missing")).await;
            assert!(found.unwrap().is_none());
        }

        #[tokio::test]
        async fn by_transaction_id() {
            let repo = InMemoryChargebackRepository::new();
            seeded(&repo, 3).await;

            let found = repo.find_by_transaction_id("txn-2").await.unwrap().unwrap();
            assert_eq!(found.transaction_id(), "txn-2");
            assert!(repo.find_by_transaction_id("txn-9").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn by_merchant_id() {
            let repo = InMemoryChargebackRepository::new();
            seeded(&repo, 2).await;
            let mut other = create_test_chargeback("txn-x", "merchant-2");
            repo.save(&mut other).await.unwrap();

            assert_eq!(repo.find_by_merchant_id("merchant-1").await.unwrap().len(), 2);
            assert_eq!(repo.find_by_merchant_id("merchant-2").await.unwrap().len(), 1);
            assert!(repo.find_by_merchant_id("nobody").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn by_status() {
            let repo = InMemoryChargebackRepository::new();
            let ids = seeded(&repo, 3).await;
            let mut approved = repo.find_by_id(&ids[0]).await.unwrap().unwrap();
            approved.approve().unwrap();
            repo.update(&mut approved).await.unwrap();

            let pending = repo.find_by_status(ChargebackStatus::Pending).await.unwrap();
            let approved = repo.find_by_status(ChargebackStatus::Approved).await.unwrap();
            assert_eq!(pending.len(), 2);
            assert_eq!(approved.len(), 1);
            assert!(repo
                .find_by_status(ChargebackStatus::Rejected)
                .await
                .unwrap()
                .is_empty());
        }
    }

    mod update {
        use super::*;

        #[tokio::test]
        async fn missing_record_fails() {
            let repo = InMemoryChargebackRepository::new();
            let mut cb = create_test_chargeback("txn-1", "merchant-1");
            cb.assign_id(ChargebackId::new("cb_never_saved")).unwrap();

            let err = repo.update(&mut cb).await.unwrap_err();
            assert!(err.is_not_found());
            assert!(repo.is_empty());
        }

        #[tokio::test]
        async fn advances_updated_at() {
            let repo = InMemoryChargebackRepository::new();
            let mut cb = create_test_chargeback("txn-1", "merchant-1");
            repo.save(&mut cb).await.unwrap();
            let before = cb.updated_at();

            repo.update(&mut cb).await.unwrap();

            let stored = repo.find_by_id(cb.id()).await.unwrap().unwrap();
            assert!(stored.updated_at().is_after(&before));
            assert_eq!(stored.created_at(), cb.created_at());
        }
    }

    mod delete {
        use super::*;

        #[tokio::test]
        async fn missing_record_fails() {
            let repo = InMemoryChargebackRepository::new();
            let err = repo.delete(&ChargebackId::new("cb_nope")).await.unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn removes_record() {
            let repo = InMemoryChargebackRepository::new();
            let ids = seeded(&repo, 1).await;

            repo.delete(&ids[0]).await.unwrap();

            assert!(repo.find_by_id(&ids[0]).await.unwrap().is_none());
            assert!(repo.delete(&ids[0]).await.unwrap_err().is_not_found());
        }
    }

    mod list {
        use super::*;

        #[tokio::test]
        async fn offset_past_end_is_empty() {
            let repo = InMemoryChargebackRepository::new();
            seeded(&repo, 3).await;
            assert!(repo.list(10, 5).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn windows_across_small_pages() {
            let repo = InMemoryChargebackRepository::new().with_max_page_size(2);
            let ids = seeded(&repo, 7).await;

            let window = repo.list(3, 3).await.unwrap();
            let window_ids: Vec<&ChargebackId> = window.iter().map(Chargeback::id).collect();
            assert_eq!(window_ids, vec![&ids[3], &ids[4], &ids[5]]);
        }

        #[tokio::test]
        async fn last_window_is_partial() {
            let repo = InMemoryChargebackRepository::new().with_max_page_size(2);
            seeded(&repo, 5).await;
            assert_eq!(repo.list(4, 10).await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn clear_empties_listing() {
            let repo = InMemoryChargebackRepository::new();
            seeded(&repo, 2).await;
            repo.clear().await;
            assert!(repo.list(0, 10).await.unwrap().is_empty());
        }
    }
}
