//! # Sweep Pagination
//!
//! Offset/limit listing emulated over a paged, unordered full-table sweep.
//!
//! The store hands back bounded pages plus a continuation cursor. To serve
//! `(offset, limit)` the sweep keeps fetching pages until `offset + limit`
//! items have been collected or the table is exhausted, then cuts the window.
//!
//! Cost grows linearly with `offset`: every skipped item is still read.
//! Large tables should move to cursor-based pagination instead.

use crate::infrastructure::persistence::traits::RepositoryResult;
use async_trait::async_trait;

/// One page of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPage<T, C> {
    /// Items in store order.
    pub items: Vec<T>,
    /// Cursor for the next page, `None` once the sweep is exhausted.
    pub next: Option<C>,
}

/// A source that can be read in pages.
#[async_trait]
pub trait PagedSweep: Send + Sync {
    /// Item yielded by the sweep.
    type Item: Send;
    /// Continuation cursor.
    type Cursor: Send;

    /// Fetches the page starting after `cursor`, or the first page if `None`.
    ///
    /// `page_size` is an upper bound; sources may return fewer items and
    /// still have more to give.
    async fn fetch_page(
        &self,
        cursor: Option<Self::Cursor>,
        page_size: usize,
    ) -> RepositoryResult<SweepPage<Self::Item, Self::Cursor>>;
}

/// Returns the `[offset, offset + limit)` window of a sweep.
///
/// A `limit` of zero returns an empty list without reading the source.
///
/// # Errors
///
/// Propagates the first error returned by the source.
pub async fn offset_window<S>(
    source: &S,
    offset: usize,
    limit: usize,
) -> RepositoryResult<Vec<S::Item>>
where
    S: PagedSweep + ?Sized,
{
    if limit == 0 {
        return Ok(Vec::new());
    }

    let wanted = offset.saturating_add(limit);
    let mut collected = Vec::new();
    let mut cursor = None;

    loop {
        let page = source.fetch_page(cursor.take(), limit).await?;
        collected.extend(page.items);
        match page.next {
            Some(next) if collected.len() < wanted => cursor = Some(next),
            _ => break,
        }
    }

    if offset >= collected.len() {
        return Ok(Vec::new());
    }
    Ok(collected.into_iter().skip(offset).take(limit).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::traits::RepositoryError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `total` integers, never more than `max_page` per page.
    #[derive(Debug)]
    struct CountingSweep {
        total: usize,
        max_page: usize,
        fetches: AtomicUsize,
    }

    impl CountingSweep {
        fn new(total: usize, max_page: usize) -> Self {
            Self {
                total,
                max_page,
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PagedSweep for CountingSweep {
        type Item = usize;
        type Cursor = usize;

        async fn fetch_page(
            &self,
            cursor: Option<usize>,
            page_size: usize,
        ) -> RepositoryResult<SweepPage<usize, usize>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let start = cursor.map_or(0, |c| c + 1);
            let end = (start + page_size.min(self.max_page)).min(self.total);
            let items: Vec<usize> = (start..end).collect();
            let next = (end < self.total).then(|| end - 1);
            Ok(SweepPage { items, next })
        }
    }

    #[derive(Debug)]
    struct FailingSweep;

    #[async_trait]
    impl PagedSweep for FailingSweep {
        type Item = usize;
        type Cursor = usize;

        async fn fetch_page(
            &self,
            _cursor: Option<usize>,
            _page_size: usize,
        ) -> RepositoryResult<SweepPage<usize, usize>> {
            Err(RepositoryError::store("scan", "boom"))
        }
    }

    #[tokio::test]
    async fn first_page_without_offset() {
        let sweep = CountingSweep::new(20, 100);
        let window = offset_window(&sweep, 0, 5).await.unwrap();
        assert_eq!(window, vec![0, 1, 2, 3, 4]);
        assert_eq!(sweep.fetches(), 1);
    }

    #[tokio::test]
    async fn offset_requires_multiple_pages() {
        let sweep = CountingSweep::new(20, 100);
        let window = offset_window(&sweep, 7, 3).await.unwrap();
        assert_eq!(window, vec![7, 8, 9]);
        // pages of 3: [0..3) [3..6) [6..9) [9..12)
        assert_eq!(sweep.fetches(), 4);
    }

    #[tokio::test]
    async fn short_pages_keep_sweeping() {
        let sweep = CountingSweep::new(20, 2);
        let window = offset_window(&sweep, 0, 5).await.unwrap();
        assert_eq!(window, vec![0, 1, 2, 3, 4]);
        assert_eq!(sweep.fetches(), 3);
    }

    #[tokio::test]
    async fn window_truncated_at_end_of_table() {
        let sweep = CountingSweep::new(8, 100);
        let window = offset_window(&sweep, 6, 5).await.unwrap();
        assert_eq!(window, vec![6, 7]);
    }

    #[tokio::test]
    async fn offset_past_end_is_empty() {
        let sweep = CountingSweep::new(4, 100);
        let window = offset_window(&sweep, 10, 5).await.unwrap();
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_reads_nothing() {
        let sweep = CountingSweep::new(4, 100);
        let window = offset_window(&sweep, 0, 0).await.unwrap();
        assert!(window.is_empty());
        assert_eq!(sweep.fetches(), 0);
    }

    #[tokio::test]
    async fn empty_table() {
        let sweep = CountingSweep::new(0, 100);
        assert!(offset_window(&sweep, 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let err = offset_window(&FailingSweep, 0, 10).await.unwrap_err();
        assert!(err.to_string().contains("scan"));
    }
}
