//! Time-bounded snapshot cache in front of another listing store.
//!
//! `fetch_all` is served from the last snapshot until it is older than the
//! configured TTL. View increments are forwarded and mirrored into the cached
//! copy; a delete drops the cached snapshot entirely.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{ListingStore, ListingStoreError};
use crate::domain::{Listing, ListingId};

struct CachedSnapshot {
    fetched_at: DateTime<Utc>,
    listings: Vec<Listing>,
}

/// Decorator caching `fetch_all` results of `S` for a fixed TTL.
pub struct CachingListingStore<S> {
    inner: S,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    snapshot: Mutex<Option<CachedSnapshot>>,
}

impl<S> CachingListingStore<S> {
    /// Wrap `inner`; a zero TTL disables caching.
    pub fn new(inner: S, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            inner,
            clock,
            ttl,
            snapshot: Mutex::new(None),
        }
    }

    /// Forget the cached snapshot so the next fetch reaches the inner store.
    pub fn invalidate(&self) -> Result<(), ListingStoreError> {
        *self.lock()? = None;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<CachedSnapshot>>, ListingStoreError> {
        self.snapshot
            .lock()
            .map_err(|_| ListingStoreError::query("listing cache lock poisoned"))
    }

    fn fresh(&self) -> Result<Option<Vec<Listing>>, ListingStoreError> {
        let now = self.clock.utc();
        let guard = self.lock()?;
        Ok(guard
            .as_ref()
            .filter(|cached| now - cached.fetched_at < self.ttl)
            .map(|cached| cached.listings.clone()))
    }
}

#[async_trait]
impl<S> ListingStore for CachingListingStore<S>
where
    S: ListingStore,
{
    async fn fetch_all(&self) -> Result<Vec<Listing>, ListingStoreError> {
        if let Some(listings) = self.fresh()? {
            debug!(count = listings.len(), "serving listings from cache");
            return Ok(listings);
        }

        let listings = self.inner.fetch_all().await?;
        *self.lock()? = Some(CachedSnapshot {
            fetched_at: self.clock.utc(),
            listings: listings.clone(),
        });
        Ok(listings)
    }

    async fn increment_view_count(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        self.inner.increment_view_count(id).await?;
        let mut guard = self.lock()?;
        if let Some(listing) = guard
            .as_mut()
            .and_then(|cached| cached.listings.iter_mut().find(|listing| listing.id() == id))
        {
            listing.record_view();
        }
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let result = self.inner.delete(id).await;
        self.invalidate()?;
        result
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::TravelMode;
    use crate::domain::ports::MockListingStore;
    use crate::domain::test_support::{ListingFixture, MutableClock};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2025, 6, 10, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(start))
    }

    fn id(raw: &str) -> ListingId {
        ListingId::new(raw).expect("valid id")
    }

    fn fetching(times: usize) -> MockListingStore {
        let listings = vec![ListingFixture::new("a", TravelMode::Bus).build()];
        let mut inner = MockListingStore::new();
        inner
            .expect_fetch_all()
            .times(times)
            .returning(move || Ok(listings.clone()));
        inner
    }

    fn cached(
        inner: MockListingStore,
        clock: &Arc<MutableClock>,
    ) -> CachingListingStore<MockListingStore> {
        let clock: Arc<dyn Clock> = clock.clone();
        CachingListingStore::new(inner, clock, TimeDelta::seconds(60))
    }

    #[rstest]
    #[tokio::test]
    async fn serves_snapshot_until_ttl_elapses(clock: Arc<MutableClock>) {
        let store = cached(fetching(2), &clock);

        store.fetch_all().await.expect("first fetch");
        clock.advance_seconds(59);
        store.fetch_all().await.expect("cached fetch");
        clock.advance_seconds(1);
        store.fetch_all().await.expect("refetch");
    }

    #[rstest]
    #[tokio::test]
    async fn increments_are_mirrored_into_the_snapshot(clock: Arc<MutableClock>) {
        let mut inner = fetching(1);
        inner
            .expect_increment_view_count()
            .with(eq(id("a")))
            .times(1)
            .returning(|_| Ok(()));
        let store = cached(inner, &clock);

        store.fetch_all().await.expect("first fetch");
        store
            .increment_view_count(&id("a"))
            .await
            .expect("increment");
        let listings = store.fetch_all().await.expect("cached fetch");

        assert_eq!(listings[0].view_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_invalidates_even_when_it_fails(clock: Arc<MutableClock>) {
        let mut inner = fetching(2);
        inner
            .expect_delete()
            .returning(|id| Err(ListingStoreError::not_found(id.as_ref())));
        let store = cached(inner, &clock);

        store.fetch_all().await.expect("first fetch");
        let result = store.delete(&id("a")).await;
        store.fetch_all().await.expect("refetch after delete");

        assert_eq!(result, Err(ListingStoreError::not_found("a")));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_fetch_is_not_cached(clock: Arc<MutableClock>) {
        let mut inner = MockListingStore::new();
        let mut calls = 0;
        inner.expect_fetch_all().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(ListingStoreError::connection("reset"))
            } else {
                Ok(Vec::new())
            }
        });
        let store = cached(inner, &clock);

        assert!(store.fetch_all().await.is_err());
        assert!(store.fetch_all().await.expect("retry").is_empty());
    }
}
