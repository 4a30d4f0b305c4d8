//! Process-local listing store.
//!
//! Backs the CLI's snapshot mode and the behaviour suite. Increments and
//! deletes are applied to the held snapshot, so repeated searches observe
//! them just as they would against the hosted store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ListingStore, ListingStoreError};
use crate::domain::{Listing, ListingId};

/// Listing store holding its snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    listings: Mutex<Vec<Listing>>,
}

impl InMemoryListingStore {
    /// Seed the store with `listings`, kept in the given order.
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Mutex::new(listings),
        }
    }

    /// Copy of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ListingStoreError::Query`] if the snapshot lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<Listing>, ListingStoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Listing>>, ListingStoreError> {
        self.listings
            .lock()
            .map_err(|_| ListingStoreError::query("in-memory listing store lock poisoned"))
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn fetch_all(&self) -> Result<Vec<Listing>, ListingStoreError> {
        self.snapshot()
    }

    async fn increment_view_count(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let mut listings = self.lock()?;
        let listing = listings
            .iter_mut()
            .find(|listing| listing.id() == id)
            .ok_or_else(|| ListingStoreError::not_found(id.as_ref()))?;
        listing.record_view();
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let mut listings = self.lock()?;
        let before = listings.len();
        listings.retain(|listing| listing.id() != id);
        if listings.len() == before {
            return Err(ListingStoreError::not_found(id.as_ref()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravelMode;
    use crate::domain::test_support::ListingFixture;

    fn id(raw: &str) -> ListingId {
        ListingId::new(raw).expect("valid id")
    }

    fn store() -> InMemoryListingStore {
        InMemoryListingStore::new(vec![
            ListingFixture::new("a", TravelMode::Rail).views(3).build(),
            ListingFixture::new("b", TravelMode::Bus).build(),
        ])
    }

    #[tokio::test]
    async fn increments_persist_across_fetches() {
        let store = store();
        store
            .increment_view_count(&id("a"))
            .await
            .expect("increment succeeds");

        let listings = store.fetch_all().await.expect("fetch succeeds");
        assert_eq!(listings[0].view_count(), 4);
        assert_eq!(listings[1].view_count(), 0);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let store = store();
        store.delete(&id("a")).await.expect("delete succeeds");

        let listings = store.fetch_all().await.expect("fetch succeeds");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id(), &id("b"));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = store();

        assert_eq!(
            store.increment_view_count(&id("zz")).await,
            Err(ListingStoreError::not_found("zz"))
        );
        assert_eq!(
            store.delete(&id("zz")).await,
            Err(ListingStoreError::not_found("zz"))
        );
    }
}
