//! Port for the hosted listing store.
//!
//! The [`ListingStore`] trait is the only way the search core reaches
//! persisted listings. Adapters own transport (REST calls, local snapshots);
//! the core never assumes exclusive access to the backing store.

use async_trait::async_trait;

use crate::domain::{Listing, ListingId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing store adapters.
    pub enum ListingStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "listing store connection failed: {message}",
        /// The store rejected or failed to execute the request.
        Query { message: String } =>
            "listing store query failed: {message}",
        /// The store's response could not be decoded.
        Decode { message: String } =>
            "listing store returned an undecodable response: {message}",
        /// No listing exists with the requested id.
        NotFound { id: String } =>
            "listing {id} not found",
    }
}

/// Port for reading listings and recording per-listing bookkeeping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Fetch every listing currently stored, in store order.
    async fn fetch_all(&self) -> Result<Vec<Listing>, ListingStoreError>;

    /// Persist one additional view for the listing.
    ///
    /// Callers treat this as best-effort telemetry: a failed increment is
    /// logged and dropped, never retried.
    async fn increment_view_count(&self, id: &ListingId) -> Result<(), ListingStoreError>;

    /// Remove a listing. Used by the owner management flow only.
    async fn delete(&self, id: &ListingId) -> Result<(), ListingStoreError>;
}

/// Fixture implementation holding no listings and accepting every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureListingStore;

#[async_trait]
impl ListingStore for FixtureListingStore {
    async fn fetch_all(&self) -> Result<Vec<Listing>, ListingStoreError> {
        Ok(Vec::new())
    }

    async fn increment_view_count(&self, _id: &ListingId) -> Result<(), ListingStoreError> {
        Ok(())
    }

    async fn delete(&self, _id: &ListingId) -> Result<(), ListingStoreError> {
        Ok(())
    }
}
