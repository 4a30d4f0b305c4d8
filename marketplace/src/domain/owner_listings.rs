//! Owner-facing listing management: "my listings", deletion and the publish
//! quota check.
//!
//! Every operation requires a signed-in viewer. Ownership is checked against
//! a fresh store snapshot before any write, since the store is shared with
//! other clients.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{IdentityProvider, ListingStore, ListingStoreError};
use crate::domain::{Listing, ListingId, PublishQuotaExceeded, UserId, ensure_publish_allowed};

/// Errors raised by [`OwnerListingService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnerListingError {
    #[error("sign in to manage listings")]
    NotSignedIn,
    #[error("listing {id} not found")]
    NotFound { id: ListingId },
    #[error("listing {id} belongs to another user")]
    NotOwner { id: ListingId },
    #[error(transparent)]
    QuotaExceeded(#[from] PublishQuotaExceeded),
    #[error(transparent)]
    Store(#[from] ListingStoreError),
}

/// Domain service for the owner management flow.
pub struct OwnerListingService<S: ?Sized, I: ?Sized> {
    store: Arc<S>,
    identity: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, I: ?Sized> OwnerListingService<S, I> {
    /// Create a new owner listing service.
    pub fn new(store: Arc<S>, identity: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            identity,
            clock,
        }
    }
}

impl<S, I> OwnerListingService<S, I>
where
    S: ListingStore + ?Sized,
    I: IdentityProvider + ?Sized,
{
    fn signed_in(&self) -> Result<UserId, OwnerListingError> {
        self.identity
            .current_user_id()
            .ok_or(OwnerListingError::NotSignedIn)
    }

    /// Listings owned by the current user, newest first.
    ///
    /// Expired listings are included; callers present them through
    /// [`crate::domain::effective_status`].
    pub async fn my_listings(&self) -> Result<Vec<Listing>, OwnerListingError> {
        let owner = self.signed_in()?;
        let mut owned: Vec<Listing> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .filter(|listing| listing.owner_id() == &owner)
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    /// Delete one of the current user's listings.
    pub async fn delete_listing(&self, id: &ListingId) -> Result<(), OwnerListingError> {
        let owner = self.signed_in()?;
        let snapshot = self.store.fetch_all().await?;
        let listing = snapshot
            .iter()
            .find(|listing| listing.id() == id)
            .ok_or_else(|| OwnerListingError::NotFound { id: id.clone() })?;
        if !listing.is_owned_by(Some(&owner)) {
            return Err(OwnerListingError::NotOwner { id: id.clone() });
        }

        match self.store.delete(id).await {
            Ok(()) => {}
            Err(ListingStoreError::NotFound { .. }) => {
                return Err(OwnerListingError::NotFound { id: id.clone() });
            }
            Err(error) => return Err(error.into()),
        }
        info!(listing_id = %id, owner_id = %owner, "listing deleted");
        Ok(())
    }

    /// Check whether the current user may publish another listing today.
    pub async fn check_publish_quota(&self) -> Result<(), OwnerListingError> {
        let owner = self.signed_in()?;
        let snapshot = self.store.fetch_all().await?;
        let today = self.clock.utc().date_naive();
        ensure_publish_allowed(&owner, &snapshot, today)?;
        Ok(())
    }
}
