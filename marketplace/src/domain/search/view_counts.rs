//! Best-effort view-count bookkeeping for listings shown to a viewer.

use std::collections::HashSet;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::ports::{ListingStore, ListingStoreError};
use crate::domain::{Listing, ListingId, UserId};

/// Summary of one accumulation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCountReport {
    /// Distinct listings an increment was sent for.
    pub attempted: usize,
    /// Increments the store acknowledged.
    pub persisted: usize,
    /// Distinct listings skipped because the viewer owns them.
    pub skipped_own: usize,
    /// Increments the store rejected; logged and dropped.
    pub failed: Vec<(ListingId, ListingStoreError)>,
}

/// Send one view increment per distinct listing the viewer does not own.
///
/// Writes run concurrently and independently. A failed write is logged and
/// lost; it never fails the pass. Local copies are bumped only for writes the
/// store acknowledged, so `listings` mirrors what was persisted.
pub async fn accumulate_views<S>(
    store: &S,
    listings: &mut [Listing],
    viewer: Option<&UserId>,
) -> ViewCountReport
where
    S: ListingStore + ?Sized,
{
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    let mut skipped_own = 0;
    for listing in listings.iter() {
        if !seen.insert(listing.id().clone()) {
            continue;
        }
        if listing.is_owned_by(viewer) {
            skipped_own += 1;
        } else {
            targets.push(listing.id().clone());
        }
    }

    let results = join_all(targets.iter().map(|id| async move {
        (id, store.increment_view_count(id).await)
    }))
    .await;

    let mut persisted_ids = HashSet::new();
    let mut failed = Vec::new();
    for (id, result) in results {
        match result {
            Ok(()) => {
                persisted_ids.insert(id.clone());
            }
            Err(error) => {
                warn!(listing_id = %id, error = %error, "view count increment failed");
                failed.push((id.clone(), error));
            }
        }
    }

    for listing in listings.iter_mut() {
        if persisted_ids.contains(listing.id()) {
            listing.record_view();
        }
    }

    debug!(
        attempted = targets.len(),
        persisted = persisted_ids.len(),
        skipped_own,
        "view counts accumulated"
    );

    ViewCountReport {
        attempted: targets.len(),
        persisted: persisted_ids.len(),
        skipped_own,
        failed,
    }
}
