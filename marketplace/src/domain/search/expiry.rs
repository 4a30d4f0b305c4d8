//! Remove listings whose travel day has arrived.

use chrono::NaiveDate;

use crate::domain::Listing;
use crate::domain::listing::is_upcoming;

/// Listings kept after pruning and how many were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub kept: Vec<Listing>,
    pub pruned: usize,
}

/// Keep only listings whose travel date is strictly after `today`.
///
/// Granularity is the whole day: departure time is ignored, and so is the
/// stored status, so an `active` listing dated today is still dropped.
/// Relative order of the kept listings is preserved.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use marketplace::domain::prune_expired;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date");
/// let outcome = prune_expired(Vec::new(), today);
/// assert!(outcome.kept.is_empty());
/// assert_eq!(outcome.pruned, 0);
/// ```
pub fn prune_expired(listings: Vec<Listing>, today: NaiveDate) -> PruneOutcome {
    let total = listings.len();
    let kept: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| is_upcoming(listing.travel_date(), today))
        .collect();
    PruneOutcome {
        pruned: total - kept.len(),
        kept,
    }
}
