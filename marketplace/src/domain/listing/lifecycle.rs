//! Time- and quota-based rules around a listing's life.
//!
//! Search expiry and review eligibility use different cutoffs: a listing
//! leaves search results once its travel day begins, while reviews open a
//! full [`REVIEW_GRACE_HOURS`] after the start of the travel day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use super::{Listing, ListingStatus};
use crate::domain::UserId;

/// How many `active` listings one owner may hold at once.
pub const ACTIVE_LISTING_LIMIT: usize = 2;

/// Hours after the start of the travel day before counterparties may review.
pub const REVIEW_GRACE_HOURS: i64 = 24;

/// Raised when an owner already holds [`ACTIVE_LISTING_LIMIT`] live listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("owner already has {limit} active listings")]
pub struct PublishQuotaExceeded {
    pub limit: usize,
}

/// Whether the travel day is still ahead of `today`.
pub(crate) fn is_upcoming(travel_date: NaiveDate, today: NaiveDate) -> bool {
    travel_date > today
}

/// Status as it should be presented on `today`.
///
/// Stored `active` listings whose travel day has arrived read as `expired`;
/// every other stored status is reported unchanged.
pub fn effective_status(listing: &Listing, today: NaiveDate) -> ListingStatus {
    match listing.status() {
        ListingStatus::Active if !is_upcoming(listing.travel_date(), today) => {
            ListingStatus::Expired
        }
        stored => stored,
    }
}

/// Check the per-owner active listing quota before publishing a new one.
///
/// Only listings that are both stored as `active` and still upcoming count
/// towards the quota.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use marketplace::domain::{UserId, ensure_publish_allowed};
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date");
/// assert!(ensure_publish_allowed(&UserId::random(), &[], today).is_ok());
/// ```
pub fn ensure_publish_allowed(
    owner: &UserId,
    existing: &[Listing],
    today: NaiveDate,
) -> Result<(), PublishQuotaExceeded> {
    let live = existing
        .iter()
        .filter(|listing| listing.owner_id() == owner)
        .filter(|listing| effective_status(listing, today) == ListingStatus::Active)
        .count();
    if live >= ACTIVE_LISTING_LIMIT {
        return Err(PublishQuotaExceeded {
            limit: ACTIVE_LISTING_LIMIT,
        });
    }
    Ok(())
}

/// Instant at which reviews for this trip open.
pub fn review_opens_at(listing: &Listing) -> DateTime<Utc> {
    let travel_day_start = listing.travel_date().and_time(NaiveTime::MIN).and_utc();
    travel_day_start + Duration::hours(REVIEW_GRACE_HOURS)
}

/// Whether counterparties may review the trip at `now`.
pub fn is_review_eligible(listing: &Listing, now: DateTime<Utc>) -> bool {
    now >= review_opens_at(listing)
}
