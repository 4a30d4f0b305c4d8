//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed listing model and the search pipeline
//! that runs over it. Types here are transport agnostic; adapters in
//! `outbound` translate stored rows into these values.
//!
//! Public surface:
//! - Listing (alias to `listing::Listing`): validated seat offer.
//! - SearchFilters (alias to `search::SearchFilters`): one search query.
//! - SearchPipeline (alias to `search::SearchPipeline`): orchestrates a
//!   search invocation against the ports.
//! - OwnerListingService: owner-facing listing management.

pub mod listing;
pub mod owner_listings;
pub mod ports;
pub mod search;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::listing::{
    ACTIVE_LISTING_LIMIT, ContactNumber, Listing, ListingDraft, ListingId, ListingStatus,
    ListingValidationError, ModeDescriptor, PublishQuotaExceeded, REVIEW_GRACE_HOURS, ReportMetadata,
    TravelMode, effective_status, ensure_publish_allowed, is_review_eligible, review_opens_at,
};
pub use self::owner_listings::{OwnerListingError, OwnerListingService};
pub use self::search::{
    CategorizedListings, ModeFilter, PipelineState, PipelineView, PruneOutcome, SearchError,
    SearchFilters, SearchFiltersValidationError, SearchOutcome, SearchPipeline, ViewCountReport,
    accumulate_views, categorize, matches, prune_expired,
};
pub use self::user::{UserId, UserIdValidationError};
