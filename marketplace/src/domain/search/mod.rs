//! Listing search: filters, expiry, view counting and tabbed results.
//!
//! The pipeline is split into small pure steps ([`prune_expired`],
//! [`matches`], [`categorize`]) plus one effectful step
//! ([`accumulate_views`]); [`SearchPipeline`] composes them against the
//! ports.

use thiserror::Error;

mod categorize;
mod expiry;
mod filters;
mod pipeline;
mod predicate;
mod view_counts;

pub use categorize::{CategorizedListings, categorize};
pub use expiry::{PruneOutcome, prune_expired};
pub use filters::{ALL_MODES_LITERAL, ModeFilter, SearchFilters, SearchFiltersValidationError};
pub use pipeline::{PipelineState, PipelineView, SearchOutcome, SearchPipeline};
pub use predicate::matches;
pub use view_counts::{ViewCountReport, accumulate_views};

/// Failures surfaced by [`SearchPipeline::search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The filters were rejected; fix the input and search again.
    #[error(transparent)]
    Validation(#[from] SearchFiltersValidationError),
    /// The listing fetch failed; the same filters may be resubmitted.
    #[error("could not load listings: {message}")]
    StoreFetch { message: String },
}

impl SearchError {
    pub fn store_fetch(message: impl Into<String>) -> Self {
        Self::StoreFetch {
            message: message.into(),
        }
    }

    /// Whether resubmitting the same filters may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreFetch { .. })
    }
}
