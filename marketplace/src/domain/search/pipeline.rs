//! Search pipeline orchestration.
//!
//! One invocation walks `idle → fetching → filtering → updating-counts →
//! ready`, or stops in `error` when the store fetch fails. Every invocation
//! takes a sequence number up front; only the invocation holding the latest
//! number may publish, so a slow older search can never overwrite the results
//! of a newer one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{IdentityProvider, ListingStore};

use super::{
    CategorizedListings, SearchError, SearchFilters, ViewCountReport, accumulate_views,
    categorize, matches, prune_expired,
};

/// Where the latest invocation currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    #[default]
    Idle,
    Fetching,
    Filtering,
    UpdatingCounts,
    Ready,
    Error,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Filtering => "filtering",
            Self::UpdatingCounts => "updating-counts",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot handed to the presentation layer.
///
/// `results` always holds the last successfully published result set; a
/// failed fetch sets `state` and `error` but leaves `results` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineView {
    pub state: PipelineState,
    pub results: CategorizedListings,
    pub error: Option<String>,
    pub sequence: u64,
}

/// Result of one [`SearchPipeline::search`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// This invocation published its results.
    Ready {
        results: CategorizedListings,
        pruned: usize,
        views: ViewCountReport,
    },
    /// A newer invocation started before this one finished; nothing was
    /// published.
    Superseded { sequence: u64, latest: u64 },
}

/// Orchestrates fetch, expiry, filtering, view counting and categorisation.
pub struct SearchPipeline<S: ?Sized, I: ?Sized> {
    store: Arc<S>,
    identity: Arc<I>,
    clock: Arc<dyn Clock>,
    latest: AtomicU64,
    view: Mutex<PipelineView>,
}

impl<S: ?Sized, I: ?Sized> SearchPipeline<S, I> {
    /// Create an idle pipeline.
    pub fn new(store: Arc<S>, identity: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            identity,
            clock,
            latest: AtomicU64::new(0),
            view: Mutex::new(PipelineView::default()),
        }
    }

    /// Current published view.
    pub fn view(&self) -> PipelineView {
        self.lock_view().clone()
    }

    /// Sequence number of the most recently started invocation.
    pub fn latest_sequence(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    // Poison is ignored: every write to the view leaves it consistent.
    fn lock_view(&self) -> MutexGuard<'_, PipelineView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the view to `state` on behalf of `sequence`.
    ///
    /// Returns `false`, leaving the view untouched, once a newer invocation
    /// has started.
    fn transition(&self, sequence: u64, state: PipelineState) -> bool {
        let mut view = self.lock_view();
        if self.latest_sequence() != sequence {
            return false;
        }
        view.state = state;
        view.sequence = sequence;
        if state != PipelineState::Error {
            view.error = None;
        }
        debug!(sequence, state = %state, "search pipeline transition");
        true
    }

    fn superseded(&self, sequence: u64) -> SearchOutcome {
        let latest = self.latest_sequence();
        debug!(sequence, latest, "search invocation superseded");
        SearchOutcome::Superseded { sequence, latest }
    }
}

impl<S, I> SearchPipeline<S, I>
where
    S: ListingStore + ?Sized,
    I: IdentityProvider + ?Sized,
{
    /// Run one search invocation.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Validation`] when the filters are rejected; the store
    ///   is never called and the view is unchanged.
    /// - [`SearchError::StoreFetch`] when the listing fetch fails; the view
    ///   moves to [`PipelineState::Error`] and keeps its previous results.
    pub async fn search(&self, filters: SearchFilters) -> Result<SearchOutcome, SearchError> {
        filters.validate()?;

        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.transition(sequence, PipelineState::Fetching) {
            return Ok(self.superseded(sequence));
        }

        let snapshot = match self.store.fetch_all().await {
            Ok(listings) => listings,
            Err(error) => return self.fail(sequence, error.to_string()),
        };

        if !self.transition(sequence, PipelineState::Filtering) {
            return Ok(self.superseded(sequence));
        }
        let today = self.clock.utc().date_naive();
        let pruned = prune_expired(snapshot, today);
        let mut narrowed: Vec<_> = pruned
            .kept
            .into_iter()
            .filter(|listing| matches(listing, &filters))
            .collect();

        if !self.transition(sequence, PipelineState::UpdatingCounts) {
            return Ok(self.superseded(sequence));
        }
        let viewer = self.identity.current_user_id();
        let views = accumulate_views(self.store.as_ref(), &mut narrowed, viewer.as_ref()).await;

        let results = categorize(narrowed);
        {
            let mut view = self.lock_view();
            if self.latest_sequence() != sequence {
                drop(view);
                return Ok(self.superseded(sequence));
            }
            view.state = PipelineState::Ready;
            view.results = results.clone();
            view.error = None;
            view.sequence = sequence;
        }
        debug!(
            sequence,
            today = %today,
            pruned = pruned.pruned,
            matched = results.len(),
            "search pipeline ready"
        );

        Ok(SearchOutcome::Ready {
            results,
            pruned: pruned.pruned,
            views,
        })
    }

    /// Exchange origin and destination, then search.
    ///
    /// The swap happens on a copy in one step, so no intermediate filter with
    /// both cities equal is ever validated. Returns the swapped filters so the
    /// caller can display them.
    ///
    /// # Errors
    ///
    /// Same as [`SearchPipeline::search`].
    pub async fn swap_and_search(
        &self,
        filters: &SearchFilters,
    ) -> Result<(SearchFilters, SearchOutcome), SearchError> {
        let swapped = filters.swapped();
        let outcome = self.search(swapped.clone()).await?;
        Ok((swapped, outcome))
    }

    fn fail(&self, sequence: u64, message: String) -> Result<SearchOutcome, SearchError> {
        let mut view = self.lock_view();
        if self.latest_sequence() != sequence {
            drop(view);
            return Ok(self.superseded(sequence));
        }
        view.state = PipelineState::Error;
        view.error = Some(message.clone());
        view.sequence = sequence;
        drop(view);
        warn!(sequence, error = %message, "listing fetch failed");
        Err(SearchError::store_fetch(message))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
