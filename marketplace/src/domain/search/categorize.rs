//! Partition a result set into per-mode tabs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Listing, TravelMode};

use super::ModeFilter;

/// Result set grouped for tabbed display.
///
/// `by_mode` always carries an entry for every [`TravelMode`], empty or not,
/// and each listing of `all` appears in exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedListings {
    all: Vec<Listing>,
    by_mode: BTreeMap<TravelMode, Vec<Listing>>,
}

impl CategorizedListings {
    pub fn all(&self) -> &[Listing] {
        &self.all
    }

    /// Listings of one mode, in result order.
    pub fn mode(&self, mode: TravelMode) -> &[Listing] {
        self.by_mode.get(&mode).map(Vec::as_slice).unwrap_or_default()
    }

    /// Listings shown under the tab selected by `filter`.
    pub fn tab(&self, filter: ModeFilter) -> &[Listing] {
        match filter {
            ModeFilter::All => self.all(),
            ModeFilter::Only(mode) => self.mode(mode),
        }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

impl Default for CategorizedListings {
    fn default() -> Self {
        categorize(Vec::new())
    }
}

/// Group `listings` by mode in a single pass, preserving relative order.
///
/// # Examples
/// ```
/// use marketplace::domain::{TravelMode, categorize};
///
/// let grouped = categorize(Vec::new());
/// assert!(grouped.is_empty());
/// assert!(grouped.mode(TravelMode::Car).is_empty());
/// ```
pub fn categorize(listings: Vec<Listing>) -> CategorizedListings {
    let mut by_mode: BTreeMap<TravelMode, Vec<Listing>> = TravelMode::ALL
        .into_iter()
        .map(|mode| (mode, Vec::new()))
        .collect();
    for listing in &listings {
        by_mode
            .entry(listing.mode())
            .or_default()
            .push(listing.clone());
    }
    CategorizedListings {
        all: listings,
        by_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::ListingFixture;

    fn sample() -> Vec<Listing> {
        vec![
            ListingFixture::new("r1", TravelMode::Rail).build(),
            ListingFixture::new("c1", TravelMode::Car).build(),
            ListingFixture::new("b1", TravelMode::Bus).build(),
            ListingFixture::new("r2", TravelMode::Rail).build(),
            ListingFixture::new("b2", TravelMode::Bus).build(),
        ]
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id().as_ref()).collect()
    }

    #[test]
    fn groups_by_mode_preserving_order() {
        let grouped = categorize(sample());

        assert_eq!(ids(grouped.all()), vec!["r1", "c1", "b1", "r2", "b2"]);
        assert_eq!(ids(grouped.mode(TravelMode::Rail)), vec!["r1", "r2"]);
        assert_eq!(ids(grouped.mode(TravelMode::Bus)), vec!["b1", "b2"]);
        assert_eq!(ids(grouped.mode(TravelMode::Car)), vec!["c1"]);
    }

    #[test]
    fn mode_buckets_reconstruct_all_without_duplicates() {
        let grouped = categorize(sample());

        let mut from_buckets: Vec<&str> = TravelMode::ALL
            .into_iter()
            .flat_map(|mode| ids(grouped.mode(mode)))
            .collect();
        let mut from_all = ids(grouped.all());
        from_buckets.sort_unstable();
        from_all.sort_unstable();
        assert_eq!(from_buckets, from_all);
    }

    #[test]
    fn empty_input_still_exposes_every_tab() {
        let grouped = CategorizedListings::default();
        for mode in TravelMode::ALL {
            assert!(grouped.mode(mode).is_empty());
        }
        assert!(grouped.tab(ModeFilter::All).is_empty());
    }

    #[test]
    fn tab_selects_bucket_by_filter() {
        let grouped = categorize(sample());
        assert_eq!(grouped.tab(ModeFilter::All).len(), 5);
        assert_eq!(grouped.tab(ModeFilter::Only(TravelMode::Car)).len(), 1);
    }

    #[test]
    fn serialises_mode_keys_as_literals() {
        let grouped = categorize(sample());
        let value = serde_json::to_value(&grouped).expect("serialise");

        assert_eq!(value["all"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["byMode"]["rail"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["byMode"]["car"].as_array().map(Vec::len), Some(1));
    }
}
