//! Decide whether a single listing satisfies a set of search filters.

use crate::domain::Listing;

use super::SearchFilters;

/// Return `true` iff `listing` passes every filter that is set.
///
/// - cities: case-insensitive substring containment;
/// - travel date and sub-type: exact equality;
/// - mode: exact equality unless the filter is [`ModeFilter::All`].
///
/// Callers validate the filters first; this function never rejects.
///
/// [`ModeFilter::All`]: super::ModeFilter::All
pub fn matches(listing: &Listing, filters: &SearchFilters) -> bool {
    city_matches(listing.from_city(), filters.from_city())
        && city_matches(listing.to_city(), filters.to_city())
        && filters
            .travel_date()
            .is_none_or(|date| listing.travel_date() == date)
        && filters.mode().admits(listing.mode())
        && filters
            .sub_type()
            .is_none_or(|wanted| listing.sub_type() == Some(wanted))
}

fn city_matches(city: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| city.to_lowercase().contains(&needle.to_lowercase()))
}
