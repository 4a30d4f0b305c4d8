//! Search filter values.
//!
//! A [`SearchFilters`] value lives for exactly one pipeline invocation. It is
//! immutable: every `with_*` call returns a new value, so a pipeline run can
//! never observe a filter changing underneath it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::TravelMode;
use crate::domain::listing::ParseTravelModeError;

/// Literal the UI uses for the "every mode" tab.
pub const ALL_MODES_LITERAL: &str = "all";

/// Mode constraint of a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModeFilter {
    #[default]
    All,
    Only(TravelMode),
}

impl ModeFilter {
    /// Whether a listing of `mode` passes this constraint.
    pub fn admits(self, mode: TravelMode) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == mode,
        }
    }
}

impl fmt::Display for ModeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_MODES_LITERAL),
            Self::Only(mode) => fmt::Display::fmt(mode, f),
        }
    }
}

impl FromStr for ModeFilter {
    type Err = ParseTravelModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == ALL_MODES_LITERAL {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl From<TravelMode> for ModeFilter {
    fn from(mode: TravelMode) -> Self {
        Self::Only(mode)
    }
}

/// Rejections raised before a search reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFiltersValidationError {
    #[error("origin and destination must differ (both were '{city}')")]
    SameCity { city: String },
}

/// Query parameters narrowing a listing search. Unset fields impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    from_city: Option<String>,
    to_city: Option<String>,
    travel_date: Option<NaiveDate>,
    mode: ModeFilter,
    sub_type: Option<String>,
}

impl SearchFilters {
    /// Filters with no constraint, as used on first page load.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_from_city(mut self, city: impl Into<String>) -> Self {
        self.from_city = normalise(city.into());
        self
    }

    #[must_use]
    pub fn with_to_city(mut self, city: impl Into<String>) -> Self {
        self.to_city = normalise(city.into());
        self
    }

    #[must_use]
    pub fn with_travel_date(mut self, date: NaiveDate) -> Self {
        self.travel_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<ModeFilter>) -> Self {
        self.mode = mode.into();
        self
    }

    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = normalise(sub_type.into());
        self
    }

    pub fn from_city(&self) -> Option<&str> {
        self.from_city.as_deref()
    }

    pub fn to_city(&self) -> Option<&str> {
        self.to_city.as_deref()
    }

    pub const fn travel_date(&self) -> Option<NaiveDate> {
        self.travel_date
    }

    pub const fn mode(&self) -> ModeFilter {
        self.mode
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    /// Exchange origin and destination.
    ///
    /// Swapping never validates: a half-entered pair stays a half-entered
    /// pair, and the result is exactly what typing the values the other way
    /// round would have produced.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::SearchFilters;
    ///
    /// let filters = SearchFilters::new().with_from_city("Mumbai").with_to_city("Pune");
    /// let swapped = filters.swapped();
    /// assert_eq!(swapped.from_city(), Some("Pune"));
    /// assert_eq!(swapped.to_city(), Some("Mumbai"));
    /// ```
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            from_city: self.to_city.clone(),
            to_city: self.from_city.clone(),
            ..self.clone()
        }
    }

    /// Reject filters that could only ever produce an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFiltersValidationError::SameCity`] when origin and
    /// destination are both set and name the same city (ignoring case).
    pub fn validate(&self) -> Result<(), SearchFiltersValidationError> {
        if let (Some(from), Some(to)) = (self.from_city(), self.to_city()) {
            if from.to_lowercase() == to.to_lowercase() {
                return Err(SearchFiltersValidationError::SameCity {
                    city: from.to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn normalise(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
