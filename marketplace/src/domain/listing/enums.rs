//! Listing enum types and parsers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transport category a listing offers a seat on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Rail,
    Bus,
    Car,
}

impl TravelMode {
    /// Every mode in result-tab order.
    pub const ALL: [Self; 3] = [Self::Rail, Self::Bus, Self::Car];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rail => "rail",
            Self::Bus => "bus",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`TravelMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTravelModeError {
    pub input: String,
}

impl fmt::Display for ParseTravelModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid travel mode: {}", self.input)
    }
}

impl std::error::Error for ParseTravelModeError {}

impl FromStr for TravelMode {
    type Err = ParseTravelModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Rows written by the first web release still say "train".
        match value {
            "rail" | "train" => Ok(Self::Rail),
            "bus" => Ok(Self::Bus),
            "car" => Ok(Self::Car),
            _ => Err(ParseTravelModeError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Stored lifecycle state of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Active,
    Sold,
    Expired,
    Suspended,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Expired => "expired",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ListingStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseListingStatusError {
    pub input: String,
}

impl fmt::Display for ParseListingStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid listing status: {}", self.input)
    }
}

impl std::error::Error for ParseListingStatusError {}

impl FromStr for ListingStatus {
    type Err = ParseListingStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "sold" => Ok(Self::Sold),
            "expired" => Ok(Self::Expired),
            "suspended" => Ok(Self::Suspended),
            _ => Err(ParseListingStatusError {
                input: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rail", TravelMode::Rail)]
    #[case("train", TravelMode::Rail)]
    #[case("bus", TravelMode::Bus)]
    #[case("car", TravelMode::Car)]
    fn parses_travel_modes(#[case] raw: &str, #[case] expected: TravelMode) {
        assert_eq!(raw.parse::<TravelMode>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_travel_mode() {
        let error = "ferry".parse::<TravelMode>().expect_err("ferry is not a mode");
        assert_eq!(error.to_string(), "invalid travel mode: ferry");
    }

    #[test]
    fn status_defaults_to_active() {
        assert_eq!(ListingStatus::default(), ListingStatus::Active);
    }

    #[rstest]
    #[case(ListingStatus::Active)]
    #[case(ListingStatus::Sold)]
    #[case(ListingStatus::Expired)]
    #[case(ListingStatus::Suspended)]
    fn status_display_parses_back(#[case] status: ListingStatus) {
        assert_eq!(status.to_string().parse::<ListingStatus>(), Ok(status));
    }
}
