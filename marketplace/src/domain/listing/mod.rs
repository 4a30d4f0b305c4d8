//! Listing entity: a single posted seat offer on rail, bus, or car-pool.
//!
//! ## Invariants
//! - origin and destination cities are non-empty and differ (compared
//!   case-insensitively after trimming);
//! - the mode descriptor agrees with the travel mode;
//! - the view count never decreases through [`Listing::record_view`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UserId;

mod contact;
mod enums;
mod lifecycle;

pub use contact::{CONTACT_MIN_DIGITS, ContactNumber, ContactNumberError};
pub use enums::{ListingStatus, ParseListingStatusError, ParseTravelModeError, TravelMode};
pub use lifecycle::{
    ACTIVE_LISTING_LIMIT, PublishQuotaExceeded, REVIEW_GRACE_HOURS, effective_status,
    ensure_publish_allowed, is_review_eligible, review_opens_at,
};
pub(crate) use lifecycle::is_upcoming;

/// Maximum seats a car-pool listing may offer.
pub const MAX_CAR_SEATS: u8 = 8;

/// Validation errors raised while building a [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingValidationError {
    #[error("listing id must not be empty")]
    EmptyId,
    #[error("listing id must not have surrounding whitespace")]
    PaddedId,
    #[error("origin city must not be empty")]
    EmptyOrigin,
    #[error("destination city must not be empty")]
    EmptyDestination,
    #[error("origin and destination must differ")]
    SameCity,
    #[error("{descriptor} descriptor does not fit a {mode} listing")]
    DescriptorMismatch {
        mode: TravelMode,
        descriptor: &'static str,
    },
    #[error("service name must not be empty")]
    EmptyServiceName,
    #[error("car model must not be empty")]
    EmptyCarModel,
    #[error("car seats must be between 1 and {max}")]
    SeatsOutOfRange { max: u8 },
}

/// Opaque listing identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListingId(String);

impl ListingId {
    /// Validate and construct a [`ListingId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ListingValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ListingValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ListingValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ListingId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ListingId> for String {
    fn from(value: ListingId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ListingId {
    type Error = ListingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Mode-specific description of what is being offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ModeDescriptor {
    /// Named rail or bus service, e.g. "Deccan Queen".
    Service { name: String },
    /// Car-pool vehicle and the number of seats on offer.
    Car { model: String, seats: u8 },
}

impl ModeDescriptor {
    fn kind(&self) -> &'static str {
        match self {
            Self::Service { .. } => "service",
            Self::Car { .. } => "car",
        }
    }

    fn validate_for(&self, mode: TravelMode) -> Result<(), ListingValidationError> {
        match (mode, self) {
            (TravelMode::Rail | TravelMode::Bus, Self::Service { name }) => {
                if name.trim().is_empty() {
                    return Err(ListingValidationError::EmptyServiceName);
                }
                Ok(())
            }
            (TravelMode::Car, Self::Car { model, seats }) => {
                if model.trim().is_empty() {
                    return Err(ListingValidationError::EmptyCarModel);
                }
                if *seats == 0 || *seats > MAX_CAR_SEATS {
                    return Err(ListingValidationError::SeatsOutOfRange {
                        max: MAX_CAR_SEATS,
                    });
                }
                Ok(())
            }
            _ => Err(ListingValidationError::DescriptorMismatch {
                mode,
                descriptor: self.kind(),
            }),
        }
    }
}

/// Abuse report attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub reason: String,
    pub reporter_id: UserId,
    pub reported_at: DateTime<Utc>,
}

/// Owner-supplied listing content before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub owner_id: UserId,
    pub mode: TravelMode,
    pub from_city: String,
    pub to_city: String,
    pub travel_date: NaiveDate,
    pub departure_time: Option<NaiveTime>,
    pub sub_type: Option<String>,
    pub descriptor: ModeDescriptor,
    pub notes: Option<String>,
    pub contact: ContactNumber,
}

/// A validated listing as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: ListingId,
    owner_id: UserId,
    mode: TravelMode,
    from_city: String,
    to_city: String,
    travel_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_type: Option<String>,
    descriptor: ModeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    contact: ContactNumber,
    view_count: u32,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ReportMetadata>,
}

impl Listing {
    /// Validate a draft and build a fresh `active` listing with no views.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, Utc};
    /// use marketplace::domain::{
    ///     ContactNumber, Listing, ListingDraft, ListingId, ModeDescriptor, TravelMode, UserId,
    /// };
    ///
    /// let draft = ListingDraft {
    ///     owner_id: UserId::random(),
    ///     mode: TravelMode::Rail,
    ///     from_city: "Mumbai".to_owned(),
    ///     to_city: "Pune".to_owned(),
    ///     travel_date: NaiveDate::from_ymd_opt(2025, 6, 11).expect("valid date"),
    ///     departure_time: None,
    ///     sub_type: Some("sleeper".to_owned()),
    ///     descriptor: ModeDescriptor::Service { name: "Deccan Queen".to_owned() },
    ///     notes: None,
    ///     contact: ContactNumber::new("9876543210").expect("valid contact"),
    /// };
    /// let id = ListingId::new("t-1").expect("valid id");
    /// let listing = Listing::try_new(id, draft, Utc::now()).expect("valid listing");
    /// assert_eq!(listing.view_count(), 0);
    /// ```
    pub fn try_new(
        id: ListingId,
        draft: ListingDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ListingValidationError> {
        let ListingDraft {
            owner_id,
            mode,
            from_city,
            to_city,
            travel_date,
            departure_time,
            sub_type,
            descriptor,
            notes,
            contact,
        } = draft;

        let from_city = from_city.trim().to_owned();
        let to_city = to_city.trim().to_owned();
        if from_city.is_empty() {
            return Err(ListingValidationError::EmptyOrigin);
        }
        if to_city.is_empty() {
            return Err(ListingValidationError::EmptyDestination);
        }
        if from_city.to_lowercase() == to_city.to_lowercase() {
            return Err(ListingValidationError::SameCity);
        }
        descriptor.validate_for(mode)?;

        Ok(Self {
            id,
            owner_id,
            mode,
            from_city,
            to_city,
            travel_date,
            departure_time,
            sub_type: non_blank(sub_type),
            descriptor,
            notes: non_blank(notes),
            contact,
            view_count: 0,
            status: ListingStatus::Active,
            created_at,
            report: None,
        })
    }

    /// Restore the stored status.
    #[must_use]
    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    /// Restore the stored view count.
    #[must_use]
    pub(crate) fn with_view_count(mut self, view_count: u32) -> Self {
        self.view_count = view_count;
        self
    }

    /// Attach abuse report metadata.
    #[must_use]
    pub fn with_report(mut self, report: ReportMetadata) -> Self {
        self.report = Some(report);
        self
    }

    /// Count one more view. Saturates instead of wrapping.
    pub fn record_view(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Whether `viewer` owns this listing. Anonymous viewers own nothing.
    pub fn is_owned_by(&self, viewer: Option<&UserId>) -> bool {
        viewer.is_some_and(|id| *id == self.owner_id)
    }

    pub const fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn from_city(&self) -> &str {
        self.from_city.as_str()
    }

    pub fn to_city(&self) -> &str {
        self.to_city.as_str()
    }

    pub const fn travel_date(&self) -> NaiveDate {
        self.travel_date
    }

    pub const fn departure_time(&self) -> Option<NaiveTime> {
        self.departure_time
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    pub fn descriptor(&self) -> &ModeDescriptor {
        &self.descriptor
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn contact(&self) -> &ContactNumber {
        &self.contact
    }

    pub const fn view_count(&self) -> u32 {
        self.view_count
    }

    pub const fn status(&self) -> ListingStatus {
        self.status
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn report(&self) -> Option<&ReportMetadata> {
        self.report.as_ref()
    }

    pub fn is_reported(&self) -> bool {
        self.report.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
