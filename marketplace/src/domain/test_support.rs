//! Listing builders and clocks shared by unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    ContactNumber, Listing, ListingDraft, ListingId, ListingStatus, ModeDescriptor, TravelMode,
    UserId,
};
use crate::outbound::FixedClock;

/// Clock pinned to midnight UTC of `date`.
pub(crate) fn clock_on(date: NaiveDate) -> Arc<dyn Clock> {
    Arc::new(FixedClock::start_of(date))
}

pub(crate) struct ListingFixture {
    id: String,
    draft: ListingDraft,
    status: ListingStatus,
    views: u32,
    created_at: DateTime<Utc>,
}

impl ListingFixture {
    pub(crate) fn new(id: &str, mode: TravelMode) -> Self {
        let descriptor = match mode {
            TravelMode::Rail => ModeDescriptor::Service {
                name: "Deccan Queen".to_owned(),
            },
            TravelMode::Bus => ModeDescriptor::Service {
                name: "Shivneri".to_owned(),
            },
            TravelMode::Car => ModeDescriptor::Car {
                model: "Innova".to_owned(),
                seats: 3,
            },
        };
        Self {
            id: id.to_owned(),
            draft: ListingDraft {
                owner_id: UserId::random(),
                mode,
                from_city: "Mumbai".to_owned(),
                to_city: "Pune".to_owned(),
                travel_date: NaiveDate::from_ymd_opt(2025, 6, 20).expect("valid fixture date"),
                departure_time: None,
                sub_type: None,
                descriptor,
                notes: None,
                contact: ContactNumber::new("9876543210").expect("valid contact"),
            },
            status: ListingStatus::Active,
            views: 0,
            created_at: Utc
                .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
        }
    }

    pub(crate) fn on(mut self, date: NaiveDate) -> Self {
        self.draft.travel_date = date;
        self
    }

    pub(crate) fn route(mut self, from: &str, to: &str) -> Self {
        from.clone_into(&mut self.draft.from_city);
        to.clone_into(&mut self.draft.to_city);
        self
    }

    pub(crate) fn owner(mut self, owner: &UserId) -> Self {
        self.draft.owner_id = owner.clone();
        self
    }

    pub(crate) fn departing(mut self, time: NaiveTime) -> Self {
        self.draft.departure_time = Some(time);
        self
    }

    pub(crate) fn status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn views(mut self, views: u32) -> Self {
        self.views = views;
        self
    }

    pub(crate) fn created(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub(crate) fn build(self) -> Listing {
        Listing::try_new(
            ListingId::new(self.id).expect("valid fixture id"),
            self.draft,
            self.created_at,
        )
        .expect("valid fixture listing")
        .with_status(self.status)
        .with_view_count(self.views)
    }
}

/// Clock the test moves forward by hand.
pub(crate) struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub(crate) fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().expect("clock mutex")
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
