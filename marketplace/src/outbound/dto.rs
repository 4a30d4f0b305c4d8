//! Stored listing row format shared by the snapshot file and REST adapters.
//!
//! Rows are decoded into [`ListingRow`] first, then mapped into domain
//! [`Listing`] values in one pass. A row that does not describe a valid
//! listing is logged with its id and skipped; the rest of the batch is kept.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    ContactNumber, Listing, ListingDraft, ListingId, ListingStatus, ModeDescriptor,
    ReportMetadata, TravelMode, UserId,
};

/// One row of the hosted `tickets` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListingRow {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) mode: String,
    pub(crate) from_city: String,
    pub(crate) to_city: String,
    pub(crate) travel_date: NaiveDate,
    #[serde(default)]
    pub(crate) departure_time: Option<String>,
    #[serde(default)]
    pub(crate) sub_type: Option<String>,
    #[serde(default)]
    pub(crate) service_name: Option<String>,
    #[serde(default)]
    pub(crate) car_model: Option<String>,
    #[serde(default)]
    pub(crate) seats: Option<u8>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    pub(crate) contact_number: String,
    #[serde(default)]
    pub(crate) view_count: i64,
    #[serde(default)]
    pub(crate) status: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) is_reported: bool,
    #[serde(default)]
    pub(crate) report_reason: Option<String>,
    #[serde(default)]
    pub(crate) reported_by: Option<String>,
    #[serde(default)]
    pub(crate) reported_at: Option<DateTime<Utc>>,
}

/// Listings decoded from a batch of rows and how many rows were dropped.
#[derive(Debug, Default)]
pub(crate) struct DecodedRows {
    pub(crate) listings: Vec<Listing>,
    pub(crate) skipped: usize,
}

/// Map a batch of rows in store order, skipping undecodable ones.
pub(crate) fn rows_into_listings(rows: Vec<ListingRow>) -> DecodedRows {
    let mut decoded = DecodedRows::default();
    for row in rows {
        let row_id = row.id.clone();
        match row.into_domain() {
            Ok(listing) => decoded.listings.push(listing),
            Err(reason) => {
                warn!(row_id = %row_id, error = %reason, "skipping undecodable listing row");
                decoded.skipped += 1;
            }
        }
    }
    decoded
}

impl ListingRow {
    fn into_domain(self) -> Result<Listing, String> {
        let id = ListingId::new(self.id).map_err(|error| error.to_string())?;
        let owner_id = UserId::new(&self.user_id).map_err(|error| error.to_string())?;
        let mode = self
            .mode
            .parse::<TravelMode>()
            .map_err(|error| error.to_string())?;
        let descriptor = match mode {
            TravelMode::Rail | TravelMode::Bus => ModeDescriptor::Service {
                name: self
                    .service_name
                    .ok_or_else(|| format!("{mode} row is missing service_name"))?,
            },
            TravelMode::Car => ModeDescriptor::Car {
                model: self
                    .car_model
                    .ok_or_else(|| "car row is missing car_model".to_owned())?,
                seats: self
                    .seats
                    .ok_or_else(|| "car row is missing seats".to_owned())?,
            },
        };
        let departure_time = self
            .departure_time
            .as_deref()
            .map(parse_departure_time)
            .transpose()?;
        let contact =
            ContactNumber::new(&self.contact_number).map_err(|error| error.to_string())?;
        let status = match self.status.as_deref() {
            Some(raw) => raw
                .parse::<ListingStatus>()
                .map_err(|error| error.to_string())?,
            None => ListingStatus::default(),
        };
        let view_count = u32::try_from(self.view_count.max(0)).unwrap_or(u32::MAX);

        let draft = ListingDraft {
            owner_id,
            mode,
            from_city: self.from_city,
            to_city: self.to_city,
            travel_date: self.travel_date,
            departure_time,
            sub_type: self.sub_type,
            descriptor,
            notes: self.notes,
            contact,
        };
        let mut listing = Listing::try_new(id, draft, self.created_at)
            .map_err(|error| error.to_string())?
            .with_status(status)
            .with_view_count(view_count);

        if self.is_reported {
            let reporter_id = self
                .reported_by
                .as_deref()
                .map(UserId::new)
                .transpose()
                .map_err(|error| error.to_string())?
                .ok_or_else(|| "reported row is missing reported_by".to_owned())?;
            listing = listing.with_report(ReportMetadata {
                reason: self.report_reason.unwrap_or_default(),
                reporter_id,
                reported_at: self.reported_at.unwrap_or(self.created_at),
            });
        }
        Ok(listing)
    }
}

fn parse_departure_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| format!("invalid departure_time '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn rail_row() -> Value {
        json!({
            "id": "t-1",
            "user_id": OWNER,
            "mode": "train",
            "from_city": "Mumbai",
            "to_city": "Pune",
            "travel_date": "2025-06-11",
            "departure_time": "07:15",
            "sub_type": "sleeper",
            "service_name": "Deccan Queen",
            "contact_number": "+91 98765 43210",
            "view_count": 12,
            "status": "active",
            "created_at": "2025-06-01T09:00:00Z"
        })
    }

    fn decode(value: Value) -> Result<Listing, String> {
        let row: ListingRow = serde_json::from_value(value).expect("row shape");
        row.into_domain()
    }

    #[test]
    fn maps_rail_row_into_listing() {
        let listing = decode(rail_row()).expect("row decodes");

        assert_eq!(listing.mode(), TravelMode::Rail);
        assert_eq!(listing.view_count(), 12);
        assert_eq!(listing.owner_id().to_string(), OWNER);
        assert_eq!(
            listing.departure_time(),
            NaiveTime::from_hms_opt(7, 15, 0)
        );
        assert!(!listing.is_reported());
    }

    #[test]
    fn maps_report_columns() {
        let mut row = rail_row();
        row["is_reported"] = json!(true);
        row["report_reason"] = json!("duplicate post");
        row["reported_by"] = json!(OWNER);

        let listing = decode(row).expect("row decodes");

        let report = listing.report().expect("report metadata");
        assert_eq!(report.reason, "duplicate post");
        assert_eq!(report.reported_at, listing.created_at());
    }

    #[rstest]
    #[case("mode", json!("ferry"), "invalid travel mode: ferry")]
    #[case("to_city", json!("mumbai"), "origin and destination must differ")]
    #[case("contact_number", json!("12345"), "at least 10 digits")]
    #[case("departure_time", json!("7pm"), "invalid departure_time")]
    #[case("status", json!("archived"), "invalid listing status")]
    fn rejects_invalid_rows(
        #[case] field: &str,
        #[case] value: Value,
        #[case] fragment: &str,
    ) {
        let mut row = rail_row();
        row[field] = value;

        let error = decode(row).expect_err("row is invalid");

        assert!(error.contains(fragment), "unexpected message: {error}");
    }

    #[test]
    fn car_rows_need_model_and_seats() {
        let mut row = rail_row();
        row["mode"] = json!("car");

        let error = decode(row).expect_err("missing car columns");
        assert_eq!(error, "car row is missing car_model");
    }

    #[test]
    fn batch_keeps_valid_rows_around_a_bad_one() {
        let mut legacy = rail_row();
        legacy["id"] = json!("legacy");
        legacy["mode"] = json!("bus");
        legacy
            .as_object_mut()
            .expect("row object")
            .remove("service_name");
        let mut later = rail_row();
        later["id"] = json!("t-2");
        let rows: Vec<ListingRow> =
            serde_json::from_value(json!([rail_row(), legacy, later])).expect("row shapes");

        let decoded = rows_into_listings(rows);

        let ids: Vec<&str> = decoded.listings.iter().map(|l| l.id().as_ref()).collect();
        assert_eq!(ids, vec!["t-1", "t-2"]);
        assert_eq!(decoded.skipped, 1);
    }
}
