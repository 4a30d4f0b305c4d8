//! Reqwest-backed adapter for the hosted backend's REST surface.
//!
//! The adapter owns transport details only: endpoint layout, auth headers,
//! timeout and HTTP error mapping, and JSON decoding into domain listings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{ListingRow, rows_into_listings};
use crate::domain::ports::{ListingStore, ListingStoreError};
use crate::domain::{Listing, ListingId};

const TICKETS_PATH: &str = "rest/v1/tickets";
const INCREMENT_VIEWS_PATH: &str = "rest/v1/rpc/increment_ticket_views";

#[derive(Serialize)]
struct IncrementViewsArgs<'a> {
    ticket_id: &'a str,
}

/// Listing store backed by the hosted REST API.
pub struct RestListingStore {
    client: Client,
    base_url: Url,
    api_key: String,
    access_token: Option<String>,
}

impl RestListingStore {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
            access_token: None,
        })
    }

    /// Send `token` as the bearer credential instead of the API key, so row
    /// level security sees the signed-in user.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ListingStoreError> {
        self.base_url.join(path).map_err(|error| {
            ListingStoreError::connection(format!("invalid endpoint {path}: {error}"))
        })
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        request
            .header("apikey", self.api_key.as_str())
            .bearer_auth(bearer)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ListingStoreError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ListingStore for RestListingStore {
    async fn fetch_all(&self) -> Result<Vec<Listing>, ListingStoreError> {
        let mut url = self.endpoint(TICKETS_PATH)?;
        url.query_pairs_mut().append_pair("select", "*");
        let body = self.send(self.client.get(url)).await?;
        let listings = parse_listings(&body)?;
        debug!(count = listings.len(), "fetched listings from REST store");
        Ok(listings)
    }

    async fn increment_view_count(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let url = self.endpoint(INCREMENT_VIEWS_PATH)?;
        let args = IncrementViewsArgs {
            ticket_id: id.as_ref(),
        };
        self.send(self.client.post(url).json(&args)).await?;
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let url = delete_url(self.endpoint(TICKETS_PATH)?, id);
        let body = self
            .send(
                self.client
                    .delete(url)
                    .header("Prefer", "return=representation"),
            )
            .await?;
        ensure_deleted(&body, id)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn delete_url(mut tickets: Url, id: &ListingId) -> Url {
    tickets
        .query_pairs_mut()
        .append_pair("id", &format!("eq.{id}"));
    tickets
}

fn parse_listings(body: &[u8]) -> Result<Vec<Listing>, ListingStoreError> {
    let rows: Vec<ListingRow> = serde_json::from_slice(body).map_err(|error| {
        ListingStoreError::decode(format!("invalid listings payload: {error}"))
    })?;
    let decoded = rows_into_listings(rows);
    if decoded.skipped > 0 {
        debug!(
            kept = decoded.listings.len(),
            skipped = decoded.skipped,
            "listing rows skipped while decoding"
        );
    }
    Ok(decoded.listings)
}

/// With `return=representation` the store echoes the deleted rows; an empty
/// array means nothing matched the id.
fn ensure_deleted(body: &[u8], id: &ListingId) -> Result<(), ListingStoreError> {
    let deleted: Vec<serde_json::Value> = serde_json::from_slice(body).map_err(|error| {
        ListingStoreError::decode(format!("invalid delete response: {error}"))
    })?;
    if deleted.is_empty() {
        return Err(ListingStoreError::not_found(id.as_ref()));
    }
    Ok(())
}

fn map_transport_error(error: reqwest::Error) -> ListingStoreError {
    ListingStoreError::connection(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ListingStoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ListingStoreError::connection(message)
        }
        _ if status.is_server_error() => ListingStoreError::connection(message),
        _ => ListingStoreError::query(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
