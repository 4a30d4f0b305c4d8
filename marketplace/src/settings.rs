//! Runtime configuration loaded via OrthoConfig.
//!
//! Every value may come from `SEATSWAP_*` environment variables or a config
//! file. Timeouts carry field defaults; optional values fall back in the
//! accessors.

use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{UserId, UserIdValidationError};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("rest_base_url is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("viewer_id is not a valid user id: {0}")]
    InvalidViewer(#[from] UserIdValidationError),
    #[error("rest_base_url is set but api_key is missing")]
    MissingApiKey,
    #[error("no listing source configured: set a snapshot path or rest_base_url")]
    NoListingSource,
    #[error("cache_ttl_secs is out of range")]
    CacheTtlOutOfRange,
}

/// Where listings are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// JSON file of stored rows.
    Snapshot(PathBuf),
    /// Hosted REST API.
    Rest { base_url: Url, api_key: String },
}

/// Configuration values for the listing search tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEATSWAP")]
pub struct MarketplaceSettings {
    /// Local snapshot file of listing rows.
    pub snapshot_path: Option<PathBuf>,
    /// Base URL of the hosted backend.
    pub rest_base_url: Option<String>,
    /// Public API key sent with every REST request.
    pub api_key: Option<String>,
    /// Per-request timeout for REST calls, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// How long a fetched snapshot is reused, in seconds. Zero disables it.
    #[ortho_config(default = 30)]
    pub cache_ttl_secs: u64,
    /// Signed-in user to search as; unset means anonymous.
    pub viewer_id: Option<String>,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            rest_base_url: None,
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            viewer_id: None,
        }
    }
}

impl MarketplaceSettings {
    /// REST request timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Snapshot cache TTL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::CacheTtlOutOfRange`] when the value does not
    /// fit a [`TimeDelta`].
    pub fn cache_ttl(&self) -> Result<TimeDelta, SettingsError> {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(SettingsError::CacheTtlOutOfRange)
    }

    /// Configured viewer, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidViewer`] when `viewer_id` is not a UUID.
    pub fn viewer(&self) -> Result<Option<UserId>, SettingsError> {
        Ok(self.viewer_id.as_deref().map(UserId::new).transpose()?)
    }

    /// Pick the listing source. A snapshot path wins over the REST backend.
    ///
    /// # Errors
    ///
    /// Fails when neither source is configured, or the REST configuration is
    /// incomplete or malformed.
    pub fn listing_source(&self) -> Result<ListingSource, SettingsError> {
        if let Some(path) = &self.snapshot_path {
            return Ok(ListingSource::Snapshot(path.clone()));
        }
        let Some(raw) = self.rest_base_url.as_deref() else {
            return Err(SettingsError::NoListingSource);
        };
        let base_url = Url::parse(raw)?;
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)?;
        Ok(ListingSource::Rest { base_url, api_key })
    }
}
