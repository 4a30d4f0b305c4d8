//! Run one listing search and print the tabbed results as JSON.
//!
//! Listings come from `--snapshot` or, when omitted, from the source
//! configured through `SEATSWAP_*` settings. Logs go to stderr so stdout stays
//! machine-readable.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use marketplace::MarketplaceSettings;
use marketplace::domain::ports::{AnonymousIdentity, FixedIdentity, IdentityProvider, ListingStore};
use marketplace::domain::{ModeFilter, SearchFilters, SearchOutcome, SearchPipeline, UserId};
use marketplace::outbound::{CachingListingStore, FixedClock, RestListingStore, load_snapshot};
use marketplace::settings::ListingSource;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `search-listings` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "search-listings",
    about = "Search seat listings and print the results grouped by travel mode",
    version
)]
struct CliArgs {
    /// JSON file of listing rows. Overrides the configured listing source.
    #[arg(long, value_name = "path")]
    snapshot: Option<PathBuf>,
    /// Origin city, matched as a case-insensitive substring.
    #[arg(long, value_name = "city")]
    from: Option<String>,
    /// Destination city, matched as a case-insensitive substring.
    #[arg(long, value_name = "city")]
    to: Option<String>,
    /// Exact travel date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
    /// `all`, `rail`, `bus` or `car`.
    #[arg(long, value_name = "mode", default_value = "all")]
    mode: ModeFilter,
    /// Exact mode-specific sub-type, e.g. a seat class.
    #[arg(long = "sub-type", value_name = "sub-type")]
    sub_type: Option<String>,
    /// Exchange origin and destination before searching.
    #[arg(long)]
    swap: bool,
    /// Search as this user. Falls back to `SEATSWAP_VIEWER_ID`.
    #[arg(long, value_name = "uuid", value_parser = parse_user_id)]
    viewer: Option<UserId>,
    /// Treat this date as today instead of reading the system clock.
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,
}

impl CliArgs {
    fn filters(&self) -> SearchFilters {
        let mut filters = SearchFilters::new().with_mode(self.mode);
        if let Some(from) = &self.from {
            filters = filters.with_from_city(from.as_str());
        }
        if let Some(to) = &self.to {
            filters = filters.with_to_city(to.as_str());
        }
        if let Some(date) = self.date {
            filters = filters.with_travel_date(date);
        }
        if let Some(sub_type) = &self.sub_type {
            filters = filters.with_sub_type(sub_type.as_str());
        }
        filters
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    UserId::new(raw).map_err(|error| error.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = MarketplaceSettings::load_from_iter([OsString::from("search-listings")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    let output = runtime.block_on(run(args, settings))?;
    println!("{output}");
    Ok(())
}

async fn run(args: CliArgs, settings: MarketplaceSettings) -> Result<String> {
    let clock: Arc<dyn Clock> = match args.today {
        Some(today) => Arc::new(FixedClock::start_of(today)),
        None => Arc::new(DefaultClock),
    };
    let store = build_store(&args, &settings, &clock)?;
    let viewer = match args.viewer.clone() {
        Some(viewer) => Some(viewer),
        None => settings.viewer()?,
    };
    let identity: Arc<dyn IdentityProvider> = match viewer {
        Some(viewer) => Arc::new(FixedIdentity::new(viewer)),
        None => Arc::new(AnonymousIdentity),
    };

    let pipeline = SearchPipeline::new(store, identity, clock);
    let filters = args.filters();
    let outcome = if args.swap {
        let (swapped, outcome) = pipeline.swap_and_search(&filters).await?;
        info!(
            from = swapped.from_city().unwrap_or_default(),
            to = swapped.to_city().unwrap_or_default(),
            "searched with swapped cities"
        );
        outcome
    } else {
        pipeline.search(filters).await?
    };

    match outcome {
        SearchOutcome::Ready {
            results,
            pruned,
            views,
        } => {
            info!(
                matched = results.len(),
                pruned,
                views_persisted = views.persisted,
                views_failed = views.failed.len(),
                "search complete"
            );
            serde_json::to_string_pretty(&results).wrap_err("failed to encode results")
        }
        SearchOutcome::Superseded { sequence, latest } => Err(eyre!(
            "search {sequence} was superseded by search {latest}"
        )),
    }
}

fn build_store(
    args: &CliArgs,
    settings: &MarketplaceSettings,
    clock: &Arc<dyn Clock>,
) -> Result<Arc<dyn ListingStore>> {
    let source = match &args.snapshot {
        Some(path) => ListingSource::Snapshot(path.clone()),
        None => settings.listing_source()?,
    };
    match source {
        ListingSource::Snapshot(path) => {
            let store = load_snapshot(&path)?;
            Ok(Arc::new(store))
        }
        ListingSource::Rest { base_url, api_key } => {
            let rest = RestListingStore::new(base_url, api_key, settings.request_timeout())
                .wrap_err("failed to build REST client")?;
            let cached = CachingListingStore::new(rest, Arc::clone(clock), settings.cache_ttl()?);
            Ok(Arc::new(cached))
        }
    }
}
