//! Listing search core for the seat-sharing marketplace.
//!
//! The crate is split the hexagonal way: [`domain`] holds the listing model,
//! the search pipeline and the ports it drives; [`outbound`] provides the
//! store adapters; [`settings`] loads runtime configuration.

pub mod domain;
pub mod outbound;
pub mod settings;

pub use settings::MarketplaceSettings;
