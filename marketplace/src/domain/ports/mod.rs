//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Time comes from [`mockable::Clock`] directly rather than a local port.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod listing_store;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{AnonymousIdentity, FixedIdentity, IdentityProvider};
#[cfg(test)]
pub use listing_store::MockListingStore;
pub use listing_store::{FixtureListingStore, ListingStore, ListingStoreError};
