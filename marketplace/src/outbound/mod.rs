//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local store holding a listing snapshot
//! - **snapshot_file**: loads that snapshot from a JSON file of stored rows
//! - **rest**: reqwest client for the hosted backend's REST API
//! - **cache**: TTL snapshot cache decorating any other store
//! - **clock**: fixed clock for reproducible runs
//!
//! Adapters are thin translators between domain types and stored rows. They
//! contain no search logic.

pub mod cache;
pub mod clock;
mod dto;
pub mod memory;
pub mod rest;
pub mod snapshot_file;

pub use cache::CachingListingStore;
pub use clock::FixedClock;
pub use memory::InMemoryListingStore;
pub use rest::RestListingStore;
pub use snapshot_file::{SnapshotLoadError, load_snapshot, read_snapshot};
