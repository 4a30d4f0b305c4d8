//! Load a listing snapshot from a JSON file of stored rows.
//!
//! The file holds a JSON array of rows in the hosted table's format (see
//! [`ListingRow`]). Files are read through `cap_std` rather than `std::fs`.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::info;

use super::dto::{ListingRow, rows_into_listings};
use super::memory::InMemoryListingStore;
use crate::domain::Listing;

/// Errors raised while loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("snapshot path {path:?} must name a file")]
    NotAFile { path: PathBuf },
    #[error("failed to read snapshot {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path:?} is not a JSON array of listing rows: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read the listings in the snapshot at `path`. Rows that do not describe a
/// valid listing are logged and skipped.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a JSON array of rows.
pub fn read_snapshot(path: &Path) -> Result<Vec<Listing>, SnapshotLoadError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| SnapshotLoadError::NotAFile {
        path: path.to_path_buf(),
    })?;
    let read_error = |source| SnapshotLoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;

    let rows: Vec<ListingRow> =
        serde_json::from_slice(&payload).map_err(|source| SnapshotLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let decoded = rows_into_listings(rows);
    info!(
        path = %path.display(),
        count = decoded.listings.len(),
        skipped = decoded.skipped,
        "listing snapshot loaded"
    );
    Ok(decoded.listings)
}

/// Load the snapshot at `path` into a fresh [`InMemoryListingStore`].
///
/// # Errors
///
/// See [`read_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<InMemoryListingStore, SnapshotLoadError> {
    read_snapshot(path).map(InMemoryListingStore::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ROWS: &str = r#"[
        {
            "id": "t-1",
            "user_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "mode": "bus",
            "from_city": "Pune",
            "to_city": "Nashik",
            "travel_date": "2025-06-14",
            "service_name": "Shivneri",
            "contact_number": "9876543210",
            "created_at": "2025-06-01T09:00:00Z"
        }
    ]"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let handle =
            Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open temp dir");
        handle.write(name, contents).expect("write snapshot");
        dir.path().join(name)
    }

    #[test]
    fn loads_rows_into_listings() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "snapshot.json", ROWS);

        let listings = read_snapshot(&path).expect("snapshot loads");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].to_city(), "Nashik");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("temp dir");

        let error = read_snapshot(&dir.path().join("absent.json")).expect_err("missing file");
        assert!(matches!(error, SnapshotLoadError::Read { .. }));
    }

    #[test]
    fn non_array_payload_is_a_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "snapshot.json", r#"{"id": "t-1"}"#);

        let error = read_snapshot(&path).expect_err("object payload");
        assert!(matches!(error, SnapshotLoadError::Parse { .. }));
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let dir = TempDir::new().expect("temp dir");
        let same_city = r#"{
            "id": "t-2",
            "user_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "mode": "bus",
            "from_city": "Pune",
            "to_city": "pune",
            "travel_date": "2025-06-14",
            "service_name": "Shivneri",
            "contact_number": "9876543210",
            "created_at": "2025-06-01T09:00:00Z"
        }"#;
        let rows = ROWS.trim().trim_end_matches(']');
        let path = write(&dir, "snapshot.json", &format!("{rows}, {same_city}]"));

        let listings = read_snapshot(&path).expect("snapshot loads");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id().as_ref(), "t-1");
    }
}
