//! Local persistence for locations and photos.
//!
//! Everything lives under one storage root:
//!
//! ```text
//! <root>/
//!   can-eye.sqlite       # One JSON location document per place
//!   photos/<sha256>.zst  # Content-addressed, zstd-compressed photo blobs
//! ```
//!
//! Location writes replace the whole document. This is the gateway the CLI
//! runs the report workflow against.

mod location;
mod photo;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;

use crate::gateway::{self, Gateway};
use crate::model::{Location, PhotoRef, PlaceId};

const DB_FILE: &str = "can-eye.sqlite";
const PHOTO_DIR: &str = "photos";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS locations (
        place_id   TEXT PRIMARY KEY,
        document   TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("location not found: {0}")]
    LocationNotFound(PlaceId),

    #[error("location already exists: {0}")]
    LocationAlreadyExists(PlaceId),

    #[error("photo not found: {0}")]
    PhotoNotFound(PhotoRef),

    #[error("photo is empty")]
    EmptyPhoto,

    #[error("corrupt storage: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local store for location documents and photo blobs.
pub struct Storage {
    root: PathBuf,
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(PHOTO_DIR))?;
        let conn = Connection::open(root.join(DB_FILE))?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(root = %root.display(), "storage opened");
        Ok(Self { root, conn })
    }

    /// Returns the default storage root: `~/.can-eye/data/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".can-eye").join("data"))
    }

    fn photo_dir(&self) -> PathBuf {
        self.root.join(PHOTO_DIR)
    }
}

impl Gateway for Storage {
    fn fetch_location(&self, place_id: &PlaceId) -> gateway::Result<Option<Location>> {
        Ok(self.load_location(place_id)?)
    }

    fn write_location(&self, location: &Location) -> gateway::Result<()> {
        Ok(self.save_location(location)?)
    }

    fn upload_photo(&self, bytes: &[u8]) -> gateway::Result<PhotoRef> {
        Ok(self.store_photo(bytes)?)
    }
}
