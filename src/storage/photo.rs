//! Photo storage: content-addressed blobs, compressed on disk.
//!
//! A photo's reference is `photos/<sha256-hex>` of its raw bytes, so storing
//! the same image twice yields the same reference and one file.

use std::fs;

use sha2::{Digest, Sha256};

use crate::model::PhotoRef;

use super::{PHOTO_DIR, Result, Storage, StorageError};

const COMPRESSION_LEVEL: i32 = 3;

impl Storage {
    /// Stores photo bytes and returns their reference.
    pub fn store_photo(&self, bytes: &[u8]) -> Result<PhotoRef> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyPhoto);
        }
        let hash = hex::encode(Sha256::digest(bytes));
        let path = self.photo_dir().join(format!("{hash}.zst"));
        if !path.exists() {
            let compressed = zstd::encode_all(bytes, COMPRESSION_LEVEL)?;
            fs::write(&path, compressed)?;
            tracing::debug!(%hash, size = bytes.len(), "photo stored");
        }
        Ok(PhotoRef::new(format!("{PHOTO_DIR}/{hash}")))
    }

    /// Loads the original bytes of a stored photo.
    pub fn load_photo(&self, reference: &PhotoRef) -> Result<Vec<u8>> {
        let hash = reference
            .as_str()
            .strip_prefix(PHOTO_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|h| h.len() == 64 && h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| StorageError::PhotoNotFound(reference.clone()))?;
        let path = self.photo_dir().join(format!("{hash}.zst"));
        if !path.exists() {
            return Err(StorageError::PhotoNotFound(reference.clone()));
        }
        let compressed = fs::read(path)?;
        Ok(zstd::decode_all(compressed.as_slice())?)
    }
}
