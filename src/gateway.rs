//! The persistence boundary: where locations are read and written and
//! where photos are uploaded.
//!
//! The workflow only ever does "read, change locally, write back". Writes
//! replace the whole location document, so the last writer wins; nothing
//! here detects a concurrent update.

use crate::model::{Location, PhotoRef, PlaceId};
use crate::storage::StorageError;

/// Errors surfaced by a gateway. All are scoped to one submission.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, GatewayError>;

/// Document store plus blob store, as the workflow sees them.
pub trait Gateway {
    /// Read a location. `None` means the place has never been stored.
    fn fetch_location(&self, place_id: &PlaceId) -> Result<Option<Location>>;

    /// Replace the stored location document with this one.
    fn write_location(&self, location: &Location) -> Result<()>;

    /// Store a photo and return a reference to it.
    fn upload_photo(&self, bytes: &[u8]) -> Result<PhotoRef>;
}

/// In-memory gateway with failure injection, for workflow tests.
#[cfg(test)]
pub mod fake {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io;

    use super::{Gateway, GatewayError, Result};
    use crate::model::{Location, PhotoRef, PlaceId};
    use crate::storage::StorageError;

    #[derive(Default)]
    pub struct FakeGateway {
        pub locations: RefCell<HashMap<PlaceId, Location>>,
        pub photos: RefCell<Vec<Vec<u8>>>,
        pub writes: Cell<u32>,
        pub fail_uploads: Cell<bool>,
        pub fail_fetches: Cell<u32>,
        pub fail_writes: Cell<u32>,
        /// Runs once, right after the next successful upload.
        pub after_upload: RefCell<Option<Box<dyn FnOnce()>>>,
        /// Runs once, between the next fetch and its caller's write.
        pub after_fetch: RefCell<Option<Box<dyn FnOnce()>>>,
    }

    impl FakeGateway {
        pub fn stored(&self, place_id: &PlaceId) -> Option<Location> {
            self.locations.borrow().get(place_id).cloned()
        }
    }

    fn unavailable(what: &str) -> GatewayError {
        StorageError::Io(io::Error::other(what.to_string())).into()
    }

    fn take_failure(counter: &Cell<u32>) -> bool {
        let left = counter.get();
        if left > 0 {
            counter.set(left - 1);
            true
        } else {
            false
        }
    }

    impl Gateway for FakeGateway {
        fn fetch_location(&self, place_id: &PlaceId) -> Result<Option<Location>> {
            if take_failure(&self.fail_fetches) {
                return Err(unavailable("fetch refused"));
            }
            let found = self.stored(place_id);
            if let Some(hook) = self.after_fetch.take() {
                hook();
            }
            Ok(found)
        }

        fn write_location(&self, location: &Location) -> Result<()> {
            if take_failure(&self.fail_writes) {
                return Err(unavailable("write refused"));
            }
            self.writes.set(self.writes.get() + 1);
            self.locations
                .borrow_mut()
                .insert(location.place_id().clone(), location.clone());
            Ok(())
        }

        fn upload_photo(&self, bytes: &[u8]) -> Result<PhotoRef> {
            if self.fail_uploads.get() {
                return Err(unavailable("upload refused"));
            }
            let mut photos = self.photos.borrow_mut();
            photos.push(bytes.to_vec());
            let reference = PhotoRef::new(format!("photos/{}", photos.len()));
            drop(photos);
            if let Some(hook) = self.after_upload.take() {
                hook();
            }
            Ok(reference)
        }
    }
}
