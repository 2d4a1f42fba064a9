//! Location storage: one JSON document per place, replaced wholesale on write.

use jiff::Timestamp;
use rusqlite::OptionalExtension;

use crate::model::{Location, Place, PlaceId};

use super::{Result, Storage, StorageError};

impl Storage {
    /// Loads a location, or `None` if the place has never been stored.
    pub fn load_location(&self, place_id: &PlaceId) -> Result<Option<Location>> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM locations WHERE place_id = ?1",
                [place_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        document
            .map(|json| parse_document(place_id, &json))
            .transpose()
    }

    /// Loads a location that must already exist.
    pub fn require_location(&self, place_id: &PlaceId) -> Result<Location> {
        self.load_location(place_id)?
            .ok_or_else(|| StorageError::LocationNotFound(place_id.clone()))
    }

    /// Writes the full location document, replacing whatever was stored.
    pub fn save_location(&self, location: &Location) -> Result<()> {
        let json = serde_json::to_string(location)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO locations (place_id, document, updated_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
                location.place_id().as_str(),
                json,
                Timestamp::now().to_string(),
            ],
        )?;
        tracing::debug!(
            place = %location.place_id(),
            reports = location.reports().len(),
            "location written"
        );
        Ok(())
    }

    /// Stores a place with no reports yet.
    pub fn seed_location(&self, place: Place) -> Result<Location> {
        if self.load_location(&place.place_id)?.is_some() {
            return Err(StorageError::LocationAlreadyExists(place.place_id));
        }
        let location = Location::new(place);
        self.save_location(&location)?;
        Ok(location)
    }

    /// Lists all stored locations, sorted by name.
    pub fn list_locations(&self) -> Result<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT place_id, document FROM locations")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut locations = Vec::new();
        for row in rows {
            let (id, json) = row?;
            let place_id = PlaceId::new(id)
                .map_err(|e| StorageError::Corrupt(format!("invalid place id: {e}")))?;
            locations.push(parse_document(&place_id, &json)?);
        }
        locations.sort_by(|a: &Location, b: &Location| a.place.name.cmp(&b.place.name));
        Ok(locations)
    }
}

fn parse_document(place_id: &PlaceId, json: &str) -> Result<Location> {
    serde_json::from_str(json)
        .map_err(|e| StorageError::Corrupt(format!("location {place_id}: {e}")))
}
