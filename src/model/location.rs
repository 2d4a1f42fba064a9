//! Locations: places with recycling machines and their report history.

use serde::{Deserialize, Serialize};

use super::{PlaceId, Report};

/// Latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A place as known to the place-search provider: identity plus the
/// descriptive fields shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub place_id: PlaceId,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_image: Option<String>,
}

/// A place and its append-only report history.
///
/// `reports` is in submission order. Summary figures are derived from the
/// last entry on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub place: Place,
    #[serde(default)]
    reports: Vec<Report>,
}

impl Location {
    /// A location that has never been reported on.
    pub fn new(place: Place) -> Self {
        Self {
            place,
            reports: Vec::new(),
        }
    }

    pub fn place_id(&self) -> &PlaceId {
        &self.place.place_id
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn latest_report(&self) -> Option<&Report> {
        self.reports.last()
    }

    /// Working machines according to the most recent report. Zero when
    /// nothing has been reported.
    pub fn good_machine_count(&self) -> u64 {
        self.latest_report().map_or(0, Report::good_machine_count)
    }

    /// All machines according to the most recent report.
    pub fn total_machine_count(&self) -> u64 {
        self.latest_report().map_or(0, Report::total_machine_count)
    }

    pub(crate) fn push_report(&mut self, report: Report) {
        self.reports.push(report);
    }
}
