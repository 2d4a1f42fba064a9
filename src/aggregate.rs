//! Location aggregate: folding a new report into a location's history.

use crate::model::{Location, Report};

/// Append `report` to the location's history.
///
/// Works the same for a stored location and for a fresh one from
/// [`Location::new`]. Existing reports are left as they were. Nothing is
/// persisted here.
pub fn apply_report(mut location: Location, report: Report) -> Location {
    location.push_report(report);
    location
}
