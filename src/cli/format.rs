//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{Location, MachineTally, MachineType, Report};

/// One line per location: id, name, working/total, address, and distance
/// when known.
pub(super) fn format_location_line(location: &Location, distance_miles: Option<f64>) -> String {
    let mut line = format!(
        "{}  {}  [{}/{} working]  {}",
        location.place_id(),
        location.place.name,
        location.good_machine_count(),
        location.total_machine_count(),
        location.place.address,
    );
    if let Some(d) = distance_miles {
        let _ = write!(line, "  ({d:.1} mi)");
    }
    line
}

/// A report as a short block: header, tallies, then photo and note if any.
/// `number` is the report's 1-based position in the location's history.
pub(super) fn format_report(number: usize, report: &Report) -> String {
    let mut out = format!(
        "#{number}  {}  {}\n  {}",
        report.submitted_at().strftime("%Y-%m-%d %H:%M UTC"),
        report.submitted_by(),
        MachineType::ALL
            .iter()
            .map(|t| format_tally(*t, report.tallies().get(*t)))
            .collect::<Vec<_>>()
            .join(" · "),
    );
    if let Some(photo) = report.photo_ref() {
        let _ = write!(out, "\n  photo: {photo}");
    }
    if let Some(message) = report.message() {
        let _ = write!(out, "\n  note: {message}");
    }
    out
}

fn format_tally(machine: MachineType, tally: &MachineTally) -> String {
    if tally.count() == 0 {
        return format!("{machine} 0");
    }
    let up = tally.thumbs_up();
    let repair = tally.repair_needed();
    format!("{machine} {} ({up} up, {repair} repair)", tally.count())
}
