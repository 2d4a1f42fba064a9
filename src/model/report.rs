//! Report: one immutable, timestamped condition report for a location.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PhotoRef, Tallies, UserId};

/// A submitted condition report.
///
/// Built only by [`crate::assemble::assemble`]. There is no mutating API:
/// corrections are made by submitting another report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ReportFields")]
pub struct Report {
    submitted_by: UserId,
    submitted_at: Timestamp,
    tallies: Tallies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_ref: Option<PhotoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Unchecked wire shape. Every stored report must have a status for every
/// machine it counts.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportFields {
    submitted_by: UserId,
    submitted_at: Timestamp,
    tallies: Tallies,
    #[serde(default)]
    photo_ref: Option<PhotoRef>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<ReportFields> for Report {
    type Error = String;

    fn try_from(fields: ReportFields) -> Result<Self, Self::Error> {
        if let Some(machine) = fields.tallies.first_incomplete() {
            let tally = fields.tallies.get(machine);
            return Err(format!(
                "report has {} of {} {machine} statuses",
                tally.status().len(),
                tally.count()
            ));
        }
        Ok(Self::new(
            fields.submitted_by,
            fields.submitted_at,
            fields.tallies,
            fields.photo_ref,
            fields.message,
        ))
    }
}

impl Report {
    pub(crate) fn new(
        submitted_by: UserId,
        submitted_at: Timestamp,
        tallies: Tallies,
        photo_ref: Option<PhotoRef>,
        message: Option<String>,
    ) -> Self {
        Self {
            submitted_by,
            submitted_at,
            tallies,
            photo_ref,
            message,
        }
    }

    pub fn submitted_by(&self) -> &UserId {
        &self.submitted_by
    }

    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    pub fn tallies(&self) -> &Tallies {
        &self.tallies
    }

    pub fn photo_ref(&self) -> Option<&PhotoRef> {
        self.photo_ref.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Machines marked thumbs-up across all types.
    pub fn good_machine_count(&self) -> u64 {
        self.tallies.thumbs_up_count()
    }

    /// Machines of any type, working or not.
    pub fn total_machine_count(&self) -> u64 {
        self.tallies.total_count()
    }
}
