//! Report assembly: sealing a finished tally into an immutable report.
//!
//! Pure: no I/O, no clock. The caller supplies `now` and any photo
//! reference, which must already have been uploaded.

use jiff::Timestamp;

use crate::model::{PhotoRef, Report, Tallies, UserId, ValidationError};

/// Build a report from completed tallies.
///
/// The tallies are copied, so resetting or editing the wizard afterwards
/// cannot reach into the returned report. Blank messages are dropped.
pub fn assemble(
    tallies: &Tallies,
    photo_ref: Option<PhotoRef>,
    user: &UserId,
    now: Timestamp,
    message: Option<&str>,
) -> Result<Report, ValidationError> {
    if let Some(machine) = tallies.first_incomplete() {
        return Err(ValidationError::SelectionRequired(machine));
    }

    let message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from);

    Ok(Report::new(
        user.clone(),
        now,
        tallies.clone(),
        photo_ref,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{MachineStatus, MachineType};

    fn tallies_with_one_glass() -> Tallies {
        let mut tallies = Tallies::default();
        tallies.increment(MachineType::Glass);
        tallies
            .set_status(MachineType::Glass, 0, MachineStatus::ThumbsUp)
            .unwrap();
        tallies
    }

    fn user() -> UserId {
        UserId::new("a@x.com").unwrap()
    }

    fn at() -> Timestamp {
        Timestamp::new(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn same_inputs_give_equal_reports() {
        let tallies = tallies_with_one_glass();
        let photo = Some(PhotoRef::new("photos/abc"));

        let a = assemble(&tallies, photo.clone(), &user(), at(), None).unwrap();
        let b = assemble(&tallies, photo, &user(), at(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn report_is_isolated_from_later_tally_edits() {
        let mut tallies = tallies_with_one_glass();
        let report = assemble(&tallies, None, &user(), at(), None).unwrap();

        tallies.increment(MachineType::Glass);
        tallies
            .set_status(MachineType::Glass, 1, MachineStatus::RepairNeeded)
            .unwrap();
        tallies = Tallies::default();

        assert_eq!(report.tallies().glass.count(), 1);
        assert_eq!(report.tallies().glass.status(), [MachineStatus::ThumbsUp]);
        assert_eq!(tallies.total_count(), 0);
    }

    #[test]
    fn incomplete_tally_is_refused() {
        let mut tallies = tallies_with_one_glass();
        tallies.increment(MachineType::Bottle);

        let err = assemble(&tallies, None, &user(), at(), None).unwrap_err();
        assert_eq!(err, ValidationError::SelectionRequired(MachineType::Bottle));
    }

    #[test]
    fn records_caller_clock_and_user() {
        let report = assemble(&tallies_with_one_glass(), None, &user(), at(), None).unwrap();
        assert_eq!(report.submitted_at(), at());
        assert_eq!(report.submitted_by().as_str(), "a@x.com");
        assert!(report.photo_ref().is_none());
    }

    #[test]
    fn blank_message_is_dropped() {
        let tallies = tallies_with_one_glass();
        let blank = assemble(&tallies, None, &user(), at(), Some("   ")).unwrap();
        assert!(blank.message().is_none());

        let note = assemble(&tallies, None, &user(), at(), Some(" Line out the door ")).unwrap();
        assert_eq!(note.message(), Some("Line out the door"));
    }
}
