//! The report wizard: a forward-only walk through the machine types,
//! then an optional photo, then confirmation.
//!
//! Each counting step is gated: the reporter cannot leave it until every
//! machine counted there has a status. A refused move leaves everything as
//! it was. There is no way back; closing and starting over is the undo.

use tracing::debug;

use crate::model::{MachineStatus, MachineType, Step, Tallies, ValidationError};

/// In-progress report state, driven one UI event at a time.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    tallies: Tallies,
    photo: Option<Vec<u8>>,
    message: Option<String>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn tallies(&self) -> &Tallies {
        &self.tallies
    }

    /// The attached photo, if the reporter chose one.
    pub fn photo(&self) -> Option<&[u8]> {
        self.photo.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn increment(&mut self, machine: MachineType) -> Result<(), ValidationError> {
        self.require_editable(machine)?;
        self.tallies.increment(machine);
        Ok(())
    }

    pub fn decrement(&mut self, machine: MachineType) -> Result<(), ValidationError> {
        self.require_editable(machine)?;
        self.tallies.decrement(machine);
        Ok(())
    }

    pub fn set_status(
        &mut self,
        machine: MachineType,
        index: usize,
        status: MachineStatus,
    ) -> Result<(), ValidationError> {
        self.require_editable(machine)?;
        self.tallies.set_status(machine, index, status)
    }

    /// Attach a free-text note to the report. Blank text clears it.
    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message.filter(|m| !m.trim().is_empty());
    }

    /// Advance one step.
    ///
    /// Leaving a counting step requires its tally to be complete. At the
    /// photo step this is the same as [`Wizard::skip_photo`].
    pub fn next(&mut self) -> Result<Step, ValidationError> {
        if let Some(machine) = self.step.machine()
            && !self.tallies.is_complete(machine)
        {
            debug!(%machine, "refused to leave incomplete step");
            return Err(ValidationError::SelectionRequired(machine));
        }
        if self.step == Step::Photo {
            self.photo = None;
        }
        let next = self.step.following().ok_or(ValidationError::AtConfirm)?;
        self.advance(next);
        Ok(next)
    }

    pub fn attach_photo(&mut self, bytes: Vec<u8>) -> Result<(), ValidationError> {
        if self.step != Step::Photo {
            return Err(ValidationError::NotAtPhotoStep(self.step));
        }
        if bytes.is_empty() {
            return Err(ValidationError::EmptyPhoto);
        }
        self.photo = Some(bytes);
        self.advance(Step::Confirm);
        Ok(())
    }

    pub fn skip_photo(&mut self) -> Result<(), ValidationError> {
        if self.step != Step::Photo {
            return Err(ValidationError::NotAtPhotoStep(self.step));
        }
        self.photo = None;
        self.advance(Step::Confirm);
        Ok(())
    }

    /// Discard everything and return to the glass step.
    pub fn reset(&mut self) {
        debug!(from = %self.step, "wizard reset");
        *self = Self::default();
    }

    fn advance(&mut self, to: Step) {
        debug!(from = %self.step, %to, "wizard step");
        self.step = to;
    }

    fn require_editable(&self, machine: MachineType) -> Result<(), ValidationError> {
        if self.step.machine() == Some(machine) {
            Ok(())
        } else {
            Err(ValidationError::NotEditable {
                machine,
                step: self.step,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::MachineStatus::{RepairNeeded, ThumbsUp};

    fn at_photo() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), Step::Photo);
        wizard
    }

    #[test]
    fn starts_at_glass() {
        assert_eq!(Wizard::new().step(), Step::Glass);
    }

    #[test]
    fn empty_steps_advance_to_confirm() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.next().unwrap(), Step::Can);
        assert_eq!(wizard.next().unwrap(), Step::Bottle);
        assert_eq!(wizard.next().unwrap(), Step::Photo);
        assert_eq!(wizard.next().unwrap(), Step::Confirm);
        assert_eq!(wizard.next().unwrap_err(), ValidationError::AtConfirm);
        assert_eq!(wizard.step(), Step::Confirm);
    }

    #[test]
    fn incomplete_glass_is_refused_and_state_unchanged() {
        let mut wizard = Wizard::new();
        wizard.increment(MachineType::Glass).unwrap();

        let before = wizard.tallies().clone();
        let err = wizard.next().unwrap_err();

        assert_eq!(err, ValidationError::SelectionRequired(MachineType::Glass));
        assert_eq!(wizard.step(), Step::Glass);
        assert_eq!(wizard.tallies(), &before);

        // Fixing the input lets the same action through.
        wizard.set_status(MachineType::Glass, 0, ThumbsUp).unwrap();
        assert_eq!(wizard.next().unwrap(), Step::Can);
    }

    #[test]
    fn every_counting_step_is_gated() {
        let mut wizard = Wizard::new();
        wizard.next().unwrap();
        wizard.increment(MachineType::Can).unwrap();
        wizard.increment(MachineType::Can).unwrap();
        wizard.set_status(MachineType::Can, 0, RepairNeeded).unwrap();
        assert_eq!(
            wizard.next().unwrap_err(),
            ValidationError::SelectionRequired(MachineType::Can)
        );

        wizard.set_status(MachineType::Can, 1, ThumbsUp).unwrap();
        wizard.next().unwrap();
        wizard.increment(MachineType::Bottle).unwrap();
        assert_eq!(
            wizard.next().unwrap_err(),
            ValidationError::SelectionRequired(MachineType::Bottle)
        );
        assert_eq!(wizard.step(), Step::Bottle);
    }

    #[test]
    fn decrement_drops_last_unit_status() {
        let mut wizard = Wizard::new();
        wizard.increment(MachineType::Glass).unwrap();
        wizard.increment(MachineType::Glass).unwrap();
        wizard.set_status(MachineType::Glass, 1, RepairNeeded).unwrap();
        wizard.decrement(MachineType::Glass).unwrap();

        // The marked unit went away, leaving one unmarked unit.
        assert_eq!(wizard.tallies().glass.count(), 1);
        assert!(wizard.tallies().glass.status().is_empty());
        assert!(wizard.next().is_err());

        wizard.set_status(MachineType::Glass, 0, ThumbsUp).unwrap();
        assert_eq!(wizard.next().unwrap(), Step::Can);
    }

    #[test]
    fn only_current_type_is_editable() {
        let mut wizard = Wizard::new();
        let err = wizard.increment(MachineType::Bottle).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotEditable {
                machine: MachineType::Bottle,
                step: Step::Glass,
            }
        );
        assert_eq!(wizard.tallies().bottle.count(), 0);
    }

    #[test]
    fn photo_is_optional() {
        let mut skipped = at_photo();
        skipped.skip_photo().unwrap();
        assert_eq!(skipped.step(), Step::Confirm);
        assert!(skipped.photo().is_none());

        let mut attached = at_photo();
        attached.attach_photo(vec![0xFF, 0xD8]).unwrap();
        assert_eq!(attached.step(), Step::Confirm);
        assert_eq!(attached.photo(), Some(&[0xFF, 0xD8][..]));
    }

    #[test]
    fn photo_only_at_photo_step() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.attach_photo(vec![1]).unwrap_err(),
            ValidationError::NotAtPhotoStep(Step::Glass)
        );
        assert_eq!(
            wizard.skip_photo().unwrap_err(),
            ValidationError::NotAtPhotoStep(Step::Glass)
        );
    }

    #[test]
    fn empty_photo_is_refused() {
        let mut wizard = at_photo();
        assert_eq!(
            wizard.attach_photo(Vec::new()).unwrap_err(),
            ValidationError::EmptyPhoto
        );
        assert_eq!(wizard.step(), Step::Photo);
    }

    #[test]
    fn reset_clears_everything() {
        let mut wizard = Wizard::new();
        wizard.increment(MachineType::Glass).unwrap();
        wizard.set_status(MachineType::Glass, 0, ThumbsUp).unwrap();
        wizard.set_message(Some("All good".into()));
        wizard.next().unwrap();

        wizard.reset();
        assert_eq!(wizard.step(), Step::Glass);
        assert_eq!(wizard.tallies(), &Tallies::default());
        assert!(wizard.message().is_none());
    }

    #[test]
    fn blank_message_clears_note() {
        let mut wizard = Wizard::new();
        wizard.set_message(Some("Bags only".into()));
        wizard.set_message(Some(" ".into()));
        assert!(wizard.message().is_none());
    }
}
