//! Machine tallies: how many units of each type were seen, and in what shape.

use serde::{Deserialize, Serialize};

use super::{MachineStatus, MachineType, ValidationError};

/// Count and per-unit status for one machine type.
///
/// `slots[i]` belongs to the i-th unit and is `None` until marked. Slots may
/// be set in any order. The slot list is never longer than `count`; units
/// past its end are unmarked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TallyFields", into = "TallyFields")]
pub struct MachineTally {
    count: u32,
    slots: Vec<Option<MachineStatus>>,
}

/// Wire shape: a dense status list, validated into a [`MachineTally`] on the
/// way in.
#[derive(Serialize, Deserialize)]
struct TallyFields {
    count: u32,
    #[serde(default)]
    status: Vec<MachineStatus>,
}

impl TryFrom<TallyFields> for MachineTally {
    type Error = String;

    fn try_from(fields: TallyFields) -> Result<Self, Self::Error> {
        if fields.status.len() > fields.count as usize {
            return Err(format!(
                "tally has {} statuses for {} machines",
                fields.status.len(),
                fields.count
            ));
        }
        Ok(Self {
            count: fields.count,
            slots: fields.status.into_iter().map(Some).collect(),
        })
    }
}

impl From<MachineTally> for TallyFields {
    fn from(tally: MachineTally) -> Self {
        Self {
            count: tally.count,
            status: tally.slots.into_iter().flatten().collect(),
        }
    }
}

impl MachineTally {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Recorded statuses in unit order, skipping unmarked units.
    pub fn status(&self) -> Vec<MachineStatus> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Removes the last unit along with its status, if it had one.
    ///
    /// Saturates at zero.
    pub fn decrement(&mut self) {
        self.count = self.count.saturating_sub(1);
        self.slots.truncate(self.count as usize);
        // No trailing unmarked slots, so equal tallies compare equal.
        while self.slots.last() == Some(&None) {
            self.slots.pop();
        }
    }

    /// Records the status of unit `index`, overwriting any earlier mark.
    pub fn set_status(
        &mut self,
        machine: MachineType,
        index: usize,
        status: MachineStatus,
    ) -> Result<(), ValidationError> {
        if index >= self.count as usize {
            return Err(ValidationError::NoSuchMachine {
                machine,
                index,
                count: self.count,
            });
        }
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(status);
        Ok(())
    }

    /// Every unit has a status. Trivially true for zero units.
    pub fn is_complete(&self) -> bool {
        self.slots.len() == self.count as usize && self.slots.iter().all(Option::is_some)
    }

    pub fn thumbs_up(&self) -> u64 {
        self.count_of(MachineStatus::ThumbsUp)
    }

    pub fn repair_needed(&self) -> u64 {
        self.count_of(MachineStatus::RepairNeeded)
    }

    fn count_of(&self, status: MachineStatus) -> u64 {
        let n = self.slots.iter().filter(|s| **s == Some(status)).count();
        u64::try_from(n).unwrap_or(u64::MAX)
    }
}

/// One tally per machine type. All three are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tallies {
    pub glass: MachineTally,
    pub can: MachineTally,
    pub bottle: MachineTally,
}

impl Tallies {
    pub fn get(&self, machine: MachineType) -> &MachineTally {
        match machine {
            MachineType::Glass => &self.glass,
            MachineType::Can => &self.can,
            MachineType::Bottle => &self.bottle,
        }
    }

    pub fn get_mut(&mut self, machine: MachineType) -> &mut MachineTally {
        match machine {
            MachineType::Glass => &mut self.glass,
            MachineType::Can => &mut self.can,
            MachineType::Bottle => &mut self.bottle,
        }
    }

    pub fn increment(&mut self, machine: MachineType) {
        self.get_mut(machine).increment();
    }

    pub fn decrement(&mut self, machine: MachineType) {
        self.get_mut(machine).decrement();
    }

    pub fn set_status(
        &mut self,
        machine: MachineType,
        index: usize,
        status: MachineStatus,
    ) -> Result<(), ValidationError> {
        self.get_mut(machine).set_status(machine, index, status)
    }

    pub fn is_complete(&self, machine: MachineType) -> bool {
        self.get(machine).is_complete()
    }

    /// The first machine type, in wizard order, still missing a status.
    pub fn first_incomplete(&self) -> Option<MachineType> {
        MachineType::ALL.into_iter().find(|t| !self.is_complete(*t))
    }

    /// Units across all types. Each stored count may be up to `u32::MAX`.
    pub fn total_count(&self) -> u64 {
        MachineType::ALL
            .iter()
            .map(|t| u64::from(self.get(*t).count()))
            .sum()
    }

    pub fn thumbs_up_count(&self) -> u64 {
        MachineType::ALL.iter().map(|t| self.get(*t).thumbs_up()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::MachineStatus::{RepairNeeded, ThumbsUp};

    #[test]
    fn n_increments_and_n_statuses_complete() {
        for n in 0..6 {
            let mut tally = MachineTally::default();
            for _ in 0..n {
                tally.increment();
            }
            for i in 0..n {
                tally.set_status(MachineType::Can, i, ThumbsUp).unwrap();
            }
            assert!(tally.is_complete(), "n = {n}");
            assert_eq!(tally.count() as usize, n);
        }
    }

    #[test]
    fn zero_count_is_complete() {
        assert!(MachineTally::default().is_complete());
        assert!(Tallies::default().first_incomplete().is_none());
    }

    #[test]
    fn decrement_never_leaves_more_statuses_than_machines() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();
        tally.increment();
        tally.set_status(MachineType::Glass, 0, ThumbsUp).unwrap();
        tally.set_status(MachineType::Glass, 1, RepairNeeded).unwrap();

        // Each step must hold the invariant, including past zero.
        for _ in 0..5 {
            tally.decrement();
            assert!(tally.status().len() <= tally.count() as usize);
        }
        assert_eq!(tally.count(), 0);
        assert!(tally.status().is_empty());
    }

    #[test]
    fn decrement_drops_last_status() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();
        tally.set_status(MachineType::Glass, 0, ThumbsUp).unwrap();
        tally.set_status(MachineType::Glass, 1, RepairNeeded).unwrap();

        tally.decrement();
        assert_eq!(tally.count(), 1);
        assert_eq!(tally.status(), [ThumbsUp]);
    }

    #[test]
    fn decrement_with_partial_statuses_stays_bounded() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();
        tally.set_status(MachineType::Glass, 0, RepairNeeded).unwrap();

        tally.decrement();
        assert_eq!(tally.count(), 1);
        assert!(tally.status().len() <= 1);
    }

    #[test]
    fn overwriting_a_status_is_allowed() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.set_status(MachineType::Bottle, 0, RepairNeeded).unwrap();
        tally.set_status(MachineType::Bottle, 0, ThumbsUp).unwrap();
        assert_eq!(tally.status(), [ThumbsUp]);
    }

    #[test]
    fn status_index_must_be_below_count() {
        let mut tally = MachineTally::default();
        tally.increment();
        let err = tally.set_status(MachineType::Can, 1, ThumbsUp).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NoSuchMachine { index: 1, count: 1, .. }
        ));
    }

    #[test]
    fn statuses_can_be_set_in_any_order() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();

        tally.set_status(MachineType::Can, 1, RepairNeeded).unwrap();
        assert!(!tally.is_complete());
        assert_eq!(tally.status(), [RepairNeeded]);

        tally.set_status(MachineType::Can, 0, ThumbsUp).unwrap();
        assert!(tally.is_complete());
        assert_eq!(tally.status(), [ThumbsUp, RepairNeeded]);
    }

    #[test]
    fn decrement_drops_only_the_last_unit() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();
        tally.increment();
        tally.set_status(MachineType::Glass, 2, ThumbsUp).unwrap();

        // The marked unit was the last one.
        tally.decrement();
        assert_eq!(tally.count(), 2);
        assert!(tally.status().is_empty());

        tally.set_status(MachineType::Glass, 0, RepairNeeded).unwrap();
        tally.decrement();
        assert_eq!(tally.status(), [RepairNeeded]);
        assert!(tally.is_complete());
    }

    #[test]
    fn serializes_dense_status_list() {
        let mut tally = MachineTally::default();
        tally.increment();
        tally.increment();
        tally.set_status(MachineType::Bottle, 1, ThumbsUp).unwrap();
        tally.set_status(MachineType::Bottle, 0, RepairNeeded).unwrap();

        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"count": 2, "status": ["repairNeeded", "thumbsUp"]})
        );
    }

    #[test]
    fn huge_stored_counts_do_not_overflow_totals() {
        let tallies: Tallies = serde_json::from_str(
            r#"{
                "glass": {"count": 4294967295, "status": []},
                "can": {"count": 1, "status": ["thumbsUp"]},
                "bottle": {"count": 4294967295, "status": []}
            }"#,
        )
        .unwrap();
        assert_eq!(tallies.total_count(), 2 * u64::from(u32::MAX) + 1);
        assert_eq!(tallies.thumbs_up_count(), 1);
    }

    #[test]
    fn increment_saturates() {
        let mut tally: MachineTally =
            serde_json::from_str(r#"{"count":4294967295,"status":[]}"#).unwrap();
        tally.increment();
        assert_eq!(tally.count(), u32::MAX);
    }

    #[test]
    fn edits_only_touch_the_named_type() {
        let mut tallies = Tallies::default();
        tallies.increment(MachineType::Bottle);
        assert_eq!(tallies.bottle.count(), 1);
        assert_eq!(tallies.glass.count(), 0);
        assert_eq!(tallies.can.count(), 0);
        assert_eq!(tallies.first_incomplete(), Some(MachineType::Bottle));
    }

    #[test]
    fn rejects_overfull_tally_on_deserialize() {
        let err = serde_json::from_str::<MachineTally>(r#"{"count":0,"status":["thumbsUp"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("1 statuses for 0 machines"));
    }

    #[test]
    fn missing_status_deserializes_as_empty() {
        let tally: MachineTally = serde_json::from_str(r#"{"count":0}"#).unwrap();
        assert!(tally.is_complete());
    }
}
