//! Wizard steps.

use std::fmt;

use super::MachineType;

/// Where the report wizard stands.
///
/// Forward-only: Glass → Can → Bottle → Photo → Confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Glass,
    Can,
    Bottle,
    Photo,
    Confirm,
}

impl Step {
    /// The machine type counted at this step, if it is a counting step.
    pub fn machine(self) -> Option<MachineType> {
        match self {
            Self::Glass => Some(MachineType::Glass),
            Self::Can => Some(MachineType::Can),
            Self::Bottle => Some(MachineType::Bottle),
            Self::Photo | Self::Confirm => None,
        }
    }

    /// The step after this one. `None` at Confirm.
    pub fn following(self) -> Option<Self> {
        match self {
            Self::Glass => Some(Self::Can),
            Self::Can => Some(Self::Bottle),
            Self::Bottle => Some(Self::Photo),
            Self::Photo => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Glass => "glass",
            Self::Can => "can",
            Self::Bottle => "bottle",
            Self::Photo => "photo",
            Self::Confirm => "confirm",
        })
    }
}
