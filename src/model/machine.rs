//! Machine kinds and per-unit condition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of recycling machine a location can have.
///
/// Closed set. [`MachineType::ALL`] fixes the order the wizard walks them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MachineType {
    Glass,
    Can,
    Bottle,
}

impl MachineType {
    pub const ALL: [Self; 3] = [Self::Glass, Self::Can, Self::Bottle];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Can => "can",
            Self::Bottle => "bottle",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the reporter saw for a single machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MachineStatus {
    /// Working.
    ThumbsUp,

    /// Broken or out of service.
    RepairNeeded,
}
