//! Core data model for Can Eye.
//!
//! These types represent what a reporter sees at a location:
//! machine tallies, reports, and the locations that accumulate them.

mod location;
mod machine;
mod report;
mod step;
mod tally;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use location::{Coordinates, Location, Place};
pub use machine::{MachineStatus, MachineType};
pub use report::Report;
pub use step::Step;
pub use tally::{MachineTally, Tallies};

/// Local, recoverable problems with what the reporter has entered so far.
///
/// Raising one never changes workflow state; repeating the action after
/// fixing the input proceeds normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("selection required: mark every {0} machine as 👍 or 🛠️")]
    SelectionRequired(MachineType),

    #[error("no {machine} machine #{index}: only {count} counted")]
    NoSuchMachine {
        machine: MachineType,
        index: usize,
        count: u32,
    },

    #[error("{machine} machines can only be changed at the {machine} step (now at {step})")]
    NotEditable { machine: MachineType, step: Step },

    #[error("photos are chosen at the photo step (now at {0})")]
    NotAtPhotoStep(Step),

    #[error("photo is empty")]
    EmptyPhoto,

    #[error("already at confirm: submit or cancel")]
    AtConfirm,

    #[error("report is not ready to submit (now at {0})")]
    NotAtConfirm(Step),

    #[error("sign in to submit a report")]
    NotAuthenticated,

    #[error("place id is empty")]
    EmptyPlaceId,
}

/// Identity of the person submitting a report. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::NotAuthenticated);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External place identifier, as issued by the place-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyPlaceId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an uploaded photo can be fetched from. Opaque to the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
