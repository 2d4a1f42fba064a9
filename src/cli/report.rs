//! The report command: drive the wizard from arguments, then submit.

use std::{fs, path::PathBuf, thread};

use clap::{Args, ValueEnum};
use jiff::Timestamp;
use tracing::warn;

use crate::config::{Config, RetryPolicy};
use crate::gateway::Gateway;
use crate::identity;
use crate::model::{MachineStatus, MachineType, Place, PlaceId, Report, UserId};
use crate::storage::Storage;
use crate::wizard::Wizard;
use crate::workflow::{SubmitError, Workflow};

use super::{PlaceArgs, format::format_report, parse_place_id};

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Place ID from the place search.
    pub(super) place_id: String,

    /// Who is reporting. Falls back to `CAN_EYE_USER`, then the config.
    #[arg(long = "as")]
    pub(super) user: Option<String>,

    /// Glass machines, one status each (e.g. `up,repair`).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub(super) glass: Vec<StatusArg>,

    /// Can machines, one status each.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub(super) can: Vec<StatusArg>,

    /// Bottle machines, one status each.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub(super) bottle: Vec<StatusArg>,

    /// Photo to attach.
    #[arg(long)]
    pub(super) photo: Option<PathBuf>,

    /// Free-text note.
    #[arg(long)]
    pub(super) message: Option<String>,

    /// Needed only when the place has never been stored.
    #[command(flatten)]
    pub(super) place: PlaceArgs,
}

/// CLI-facing machine status, mapped to the domain `MachineStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    /// Working.
    Up,
    /// Needs repair.
    Repair,
}

impl StatusArg {
    fn to_domain(self) -> MachineStatus {
        match self {
            Self::Up => MachineStatus::ThumbsUp,
            Self::Repair => MachineStatus::RepairNeeded,
        }
    }
}

pub(super) fn cmd_report(
    config: &Config,
    storage: &Storage,
    args: ReportArgs,
) -> Result<(), String> {
    let place_id = parse_place_id(&args.place_id)?;
    let stored = storage
        .load_location(&place_id)
        .map_err(|e| format!("failed to load location: {e}"))?;
    let place = resolve_place(stored.map(|l| l.place), place_id, args.place)?;
    let user = identity::resolve_user(args.user.as_deref(), config)?;
    let photo = args
        .photo
        .as_ref()
        .map(|path| fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display())))
        .transpose()?;

    let mut workflow = Workflow::new(storage, place);
    let tallies = [
        (MachineType::Glass, args.glass.as_slice()),
        (MachineType::Can, args.can.as_slice()),
        (MachineType::Bottle, args.bottle.as_slice()),
    ];
    fill_wizard(workflow.wizard_mut(), &tallies, photo, args.message)
        .map_err(|e| e.to_string())?;

    let report = submit_with_retry(&mut workflow, user.as_ref(), &config.retry)?;

    let location = storage
        .require_location(&workflow.place().place_id)
        .map_err(|e| format!("report saved but could not be read back: {e}"))?;
    eprintln!(
        "Report saved for {}: {}/{} machines working",
        location.place.name,
        location.good_machine_count(),
        location.total_machine_count(),
    );
    println!("{}", format_report(location.reports().len(), &report));
    Ok(())
}

/// A stored place wins, and describing it again is refused rather than
/// silently ignored. Unknown places are built from the flags.
fn resolve_place(
    stored: Option<Place>,
    place_id: PlaceId,
    args: PlaceArgs,
) -> Result<Place, String> {
    match stored {
        Some(place) => {
            let given = args.given();
            if given.is_empty() {
                Ok(place)
            } else {
                Err(format!(
                    "place '{place_id}' is already known; drop {}",
                    given.join(", ")
                ))
            }
        }
        None => args.into_place(place_id),
    }
}

/// Feed one machine type at a time through the wizard, as a UI would:
/// count, mark each unit, move on. Ends at Confirm.
fn fill_wizard(
    wizard: &mut Wizard,
    tallies: &[(MachineType, &[StatusArg])],
    photo: Option<Vec<u8>>,
    message: Option<String>,
) -> Result<(), crate::model::ValidationError> {
    for (machine, statuses) in tallies {
        for (index, status) in statuses.iter().enumerate() {
            wizard.increment(*machine)?;
            wizard.set_status(*machine, index, status.to_domain())?;
        }
        wizard.next()?;
    }
    match photo {
        Some(bytes) => wizard.attach_photo(bytes)?,
        None => wizard.skip_photo()?,
    }
    wizard.set_message(message);
    Ok(())
}

/// Submit, retrying remote failures per `policy`. A retried write reuses
/// the report assembled by the first attempt.
fn submit_with_retry<G: Gateway>(
    workflow: &mut Workflow<'_, G>,
    user: Option<&UserId>,
    policy: &RetryPolicy,
) -> Result<Report, String> {
    let mut attempt = 1;
    loop {
        match workflow.submit(user, Timestamp::now()) {
            Ok(report) => return Ok(report),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(attempt, ?delay, error = %e, "submission failed; retrying");
                thread::sleep(delay);
                attempt += 1;
            }
            Err(SubmitError::Validation(e)) => return Err(e.to_string()),
            Err(e) => return Err(format!("report not saved: {e}")),
        }
    }
}
