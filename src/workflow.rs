//! Report submission: taking a confirmed wizard through upload, assembly,
//! the location update, and the write-back.
//!
//! The gateway calls are the only places control leaves the workflow, and
//! a cancellation is checked after each of them before any further local
//! change is made. A failed photo upload leaves the wizard untouched at
//! Confirm. A failed fetch or write keeps the assembled report so a retry
//! reuses it instead of building (and uploading) again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use jiff::Timestamp;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::apply_report;
use crate::assemble::assemble;
use crate::gateway::{Gateway, GatewayError};
use crate::model::{Location, Place, Report, Step, UserId, ValidationError};
use crate::wizard::Wizard;

/// Why a submission did not go through. None of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("photo upload failed: {0}")]
    Upload(GatewayError),

    #[error("failed to save report: {0}")]
    Persistence(GatewayError),

    #[error("submission cancelled")]
    Cancelled,
}

impl SubmitError {
    /// Whether submitting again (unchanged) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upload(_) | Self::Persistence(_))
    }
}

/// Shared flag for closing the report while a gateway call is in flight.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// An assembled report that has not been written yet.
#[derive(Debug, Clone)]
struct PendingWrite {
    report: Report,
    /// The updated location, once it has been fetched and the report applied.
    location: Option<Location>,
}

/// One reporter filing reports for one place.
pub struct Workflow<'g, G: Gateway> {
    id: Uuid,
    gateway: &'g G,
    place: Place,
    wizard: Wizard,
    pending: Option<PendingWrite>,
    cancellation: Cancellation,
}

impl<'g, G: Gateway> Workflow<'g, G> {
    /// Start a report for `place`. The place's descriptive fields are used
    /// to create the location if it has never been stored.
    pub fn new(gateway: &'g G, place: Place) -> Self {
        Self {
            id: Uuid::new_v4(),
            gateway,
            place,
            wizard: Wizard::new(),
            pending: None,
            cancellation: Cancellation::default(),
        }
    }

    pub fn place(&self) -> &Place {
        &self.place
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    /// A handle the environment can use to cancel mid-submission.
    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// The report kept back by a failed write, if any.
    pub fn pending_report(&self) -> Option<&Report> {
        self.pending.as_ref().map(|p| &p.report)
    }

    /// Close the report: drop all in-progress state without writing anything.
    pub fn cancel(&mut self) {
        if self.pending.is_some() {
            warn!(submission = %self.id, "discarding unsaved report");
        }
        self.discard();
    }

    /// Submit the confirmed report.
    ///
    /// `user` is the currently signed-in reporter and `now` the submission
    /// time. When an earlier attempt failed after assembly, both are ignored
    /// and the retained report is written as it was.
    pub fn submit(
        &mut self,
        user: Option<&UserId>,
        now: Timestamp,
    ) -> Result<Report, SubmitError> {
        if let Some(pending) = self.pending.take() {
            info!(submission = %self.id, place = %self.place.place_id, "retrying write");
            return self.write(pending);
        }

        let step = self.wizard.step();
        if step != Step::Confirm {
            return Err(ValidationError::NotAtConfirm(step).into());
        }
        let user = user.ok_or(ValidationError::NotAuthenticated)?;
        if let Some(machine) = self.wizard.tallies().first_incomplete() {
            return Err(ValidationError::SelectionRequired(machine).into());
        }

        let photo_ref = match self.wizard.photo() {
            Some(bytes) => {
                let reference = self.gateway.upload_photo(bytes).map_err(|e| {
                    warn!(submission = %self.id, error = %e, "photo upload failed");
                    SubmitError::Upload(e)
                })?;
                debug!(submission = %self.id, photo = %reference, "photo uploaded");
                Some(reference)
            }
            None => None,
        };
        if self.cancellation.is_cancelled() {
            if let Some(reference) = &photo_ref {
                warn!(
                    submission = %self.id,
                    photo = %reference,
                    "cancelled after upload; photo orphaned"
                );
            }
            self.discard();
            return Err(SubmitError::Cancelled);
        }

        let report = assemble(
            self.wizard.tallies(),
            photo_ref,
            user,
            now,
            self.wizard.message(),
        )?;
        self.write(PendingWrite {
            report,
            location: None,
        })
    }

    /// Fetch-apply-write for an assembled report. On failure the report is
    /// parked in `self.pending` for the next submit.
    fn write(&mut self, mut pending: PendingWrite) -> Result<Report, SubmitError> {
        let location = match pending.location.take() {
            Some(location) => location,
            None => {
                let fetched = match self.gateway.fetch_location(&self.place.place_id) {
                    Ok(fetched) => fetched,
                    Err(e) => {
                        warn!(submission = %self.id, error = %e, "location fetch failed");
                        self.pending = Some(pending);
                        return Err(SubmitError::Persistence(e));
                    }
                };
                if self.cancellation.is_cancelled() {
                    if let Some(reference) = pending.report.photo_ref() {
                        warn!(
                            submission = %self.id,
                            photo = %reference,
                            "cancelled after upload; photo orphaned"
                        );
                    }
                    self.discard();
                    return Err(SubmitError::Cancelled);
                }
                let base = fetched.unwrap_or_else(|| {
                    debug!(place = %self.place.place_id, "first report for place");
                    Location::new(self.place.clone())
                });
                apply_report(base, pending.report.clone())
            }
        };

        match self.gateway.write_location(&location) {
            Ok(()) => {
                info!(
                    submission = %self.id,
                    place = %self.place.place_id,
                    reports = location.reports().len(),
                    "report saved"
                );
                self.wizard.reset();
                Ok(pending.report)
            }
            Err(e) => {
                warn!(submission = %self.id, error = %e, "location write failed");
                if let Some(reference) = pending.report.photo_ref() {
                    warn!(
                        submission = %self.id,
                        photo = %reference,
                        "photo stored without a report"
                    );
                }
                self.pending = Some(PendingWrite {
                    report: pending.report,
                    location: Some(location),
                });
                Err(SubmitError::Persistence(e))
            }
        }
    }

    fn discard(&mut self) {
        self.pending = None;
        self.wizard.reset();
        self.cancellation.clear();
    }
}
