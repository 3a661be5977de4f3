//! Submission wizard.
//!
//! A [`SubmissionWorkflow`] walks one disclosure through the input steps and
//! hands the finalized [`Submission`] to the ingestion service. The ingestion
//! call runs as a spawned task whose handle the workflow owns: stepping back,
//! cancelling or dropping the workflow aborts it, so a late response can only
//! ever land on the instance that sent it.
//!
//! A request that already finished when the user steps back is applied, not
//! thrown away. One that was cut off mid-flight may still have been filed, so
//! the workflow refuses to send the draft again until the caller confirms
//! with [`SubmissionWorkflow::confirm_resubmit`].
//!
//! [`Submission`]: patentwise_core::Submission

mod draft;
mod step;

pub use draft::{Draft, RECAP_TEXT_CHARS, Recap, ValidationError, validate_upload};
pub use step::Step;

use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use patentwise_core::config::UploadConfig;
use patentwise_core::{DocumentRef, Domain, DomainKeywords, Principal, SubmissionId};
use patentwise_risk::suggest_domain;
use patentwise_store::{
    Backend, ContentStore, DocumentUpload, IngestionError, StoreError, SubmissionIngestion,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::gate::{GateError, IdentityGate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("cannot {action} while at step {step}")]
    WrongStep { action: &'static str, step: Step },
    #[error("document upload failed: {0}")]
    Store(#[from] StoreError),
    #[error("submission failed: {0}")]
    Ingestion(#[from] IngestionError),
    #[error("an interrupted submission may already have been filed; confirm before sending again")]
    OutcomeUnknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The ingestion call was started.
    Started,
    /// A submission is already in flight; nothing was sent.
    AlreadyInFlight,
}

type Joined = Result<Result<SubmissionId, IngestionError>, tokio::task::JoinError>;
type InFlight = JoinHandle<Result<SubmissionId, IngestionError>>;

pub struct SubmissionWorkflow {
    owner: Principal,
    content: Arc<dyn ContentStore>,
    ingestion: Arc<dyn SubmissionIngestion>,
    limits: UploadConfig,
    step: Step,
    draft: Draft,
    last_error: Option<WorkflowError>,
    in_flight: Option<InFlight>,
    outcome_unknown: bool,
    submission_id: Option<SubmissionId>,
}

impl SubmissionWorkflow {
    /// Start a wizard for the signed-in user.
    pub fn new(gate: &IdentityGate, backend: &Backend, limits: UploadConfig) -> Result<Self, GateError> {
        let owner = gate.require_principal()?.clone();
        Ok(Self {
            owner,
            content: backend.content.clone(),
            ingestion: backend.ingestion.clone(),
            limits,
            step: Step::CollectingInfo,
            draft: Draft::default(),
            last_error: None,
            in_flight: None,
            outcome_unknown: false,
            submission_id: None,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The most recent submit failure, cleared on the next submit.
    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// Set once the workflow reaches `Complete`.
    pub fn submission_id(&self) -> Option<&SubmissionId> {
        self.submission_id.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True after a request was aborted before its answer arrived.
    pub fn outcome_unknown(&self) -> bool {
        self.outcome_unknown
    }

    /// Accept the risk of a duplicate after an interrupted submission and
    /// allow `submit` again.
    pub fn confirm_resubmit(&mut self) {
        if self.outcome_unknown {
            info!("resubmit confirmed after interrupted submission");
            self.outcome_unknown = false;
        }
    }

    /// Whether `next` would succeed right now.
    pub fn can_advance(&self) -> bool {
        self.step.next_input().is_some() && self.draft.validate(self.step).is_ok()
    }

    /// Validate the current step and move to the next one.
    pub fn next(&mut self) -> Result<Step, WorkflowError> {
        let Some(next) = self.step.next_input() else {
            return Err(WorkflowError::WrongStep {
                action: "advance",
                step: self.step,
            });
        };
        self.draft.validate(self.step)?;
        debug!(from = %self.step, to = %next, "workflow advanced");
        self.step = next;
        Ok(next)
    }

    /// Step back. From `Submitting` this interrupts the outstanding request
    /// (see [`cancel`](Self::cancel)). `Complete` stays put.
    pub fn back(&mut self) -> Step {
        if self.step == Step::Submitting {
            self.interrupt();
        } else {
            self.step = self.step.previous_input();
        }
        self.step
    }

    /// Leave `Submitting`. A request that already answered is applied, so a
    /// success still lands on `Complete`. Otherwise it is aborted and the
    /// workflow returns to `Review` with the outcome marked unknown. Does
    /// nothing outside `Submitting`.
    pub fn cancel(&mut self) {
        if self.step == Step::Submitting {
            self.interrupt();
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.step.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_editable("edit the title")?;
        self.draft.title = title.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_editable("edit the description")?;
        self.draft.description = description.into();
        Ok(())
    }

    pub fn set_inventors(&mut self, inventors: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_editable("edit the inventors")?;
        self.draft.inventors = inventors.into();
        Ok(())
    }

    /// Non-empty text replaces any attached document.
    pub fn set_raw_text(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_editable("edit the text")?;
        self.draft.set_raw_text(text.into());
        Ok(())
    }

    pub fn set_domain(&mut self, domain: Domain) -> Result<(), WorkflowError> {
        self.ensure_editable("select a domain")?;
        self.draft.domain = Some(domain);
        Ok(())
    }

    pub fn clear_document(&mut self) -> Result<(), WorkflowError> {
        self.ensure_editable("remove the document")?;
        self.draft.clear_document();
        Ok(())
    }

    /// Check and upload a file, then attach it in place of any pasted text.
    /// On failure the draft is unchanged.
    pub async fn attach_document(&mut self, upload: DocumentUpload) -> Result<&DocumentRef, WorkflowError> {
        self.ensure_editable("attach a document")?;
        validate_upload(&upload, &self.limits)?;

        let file_name = upload.file_name.clone();
        let document = match self.content.store(&self.owner.user_id, upload).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(file = %file_name, error = %e, "document upload failed");
                return Err(e.into());
            }
        };
        info!(file = %document.file_name, key = %document.key, "document attached");
        self.draft.attach_document(document);
        self.draft
            .document()
            .ok_or(WorkflowError::Invalid(ValidationError::MissingContent))
    }

    /// Pick a domain from keyword hits in the draft's text fields, if one of
    /// the keyword lists names a known domain.
    pub fn suggest_domain(&self, keyword_sets: &[DomainKeywords]) -> Option<Domain> {
        let text = [
            self.draft.title.as_str(),
            self.draft.description.as_str(),
            self.draft.raw_text(),
        ]
        .join(" ");
        let suggestion = suggest_domain(&text, keyword_sets)?;
        keyword_sets
            .iter()
            .find(|k| k.domain_id == suggestion.domain_id)
            .and_then(DomainKeywords::known_domain)
    }

    /// Finalize the draft and send it. Only accepted from `Review`; a second
    /// call while one is in flight sends nothing.
    pub fn submit(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        match self.step {
            Step::Submitting => {
                debug!("submit ignored, already in flight");
                return Ok(SubmitOutcome::AlreadyInFlight);
            }
            Step::Review if self.outcome_unknown => return Err(WorkflowError::OutcomeUnknown),
            Step::Review => {}
            step => {
                return Err(WorkflowError::WrongStep {
                    action: "submit",
                    step,
                });
            }
        }

        let submission = self.draft.finalize(&self.owner.user_id, Utc::now())?;
        info!(
            submission = %submission.id,
            title = %submission.title,
            domain = %submission.domain,
            "submitting disclosure"
        );

        let ingestion = self.ingestion.clone();
        self.in_flight = Some(tokio::spawn(async move { ingestion.create(submission).await }));
        self.last_error = None;
        self.step = Step::Submitting;
        Ok(SubmitOutcome::Started)
    }

    /// Wait for the in-flight submission and apply its result: `Complete` on
    /// success, back to `Review` with the error kept on failure.
    ///
    /// If this future is dropped before it finishes, the request stays owned
    /// by the workflow.
    pub async fn settle(&mut self) -> Result<Step, WorkflowError> {
        let Some(handle) = self.in_flight.as_mut() else {
            return Ok(self.step);
        };
        let joined = handle.await;
        self.in_flight = None;
        self.apply(joined)
    }

    fn apply(&mut self, joined: Joined) -> Result<Step, WorkflowError> {
        let outcome = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "submission task did not finish");
                Err(IngestionError::Interrupted)
            }
        };
        match outcome {
            Ok(id) => {
                info!(submission = %id, "submission accepted");
                self.submission_id = Some(id);
                self.step = Step::Complete;
                Ok(self.step)
            }
            Err(e) => {
                warn!(error = %e, "submission failed, returning to review");
                let err = WorkflowError::Ingestion(e);
                self.last_error = Some(err.clone());
                self.step = Step::Review;
                Err(err)
            }
        }
    }

    fn interrupt(&mut self) {
        let Some(mut handle) = self.in_flight.take() else {
            self.step = Step::Review;
            return;
        };
        if handle.is_finished()
            && let Some(joined) = (&mut handle).now_or_never()
        {
            debug!("submission answered before interrupt, applying it");
            // Failures are kept in `last_error`; the step says where we landed.
            let _ = self.apply(joined);
            return;
        }
        handle.abort();
        warn!("in-flight submission aborted, outcome unknown");
        self.outcome_unknown = true;
        self.last_error = Some(WorkflowError::Ingestion(IngestionError::Interrupted));
        self.step = Step::Review;
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            info!("in-flight submission aborted");
        }
    }
}

impl Drop for SubmissionWorkflow {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
