use tracing::{info, warn};

use crate::config::MessagesConfig;
use crate::errors::{ScreeningError, ValidationError};
use crate::submission::staging::{StagedFile, Staging};
use crate::submission::ScreeningTransport;
use crate::types::ScreeningResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
}

/// Staged files, job description, busy flag and last error of the upload
/// form.
#[derive(Debug, Clone)]
pub struct SubmissionForm {
    staging: Staging,
    job_description: String,
    state: SubmissionState,
    last_error: Option<String>,
    messages: MessagesConfig,
}

impl SubmissionForm {
    pub fn new(max_files: usize, messages: MessagesConfig) -> Self {
        Self {
            staging: Staging::new(max_files),
            job_description: String::new(),
            state: SubmissionState::Idle,
            last_error: None,
            messages,
        }
    }

    /// Adds candidate files; on rejection the error is recorded and `false`
    /// returned with staging untouched.
    pub fn stage(&mut self, candidates: Vec<StagedFile>) -> bool {
        match self.staging.add(candidates) {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                self.last_error = Some(ScreeningError::from(err).user_message(&self.messages));
                false
            }
        }
    }

    pub fn remove_file(&mut self, index: usize) -> Option<StagedFile> {
        self.staging.remove(index)
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn files(&self) -> &[StagedFile] {
        self.staging.files()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.staging.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if self.staging.len() > self.staging.max_files() {
            return Err(ValidationError::TooManyFiles {
                attempted: self.staging.len(),
                max: self.staging.max_files(),
            });
        }
        if self.job_description.trim().is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        Ok(())
    }

    /// Runs one pass of the form state machine.
    ///
    /// Validation failures return before the transport is touched. The form
    /// is back in `Idle` on every exit path; on success staging and the
    /// description are cleared, on failure they are kept for a retry.
    ///
    /// The `&mut self` borrow is held across the upload, so a second submit
    /// cannot start while one is in flight.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<ScreeningResponse, ScreeningError>
    where
        T: ScreeningTransport + ?Sized,
    {
        self.state = SubmissionState::Validating;
        if let Err(err) = self.validate() {
            self.state = SubmissionState::Idle;
            let err = ScreeningError::from(err);
            self.last_error = Some(err.user_message(&self.messages));
            return Err(err);
        }

        self.state = SubmissionState::Submitting;
        self.last_error = None;
        info!(
            "submitting {} resume(s) for screening",
            self.staging.len()
        );
        let outcome = transport
            .upload(self.staging.files(), &self.job_description)
            .await;
        self.state = SubmissionState::Idle;

        match outcome {
            Ok(response) => {
                info!("screening returned {} row(s)", response.rows().len());
                self.staging.clear();
                self.job_description.clear();
                Ok(response)
            }
            Err(err) => {
                warn!("screening request failed: {err}");
                self.last_error = Some(err.user_message(&self.messages));
                Err(err)
            }
        }
    }
}
