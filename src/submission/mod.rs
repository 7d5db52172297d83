pub mod form;
pub mod staging;

use async_trait::async_trait;

use crate::errors::ScreeningError;
use crate::types::ScreeningResponse;

pub use form::{SubmissionForm, SubmissionState};
pub use staging::{collect_candidates, StagedFile, Staging};

/// Sends one batch of résumés plus a job description and returns the decoded
/// response. Implementations must issue exactly one request per call.
#[async_trait]
pub trait ScreeningTransport: Send + Sync {
    async fn upload(
        &self,
        files: &[StagedFile],
        job_description: &str,
    ) -> Result<ScreeningResponse, ScreeningError>;
}
