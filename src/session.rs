use crate::config::Config;
use crate::errors::ScreeningError;
use crate::submission::{ScreeningTransport, SubmissionForm};
use crate::types::{ScreeningResponse, ScreeningResult};
use crate::view::SortState;

/// Everything the screens share: the upload form, the result on display and
/// its sort state.
#[derive(Debug, Clone)]
pub struct Session {
    pub form: SubmissionForm,
    result: Option<ScreeningResponse>,
    sort: SortState,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            form: SubmissionForm::new(config.upload.max_files, config.messages.clone()),
            result: None,
            sort: SortState::default(),
        }
    }

    /// Submits the form. The current result stays in place while the request
    /// is in flight and after a failure; a success replaces it wholesale.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<&ScreeningResponse, ScreeningError>
    where
        T: ScreeningTransport + ?Sized,
    {
        let response = self.form.submit(transport).await?;
        Ok(self.show(response))
    }

    /// Puts a response on display with the default ordering.
    pub fn show(&mut self, response: ScreeningResponse) -> &ScreeningResponse {
        self.sort = SortState::default();
        self.result.insert(response)
    }

    pub fn result(&self) -> Option<&ScreeningResponse> {
        self.result.as_ref()
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }

    /// Rows of the current result in display order.
    pub fn visible_rows(&self) -> Vec<&ScreeningResult> {
        self.result
            .as_ref()
            .map(|r| self.sort.apply(r.rows()))
            .unwrap_or_default()
    }
}
