//! HTTP client for the screening service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::errors::ScreeningError;
use crate::submission::staging::{StagedFile, PDF_MIME};
use crate::submission::ScreeningTransport;
use crate::types::{HealthStatus, HistoryEntry, HistoryPage, ScreeningResponse};

const USER_AGENT: &str = concat!("resume-screen/", env!("CARGO_PKG_VERSION"));
const FILES_FIELD: &str = "files";
const DESCRIPTION_FIELD: &str = "job_description";

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ScreeningError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    pub async fn health(&self) -> Result<HealthStatus, ScreeningError> {
        self.get_json(&self.config.health_url()).await
    }

    pub async fn history(&self) -> Result<HistoryPage, ScreeningError> {
        self.get_json(&self.config.history_url()).await
    }

    pub async fn screening(&self, id: i64) -> Result<HistoryEntry, ScreeningError> {
        self.get_json(&self.config.screening_url(id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ScreeningError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let body = success_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| ScreeningError::MalformedResponse(format!("GET {url}: {e}")))
    }
}

#[async_trait]
impl ScreeningTransport for ApiClient {
    async fn upload(
        &self,
        files: &[StagedFile],
        job_description: &str,
    ) -> Result<ScreeningResponse, ScreeningError> {
        let url = self.config.upload_url();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(PDF_MIME)?;
            form = form.part(FILES_FIELD, part);
        }
        form = form.text(DESCRIPTION_FIELD, job_description.to_string());

        info!("POST {url} with {} file(s)", files.len());
        let response = self.client.post(&url).multipart(form).send().await?;
        let body = success_body(response).await?;
        ScreeningResponse::decode(&body)
    }
}

/// Returns the body of a 2xx response, or a transport error carrying the
/// server's `detail` text when it sent one.
async fn success_body(response: Response) -> Result<String, ScreeningError> {
    let status = response.status();
    let body = response.text().await?;
    debug!("response status {status}, {} byte(s)", body.len());
    if !status.is_success() {
        let preview: String = body.chars().take(180).collect();
        debug!("error body: {preview}");
        return Err(ScreeningError::Transport {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(body)
}

/// Extracts the human-readable `detail` from an error body.
///
/// A list-valued `detail` (request validation errors) is flattened by joining
/// the entries' `msg` fields.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}
