use std::path::PathBuf;

use thiserror::Error;

use crate::config::MessagesConfig;

/// Input problems caught before anything leaves the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no files staged")]
    NoFiles,
    #[error("{attempted} files exceed the limit of {max}")]
    TooManyFiles { attempted: usize, max: usize },
    #[error("job description is blank")]
    BlankDescription,
}

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("screening service returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Transport { status: u16, detail: Option<String> },

    #[error("request to screening service failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed screening response: {0}")]
    MalformedResponse(String),

    #[error("failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScreeningError {
    /// The single line shown to the user for this failure.
    ///
    /// Server-provided `detail` wins; every other transport-side failure,
    /// including a malformed body, collapses to the generic upload message.
    pub fn user_message(&self, messages: &MessagesConfig) -> String {
        match self {
            Self::Validation(ValidationError::NoFiles) => messages.no_files.clone(),
            Self::Validation(ValidationError::BlankDescription) => {
                messages.blank_description.clone()
            }
            Self::Validation(ValidationError::TooManyFiles { max, .. }) => messages
                .too_many_files
                .replace("{max}", &max.to_string()),
            Self::Transport {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Io { path, .. } => format!("Could not read {}", path.display()),
            Self::Transport { .. } | Self::Network(_) | Self::MalformedResponse(_) => {
                messages.upload_failed.clone()
            }
        }
    }
}
