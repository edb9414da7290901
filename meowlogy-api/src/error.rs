use meowlogy_utils::validation::ValidationError;
use thiserror::Error;

/// Failures talking to the cat-facts collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or connectivity failure (DNS, refused connection, reset mid-body).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The collaborator answered 2xx with a body we cannot interpret.
    #[error("unexpected response format: {0}")]
    Format(String),

    /// Rejected locally before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx answer, with the collaborator's `detail`/`message` when it sent one.
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// A streaming endpoint answered 2xx but without a body to read.
    #[error("no response body received")]
    NoBody,
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Text suitable for a transient notice in the front end.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Error connecting to server".to_owned(),
            Self::Format(_) => "Unexpected response from server".to_owned(),
            Self::Validation(err) => err.to_string(),
            Self::Server { detail, .. } => detail.clone(),
            Self::NoBody => "No response received from AI service.".to_owned(),
        }
    }
}
