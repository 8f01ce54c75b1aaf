use crate::models::TextId;
use thiserror::Error;

/// Failure of the online completion provider
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to completion provider failed: {0}")]
    Transport(reqwest::Error),

    #[error("completion provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("completion response contained no text")]
    EmptyCandidates,
}

// The request URL carries the API key as a query parameter
impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.without_url())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("text {0} not found")]
    NotFound(TextId),

    #[error("text generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    #[error("persistence failed: {0}")]
    PersistenceFailed(#[from] rusqlite::Error),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}
