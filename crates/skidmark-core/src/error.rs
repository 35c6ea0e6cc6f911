// Error taxonomy for roast generation.

use thiserror::Error;

use crate::response::DecodeError;

#[derive(Debug, Error)]
pub enum RoastError {
    /// The request was well-formed but unusable (e.g. no teams).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request body could not be decoded into a roast request.
    #[error("malformed request envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// The generation service failed.
    #[error("generation failed: {0:#}")]
    Generation(anyhow::Error),

    /// The generation service answered with something other than a
    /// team-id -> roast mapping.
    #[error("could not decode generation response: {0}")]
    Decode(#[from] DecodeError),

    /// A batch task panicked or was aborted.
    #[error("batch task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl RoastError {
    /// True for errors caused by the caller's input (reported as 400),
    /// false for server-side failures (reported as 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RoastError::InvalidInput(_) | RoastError::MalformedEnvelope(_)
        )
    }
}
