//! Typed errors for the extraction workflow.
//!
//! Library code returns [`ExtractionError`]; binaries wrap it in `anyhow`.
//! An absent cached record is not an error: stores return `Ok(None)`.

use openai_client::OpenAIError;
use thiserror::Error;

/// Errors that can occur while fetching, extracting or persisting.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The source page answered 404
    #[error("page not found")]
    PageNotFound,

    /// The source page could not be fetched (transport failure or non-200/404 status)
    #[error("service unavailable, try again later: {0}")]
    ServiceUnavailable(String),

    /// The source page body exceeded the configured size limit
    #[error("page exceeds the {limit} byte limit")]
    PageTooLarge { limit: usize },

    /// The completion API answered without any choice
    #[error("no choices returned")]
    NoChoicesReturned,

    /// The completion content did not match the extraction shape
    #[error("malformed extraction: {0}")]
    MalformedExtraction(String),

    /// Caller supplied an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The completion API call failed
    #[error("AI service error: {0}")]
    Ai(#[from] OpenAIError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// The request was abandoned or the process is shutting down
    #[error("operation cancelled")]
    Cancelled,
}

impl ExtractionError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
