//! Mapping from domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": "<message>"}`. A missing page is
//! 404; everything else the workflow can fail with is 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::ExtractionError;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Convert a workflow error; `expose_details` keeps the error text on 500s.
    pub fn from_extraction(err: ExtractionError, expose_details: bool) -> Self {
        match err {
            ExtractionError::PageNotFound => Self::not_found(err.to_string()),
            err => {
                error!(error = %err, "Request failed");
                let message = if expose_details {
                    err.to_string()
                } else {
                    INTERNAL_ERROR_MESSAGE.to_string()
                };
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_not_found_is_404() {
        let err = ApiError::from_extraction(ExtractionError::PageNotFound, false);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "page not found");
    }

    #[test]
    fn test_other_errors_are_500() {
        for err in [
            ExtractionError::ServiceUnavailable("timeout".into()),
            ExtractionError::NoChoicesReturned,
            ExtractionError::MalformedExtraction("bad".into()),
            ExtractionError::invalid_argument("url must not be empty"),
            ExtractionError::Cancelled,
        ] {
            let api = ApiError::from_extraction(err, true);
            assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_details_hidden_when_not_exposed() {
        let api = ApiError::from_extraction(ExtractionError::NoChoicesReturned, false);
        assert_eq!(api.message(), INTERNAL_ERROR_MESSAGE);

        let api = ApiError::from_extraction(ExtractionError::NoChoicesReturned, true);
        assert_eq!(api.message(), "no choices returned");
    }
}
