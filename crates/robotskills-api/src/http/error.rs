//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use robotskills_types::error::{SubmissionError, ValidationErrors};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Workflow errors from the submission service.
    Submission(SubmissionError),
    /// Field errors from the dry-run validator.
    Validation(ValidationErrors),
    /// Malformed path, query or body.
    BadRequest(String),
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        AppError::Submission(e)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<serde_json::Value>) {
        match self {
            AppError::Submission(SubmissionError::NotFound) => {
                (StatusCode::NOT_FOUND, "SUBMISSION_NOT_FOUND", None)
            }
            AppError::Submission(SubmissionError::Validation(errors)) | AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                Some(json!(errors.errors)),
            ),
            AppError::Submission(SubmissionError::IncompleteSubmission { missing, invalid }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INCOMPLETE_SUBMISSION",
                Some(json!({ "missing": missing, "invalid": invalid })),
            ),
            AppError::Submission(SubmissionError::InvalidTransition { from, to }) => (
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                Some(json!({ "from": from, "to": to })),
            ),
            AppError::Submission(SubmissionError::Locked { status }) => (
                StatusCode::CONFLICT,
                "SECTION_LOCKED",
                Some(json!({ "status": status })),
            ),
            AppError::Submission(SubmissionError::Persistence(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "PERSISTENCE_ERROR", None)
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Submission(e) => e.to_string(),
            AppError::Validation(e) => format!("validation failed: {e}"),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = self.parts();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        } else {
            tracing::debug!(code, error = %message, "request rejected");
        }

        let body = ApiResponse::error(code, &message, details, uuid::Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}
