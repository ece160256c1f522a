//! Section editing and dry-run validation handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use robotskills_types::section::SectionPayload;
use robotskills_types::submission::Submission;

use crate::http::error::AppError;
use crate::http::extractors::{body, path};
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// PUT /api/v1/submissions/:id/sections/:kind - Validate and replace one section.
pub async fn save_section(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;
    let kind = path::section_kind(&kind)?;
    let payload = body::json(payload)?;

    let submission = state
        .submission_service
        .save_section(&id, kind, &payload)
        .await?;
    let missing = submission.missing_sections();

    let mut resp = clock
        .success(submission)
        .with_link("self", &format!("/api/v1/submissions/{id}/sections/{kind}"))
        .with_link("submission", &format!("/api/v1/submissions/{id}"));
    if missing.is_empty() {
        resp = resp.with_link("submit", &format!("/api/v1/submissions/{id}/submit"));
    }
    Ok(Json(resp))
}

/// POST /api/v1/sections/:kind/validate - Run the section validator without storing.
pub async fn validate_section(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<SectionPayload>>, AppError> {
    let clock = RequestClock::start();
    let kind = path::section_kind(&kind)?;
    let payload = body::json(payload)?;

    let section = state.submission_service.validate_section(kind, &payload)?;
    Ok(Json(clock.success(section)))
}
