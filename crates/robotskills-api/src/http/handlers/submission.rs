//! Submission lifecycle handlers for the REST API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use robotskills_types::review::{OemDecisionRequest, PlatformReviewResult};
use robotskills_types::submission::{CreateSubmissionRequest, Submission, TransitionRecord};

use crate::http::error::AppError;
use crate::http::extractors::query::SubmissionListQuery;
use crate::http::extractors::{body, path};
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Body of `POST /submissions/{id}/withdraw`.
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub actor: String,
}

fn with_submission_links(resp: ApiResponse<Submission>) -> ApiResponse<Submission> {
    let Some(id) = resp.data.as_ref().map(|s| s.id) else {
        return resp;
    };
    resp.with_link("self", &format!("/api/v1/submissions/{id}"))
        .with_link("reviews", &format!("/api/v1/submissions/{id}/reviews"))
        .with_link("history", &format!("/api/v1/submissions/{id}/history"))
}

/// POST /api/v1/submissions - Start a new draft.
pub async fn create_submission(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let request = body::json(payload)?;

    let submission = state.submission_service.start_draft(request).await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// GET /api/v1/submissions - List submissions with filters and pagination.
pub async fn list_submissions(
    State(state): State<AppState>,
    params: Result<Query<SubmissionListQuery>, QueryRejection>,
) -> ApiResult<Vec<Submission>> {
    let clock = RequestClock::start();
    let filter = body::query(params)?.into_filter()?;

    let submissions = state.submission_service.list(filter).await?;
    Ok(Json(
        clock
            .success(submissions)
            .with_link("self", "/api/v1/submissions"),
    ))
}

/// GET /api/v1/submissions/:id - Get a submission with its sections.
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;

    let submission = state.submission_service.get(&id).await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// POST /api/v1/submissions/:id/submit - Submit (or resubmit) for automated review.
pub async fn submit_for_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;

    let submission = state.submission_service.submit_for_review(&id).await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// POST /api/v1/submissions/:id/automated-review/complete - Advance on the stored verdict.
pub async fn complete_automated_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;

    let submission = state
        .submission_service
        .complete_automated_review(&id)
        .await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// POST /api/v1/submissions/:id/decision - Record the OEM's approve/reject.
pub async fn record_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OemDecisionRequest>, JsonRejection>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;
    let request = body::json(payload)?;

    let submission = state
        .submission_service
        .record_oem_decision(&id, request)
        .await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// POST /api/v1/submissions/:id/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> ApiResult<Submission> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;
    let request = body::json(payload)?;
    if request.actor.trim().is_empty() {
        return Err(AppError::BadRequest("actor must not be empty".to_string()));
    }

    let submission = state
        .submission_service
        .withdraw(&id, request.actor.trim())
        .await?;
    Ok(Json(with_submission_links(clock.success(submission))))
}

/// GET /api/v1/submissions/:id/reviews - Automated review results, newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<PlatformReviewResult>> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;

    let reviews = state.submission_service.review_history(&id).await?;
    Ok(Json(
        clock
            .success(reviews)
            .with_link("submission", &format!("/api/v1/submissions/{id}")),
    ))
}

/// GET /api/v1/submissions/:id/history - Status changes, oldest first.
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TransitionRecord>> {
    let clock = RequestClock::start();
    let id = path::submission_id(&id)?;

    let history = state.submission_service.transition_history(&id).await?;
    Ok(Json(
        clock
            .success(history)
            .with_link("submission", &format!("/api/v1/submissions/{id}")),
    ))
}
