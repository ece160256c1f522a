//! Dashboard statistics endpoint.
//!
//! GET /api/v1/stats - Submission counts per status.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionStats {
    pub total: u64,
    /// Every status, zeros included.
    pub by_status: BTreeMap<String, u64>,
}

/// GET /api/v1/stats - Aggregate counts for the review dashboard.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SubmissionStats>>, AppError> {
    let clock = RequestClock::start();

    let counts = state.submission_service.status_counts().await?;
    let stats = SubmissionStats {
        total: counts.iter().map(|(_, n)| n).sum(),
        by_status: counts
            .into_iter()
            .map(|(status, n)| (status.to_string(), n))
            .collect(),
    };

    Ok(Json(
        clock
            .success(stats)
            .with_link("self", "/api/v1/stats")
            .with_link("submissions", "/api/v1/submissions"),
    ))
}
