//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use robotskills_core::repository::SubmissionFilter;
use robotskills_types::submission::{SkillId, SubmissionStatus};

use crate::http::error::AppError;

/// Query parameters for the submission list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct SubmissionListQuery {
    /// Filter by status (draft, pending_automated_review, ...).
    pub status: Option<String>,
    /// Filter by owning skill.
    pub skill_id: Option<String>,
    /// Filter by developer.
    pub developer_id: Option<String>,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl SubmissionListQuery {
    pub fn into_filter(self) -> Result<SubmissionFilter, AppError> {
        let status = self
            .status
            .map(|s| s.parse::<SubmissionStatus>().map_err(AppError::BadRequest))
            .transpose()?;
        let skill_id = self
            .skill_id
            .map(|s| {
                s.parse::<SkillId>()
                    .map_err(|_| AppError::BadRequest(format!("invalid skill id: '{s}'")))
            })
            .transpose()?;
        if self.limit.is_some_and(|l| l < 0) || self.offset.is_some_and(|o| o < 0) {
            return Err(AppError::BadRequest(
                "limit and offset must not be negative".to_string(),
            ));
        }

        Ok(SubmissionFilter {
            status,
            skill_id,
            developer_id: self.developer_id,
            limit: self.limit,
            offset: self.offset,
        })
    }
}
