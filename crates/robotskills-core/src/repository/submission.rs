//! Submission repository trait definition.

use chrono::{DateTime, Utc};
use robotskills_types::error::RepositoryError;
use robotskills_types::review::{OemDecision, PlatformReviewResult};
use robotskills_types::section::SectionPayload;
use robotskills_types::submission::{
    SkillId, Submission, SubmissionId, SubmissionStatus, TransitionRecord,
};

/// Filter criteria for listing submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    pub skill_id: Option<SkillId>,
    pub developer_id: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<i64>,
}

impl SubmissionFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        self.status.is_none_or(|s| s == submission.status)
            && self.skill_id.is_none_or(|id| id == submission.skill_id)
            && self
                .developer_id
                .as_deref()
                .is_none_or(|dev| dev == submission.developer_id)
    }
}

/// One status change as written to the backend.
///
/// The write is conditional on the submission still being in `from`; the
/// optional review result or OEM decision and the history row are written in
/// the same atomic step.
#[derive(Debug, Clone)]
pub struct Transition {
    pub submission_id: SubmissionId,
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub actor: String,
    pub at: DateTime<Utc>,
    pub review: Option<PlatformReviewResult>,
    pub decision: Option<OemDecision>,
}

impl Transition {
    pub fn new(
        submission_id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            submission_id,
            from,
            to,
            actor: actor.into(),
            at: Utc::now(),
            review: None,
            decision: None,
        }
    }

    pub fn with_review(mut self, review: PlatformReviewResult) -> Self {
        self.review = Some(review);
        self
    }

    pub fn with_decision(mut self, decision: OemDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn record(&self) -> TransitionRecord {
        TransitionRecord {
            submission_id: self.submission_id,
            from: self.from,
            to: self.to,
            actor: self.actor.clone(),
            at: self.at,
        }
    }
}

/// Repository trait for submission persistence.
///
/// Implementations live in robotskills-infra (`SqliteSubmissionRepository`)
/// and in [`super::memory`]. Uses native async fn in traits (RPITIT).
pub trait SubmissionRepository: Send + Sync {
    /// Insert a new submission. `Conflict` if the id already exists.
    fn create(
        &self,
        submission: &Submission,
    ) -> impl std::future::Future<Output = Result<Submission, RepositoryError>> + Send;

    /// Load a submission with its sections, latest review and latest decision.
    fn get(
        &self,
        id: &SubmissionId,
    ) -> impl std::future::Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    /// List submissions, newest first.
    fn list(
        &self,
        filter: Option<SubmissionFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Submission>, RepositoryError>> + Send;

    /// Replace one section wholesale.
    ///
    /// `NotFound` if the submission does not exist, `Conflict` if it is no
    /// longer in an editable status.
    fn save_section(
        &self,
        id: &SubmissionId,
        payload: &SectionPayload,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Apply a status change atomically.
    ///
    /// `NotFound` if the submission does not exist, `Conflict` if its status
    /// is no longer `transition.from`. Nothing is written on error.
    fn apply_transition(
        &self,
        transition: &Transition,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All platform review results, newest first.
    fn list_review_results(
        &self,
        id: &SubmissionId,
    ) -> impl std::future::Future<Output = Result<Vec<PlatformReviewResult>, RepositoryError>> + Send;

    /// Status history, oldest first.
    fn list_transitions(
        &self,
        id: &SubmissionId,
    ) -> impl std::future::Future<Output = Result<Vec<TransitionRecord>, RepositoryError>> + Send;

    /// Number of submissions per status. Statuses with no rows may be omitted.
    fn count_by_status(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<(SubmissionStatus, u64)>, RepositoryError>> + Send;
}
