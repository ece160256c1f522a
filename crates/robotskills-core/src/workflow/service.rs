//! Submission workflow service.
//!
//! Orchestrates drafting, section edits and every status change. All status
//! changes go through [`can_transition`] and a single conditional repository
//! write; hooks run only after that write succeeded.

use std::sync::Arc;

use robotskills_types::error::{RepositoryError, SubmissionError, ValidationErrors};
use robotskills_types::review::{DecisionOutcome, OemDecisionRequest, PlatformReviewResult};
use robotskills_types::section::{SectionKind, SectionPayload};
use robotskills_types::submission::{
    CreateSubmissionRequest, SkillId, Submission, SubmissionId, SubmissionStatus,
    TransitionRecord,
};
use serde_json::Value;

use super::transitions::can_transition;
use crate::hook::{TransitionEvent, TransitionHook};
use crate::repository::{SubmissionFilter, SubmissionRepository, Transition};
use crate::review::PlatformReviewer;
use crate::validation;

/// Actor recorded for transitions made by the platform itself.
pub const PLATFORM_ACTOR: &str = "platform";

/// How post-transition hooks are run relative to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookDispatch {
    /// Awaited before the transition call returns.
    #[default]
    Inline,
    /// Spawned on the tokio runtime; the caller does not wait for them.
    Detached,
}

/// Service driving the submission lifecycle.
///
/// Generic over the repository, the automated reviewer and the hook set so
/// robotskills-core never depends on robotskills-infra.
pub struct SubmissionService<R: SubmissionRepository, P: PlatformReviewer, H: TransitionHook> {
    repo: R,
    reviewer: P,
    hooks: Arc<H>,
    dispatch: HookDispatch,
}

impl<R: SubmissionRepository, P: PlatformReviewer, H: TransitionHook + 'static>
    SubmissionService<R, P, H>
{
    pub fn new(repo: R, reviewer: P, hooks: H) -> Self {
        Self {
            repo,
            reviewer,
            hooks: Arc::new(hooks),
            dispatch: HookDispatch::Inline,
        }
    }

    pub fn with_hook_dispatch(mut self, dispatch: HookDispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Start a new draft with no sections.
    pub async fn start_draft(
        &self,
        request: CreateSubmissionRequest,
    ) -> Result<Submission, SubmissionError> {
        let developer_id = request.developer_id.trim();
        if developer_id.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.push("developer_id", "must not be empty");
            return Err(SubmissionError::Validation(errors));
        }

        let skill_id = request.skill_id.unwrap_or_else(SkillId::new);
        let submission = Submission::new_draft(skill_id, developer_id);
        let submission = self.repo.create(&submission).await.map_err(storage)?;

        tracing::info!(
            submission_id = %submission.id,
            skill_id = %submission.skill_id,
            developer_id = %submission.developer_id,
            "draft started"
        );
        Ok(submission)
    }

    pub async fn get(&self, id: &SubmissionId) -> Result<Submission, SubmissionError> {
        self.repo
            .get(id)
            .await
            .map_err(storage)?
            .ok_or(SubmissionError::NotFound)
    }

    pub async fn list(&self, filter: SubmissionFilter) -> Result<Vec<Submission>, SubmissionError> {
        self.repo.list(Some(filter)).await.map_err(storage)
    }

    /// Dry-run validator; nothing is stored.
    pub fn validate_section(
        &self,
        kind: SectionKind,
        payload: &Value,
    ) -> Result<SectionPayload, ValidationErrors> {
        validation::validate_section(kind, payload)
    }

    /// Validate `payload` and replace the section wholesale.
    pub async fn save_section(
        &self,
        id: &SubmissionId,
        kind: SectionKind,
        payload: &Value,
    ) -> Result<Submission, SubmissionError> {
        let submission = self.get(id).await?;
        if !submission.status.is_editable() {
            return Err(SubmissionError::Locked {
                status: submission.status,
            });
        }

        let section = validation::validate_section(kind, payload).map_err(|errors| {
            tracing::debug!(submission_id = %id, section = %kind, errors = errors.len(), "section rejected");
            SubmissionError::Validation(errors)
        })?;

        match self.repo.save_section(id, &section, chrono::Utc::now()).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                // Status changed between the read and the write.
                let current = self.get(id).await?;
                return Err(SubmissionError::Locked {
                    status: current.status,
                });
            }
            Err(e) => return Err(storage(e)),
        }

        tracing::debug!(submission_id = %id, section = %kind, "section saved");
        self.get(id).await
    }

    /// Send a complete submission to automated review.
    ///
    /// Sections are checked before the status edge, so a partial section set
    /// always reports `IncompleteSubmission`. From `rejected` this is the
    /// resubmit edge. The new review result is stored together with the
    /// status change.
    pub async fn submit_for_review(&self, id: &SubmissionId) -> Result<Submission, SubmissionError> {
        let submission = self.get(id).await?;
        let to = SubmissionStatus::PendingAutomatedReview;

        let (missing, invalid) = validation::check_completeness(&submission);
        if !missing.is_empty() || !invalid.is_empty() {
            tracing::debug!(
                submission_id = %id,
                missing = missing.len(),
                invalid = invalid.len(),
                "submission incomplete"
            );
            return Err(SubmissionError::IncompleteSubmission { missing, invalid });
        }
        ensure_transition(submission.status, to)?;

        let review = self.reviewer.review(&submission);
        tracing::info!(
            submission_id = %id,
            verdict = %review.verdict,
            findings = review.findings.len(),
            "automated review finished"
        );

        let transition = Transition::new(*id, submission.status, to, submission.developer_id.as_str())
            .with_review(review);
        self.commit(transition).await
    }

    /// Apply the verdict of the attached review: pass moves on to OEM review,
    /// fail rejects.
    pub async fn complete_automated_review(
        &self,
        id: &SubmissionId,
    ) -> Result<Submission, SubmissionError> {
        let submission = self.get(id).await?;
        let to = match submission.review.as_ref().map(PlatformReviewResult::passed) {
            Some(false) => SubmissionStatus::Rejected,
            _ => SubmissionStatus::PendingOemReview,
        };
        if submission.status != SubmissionStatus::PendingAutomatedReview || submission.review.is_none() {
            return Err(SubmissionError::InvalidTransition {
                from: submission.status,
                to,
            });
        }
        ensure_transition(submission.status, to)?;

        self.commit(Transition::new(*id, submission.status, to, PLATFORM_ACTOR))
            .await
    }

    /// Record the OEM's decision. Only valid while `pending_oem_review`.
    pub async fn record_oem_decision(
        &self,
        id: &SubmissionId,
        request: OemDecisionRequest,
    ) -> Result<Submission, SubmissionError> {
        let submission = self.get(id).await?;
        let to = match request.outcome {
            DecisionOutcome::Approve => SubmissionStatus::Published,
            DecisionOutcome::Reject => SubmissionStatus::Rejected,
        };
        if submission.status != SubmissionStatus::PendingOemReview {
            return Err(SubmissionError::InvalidTransition {
                from: submission.status,
                to,
            });
        }
        ensure_transition(submission.status, to)?;
        check_decision(&request).map_err(SubmissionError::Validation)?;

        let decision = request.into_decision(*id);
        tracing::info!(
            submission_id = %id,
            oem = %decision.oem,
            outcome = ?decision.outcome,
            "oem decision recorded"
        );

        let transition = Transition::new(*id, submission.status, to, decision.reviewer.as_str())
            .with_decision(decision);
        self.commit(transition).await
    }

    /// Withdraw from any non-terminal status.
    pub async fn withdraw(
        &self,
        id: &SubmissionId,
        actor: &str,
    ) -> Result<Submission, SubmissionError> {
        let submission = self.get(id).await?;
        let to = SubmissionStatus::Withdrawn;
        ensure_transition(submission.status, to)?;
        self.commit(Transition::new(*id, submission.status, to, actor))
            .await
    }

    /// All automated review results, newest first.
    pub async fn review_history(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<PlatformReviewResult>, SubmissionError> {
        self.repo.list_review_results(id).await.map_err(storage)
    }

    /// Status changes, oldest first.
    pub async fn transition_history(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<TransitionRecord>, SubmissionError> {
        self.repo.list_transitions(id).await.map_err(storage)
    }

    /// Submission count for every status, zeros included, in lifecycle order.
    pub async fn status_counts(&self) -> Result<Vec<(SubmissionStatus, u64)>, SubmissionError> {
        let counts = self.repo.count_by_status().await.map_err(storage)?;
        Ok(SubmissionStatus::ALL
            .into_iter()
            .map(|status| {
                let n = counts
                    .iter()
                    .find(|(s, _)| *s == status)
                    .map_or(0, |(_, n)| *n);
                (status, n)
            })
            .collect())
    }

    /// Persist the transition, then fire hooks. Hook failures are logged only.
    async fn commit(&self, transition: Transition) -> Result<Submission, SubmissionError> {
        let id = transition.submission_id;
        match self.repo.apply_transition(&transition).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(reason)) => {
                tracing::warn!(
                    submission_id = %id,
                    from = %transition.from,
                    to = %transition.to,
                    reason = %reason,
                    "stale transition rejected"
                );
                let current = self.get(&id).await?;
                return Err(SubmissionError::InvalidTransition {
                    from: current.status,
                    to: transition.to,
                });
            }
            Err(e) => return Err(storage(e)),
        }

        tracing::info!(
            submission_id = %id,
            from = %transition.from,
            to = %transition.to,
            actor = %transition.actor,
            "submission transitioned"
        );

        let submission = self.get(&id).await?;
        let event = TransitionEvent::new(&submission, transition.from, &transition.actor);
        match self.dispatch {
            HookDispatch::Inline => run_hooks(self.hooks.as_ref(), &event).await,
            HookDispatch::Detached => {
                let hooks = Arc::clone(&self.hooks);
                tokio::spawn(async move { run_hooks(hooks.as_ref(), &event).await });
            }
        }
        Ok(submission)
    }
}

async fn run_hooks<H: TransitionHook>(hooks: &H, event: &TransitionEvent) {
    if let Err(e) = hooks.on_transition(event).await {
        tracing::warn!(
            hook = hooks.name(),
            submission_id = %event.submission_id,
            error = %e,
            "transition hook failed"
        );
    }
}

fn ensure_transition(from: SubmissionStatus, to: SubmissionStatus) -> Result<(), SubmissionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(SubmissionError::InvalidTransition { from, to })
    }
}

fn check_decision(request: &OemDecisionRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if request.oem.trim().is_empty() {
        errors.push("oem", "must not be empty");
    }
    if request.reviewer.trim().is_empty() {
        errors.push("reviewer", "must not be empty");
    }
    if request.outcome == DecisionOutcome::Reject && request.comments.trim().is_empty() {
        errors.push("comments", "a rejection must explain what to fix");
    }
    errors.into_result(())
}

fn storage(e: RepositoryError) -> SubmissionError {
    match e {
        RepositoryError::NotFound => SubmissionError::NotFound,
        other => SubmissionError::Persistence(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::hook::testing::RecordingHook;
    use crate::repository::InMemorySubmissionRepository;
    use crate::review::RuleBasedReviewer;
    use crate::validation::fixtures;

    type TestService = SubmissionService<InMemorySubmissionRepository, RuleBasedReviewer, RecordingHook>;

    fn service() -> (TestService, RecordingHook) {
        let hook = RecordingHook::default();
        let svc = SubmissionService::new(
            InMemorySubmissionRepository::new(),
            RuleBasedReviewer::default(),
            hook.clone(),
        );
        (svc, hook)
    }

    async fn draft(svc: &TestService) -> Submission {
        svc.start_draft(CreateSubmissionRequest {
            developer_id: "dev-1".to_string(),
            skill_id: None,
        })
        .await
        .unwrap()
    }

    async fn complete_draft(svc: &TestService) -> Submission {
        let submission = draft(svc).await;
        for kind in SectionKind::ALL {
            svc.save_section(&submission.id, *kind, &fixtures::payload(*kind))
                .await
                .unwrap();
        }
        svc.get(&submission.id).await.unwrap()
    }

    fn decision(outcome: DecisionOutcome, comments: &str) -> OemDecisionRequest {
        OemDecisionRequest {
            oem: "Acme Robotics".to_string(),
            reviewer: "reviewer@acme.test".to_string(),
            outcome,
            comments: comments.to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_draft_requires_developer() {
        let (svc, _) = service();
        let err = svc
            .start_draft(CreateSubmissionRequest {
                developer_id: "  ".to_string(),
                skill_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(ref e) if e.has_field("developer_id")));
    }

    #[tokio::test]
    async fn test_start_draft_keeps_given_skill() {
        let (svc, _) = service();
        let skill_id = SkillId::new();
        let submission = svc
            .start_draft(CreateSubmissionRequest {
                developer_id: "dev-1".to_string(),
                skill_id: Some(skill_id),
            })
            .await
            .unwrap();
        assert_eq!(submission.skill_id, skill_id);
        assert_eq!(submission.status, SubmissionStatus::Draft);
        assert!(submission.sections.is_empty());
    }

    #[tokio::test]
    async fn test_save_section_validation_error() {
        let (svc, _) = service();
        let submission = draft(&svc).await;
        let err = svc
            .save_section(&submission.id, SectionKind::Assets, &json!({ "screenshots": [] }))
            .await
            .unwrap_err();
        match err {
            SubmissionError::Validation(errors) => {
                assert!(errors.has_field("icon_url"));
                assert!(errors.has_field("screenshots"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(svc.get(&submission.id).await.unwrap().sections.is_empty());
    }

    #[tokio::test]
    async fn test_section_edit_replaces_wholesale() {
        let (svc, _) = service();
        let submission = draft(&svc).await;
        svc.save_section(&submission.id, SectionKind::Assets, &fixtures::assets())
            .await
            .unwrap();
        let updated = svc
            .save_section(
                &submission.id,
                SectionKind::Assets,
                &json!({
                    "icon_url": "https://cdn.robotskills.test/new.png",
                    "screenshots": ["https://cdn.robotskills.test/only.png"]
                }),
            )
            .await
            .unwrap();
        match updated.section(SectionKind::Assets) {
            Some(SectionPayload::Assets(a)) => assert_eq!(a.screenshots.len(), 1),
            other => panic!("unexpected section: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_runs_review_and_fires_hooks() {
        let (svc, hook) = service();
        let submission = complete_draft(&svc).await;
        let submitted = svc.submit_for_review(&submission.id).await.unwrap();

        assert_eq!(submitted.status, SubmissionStatus::PendingAutomatedReview);
        assert!(submitted.review.as_ref().is_some_and(|r| r.passed()));

        let events = hook.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].from, SubmissionStatus::Draft);
        assert_eq!(events[0].to, SubmissionStatus::PendingAutomatedReview);
        assert_eq!(events[0].actor, "dev-1");
    }

    #[tokio::test]
    async fn test_locked_outside_draft_and_rejected() {
        let (svc, _) = service();
        let submission = complete_draft(&svc).await;
        svc.submit_for_review(&submission.id).await.unwrap();
        let err = svc
            .save_section(&submission.id, SectionKind::Assets, &fixtures::assets())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Locked {
                status: SubmissionStatus::PendingAutomatedReview
            }
        ));
    }

    #[tokio::test]
    async fn test_complete_review_requires_pending_review() {
        let (svc, _) = service();
        let submission = draft(&svc).await;
        let err = svc.complete_automated_review(&submission.id).await.unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::InvalidTransition {
                from: SubmissionStatus::Draft,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_review_rejects() {
        let (svc, _) = service();
        let submission = draft(&svc).await;
        for kind in SectionKind::ALL {
            let mut payload = fixtures::payload(*kind);
            if *kind == SectionKind::Compatibility {
                payload["required_hardware"] = json!(["wheels"]);
            }
            svc.save_section(&submission.id, *kind, &payload).await.unwrap();
        }
        let submitted = svc.submit_for_review(&submission.id).await.unwrap();
        assert!(!submitted.review.as_ref().unwrap().passed());

        let rejected = svc.complete_automated_review(&submission.id).await.unwrap();
        assert_eq!(rejected.status, SubmissionStatus::Rejected);
    }

    #[tokio::test]
    async fn test_reject_requires_comments() {
        let (svc, _) = service();
        let submission = complete_draft(&svc).await;
        svc.submit_for_review(&submission.id).await.unwrap();
        svc.complete_automated_review(&submission.id).await.unwrap();

        let err = svc
            .record_oem_decision(&submission.id, decision(DecisionOutcome::Reject, " "))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(ref e) if e.has_field("comments")));
        assert_eq!(
            svc.get(&submission.id).await.unwrap().status,
            SubmissionStatus::PendingOemReview
        );
    }

    #[tokio::test]
    async fn test_hook_failure_keeps_transition() {
        let hook = RecordingHook::failing();
        let svc = SubmissionService::new(
            InMemorySubmissionRepository::new(),
            RuleBasedReviewer::default(),
            hook.clone(),
        );
        let submission = draft(&svc).await;
        let withdrawn = svc.withdraw(&submission.id, "dev-1").await.unwrap();
        assert_eq!(withdrawn.status, SubmissionStatus::Withdrawn);
        assert_eq!(hook.events().len(), 1);
        assert_eq!(svc.transition_history(&submission.id).await.unwrap().len(), 1);
    }

    /// Blocks until the gate is opened, then records the event.
    #[derive(Clone, Default)]
    struct GatedHook {
        gate: Arc<tokio::sync::Notify>,
        inner: RecordingHook,
    }

    impl TransitionHook for GatedHook {
        fn name(&self) -> &str {
            "gated"
        }

        async fn on_transition(
            &self,
            event: &TransitionEvent,
        ) -> Result<(), robotskills_types::error::HookError> {
            self.gate.notified().await;
            self.inner.on_transition(event).await
        }
    }

    #[tokio::test]
    async fn test_detached_hooks_do_not_delay_transition() {
        let hook = GatedHook::default();
        let svc = SubmissionService::new(
            InMemorySubmissionRepository::new(),
            RuleBasedReviewer::default(),
            hook.clone(),
        )
        .with_hook_dispatch(HookDispatch::Detached);

        let submission = svc
            .start_draft(CreateSubmissionRequest {
                developer_id: "dev-1".to_string(),
                skill_id: None,
            })
            .await
            .unwrap();
        let withdrawn = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            svc.withdraw(&submission.id, "dev-1"),
        )
        .await
        .expect("transition returns while the hook is blocked")
        .unwrap();
        assert_eq!(withdrawn.status, SubmissionStatus::Withdrawn);
        assert!(hook.inner.events().is_empty());

        hook.gate.notify_one();
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while hook.inner.events().is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("hook runs in the background");
        assert_eq!(hook.inner.events()[0].to, SubmissionStatus::Withdrawn);
    }

    #[tokio::test]
    async fn test_withdraw_terminal_is_invalid() {
        let (svc, hook) = service();
        let submission = draft(&svc).await;
        svc.withdraw(&submission.id, "dev-1").await.unwrap();
        let err = svc.withdraw(&submission.id, "dev-1").await.unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::InvalidTransition {
                from: SubmissionStatus::Withdrawn,
                to: SubmissionStatus::Withdrawn
            }
        ));
        assert_eq!(hook.events().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_submission() {
        let (svc, _) = service();
        let id = SubmissionId::new();
        assert!(matches!(svc.get(&id).await, Err(SubmissionError::NotFound)));
        assert!(matches!(
            svc.submit_for_review(&id).await,
            Err(SubmissionError::NotFound)
        ));
        assert!(matches!(
            svc.review_history(&id).await,
            Err(SubmissionError::NotFound)
        ));
        assert!(matches!(
            svc.transition_history(&id).await,
            Err(SubmissionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_status_counts_include_zeros() {
        let (svc, _) = service();
        draft(&svc).await;
        let withdrawn = draft(&svc).await;
        svc.withdraw(&withdrawn.id, "dev-1").await.unwrap();

        let counts = svc.status_counts().await.unwrap();
        assert_eq!(counts.len(), SubmissionStatus::ALL.len());
        assert_eq!(counts[0], (SubmissionStatus::Draft, 1));
        assert_eq!(counts[5], (SubmissionStatus::Withdrawn, 1));
        assert_eq!(counts[3], (SubmissionStatus::Published, 0));
    }
}
