//! Post-transition hooks.
//!
//! Hooks run after a status change has been persisted. They cache-bust the
//! storefront and notify developers; a failing hook is logged by the caller
//! and never undoes the transition.

pub mod box_hook;
pub mod chain;

use robotskills_types::error::HookError;
use robotskills_types::submission::{SkillId, Submission, SubmissionId, SubmissionStatus};
use serde::Serialize;

pub use box_hook::{BoxTransitionHook, TransitionHookDyn};
pub use chain::HookChain;

/// What changed, plus the storefront paths whose cached pages are now stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionEvent {
    pub submission_id: SubmissionId,
    pub skill_id: SkillId,
    pub developer_id: String,
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub actor: String,
    /// Identity slug, when the identity section has been saved.
    pub slug: Option<String>,
    pub revalidate_paths: Vec<String>,
}

impl TransitionEvent {
    /// Build the event for `submission`, which already carries the new status.
    pub fn new(submission: &Submission, from: SubmissionStatus, actor: &str) -> Self {
        let slug = submission.slug().map(str::to_string);
        Self {
            submission_id: submission.id,
            skill_id: submission.skill_id,
            developer_id: submission.developer_id.clone(),
            from,
            to: submission.status,
            actor: actor.to_string(),
            revalidate_paths: revalidate_paths(submission, slug.as_deref()),
            slug,
        }
    }
}

/// Pages showing the submission. The public skill page only changes on publish.
pub fn revalidate_paths(submission: &Submission, slug: Option<&str>) -> Vec<String> {
    let mut paths = vec![
        format!("/developer/submissions/{}", submission.id),
        format!("/developer/skills/{}", submission.skill_id),
        "/admin/reviews".to_string(),
    ];
    if submission.status == SubmissionStatus::Published {
        if let Some(slug) = slug {
            paths.push(format!("/skills/{slug}"));
        }
    }
    paths
}

/// Side effect run after every persisted transition.
pub trait TransitionHook: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn on_transition(
        &self,
        event: &TransitionEvent,
    ) -> impl std::future::Future<Output = Result<(), HookError>> + Send;
}

/// Hook that does nothing. Used when no hooks are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl TransitionHook for NoopHook {
    fn name(&self) -> &str {
        "noop"
    }

    async fn on_transition(&self, _event: &TransitionEvent) -> Result<(), HookError> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every event; optionally fails after recording.
    #[derive(Clone, Default)]
    pub struct RecordingHook {
        pub events: Arc<Mutex<Vec<TransitionEvent>>>,
        pub fail: bool,
    }

    impl RecordingHook {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn events(&self) -> Vec<TransitionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl TransitionHook for RecordingHook {
        fn name(&self) -> &str {
            "recording"
        }

        async fn on_transition(&self, event: &TransitionEvent) -> Result<(), HookError> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                Err(HookError::Status(500))
            } else {
                Ok(())
            }
        }
    }
}
