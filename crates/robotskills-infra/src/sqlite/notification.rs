//! Developer notifications written after every status change.

use chrono::Utc;
use robotskills_core::hook::{TransitionEvent, TransitionHook};
use robotskills_types::error::HookError;
use robotskills_types::submission::SubmissionStatus;
use uuid::Uuid;

use super::pool::DatabasePool;

/// Inserts one `notifications` row for the submission's developer.
pub struct SqliteNotificationHook {
    pool: DatabasePool,
}

impl SqliteNotificationHook {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn message(event: &TransitionEvent) -> String {
    let name = event.slug.as_deref().unwrap_or("your skill");
    match event.to {
        SubmissionStatus::PendingAutomatedReview => {
            format!("Submission for {name} is in automated review.")
        }
        SubmissionStatus::PendingOemReview => {
            format!("Submission for {name} passed automated review and is waiting for OEM review.")
        }
        SubmissionStatus::Published => format!("{name} is now published."),
        SubmissionStatus::Rejected => {
            format!("Submission for {name} was rejected. Check the review and resubmit.")
        }
        SubmissionStatus::Withdrawn => format!("Submission for {name} was withdrawn."),
        SubmissionStatus::Draft => format!("Submission for {name} is back in draft."),
    }
}

impl TransitionHook for SqliteNotificationHook {
    fn name(&self) -> &str {
        "notification"
    }

    async fn on_transition(&self, event: &TransitionEvent) -> Result<(), HookError> {
        sqlx::query(
            "INSERT INTO notifications (id, developer_id, submission_id, status, message, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&event.developer_id)
        .bind(event.submission_id.to_string())
        .bind(event.to.as_str())
        .bind(message(event))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| HookError::Storage(e.to_string()))?;

        tracing::debug!(
            submission_id = %event.submission_id,
            developer_id = %event.developer_id,
            "notification stored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use robotskills_core::repository::SubmissionRepository;
    use robotskills_types::submission::{SkillId, Submission};

    use super::*;
    use crate::sqlite::pool::test_pool;
    use crate::sqlite::submission::SqliteSubmissionRepository;

    #[tokio::test]
    async fn test_notification_row_written() {
        let pool = test_pool().await;
        let repo = SqliteSubmissionRepository::new(pool.clone());
        let mut submission = Submission::new_draft(SkillId::new(), "dev-7");
        repo.create(&submission).await.unwrap();

        submission.status = SubmissionStatus::Rejected;
        let event = TransitionEvent::new(
            &submission,
            SubmissionStatus::PendingOemReview,
            "qa@acme.test",
        );
        let hook = SqliteNotificationHook::new(pool.clone());
        hook.on_transition(&event).await.unwrap();

        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT developer_id, status, message FROM notifications WHERE submission_id = ?",
        )
        .bind(submission.id.to_string())
        .fetch_all(&pool.reader)
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "dev-7");
        assert_eq!(rows[0].1, "rejected");
        assert!(rows[0].2.contains("rejected"));
    }

    #[tokio::test]
    async fn test_unknown_submission_is_storage_error() {
        let pool = test_pool().await;
        let submission = Submission::new_draft(SkillId::new(), "dev-7");
        let event = TransitionEvent::new(&submission, SubmissionStatus::Draft, "dev-7");
        let err = SqliteNotificationHook::new(pool)
            .on_transition(&event)
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Storage(_)));
    }
}
