//! SQLite submission repository implementation.
//!
//! Implements `SubmissionRepository` from `robotskills-core`. Sections, review
//! results, OEM decisions and history rows live in their own tables; a
//! transition touches several of them inside one writer transaction.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use robotskills_core::repository::{SubmissionFilter, SubmissionRepository, Transition};
use robotskills_types::error::RepositoryError;
use robotskills_types::review::{DecisionOutcome, Finding, OemDecision, PlatformReviewResult, Verdict};
use robotskills_types::section::{SectionKind, SectionPayload};
use robotskills_types::submission::{
    SkillId, Submission, SubmissionId, SubmissionStatus, TransitionRecord,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SubmissionRepository`.
pub struct SqliteSubmissionRepository {
    pool: DatabasePool,
}

impl SqliteSubmissionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Attach sections, the latest review and the latest decision.
    async fn hydrate(&self, row: &SqliteRow) -> Result<Submission, RepositoryError> {
        let mut submission = SubmissionRow::from_row(row).map_err(query_err)?.into_submission()?;
        let id = submission.id.to_string();

        let section_rows = sqlx::query("SELECT kind, payload FROM submission_sections WHERE submission_id = ?")
            .bind(&id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        for row in &section_rows {
            let payload = section_from_row(row)?;
            submission.sections.insert(payload.kind(), payload);
        }

        submission.review = sqlx::query(
            "SELECT * FROM review_results WHERE submission_id = ? ORDER BY rowid DESC LIMIT 1",
        )
        .bind(&id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?
        .map(|row| review_from_row(&row))
        .transpose()?;

        submission.decision = sqlx::query(
            "SELECT * FROM oem_decisions WHERE submission_id = ? ORDER BY rowid DESC LIMIT 1",
        )
        .bind(&id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?
        .map(|row| decision_from_row(&row))
        .transpose()?;

        Ok(submission)
    }

    async fn exists(&self, id: &SubmissionId) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM submissions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        Ok(row.is_some())
    }
}

/// Internal row type for mapping SQLite rows to a bare `Submission`.
struct SubmissionRow {
    id: String,
    skill_id: String,
    developer_id: String,
    status: String,
    created_at: String,
    updated_at: String,
    transitioned_at: String,
}

impl SubmissionRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            skill_id: row.try_get("skill_id")?,
            developer_id: row.try_get("developer_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            transitioned_at: row.try_get("transitioned_at")?,
        })
    }

    fn into_submission(self) -> Result<Submission, RepositoryError> {
        let id = self
            .id
            .parse::<SubmissionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid submission id: {e}")))?;
        let skill_id = self
            .skill_id
            .parse::<SkillId>()
            .map_err(|e| RepositoryError::Query(format!("invalid skill id: {e}")))?;
        let status: SubmissionStatus = self.status.parse().map_err(RepositoryError::Query)?;

        Ok(Submission {
            id,
            skill_id,
            developer_id: self.developer_id,
            status,
            sections: Default::default(),
            review: None,
            decision: None,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            transitioned_at: parse_datetime(&self.transitioned_at)?,
        })
    }
}

fn section_from_row(row: &SqliteRow) -> Result<SectionPayload, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(query_err)?;
    let payload: String = row.try_get("payload").map_err(query_err)?;
    let kind = SectionKind::from_str(&kind).map_err(RepositoryError::Query)?;
    let value: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| RepositoryError::Query(format!("invalid {kind} payload JSON: {e}")))?;
    SectionPayload::from_value(kind, value)
        .map_err(|e| RepositoryError::Query(format!("invalid {kind} payload: {e}")))
}

fn review_from_row(row: &SqliteRow) -> Result<PlatformReviewResult, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let submission_id: String = row.try_get("submission_id").map_err(query_err)?;
    let verdict: String = row.try_get("verdict").map_err(query_err)?;
    let findings: String = row.try_get("findings").map_err(query_err)?;
    let reviewed_at: String = row.try_get("reviewed_at").map_err(query_err)?;

    let findings: Vec<Finding> = serde_json::from_str(&findings)
        .map_err(|e| RepositoryError::Query(format!("invalid findings JSON: {e}")))?;

    Ok(PlatformReviewResult {
        id: parse_uuid(&id)?,
        submission_id: SubmissionId::from_uuid(parse_uuid(&submission_id)?),
        verdict: Verdict::from_str(&verdict).map_err(RepositoryError::Query)?,
        findings,
        reviewed_at: parse_datetime(&reviewed_at)?,
    })
}

fn decision_from_row(row: &SqliteRow) -> Result<OemDecision, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let submission_id: String = row.try_get("submission_id").map_err(query_err)?;
    let outcome: String = row.try_get("outcome").map_err(query_err)?;
    let decided_at: String = row.try_get("decided_at").map_err(query_err)?;

    Ok(OemDecision {
        id: parse_uuid(&id)?,
        submission_id: SubmissionId::from_uuid(parse_uuid(&submission_id)?),
        oem: row.try_get("oem").map_err(query_err)?,
        reviewer: row.try_get("reviewer").map_err(query_err)?,
        outcome: DecisionOutcome::from_str(&outcome).map_err(RepositoryError::Query)?,
        comments: row.try_get("comments").map_err(query_err)?,
        decided_at: parse_datetime(&decided_at)?,
    })
}

fn transition_from_row(row: &SqliteRow) -> Result<TransitionRecord, RepositoryError> {
    let submission_id: String = row.try_get("submission_id").map_err(query_err)?;
    let from: String = row.try_get("from_status").map_err(query_err)?;
    let to: String = row.try_get("to_status").map_err(query_err)?;
    let at: String = row.try_get("at").map_err(query_err)?;

    Ok(TransitionRecord {
        submission_id: SubmissionId::from_uuid(parse_uuid(&submission_id)?),
        from: from.parse().map_err(RepositoryError::Query)?,
        to: to.parse().map_err(RepositoryError::Query)?,
        actor: row.try_get("actor").map_err(query_err)?,
        at: parse_datetime(&at)?,
    })
}

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid uuid: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl SubmissionRepository for SqliteSubmissionRepository {
    async fn create(&self, submission: &Submission) -> Result<Submission, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        sqlx::query(
            "INSERT INTO submissions (id, skill_id, developer_id, status, created_at, updated_at, transitioned_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(submission.id.to_string())
        .bind(submission.skill_id.to_string())
        .bind(&submission.developer_id)
        .bind(submission.status.as_str())
        .bind(format_datetime(&submission.created_at))
        .bind(format_datetime(&submission.updated_at))
        .bind(format_datetime(&submission.transitioned_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "submission {} already exists",
                        submission.id
                    ));
                }
            }
            query_err(e)
        })?;

        for payload in submission.sections.values() {
            sqlx::query(
                "INSERT INTO submission_sections (submission_id, kind, payload, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(submission.id.to_string())
            .bind(payload.kind().as_str())
            .bind(to_json(&payload.to_value())?)
            .bind(format_datetime(&submission.updated_at))
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(submission.clone())
    }

    async fn get(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM submissions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: Option<SubmissionFilter>,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = String::from("SELECT * FROM submissions");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(skill_id) = filter.skill_id {
            conditions.push("skill_id = ?");
            binds.push(skill_id.to_string());
        }
        if let Some(ref developer_id) = filter.developer_id {
            conditions.push("developer_id = ?");
            binds.push(developer_id.clone());
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        let limit = filter.limit.map_or(-1, |l| l.max(0));
        let offset = filter.offset.unwrap_or(0).max(0);
        sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(query_err)?;

        let mut submissions = Vec::with_capacity(rows.len());
        for row in &rows {
            submissions.push(self.hydrate(row).await?);
        }
        Ok(submissions)
    }

    async fn save_section(
        &self,
        id: &SubmissionId,
        payload: &SectionPayload,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let touched = sqlx::query(
            "UPDATE submissions SET updated_at = ? WHERE id = ? AND status IN ('draft', 'rejected')",
        )
        .bind(format_datetime(&at))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        if touched.rows_affected() == 0 {
            let status: Option<(String,)> = sqlx::query_as("SELECT status FROM submissions WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
            return match status {
                None => Err(RepositoryError::NotFound),
                Some((status,)) => Err(RepositoryError::Conflict(format!(
                    "submission {id} is {status}"
                ))),
            };
        }

        sqlx::query(
            "INSERT INTO submission_sections (submission_id, kind, payload, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(submission_id, kind) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        )
        .bind(id.to_string())
        .bind(payload.kind().as_str())
        .bind(to_json(&payload.to_value())?)
        .bind(format_datetime(&at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn apply_transition(&self, transition: &Transition) -> Result<(), RepositoryError> {
        let id = transition.submission_id.to_string();
        let at = format_datetime(&transition.at);
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let updated = sqlx::query(
            "UPDATE submissions SET status = ?, updated_at = ?, transitioned_at = ?
             WHERE id = ? AND status = ?",
        )
        .bind(transition.to.as_str())
        .bind(&at)
        .bind(&at)
        .bind(&id)
        .bind(transition.from.as_str())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        if updated.rows_affected() == 0 {
            let status: Option<(String,)> = sqlx::query_as("SELECT status FROM submissions WHERE id = ?")
                .bind(&id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
            // Dropping `tx` rolls back.
            return match status {
                None => Err(RepositoryError::NotFound),
                Some((status,)) => Err(RepositoryError::Conflict(format!(
                    "expected status '{}', found '{status}'",
                    transition.from
                ))),
            };
        }

        if let Some(review) = &transition.review {
            sqlx::query(
                "INSERT INTO review_results (id, submission_id, verdict, findings, reviewed_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(review.id.to_string())
            .bind(&id)
            .bind(review.verdict.to_string())
            .bind(to_json(&review.findings)?)
            .bind(format_datetime(&review.reviewed_at))
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        if let Some(decision) = &transition.decision {
            sqlx::query(
                "INSERT INTO oem_decisions (id, submission_id, oem, reviewer, outcome, comments, decided_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(decision.id.to_string())
            .bind(&id)
            .bind(&decision.oem)
            .bind(&decision.reviewer)
            .bind(decision.outcome.to_string())
            .bind(&decision.comments)
            .bind(format_datetime(&decision.decided_at))
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        sqlx::query(
            "INSERT INTO submission_transitions (submission_id, from_status, to_status, actor, at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(transition.from.as_str())
        .bind(transition.to.as_str())
        .bind(&transition.actor)
        .bind(&at)
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn list_review_results(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<PlatformReviewResult>, RepositoryError> {
        if !self.exists(id).await? {
            return Err(RepositoryError::NotFound);
        }
        let rows = sqlx::query("SELECT * FROM review_results WHERE submission_id = ? ORDER BY rowid DESC")
            .bind(id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(review_from_row).collect()
    }

    async fn list_transitions(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<TransitionRecord>, RepositoryError> {
        if !self.exists(id).await? {
            return Err(RepositoryError::NotFound);
        }
        let rows = sqlx::query("SELECT * FROM submission_transitions WHERE submission_id = ? ORDER BY id ASC")
            .bind(id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(transition_from_row).collect()
    }

    async fn count_by_status(&self) -> Result<Vec<(SubmissionStatus, u64)>, RepositoryError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM submissions GROUP BY status ORDER BY status")
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;

        let mut counts = rows
            .into_iter()
            .map(|(status, n)| {
                let status: SubmissionStatus = status.parse().map_err(RepositoryError::Query)?;
                Ok((status, n.max(0) as u64))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        counts.sort();
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use robotskills_core::validation::validate_section;
    use robotskills_types::review::Severity;
    use serde_json::json;

    use super::*;
    use crate::sqlite::pool::test_pool;

    fn assets() -> SectionPayload {
        validate_section(
            SectionKind::Assets,
            &json!({
                "icon_url": "https://cdn.robotskills.test/icon.png",
                "screenshots": ["https://cdn.robotskills.test/1.png"]
            }),
        )
        .unwrap()
    }

    fn review_for(id: SubmissionId, severity: Severity) -> PlatformReviewResult {
        PlatformReviewResult::from_findings(
            id,
            vec![Finding {
                code: "assets.few_screenshots".to_string(),
                severity,
                section: SectionKind::Assets,
                message: "1 screenshot(s)".to_string(),
            }],
        )
    }

    async fn repo_with_draft() -> (SqliteSubmissionRepository, Submission) {
        let repo = SqliteSubmissionRepository::new(test_pool().await);
        let submission = Submission::new_draft(SkillId::new(), "dev-1");
        repo.create(&submission).await.unwrap();
        (repo, submission)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (repo, submission) = repo_with_draft().await;
        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, submission.id);
        assert_eq!(loaded.skill_id, submission.skill_id);
        assert_eq!(loaded.status, SubmissionStatus::Draft);
        assert!(loaded.sections.is_empty());
        assert!(repo.get(&SubmissionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let (repo, submission) = repo_with_draft().await;
        let err = repo.create(&submission).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_section_upserts() {
        let (repo, submission) = repo_with_draft().await;
        let payload = assets();
        repo.save_section(&submission.id, &payload, Utc::now()).await.unwrap();
        repo.save_section(&submission.id, &payload, Utc::now()).await.unwrap();

        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.sections.len(), 1);
        assert_eq!(loaded.section(SectionKind::Assets), Some(&payload));
    }

    #[tokio::test]
    async fn test_save_section_locked_and_missing() {
        let (repo, submission) = repo_with_draft().await;
        repo.apply_transition(&Transition::new(
            submission.id,
            SubmissionStatus::Draft,
            SubmissionStatus::Withdrawn,
            "dev-1",
        ))
        .await
        .unwrap();

        let err = repo
            .save_section(&submission.id, &assets(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = repo
            .save_section(&SubmissionId::new(), &assets(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_transition_writes_review_and_history() {
        let (repo, submission) = repo_with_draft().await;
        let review = review_for(submission.id, Severity::Info);
        repo.apply_transition(
            &Transition::new(
                submission.id,
                SubmissionStatus::Draft,
                SubmissionStatus::PendingAutomatedReview,
                "dev-1",
            )
            .with_review(review.clone()),
        )
        .await
        .unwrap();

        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SubmissionStatus::PendingAutomatedReview);
        assert_eq!(loaded.review.as_ref().map(|r| r.id), Some(review.id));
        assert_eq!(loaded.review.unwrap().findings, review.findings);

        let history = repo.list_transitions(&submission.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from, SubmissionStatus::Draft);
        assert_eq!(history[0].actor, "dev-1");
    }

    #[tokio::test]
    async fn test_stale_transition_rolls_back() {
        let (repo, submission) = repo_with_draft().await;
        repo.apply_transition(&Transition::new(
            submission.id,
            SubmissionStatus::Draft,
            SubmissionStatus::Withdrawn,
            "dev-1",
        ))
        .await
        .unwrap();

        let stale = Transition::new(
            submission.id,
            SubmissionStatus::Draft,
            SubmissionStatus::PendingAutomatedReview,
            "dev-1",
        )
        .with_review(review_for(submission.id, Severity::Error));
        let err = repo.apply_transition(&stale).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        assert!(repo.list_review_results(&submission.id).await.unwrap().is_empty());
        assert_eq!(repo.list_transitions(&submission.id).await.unwrap().len(), 1);

        let missing = Transition::new(
            SubmissionId::new(),
            SubmissionStatus::Draft,
            SubmissionStatus::Withdrawn,
            "dev-1",
        );
        assert!(matches!(
            repo.apply_transition(&missing).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_review_history_newest_first_and_latest_decision() {
        let (repo, submission) = repo_with_draft().await;
        let first = review_for(submission.id, Severity::Error);
        let second = review_for(submission.id, Severity::Info);

        let steps = [
            (SubmissionStatus::Draft, SubmissionStatus::PendingAutomatedReview, Some(first.clone())),
            (SubmissionStatus::PendingAutomatedReview, SubmissionStatus::Rejected, None),
            (SubmissionStatus::Rejected, SubmissionStatus::PendingAutomatedReview, Some(second.clone())),
            (SubmissionStatus::PendingAutomatedReview, SubmissionStatus::PendingOemReview, None),
        ];
        for (from, to, review) in steps {
            let mut t = Transition::new(submission.id, from, to, "platform");
            t.review = review;
            repo.apply_transition(&t).await.unwrap();
        }

        let decision = robotskills_types::review::OemDecisionRequest {
            oem: "Acme Robotics".to_string(),
            reviewer: "qa@acme.test".to_string(),
            outcome: DecisionOutcome::Approve,
            comments: String::new(),
        }
        .into_decision(submission.id);
        repo.apply_transition(
            &Transition::new(
                submission.id,
                SubmissionStatus::PendingOemReview,
                SubmissionStatus::Published,
                "qa@acme.test",
            )
            .with_decision(decision.clone()),
        )
        .await
        .unwrap();

        let reviews = repo.list_review_results(&submission.id).await.unwrap();
        assert_eq!(
            reviews.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(reviews[1].verdict, Verdict::Fail);

        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SubmissionStatus::Published);
        assert_eq!(loaded.review.unwrap().id, second.id);
        assert_eq!(loaded.decision, Some(decision));
        assert_eq!(repo.list_transitions(&submission.id).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_filter_and_counts() {
        let repo = SqliteSubmissionRepository::new(test_pool().await);
        let skill = SkillId::new();
        for dev in ["dev-a", "dev-b", "dev-a"] {
            repo.create(&Submission::new_draft(skill, dev)).await.unwrap();
        }
        let other = Submission::new_draft(SkillId::new(), "dev-a");
        repo.create(&other).await.unwrap();
        repo.apply_transition(&Transition::new(
            other.id,
            SubmissionStatus::Draft,
            SubmissionStatus::Withdrawn,
            "dev-a",
        ))
        .await
        .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 4);

        let filtered = repo
            .list(Some(SubmissionFilter {
                skill_id: Some(skill),
                developer_id: Some("dev-a".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);

        let page = repo
            .list(Some(SubmissionFilter {
                offset: Some(3),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);

        let withdrawn = repo
            .list(Some(SubmissionFilter {
                status: Some(SubmissionStatus::Withdrawn),
                limit: Some(10),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(withdrawn.len(), 1);
        assert_eq!(withdrawn[0].id, other.id);

        let counts = repo.count_by_status().await.unwrap();
        assert_eq!(
            counts,
            vec![(SubmissionStatus::Draft, 3), (SubmissionStatus::Withdrawn, 1)]
        );
    }
}
