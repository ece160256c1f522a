//! In-memory submission repository.
//!
//! Backs service tests. Each submission's review results and history live in
//! the same map entry as the submission, so a transition is atomic under the
//! entry's shard lock.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use robotskills_types::error::RepositoryError;
use robotskills_types::review::PlatformReviewResult;
use robotskills_types::section::SectionPayload;
use robotskills_types::submission::{Submission, SubmissionId, SubmissionStatus, TransitionRecord};

use super::submission::{SubmissionFilter, SubmissionRepository, Transition};

struct Entry {
    submission: Submission,
    reviews: Vec<PlatformReviewResult>,
    transitions: Vec<TransitionRecord>,
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    entries: DashMap<SubmissionId, Entry>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: &Submission) -> Result<Submission, RepositoryError> {
        match self.entries.entry(submission.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "submission {} already exists",
                submission.id
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Entry {
                    submission: submission.clone(),
                    reviews: Vec::new(),
                    transitions: Vec::new(),
                });
                Ok(submission.clone())
            }
        }
    }

    async fn get(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.entries.get(id).map(|e| e.submission.clone()))
    }

    async fn list(
        &self,
        filter: Option<SubmissionFilter>,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut submissions: Vec<Submission> = self
            .entries
            .iter()
            .filter(|e| filter.matches(&e.submission))
            .map(|e| e.submission.clone())
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(submissions.into_iter().skip(offset).take(limit).collect())
    }

    async fn save_section(
        &self,
        id: &SubmissionId,
        payload: &SectionPayload,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut entry = self.entries.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if !entry.submission.status.is_editable() {
            return Err(RepositoryError::Conflict(format!(
                "submission {id} is {}",
                entry.submission.status
            )));
        }
        entry.submission.sections.insert(payload.kind(), payload.clone());
        entry.submission.updated_at = at;
        Ok(())
    }

    async fn apply_transition(&self, transition: &Transition) -> Result<(), RepositoryError> {
        let mut entry = self
            .entries
            .get_mut(&transition.submission_id)
            .ok_or(RepositoryError::NotFound)?;
        if entry.submission.status != transition.from {
            return Err(RepositoryError::Conflict(format!(
                "expected status '{}', found '{}'",
                transition.from, entry.submission.status
            )));
        }

        let entry = &mut *entry;
        entry.submission.status = transition.to;
        entry.submission.updated_at = transition.at;
        entry.submission.transitioned_at = transition.at;
        if let Some(review) = &transition.review {
            entry.reviews.push(review.clone());
            entry.submission.review = Some(review.clone());
        }
        if let Some(decision) = &transition.decision {
            entry.submission.decision = Some(decision.clone());
        }
        entry.transitions.push(transition.record());
        Ok(())
    }

    async fn list_review_results(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<PlatformReviewResult>, RepositoryError> {
        let entry = self.entries.get(id).ok_or(RepositoryError::NotFound)?;
        Ok(entry.reviews.iter().rev().cloned().collect())
    }

    async fn list_transitions(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<TransitionRecord>, RepositoryError> {
        let entry = self.entries.get(id).ok_or(RepositoryError::NotFound)?;
        Ok(entry.transitions.clone())
    }

    async fn count_by_status(&self) -> Result<Vec<(SubmissionStatus, u64)>, RepositoryError> {
        let mut counts: Vec<(SubmissionStatus, u64)> = Vec::new();
        for entry in self.entries.iter() {
            let status = entry.submission.status;
            match counts.iter_mut().find(|(s, _)| *s == status) {
                Some((_, n)) => *n += 1,
                None => counts.push((status, 1)),
            }
        }
        counts.sort();
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use robotskills_types::review::PlatformReviewResult;
    use robotskills_types::section::SectionKind;
    use robotskills_types::submission::SkillId;

    use super::*;
    use crate::validation::fixtures;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemorySubmissionRepository::new();
        let submission = Submission::new_draft(SkillId::new(), "dev-1");
        repo.create(&submission).await.unwrap();
        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, submission.id);
        assert!(matches!(
            repo.create(&submission).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(repo.get(&SubmissionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_transition_is_conflict() {
        let repo = InMemorySubmissionRepository::new();
        let submission = Submission::new_draft(SkillId::new(), "dev-1");
        repo.create(&submission).await.unwrap();

        let first = Transition::new(
            submission.id,
            SubmissionStatus::Draft,
            SubmissionStatus::Withdrawn,
            "dev-1",
        );
        repo.apply_transition(&first).await.unwrap();

        let stale = Transition::new(
            submission.id,
            SubmissionStatus::Draft,
            SubmissionStatus::PendingAutomatedReview,
            "dev-1",
        )
        .with_review(PlatformReviewResult::from_findings(submission.id, vec![]));
        let err = repo.apply_transition(&stale).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let loaded = repo.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SubmissionStatus::Withdrawn);
        assert!(loaded.review.is_none());
        assert!(repo.list_review_results(&submission.id).await.unwrap().is_empty());
        assert_eq!(repo.list_transitions(&submission.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_section_respects_lock() {
        let repo = InMemorySubmissionRepository::new();
        let mut submission = Submission::new_draft(SkillId::new(), "dev-1");
        submission.status = SubmissionStatus::PendingOemReview;
        repo.create(&submission).await.unwrap();

        let payload = fixtures::section(SectionKind::Assets);
        let err = repo
            .save_section(&submission.id, &payload, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(matches!(
            repo.save_section(&SubmissionId::new(), &payload, Utc::now()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = InMemorySubmissionRepository::new();
        let skill = SkillId::new();
        for i in 0..5 {
            let dev = if i % 2 == 0 { "dev-a" } else { "dev-b" };
            repo.create(&Submission::new_draft(skill, dev)).await.unwrap();
        }
        repo.create(&Submission::new_draft(SkillId::new(), "dev-a"))
            .await
            .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let by_skill = SubmissionFilter {
            skill_id: Some(skill),
            developer_id: Some("dev-a".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(Some(by_skill)).await.unwrap().len(), 3);

        let page = SubmissionFilter {
            limit: Some(2),
            offset: Some(5),
            ..Default::default()
        };
        assert_eq!(repo.list(Some(page)).await.unwrap().len(), 1);

        let counts = repo.count_by_status().await.unwrap();
        assert_eq!(counts, vec![(SubmissionStatus::Draft, 6)]);
    }
}
