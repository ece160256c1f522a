use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::review::{OemDecision, PlatformReviewResult};
use crate::section::{SectionKind, SectionPayload};

/// Declares a UUID v7 newtype identifier with Display/FromStr/Default.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-sortable).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a submission.
    SubmissionId
);

uuid_id!(
    /// Unique identifier for the skill a submission publishes a version of.
    SkillId
);

/// Lifecycle states of a submission.
///
/// ```text
/// draft -> pending_automated_review -> pending_oem_review -> published
///                 |       ^                   |
///                 v       | (resubmit)        v
///               rejected <--------------------+
/// ```
///
/// Every non-terminal state may also move to `withdrawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    PendingAutomatedReview,
    PendingOemReview,
    Published,
    Rejected,
    Withdrawn,
}

impl SubmissionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SubmissionStatus; 6] = [
        SubmissionStatus::Draft,
        SubmissionStatus::PendingAutomatedReview,
        SubmissionStatus::PendingOemReview,
        SubmissionStatus::Published,
        SubmissionStatus::Rejected,
        SubmissionStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::PendingAutomatedReview => "pending_automated_review",
            SubmissionStatus::PendingOemReview => "pending_oem_review",
            SubmissionStatus::Published => "published",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Withdrawn => "withdrawn",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Published | SubmissionStatus::Withdrawn)
    }

    /// States in which the developer may replace section payloads.
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Draft | SubmissionStatus::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(SubmissionStatus::Draft),
            "pending_automated_review" => Ok(SubmissionStatus::PendingAutomatedReview),
            "pending_oem_review" => Ok(SubmissionStatus::PendingOemReview),
            "published" => Ok(SubmissionStatus::Published),
            "rejected" => Ok(SubmissionStatus::Rejected),
            "withdrawn" => Ok(SubmissionStatus::Withdrawn),
            other => Err(format!("invalid submission status: '{other}'")),
        }
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        SubmissionStatus::Draft
    }
}

/// One developer's attempt to publish a skill version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub skill_id: SkillId,
    /// Opaque owner reference issued by the external auth system.
    pub developer_id: String,
    pub status: SubmissionStatus,
    /// Validated section payloads, ordered by section kind.
    pub sections: BTreeMap<SectionKind, SectionPayload>,
    /// Latest Platform Review Result, if the submission was ever submitted.
    pub review: Option<PlatformReviewResult>,
    /// Latest OEM decision, if one was recorded.
    pub decision: Option<OemDecision>,
    pub created_at: DateTime<Utc>,
    /// Last section edit or status change.
    pub updated_at: DateTime<Utc>,
    /// Last status change.
    pub transitioned_at: DateTime<Utc>,
}

impl Submission {
    /// Build a fresh draft with no sections.
    pub fn new_draft(skill_id: SkillId, developer_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SubmissionId::new(),
            skill_id,
            developer_id: developer_id.into(),
            status: SubmissionStatus::Draft,
            sections: BTreeMap::new(),
            review: None,
            decision: None,
            created_at: now,
            updated_at: now,
            transitioned_at: now,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionPayload> {
        self.sections.get(&kind)
    }

    /// Section kinds that have not been provided yet, in canonical order.
    pub fn missing_sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.sections.contains_key(kind))
            .collect()
    }

    /// The public slug from the identity section, if present.
    pub fn slug(&self) -> Option<&str> {
        match self.sections.get(&SectionKind::Identity) {
            Some(SectionPayload::Identity(identity)) => Some(identity.slug.as_str()),
            _ => None,
        }
    }
}

/// Request to start a new submission draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmissionRequest {
    pub developer_id: String,
    /// Publish a new version of an existing skill. A new skill id is minted when absent.
    #[serde(default)]
    pub skill_id: Option<SkillId>,
}

/// Append-only history row for one status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub submission_id: SubmissionId,
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    /// Who caused the transition (developer id, reviewer, or "platform").
    pub actor: String,
    pub at: DateTime<Utc>,
}
