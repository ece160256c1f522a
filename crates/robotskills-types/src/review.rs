//! Review artifacts attached to a submission: automated Platform Review
//! Results and human OEM decisions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::section::SectionKind;
use crate::submission::SubmissionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "fail" => Ok(Verdict::Fail),
            other => Err(format!("invalid verdict: '{other}'")),
        }
    }
}

/// Finding severity. Any `Error` finding fails the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One itemized observation from the automated review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable machine-readable code, e.g. `package.too_large`.
    pub code: String,
    pub severity: Severity,
    pub section: SectionKind,
    pub message: String,
}

/// Automated pass/fail verdict with itemized findings.
///
/// Immutable once recorded. A re-submission appends a new result; older
/// results stay in the history untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformReviewResult {
    pub id: Uuid,
    pub submission_id: SubmissionId,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub reviewed_at: DateTime<Utc>,
}

impl PlatformReviewResult {
    /// Build a result whose verdict is derived from the findings.
    pub fn from_findings(submission_id: SubmissionId, findings: Vec<Finding>) -> Self {
        let verdict = if findings.iter().any(|f| f.severity == Severity::Error) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };
        Self {
            id: Uuid::now_v7(),
            submission_id,
            verdict,
            findings,
            reviewed_at: Utc::now(),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    Approve,
    Reject,
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionOutcome::Approve => write!(f, "approve"),
            DecisionOutcome::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for DecisionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(DecisionOutcome::Approve),
            "reject" => Ok(DecisionOutcome::Reject),
            other => Err(format!("invalid decision outcome: '{other}'")),
        }
    }
}

/// A human reviewer's verdict, owned by the reviewing OEM organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OemDecision {
    pub id: Uuid,
    pub submission_id: SubmissionId,
    pub oem: String,
    pub reviewer: String,
    pub outcome: DecisionOutcome,
    #[serde(default)]
    pub comments: String,
    pub decided_at: DateTime<Utc>,
}

/// Caller input for recording an OEM decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OemDecisionRequest {
    pub oem: String,
    pub reviewer: String,
    pub outcome: DecisionOutcome,
    #[serde(default)]
    pub comments: String,
}

impl OemDecisionRequest {
    pub fn into_decision(self, submission_id: SubmissionId) -> OemDecision {
        OemDecision {
            id: Uuid::now_v7(),
            submission_id,
            oem: self.oem,
            reviewer: self.reviewer,
            outcome: self.outcome,
            comments: self.comments,
            decided_at: Utc::now(),
        }
    }
}
