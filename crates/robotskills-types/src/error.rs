use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::section::SectionKind;
use crate::submission::SubmissionStatus;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path to the offending field, e.g. `robots[1].min_firmware`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found while validating one section payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether any error is reported for exactly this field path.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A section that exists but no longer passes its validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidSection {
    pub kind: SectionKind,
    pub errors: ValidationErrors,
}

/// Errors from the submission workflow.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("submission incomplete: missing {missing:?}, invalid {}", .invalid.len())]
    IncompleteSubmission {
        missing: Vec<SectionKind>,
        invalid: Vec<InvalidSection>,
    },

    #[error("cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("sections cannot be edited while the submission is '{status}'")]
    Locked { status: SubmissionStatus },

    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Errors from repository operations (used by trait definitions in robotskills-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from post-transition hooks. Logged, never propagated to callers.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook request failed: {0}")]
    Request(String),

    #[error("hook endpoint returned status {0}")]
    Status(u16),

    #[error("hook storage error: {0}")]
    Storage(String),
}
