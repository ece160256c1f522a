//! Section schema validators.
//!
//! Each section kind has a pure `validate(&Value)` that either produces the
//! normalized typed section or every field-level problem found in the payload.

pub mod assets;
pub mod compatibility;
pub mod identity;
pub mod package;
pub mod permissions;
pub mod reader;

use robotskills_types::error::{InvalidSection, ValidationErrors};
use robotskills_types::section::{SectionKind, SectionPayload};
use robotskills_types::submission::Submission;
use serde_json::Value;

/// Validate `payload` as a section of the given kind.
pub fn validate_section(kind: SectionKind, payload: &Value) -> Result<SectionPayload, ValidationErrors> {
    match kind {
        SectionKind::Identity => identity::validate(payload).map(SectionPayload::Identity),
        SectionKind::Assets => assets::validate(payload).map(SectionPayload::Assets),
        SectionKind::Compatibility => {
            compatibility::validate(payload).map(SectionPayload::Compatibility)
        }
        SectionKind::Permissions => permissions::validate(payload).map(SectionPayload::Permissions),
        SectionKind::Package => package::validate(payload).map(SectionPayload::Package),
    }
}

/// Re-validate every stored section of a submission.
///
/// Returns the kinds that are missing and the sections that no longer pass.
/// Both lists empty means the submission is complete.
pub fn check_completeness(submission: &Submission) -> (Vec<SectionKind>, Vec<InvalidSection>) {
    let missing = submission.missing_sections();
    let invalid = submission
        .sections
        .iter()
        .filter_map(|(kind, payload)| {
            validate_section(*kind, &payload.to_value())
                .err()
                .map(|errors| InvalidSection {
                    kind: *kind,
                    errors,
                })
        })
        .collect();
    (missing, invalid)
}
