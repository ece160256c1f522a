//! Typed parsing of path segments.

use robotskills_types::section::SectionKind;
use robotskills_types::submission::SubmissionId;

use crate::http::error::AppError;

pub fn submission_id(raw: &str) -> Result<SubmissionId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid submission id: '{raw}'")))
}

pub fn section_kind(raw: &str) -> Result<SectionKind, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_id_roundtrip() {
        let id = SubmissionId::new();
        assert_eq!(submission_id(&id.to_string()).unwrap(), id);
        assert!(matches!(submission_id("abc"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_section_kind() {
        assert_eq!(section_kind("package").unwrap(), SectionKind::Package);
        assert!(matches!(section_kind("pricing"), Err(AppError::BadRequest(_))));
    }
}
