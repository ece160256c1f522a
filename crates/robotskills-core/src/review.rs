//! Automated platform review.
//!
//! The reviewer runs when a submission enters `pending_automated_review`. It
//! only looks at already-validated sections and turns policy checks into
//! itemized findings; the verdict is `fail` iff any finding is an error.

use robotskills_types::config::ReviewConfig;
use robotskills_types::review::{Finding, PlatformReviewResult, Severity};
use robotskills_types::section::{
    AssetsSection, CompatibilitySection, IdentitySection, PackageSection, PermissionsSection,
    Runtime, SectionKind, SectionPayload,
};
use robotskills_types::submission::Submission;

/// Produces a review result for a complete submission.
pub trait PlatformReviewer: Send + Sync {
    fn review(&self, submission: &Submission) -> PlatformReviewResult;
}

/// Policy checks driven by [`ReviewConfig`].
#[derive(Debug, Clone, Default)]
pub struct RuleBasedReviewer {
    config: ReviewConfig,
}

impl RuleBasedReviewer {
    pub fn new(config: ReviewConfig) -> Self {
        Self { config }
    }

    fn check_identity(&self, identity: &IdentitySection, findings: &mut Vec<Finding>) {
        if !identity.version.pre.is_empty() {
            let severity = if self.config.reject_prerelease {
                Severity::Error
            } else {
                Severity::Warning
            };
            findings.push(finding(
                "identity.prerelease_version",
                severity,
                SectionKind::Identity,
                format!("version {} is a pre-release", identity.version),
            ));
        }
    }

    fn check_assets(&self, assets: &AssetsSection, findings: &mut Vec<Finding>) {
        let count = assets.screenshots.len();
        if count < self.config.min_recommended_screenshots {
            findings.push(finding(
                "assets.few_screenshots",
                Severity::Info,
                SectionKind::Assets,
                format!(
                    "{count} screenshot(s); at least {} recommended",
                    self.config.min_recommended_screenshots
                ),
            ));
        }
    }

    fn check_compatibility(&self, compatibility: &CompatibilitySection, findings: &mut Vec<Finding>) {
        for robot in compatibility.robots.iter().filter(|r| r.max_firmware.is_none()) {
            findings.push(finding(
                "compatibility.open_firmware_range",
                Severity::Info,
                SectionKind::Compatibility,
                format!(
                    "{} {} has no max_firmware; future firmware is assumed compatible",
                    robot.oem, robot.model
                ),
            ));
        }
    }

    fn check_permissions(
        &self,
        permissions: &PermissionsSection,
        compatibility: Option<&CompatibilitySection>,
        findings: &mut Vec<Finding>,
    ) {
        for request in &permissions.permissions {
            let Some(hardware) = request.permission.required_hardware() else {
                continue;
            };
            if !compatibility.is_some_and(|c| c.requires(hardware)) {
                findings.push(finding(
                    "permissions.hardware_missing",
                    Severity::Error,
                    SectionKind::Permissions,
                    format!(
                        "permission '{}' requested but '{hardware}' is not in required_hardware",
                        request.permission
                    ),
                ));
            }
        }

        if permissions.collects_data && permissions.has_sensitive() {
            findings.push(finding(
                "permissions.sensitive_data",
                Severity::Warning,
                SectionKind::Permissions,
                "sensitive permissions combined with data collection need a manual privacy check",
            ));
        }
    }

    fn check_package(&self, package: &PackageSection, findings: &mut Vec<Finding>) {
        if package.size_bytes > self.config.max_package_bytes {
            findings.push(finding(
                "package.too_large",
                Severity::Error,
                SectionKind::Package,
                format!(
                    "package is {} bytes; the limit is {} bytes",
                    package.size_bytes, self.config.max_package_bytes
                ),
            ));
        }
        if package.runtime == Runtime::Native {
            findings.push(finding(
                "package.native_runtime",
                Severity::Warning,
                SectionKind::Package,
                "native packages cannot be sandboxed and get extra OEM scrutiny",
            ));
        }
    }
}

impl PlatformReviewer for RuleBasedReviewer {
    fn review(&self, submission: &Submission) -> PlatformReviewResult {
        let mut findings = Vec::new();

        let compatibility = match submission.section(SectionKind::Compatibility) {
            Some(SectionPayload::Compatibility(c)) => Some(c),
            _ => None,
        };

        for payload in submission.sections.values() {
            match payload {
                SectionPayload::Identity(s) => self.check_identity(s, &mut findings),
                SectionPayload::Assets(s) => self.check_assets(s, &mut findings),
                SectionPayload::Compatibility(s) => self.check_compatibility(s, &mut findings),
                SectionPayload::Permissions(s) => {
                    self.check_permissions(s, compatibility, &mut findings)
                }
                SectionPayload::Package(s) => self.check_package(s, &mut findings),
            }
        }

        PlatformReviewResult::from_findings(submission.id, findings)
    }
}

fn finding(
    code: &str,
    severity: Severity,
    section: SectionKind,
    message: impl Into<String>,
) -> Finding {
    Finding {
        code: code.to_string(),
        severity,
        section,
        message: message.into(),
    }
}
