//! Permissions section: requested permissions, data collection, privacy policy.

use robotskills_types::error::ValidationErrors;
use robotskills_types::section::{Permission, PermissionRequest, PermissionsSection};
use serde_json::Value;

use super::reader::{index, report_duplicates, ObjectReader, ROOT};

const FIELDS: &[&str] = &["permissions", "collects_data", "privacy_policy_url"];
const REQUEST_FIELDS: &[&str] = &["permission", "rationale"];

pub fn validate(payload: &Value) -> Result<PermissionsSection, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(reader) = ObjectReader::new(payload, ROOT, &mut errors) else {
        return Err(errors);
    };
    reader.deny_unknown(FIELDS, &mut errors);

    let path = reader.path("permissions");
    let indexed: Option<Vec<(usize, PermissionRequest)>> = reader
        .array("permissions", 0, Permission::ALL.len(), &mut errors)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    read_request(item, &index(&path, i), &mut errors).map(|r| (i, r))
                })
                .collect()
        });
    if let Some(ref indexed) = indexed {
        report_duplicates(
            indexed.iter().map(|(i, r)| (*i, r.permission)),
            &path,
            "permission",
            &mut errors,
        );
    }
    let permissions: Option<Vec<PermissionRequest>> =
        indexed.map(|items| items.into_iter().map(|(_, r)| r).collect());

    let collects_data = reader.bool_or("collects_data", false, &mut errors);
    let privacy_policy_url = reader.optional_https_url("privacy_policy_url", &mut errors);

    // A privacy policy is mandatory once personal data can leave the robot.
    let needs_policy = collects_data.unwrap_or(false)
        || permissions
            .as_ref()
            .is_some_and(|p| p.iter().any(|r| r.permission.is_sensitive()));
    if needs_policy && matches!(privacy_policy_url, Some(None)) {
        errors.push(
            reader.path("privacy_policy_url"),
            "is required when collecting data or requesting sensitive permissions",
        );
    }

    match (permissions, collects_data, privacy_policy_url) {
        (Some(permissions), Some(collects_data), Some(privacy_policy_url))
            if errors.is_empty() =>
        {
            Ok(PermissionsSection {
                permissions,
                collects_data,
                privacy_policy_url,
            })
        }
        _ => Err(errors),
    }
}

fn read_request(item: &Value, path: &str, errors: &mut ValidationErrors) -> Option<PermissionRequest> {
    let reader = ObjectReader::new(item, path, errors)?;
    reader.deny_unknown(REQUEST_FIELDS, errors);

    let permission = reader.enumeration("permission", &Permission::expected(), errors);
    let rationale = reader.string("rationale", 10, 500, errors);

    Some(PermissionRequest {
        permission: permission?,
        rationale: rationale?,
    })
}
