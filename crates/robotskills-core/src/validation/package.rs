//! Package section: the uploaded artifact and how the robot runs it.

use robotskills_types::error::ValidationErrors;
use robotskills_types::section::{PackageSection, Runtime};
use serde_json::Value;

use super::reader::{ObjectReader, ROOT};

const FIELDS: &[&str] = &[
    "artifact_url",
    "sha256",
    "size_bytes",
    "runtime",
    "entrypoint",
    "min_sdk",
];

/// Hard schema ceiling. The reviewer applies the tighter configured limit.
pub const MAX_PACKAGE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

pub fn validate(payload: &Value) -> Result<PackageSection, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(reader) = ObjectReader::new(payload, ROOT, &mut errors) else {
        return Err(errors);
    };
    reader.deny_unknown(FIELDS, &mut errors);

    let artifact_url = reader.https_url("artifact_url", &mut errors);
    let sha256 = reader
        .string("sha256", 64, 64, &mut errors)
        .filter(|digest| {
            let ok = digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
            if !ok {
                errors.push(reader.path("sha256"), "must be lowercase hexadecimal");
            }
            ok
        });
    let size_bytes = reader.u64_in("size_bytes", 1, MAX_PACKAGE_BYTES, &mut errors);
    let runtime: Option<Runtime> = reader.enumeration("runtime", &Runtime::expected(), &mut errors);
    let entrypoint = reader
        .string("entrypoint", 1, 256, &mut errors)
        .filter(|entry| {
            let escapes = entry.split(['/', '\\']).any(|segment| segment == "..");
            if escapes {
                errors.push(reader.path("entrypoint"), "must not contain '..' segments");
            }
            !escapes
        });
    let min_sdk = reader.semver("min_sdk", &mut errors);

    match (artifact_url, sha256, size_bytes, runtime, entrypoint, min_sdk) {
        (
            Some(artifact_url),
            Some(sha256),
            Some(size_bytes),
            Some(runtime),
            Some(entrypoint),
            Some(min_sdk),
        ) if errors.is_empty() => Ok(PackageSection {
            artifact_url,
            sha256,
            size_bytes,
            runtime,
            entrypoint,
            min_sdk,
        }),
        _ => Err(errors),
    }
}
