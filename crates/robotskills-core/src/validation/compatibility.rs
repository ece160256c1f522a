//! Compatibility section: supported robot models, firmware ranges, hardware.

use robotskills_types::error::ValidationErrors;
use robotskills_types::section::{CompatibilitySection, Hardware, RobotCompatibility};
use serde_json::Value;

use super::reader::{index, parse_enum, report_duplicates, ObjectReader, ROOT};

const FIELDS: &[&str] = &["robots", "required_hardware"];
const ROBOT_FIELDS: &[&str] = &["oem", "model", "min_firmware", "max_firmware"];

const MAX_ROBOTS: usize = 50;

pub fn validate(payload: &Value) -> Result<CompatibilitySection, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(reader) = ObjectReader::new(payload, ROOT, &mut errors) else {
        return Err(errors);
    };
    reader.deny_unknown(FIELDS, &mut errors);

    let robots_path = reader.path("robots");
    let robots: Option<Vec<(usize, RobotCompatibility)>> = reader
        .array("robots", 1, MAX_ROBOTS, &mut errors)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    read_robot(item, &index(&robots_path, i), &mut errors).map(|r| (i, r))
                })
                .collect()
        });
    if let Some(ref robots) = robots {
        report_duplicates(
            robots
                .iter()
                .map(|(i, r)| (*i, (r.oem.to_lowercase(), r.model.to_lowercase()))),
            &robots_path,
            "robot model",
            &mut errors,
        );
    }

    let hardware_path = reader.path("required_hardware");
    let required_hardware: Option<Vec<(usize, Hardware)>> = reader
        .array("required_hardware", 0, Hardware::ALL.len(), &mut errors)
        .map(|items| {
            let expected = Hardware::expected();
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    parse_enum(item, &index(&hardware_path, i), &expected, &mut errors)
                        .map(|h| (i, h))
                })
                .collect()
        });
    if let Some(ref hardware) = required_hardware {
        report_duplicates(
            hardware.iter().copied(),
            &hardware_path,
            "hardware",
            &mut errors,
        );
    }

    match (robots, required_hardware) {
        (Some(robots), Some(required_hardware)) if errors.is_empty() => Ok(CompatibilitySection {
            robots: robots.into_iter().map(|(_, r)| r).collect(),
            required_hardware: required_hardware.into_iter().map(|(_, h)| h).collect(),
        }),
        _ => Err(errors),
    }
}

fn read_robot(item: &Value, path: &str, errors: &mut ValidationErrors) -> Option<RobotCompatibility> {
    let reader = ObjectReader::new(item, path, errors)?;
    reader.deny_unknown(ROBOT_FIELDS, errors);

    let oem = reader.string("oem", 2, 64, errors);
    let model = reader.string("model", 1, 64, errors);
    let min_firmware = reader.semver("min_firmware", errors);
    let max_firmware = reader.optional_semver("max_firmware", errors);

    if let (Some(min), Some(Some(max))) = (&min_firmware, &max_firmware) {
        if max < min {
            errors.push(
                reader.path("max_firmware"),
                format!("must not be lower than min_firmware ({min})"),
            );
            return None;
        }
    }

    Some(RobotCompatibility {
        oem: oem?,
        model: model?,
        min_firmware: min_firmware?,
        max_firmware: max_firmware?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_compatibility() {
        let section = validate(&json!({
            "robots": [
                { "oem": "Acme Robotics", "model": "Rover X", "min_firmware": "2.1.0" },
                { "oem": "Acme Robotics", "model": "Rover Y", "min_firmware": "3.0.0", "max_firmware": "3.9.9" }
            ],
            "required_hardware": ["camera", "wheels"]
        }))
        .unwrap();
        assert_eq!(section.robots.len(), 2);
        assert!(section.requires(Hardware::Camera));
        assert!(section.robots[0].max_firmware.is_none());
    }

    #[test]
    fn test_at_least_one_robot() {
        let errors = validate(&json!({ "robots": [] })).unwrap_err();
        assert!(errors.has_field("robots"));
    }

    #[test]
    fn test_inverted_firmware_range() {
        let errors = validate(&json!({
            "robots": [{ "oem": "Acme", "model": "R1", "min_firmware": "2.0.0", "max_firmware": "1.9.0" }]
        }))
        .unwrap_err();
        assert!(errors.has_field("robots[0].max_firmware"));
    }

    #[test]
    fn test_duplicate_robot_case_insensitive() {
        let errors = validate(&json!({
            "robots": [
                { "oem": "Acme", "model": "R1", "min_firmware": "1.0.0" },
                { "oem": "ACME", "model": "r1", "min_firmware": "1.1.0" }
            ]
        }))
        .unwrap_err();
        assert!(errors.has_field("robots[1]"));
    }

    #[test]
    fn test_duplicate_path_counts_invalid_entries() {
        let errors = validate(&json!({
            "robots": [
                { "oem": "Acme", "model": "R1", "min_firmware": "1.0.0" },
                { "oem": "Acme", "model": "R2", "min_firmware": "not-a-version" },
                { "oem": "acme", "model": "R1", "min_firmware": "1.2.0" }
            ],
            "required_hardware": ["camera", "jetpack", "camera"]
        }))
        .unwrap_err();
        assert!(errors.has_field("robots[1].min_firmware"));
        assert!(errors.has_field("robots[2]"));
        assert!(!errors.has_field("robots[1]"));
        assert!(errors.has_field("required_hardware[1]"));
        assert!(errors.has_field("required_hardware[2]"));
    }

    #[test]
    fn test_unknown_hardware_and_nested_fields() {
        let errors = validate(&json!({
            "robots": [{ "oem": "Acme", "model": "R1", "min_firmware": "x", "color": "red" }],
            "required_hardware": ["jetpack"]
        }))
        .unwrap_err();
        assert!(errors.has_field("robots[0].min_firmware"));
        assert!(errors.has_field("robots[0].color"));
        assert!(errors.has_field("required_hardware[0]"));
    }
}
