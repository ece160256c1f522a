//! Assets section: icon, screenshots, optional video.

use robotskills_types::error::ValidationErrors;
use robotskills_types::section::AssetsSection;
use serde_json::Value;

use super::reader::{check_https_url, check_string, index, ObjectReader, ROOT};

const FIELDS: &[&str] = &["icon_url", "screenshots", "video_url"];

const MAX_SCREENSHOTS: usize = 8;

pub fn validate(payload: &Value) -> Result<AssetsSection, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(reader) = ObjectReader::new(payload, ROOT, &mut errors) else {
        return Err(errors);
    };
    reader.deny_unknown(FIELDS, &mut errors);

    let icon_url = reader.https_url("icon_url", &mut errors);
    let video_url = reader.optional_https_url("video_url", &mut errors);

    let path = reader.path("screenshots");
    let screenshots: Option<Vec<String>> = reader
        .array("screenshots", 1, MAX_SCREENSHOTS, &mut errors)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let item_path = index(&path, i);
                    check_string(item, &item_path, 1, 2048, &mut errors)
                        .filter(|url| check_https_url(url, &item_path, &mut errors))
                })
                .collect()
        });

    match (icon_url, screenshots, video_url) {
        (Some(icon_url), Some(screenshots), Some(video_url)) if errors.is_empty() => {
            Ok(AssetsSection {
                icon_url,
                screenshots,
                video_url,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_assets() {
        let assets = validate(&json!({
            "icon_url": "https://cdn.robotskills.test/icon.png",
            "screenshots": ["https://cdn.robotskills.test/1.png"]
        }))
        .unwrap();
        assert_eq!(assets.screenshots.len(), 1);
        assert!(assets.video_url.is_none());
    }

    #[test]
    fn test_screenshots_required() {
        let errors = validate(&json!({
            "icon_url": "https://cdn.robotskills.test/icon.png",
            "screenshots": []
        }))
        .unwrap_err();
        assert!(errors.has_field("screenshots"));
    }

    #[test]
    fn test_insecure_urls_reported_by_index() {
        let errors = validate(&json!({
            "icon_url": "http://cdn.robotskills.test/icon.png",
            "screenshots": ["https://cdn.robotskills.test/1.png", "ftp://files.test/2.png"],
            "video_url": "https://video.robotskills.test/demo.mp4"
        }))
        .unwrap_err();
        assert!(errors.has_field("icon_url"));
        assert!(errors.has_field("screenshots[1]"));
        assert_eq!(errors.len(), 2);
    }
}
