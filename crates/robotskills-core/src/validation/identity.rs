//! Identity section: storefront name, slug, copy, category, tags, version.

use robotskills_types::error::ValidationErrors;
use robotskills_types::section::{IdentitySection, SkillCategory};
use serde_json::Value;

use super::reader::{check_string, index, report_duplicates, ObjectReader, ROOT};

const FIELDS: &[&str] = &[
    "name",
    "slug",
    "summary",
    "description",
    "category",
    "tags",
    "version",
];

const MAX_TAGS: usize = 10;

pub fn validate(payload: &Value) -> Result<IdentitySection, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(reader) = ObjectReader::new(payload, ROOT, &mut errors) else {
        return Err(errors);
    };
    reader.deny_unknown(FIELDS, &mut errors);

    let name = reader.string("name", 3, 64, &mut errors);
    let slug = reader
        .string("slug", 3, 48, &mut errors)
        .filter(|slug| check_slug(slug, &reader.path("slug"), &mut errors));
    let summary = reader.string("summary", 10, 160, &mut errors);
    let description = reader.string("description", 30, 5000, &mut errors);
    let category: Option<SkillCategory> =
        reader.enumeration("category", &SkillCategory::expected(), &mut errors);
    let version = reader.semver("version", &mut errors);
    let tags = read_tags(&reader, &mut errors);

    match (name, slug, summary, description, category, version, tags) {
        (
            Some(name),
            Some(slug),
            Some(summary),
            Some(description),
            Some(category),
            Some(version),
            Some(tags),
        ) if errors.is_empty() => Ok(IdentitySection {
            name,
            slug,
            summary,
            description,
            category,
            tags,
            version,
        }),
        _ => Err(errors),
    }
}

/// Lowercase letters, digits and single hyphens; no hyphen at either end.
fn check_slug(slug: &str, path: &str, errors: &mut ValidationErrors) -> bool {
    let charset_ok = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !charset_ok {
        errors.push(path, "must contain only lowercase letters, digits, and hyphens");
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        errors.push(path, "must not start or end with a hyphen or contain '--'");
        return false;
    }
    true
}

fn read_tags(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<Vec<String>> {
    let path = reader.path("tags");
    let items = reader.array("tags", 0, MAX_TAGS, errors)?;
    let before = errors.len();

    let tags: Vec<(usize, String)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            check_string(item, &index(&path, i), 2, 24, errors).map(|tag| (i, tag.to_lowercase()))
        })
        .collect();
    report_duplicates(tags.iter().cloned(), &path, "tag", errors);

    (errors.len() == before).then(|| tags.into_iter().map(|(_, tag)| tag).collect())
}
