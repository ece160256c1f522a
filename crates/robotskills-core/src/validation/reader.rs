//! Field readers shared by the section validators.
//!
//! Validators never stop at the first problem: every read records its
//! failures into a shared [`ValidationErrors`] and returns `None`, so a
//! single pass reports everything the developer has to fix.

use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use robotskills_types::error::ValidationErrors;
use serde_json::{Map, Value};

/// Path used for errors about the payload itself.
pub const ROOT: &str = "$";

/// Join a parent path and a child key (`robots[0]` + `model`).
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

pub fn index(prefix: &str, i: usize) -> String {
    format!("{prefix}[{i}]")
}

/// Reads typed fields out of one JSON object.
pub struct ObjectReader<'v> {
    obj: &'v Map<String, Value>,
    prefix: String,
}

impl<'v> ObjectReader<'v> {
    /// Wrap `value` if it is an object, recording an error at `path` otherwise.
    pub fn new(value: &'v Value, path: &str, errors: &mut ValidationErrors) -> Option<Self> {
        match value.as_object() {
            Some(obj) => Some(Self {
                obj,
                prefix: if path == ROOT { String::new() } else { path.to_string() },
            }),
            None => {
                errors.push(path, "must be a JSON object");
                None
            }
        }
    }

    pub fn path(&self, key: &str) -> String {
        join(&self.prefix, key)
    }

    /// Report keys that the section does not define.
    pub fn deny_unknown(&self, known: &[&str], errors: &mut ValidationErrors) {
        let mut unknown: Vec<&String> = self
            .obj
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .collect();
        unknown.sort();
        for key in unknown {
            errors.push(self.path(key), "unknown field");
        }
    }

    fn get(&self, key: &str) -> Option<&'v Value> {
        match self.obj.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    /// A trimmed string whose character count lies in `min..=max`.
    pub fn string(
        &self,
        key: &str,
        min: usize,
        max: usize,
        errors: &mut ValidationErrors,
    ) -> Option<String> {
        let Some(value) = self.get(key) else {
            errors.push(self.path(key), "is required");
            return None;
        };
        check_string(value, &self.path(key), min, max, errors)
    }

    pub fn optional_string(
        &self,
        key: &str,
        min: usize,
        max: usize,
        errors: &mut ValidationErrors,
    ) -> Option<Option<String>> {
        match self.get(key) {
            None => Some(None),
            Some(value) => check_string(value, &self.path(key), min, max, errors).map(Some),
        }
    }

    /// A lowercase enum value parsed with `FromStr`.
    pub fn enumeration<T>(
        &self,
        key: &str,
        expected: &str,
        errors: &mut ValidationErrors,
    ) -> Option<T>
    where
        T: FromStr,
    {
        let Some(value) = self.get(key) else {
            errors.push(self.path(key), "is required");
            return None;
        };
        parse_enum(value, &self.path(key), expected, errors)
    }

    pub fn semver(&self, key: &str, errors: &mut ValidationErrors) -> Option<semver::Version> {
        let Some(value) = self.get(key) else {
            errors.push(self.path(key), "is required");
            return None;
        };
        check_semver(value, &self.path(key), errors)
    }

    pub fn optional_semver(
        &self,
        key: &str,
        errors: &mut ValidationErrors,
    ) -> Option<Option<semver::Version>> {
        match self.get(key) {
            None => Some(None),
            Some(value) => check_semver(value, &self.path(key), errors).map(Some),
        }
    }

    pub fn https_url(&self, key: &str, errors: &mut ValidationErrors) -> Option<String> {
        let raw = self.string(key, 1, 2048, errors)?;
        check_https_url(&raw, &self.path(key), errors).then_some(raw)
    }

    pub fn optional_https_url(
        &self,
        key: &str,
        errors: &mut ValidationErrors,
    ) -> Option<Option<String>> {
        match self.optional_string(key, 1, 2048, errors)? {
            None => Some(None),
            Some(raw) => check_https_url(&raw, &self.path(key), errors).then_some(Some(raw)),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool, errors: &mut ValidationErrors) -> Option<bool> {
        match self.get(key) {
            None => Some(default),
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                errors.push(self.path(key), "must be a boolean");
                None
            }
        }
    }

    /// An unsigned integer in `min..=max`.
    pub fn u64_in(
        &self,
        key: &str,
        min: u64,
        max: u64,
        errors: &mut ValidationErrors,
    ) -> Option<u64> {
        let Some(value) = self.get(key) else {
            errors.push(self.path(key), "is required");
            return None;
        };
        match value.as_u64() {
            Some(n) if (min..=max).contains(&n) => Some(n),
            Some(_) => {
                errors.push(self.path(key), format!("must be between {min} and {max}"));
                None
            }
            None => {
                errors.push(self.path(key), "must be a non-negative integer");
                None
            }
        }
    }

    /// An array whose length lies in `min..=max`. Absent arrays count as empty.
    pub fn array(
        &self,
        key: &str,
        min: usize,
        max: usize,
        errors: &mut ValidationErrors,
    ) -> Option<&'v Vec<Value>> {
        static EMPTY: Vec<Value> = Vec::new();
        let items = match self.get(key) {
            None => &EMPTY,
            Some(Value::Array(items)) => items,
            Some(_) => {
                errors.push(self.path(key), "must be an array");
                return None;
            }
        };
        if items.len() < min {
            let msg = if min == 1 {
                "must contain at least one item".to_string()
            } else {
                format!("must contain at least {min} items")
            };
            errors.push(self.path(key), msg);
            return None;
        }
        if items.len() > max {
            errors.push(self.path(key), format!("must contain at most {max} items"));
            return None;
        }
        Some(items)
    }
}

pub fn check_string(
    value: &Value,
    path: &str,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(s) = value.as_str() else {
        errors.push(path, "must be a string");
        return None;
    };
    let trimmed = s.trim();
    let len = trimmed.chars().count();
    if len == 0 && min > 0 {
        errors.push(path, "must not be empty");
        None
    } else if len < min {
        errors.push(path, format!("must be at least {min} characters"));
        None
    } else if len > max {
        errors.push(path, format!("must be at most {max} characters"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_enum<T: FromStr>(
    value: &Value,
    path: &str,
    expected: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match value.as_str().map(|s| s.trim().parse::<T>()) {
        Some(Ok(v)) => Some(v),
        _ => {
            errors.push(path, format!("must be one of: {expected}"));
            None
        }
    }
}

fn check_semver(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<semver::Version> {
    let Some(s) = value.as_str() else {
        errors.push(path, "must be a version string");
        return None;
    };
    match s.trim().parse::<semver::Version>() {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(path, format!("must be a semantic version ({e})"));
            None
        }
    }
}

/// Absolute `https://` URL with a host.
pub fn check_https_url(raw: &str, path: &str, errors: &mut ValidationErrors) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "https" && parsed.host_str().is_some() => true,
        Ok(_) => {
            errors.push(path, "must be an https URL");
            false
        }
        Err(e) => {
            errors.push(path, format!("must be a valid URL ({e})"));
            false
        }
    }
}

/// Record an error for every item that repeats an earlier one.
pub fn report_duplicates<K: Eq + Hash>(
    keys: impl IntoIterator<Item = (usize, K)>,
    path: &str,
    what: &str,
    errors: &mut ValidationErrors,
) {
    let mut seen = HashSet::new();
    for (i, key) in keys {
        if !seen.insert(key) {
            errors.push(index(path, i), format!("duplicate {what}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_paths() {
        assert_eq!(join("", "name"), "name");
        assert_eq!(join("robots[2]", "model"), "robots[2].model");
    }

    #[test]
    fn test_non_object_payload() {
        let mut errors = ValidationErrors::new();
        assert!(ObjectReader::new(&json!([1, 2]), ROOT, &mut errors).is_none());
        assert!(errors.has_field("$"));
    }

    #[test]
    fn test_string_bounds_and_trim() {
        let value = json!({ "a": "  hi  ", "b": "x", "c": 4 });
        let mut errors = ValidationErrors::new();
        let reader = ObjectReader::new(&value, ROOT, &mut errors).unwrap();
        assert_eq!(reader.string("a", 1, 5, &mut errors).as_deref(), Some("hi"));
        assert!(reader.string("b", 2, 5, &mut errors).is_none());
        assert!(reader.string("c", 1, 5, &mut errors).is_none());
        assert!(reader.string("missing", 1, 5, &mut errors).is_none());
        assert_eq!(errors.len(), 3);
        assert!(errors.has_field("missing"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let value = json!({ "video_url": null });
        let mut errors = ValidationErrors::new();
        let reader = ObjectReader::new(&value, ROOT, &mut errors).unwrap();
        assert_eq!(reader.optional_https_url("video_url", &mut errors), Some(None));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_https_only() {
        let mut errors = ValidationErrors::new();
        assert!(check_https_url("https://cdn.robotskills.test/a.png", "u", &mut errors));
        assert!(!check_https_url("http://cdn.robotskills.test/a.png", "u", &mut errors));
        assert!(!check_https_url("not a url", "u", &mut errors));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unknown_fields_sorted() {
        let value = json!({ "zeta": 1, "name": "x", "alpha": 2 });
        let mut errors = ValidationErrors::new();
        let reader = ObjectReader::new(&value, ROOT, &mut errors).unwrap();
        reader.deny_unknown(&["name"], &mut errors);
        let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_report_duplicates() {
        let mut errors = ValidationErrors::new();
        report_duplicates(
            vec![(0, "a"), (1, "b"), (2, "a")],
            "tags",
            "tag",
            &mut errors,
        );
        assert!(errors.has_field("tags[2]"));
        assert_eq!(errors.len(), 1);
    }
}
