//! Post metadata taken from front-matter

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptive fields of a post, in the order they appear in the file.
///
/// The map is handed to the page exactly as it was written. The accessors
/// below only read from it, for sorting and listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The `title` field, if it is a string
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// The `date` field parsed into a local timestamp
    pub fn date(&self) -> Option<DateTime<Local>> {
        self.get("date")
            .and_then(Value::as_str)
            .and_then(parse_date_string)
    }

    /// Tags, accepting either `tags: rust` or `tags: [rust, web]`
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::String(tag)) => vec![tag.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Posts are published unless they say `published: false`
    pub fn published(&self) -> bool {
        self.get("published")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

impl From<IndexMap<String, Value>> for Metadata {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}
