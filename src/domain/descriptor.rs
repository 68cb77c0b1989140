//! Remote version descriptor
//!
//! A descriptor is decoded in two phases: serde fills a [`RawDescriptor`]
//! whose fields are all optional, then `TryFrom` checks the required keys.
//! Nothing downstream ever sees a descriptor that failed the check.
//!
//! Optional keys never fail a descriptor. A value with an unexpected shape
//! (say `"update_priority": 1`) is moved to `extra` under its wire name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields every descriptor must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["latest_version", "release_date", "download_url"];

/// Descriptor document as received, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDescriptor {
    pub latest_version: Option<String>,
    pub release_date: Option<String>,
    pub download_url: Option<String>,
    #[serde(rename = "changelog", alias = "changelog_url")]
    pub changelog_url: Option<Value>,
    pub update_priority: Option<Value>,
    pub changes: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Keep `value` if it is a string, otherwise park it in `extra` as `key`
fn take_string(
    value: Option<Value>,
    key: &str,
    extra: &mut BTreeMap<String, Value>,
) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        other => {
            extra.insert(key.to_string(), other);
            None
        }
    }
}

/// Keep `value` if it is an array of strings, otherwise park it in `extra`
fn take_string_list(
    value: Option<Value>,
    key: &str,
    extra: &mut BTreeMap<String, Value>,
) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    if let Value::Array(items) = &value {
        if let Some(list) = items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        {
            return list;
        }
    }
    extra.insert(key.to_string(), value);
    Vec::new()
}

/// Validated release metadata published by the update server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    /// Dotted numeric version, optionally `v`-prefixed
    pub latest_version: String,
    /// Free-form release date label
    pub release_date: String,
    /// Where the release can be downloaded
    pub download_url: String,
    #[serde(
        rename = "changelog",
        alias = "changelog_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub changelog_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_priority: Option<String>,
    /// Human-readable change entries, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    /// Unrecognized top-level keys, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VersionDescriptor {
    /// Create a descriptor from its required fields
    pub fn new(
        latest_version: impl Into<String>,
        release_date: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            latest_version: latest_version.into(),
            release_date: release_date.into(),
            download_url: download_url.into(),
            changelog_url: None,
            update_priority: None,
            changes: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Set the changelog URL
    pub fn with_changelog(mut self, url: impl Into<String>) -> Self {
        self.changelog_url = Some(url.into());
        self
    }

    /// Set the update priority
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.update_priority = Some(priority.into());
        self
    }

    /// Set the list of changes
    pub fn with_changes<I, S>(mut self, changes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changes = changes.into_iter().map(Into::into).collect();
        self
    }

    /// Decode and validate a JSON body
    pub fn from_json(body: &[u8]) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor =
            serde_json::from_slice(body).map_err(|e| DescriptorError::Decode(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Release date as a calendar date, when it is written as `YYYY-MM-DD`
    pub fn release_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.release_date.trim(), "%Y-%m-%d").ok()
    }
}

/// Why a body could not become a [`VersionDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Not a JSON object, or a required field is not a string
    Decode(String),
    /// A required key is absent or null
    MissingField(&'static str),
}

impl TryFrom<RawDescriptor> for VersionDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let latest_version = raw
            .latest_version
            .ok_or(DescriptorError::MissingField(REQUIRED_FIELDS[0]))?;
        let release_date = raw
            .release_date
            .ok_or(DescriptorError::MissingField(REQUIRED_FIELDS[1]))?;
        let download_url = raw
            .download_url
            .ok_or(DescriptorError::MissingField(REQUIRED_FIELDS[2]))?;

        let mut extra = raw.extra;
        let changelog_url = take_string(raw.changelog_url, "changelog", &mut extra);
        let update_priority = take_string(raw.update_priority, "update_priority", &mut extra);
        let changes = take_string_list(raw.changes, "changes", &mut extra);

        Ok(Self {
            latest_version,
            release_date,
            download_url,
            changelog_url,
            update_priority,
            changes,
            extra,
        })
    }
}
