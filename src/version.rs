//! Dotted-numeric version comparison
//!
//! Versions are compared component by component after stripping a single
//! leading `v`/`V` and zero-padding the shorter one, so `1.2` equals `1.2.0`.
//! A malformed version never reports an update.

use crate::error::VersionError;
use log::debug;
use std::cmp::Ordering;

/// Parse a version string into its numeric components
pub fn parse_version(version: &str) -> Result<Vec<u64>, VersionError> {
    let trimmed = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);

    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }

    trimmed
        .split('.')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| VersionError::InvalidComponent {
                    version: version.to_string(),
                    component: part.to_string(),
                })
        })
        .collect()
}

/// Compare two version strings, padding the shorter one with zeros
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    let parts_a = parse_version(a)?;
    let parts_b = parse_version(b)?;

    let len = parts_a.len().max(parts_b.len());
    for i in 0..len {
        let pa = parts_a.get(i).copied().unwrap_or(0);
        let pb = parts_b.get(i).copied().unwrap_or(0);
        match pa.cmp(&pb) {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }

    Ok(Ordering::Equal)
}

/// Returns true only if `latest` is strictly newer than `current`.
///
/// Parse failures on either side count as "not newer".
pub fn is_newer(current: &str, latest: &str) -> bool {
    match compare_versions(latest, current) {
        Ok(ordering) => ordering == Ordering::Greater,
        Err(e) => {
            debug!("version comparison failed ({} vs {}): {}", current, latest, e);
            false
        }
    }
}

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch-level (or deeper) change
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        match (parse_version(old), parse_version(new)) {
            (Ok(old), Ok(new)) => {
                let at = |parts: &[u64], i: usize| parts.get(i).copied().unwrap_or(0);
                if at(&new, 0) != at(&old, 0) {
                    VersionChangeType::Major
                } else if at(&new, 1) != at(&old, 1) {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}
