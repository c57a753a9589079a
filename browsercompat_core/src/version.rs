//! Dotted version ordering
//!
//! Versions are compared group by group as numbers, padding the shorter
//! version with `0` groups, so `"1.10" > "1.9"` and `"2" == "2.0.0"`. Groups
//! have no width limit.
//! Dataset rows may also describe a span of releases (`"4.2-4.3"`), which is
//! modeled by [`VersionRange`].

use std::{cmp::Ordering, fmt};

use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// A parsed dotted-numeric version.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    /// Digits of every group without leading zeros, `0` is empty.
    groups: Vec<String>,
}

impl Version {
    /// Parse a dotted version string.
    ///
    /// # Errors
    /// when one of the groups is empty or is not a base-10 number
    pub fn parse(raw: &str) -> Result<Self> {
        let groups = raw
            .split('.')
            .map(|group| {
                if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid_version(raw));
                }
                Ok(group.trim_start_matches('0').to_string())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            groups,
        })
    }

    /// The version as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.groups.len().max(other.groups.len());
        (0..len)
            .map(|i| {
                let left = self.groups.get(i).map_or("", String::as_str);
                let right = other.groups.get(i).map_or("", String::as_str);
                // same digit count compares lexically
                left.len().cmp(&right.len()).then_with(|| left.cmp(right))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn invalid_version(raw: &str) -> Error {
    Error::InvalidVersionFormat {
        version: raw.to_string(),
    }
}

/// Return the greatest of the given version or version-range labels.
///
/// A range is as new as its newest release, so `"4.2-4.3"` beats `"4.2"`.
/// When several inputs are equal after padding, the first of them is
/// returned. An empty input yields `None`.
///
/// # Errors
/// when one of the inputs is not a dotted-numeric version or range
pub fn greatest<'a, I>(versions: I) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(Version, &'a str)> = None;
    for raw in versions {
        let high = VersionRange::new(raw).high()?.clone();
        match &best {
            Some((current, _)) if high <= *current => {}
            _ => best = Some((high, raw)),
        }
    }
    Ok(best.map(|(_, raw)| raw))
}

/// Return `true` when `candidate` is strictly greater than `other`.
///
/// # Errors
/// when one of the inputs is not a dotted-numeric version
pub fn is_higher(candidate: &str, other: &str) -> Result<bool> {
    Ok(Version::parse(candidate)? > Version::parse(other)?)
}

/// A dataset version label: a single version (`"10"`) or a span of releases
/// written as `"low-high"`.
///
/// Labels that are not numeric (`"TP"`, `"all"`) are kept as they are; their
/// bound accessors return [`Error::InvalidVersionFormat`].
#[derive(Debug, Clone)]
pub struct VersionRange {
    label: String,
    bounds: Option<(Version, Version)>,
}

impl VersionRange {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let bounds = match label.split_once('-') {
            Some((low, high)) => Version::parse(low).ok().zip(Version::parse(high).ok()),
            None => Version::parse(&label)
                .ok()
                .map(|version| (version.clone(), version)),
        };
        Self { label, bounds }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Oldest release covered by this row.
    ///
    /// # Errors
    /// when the label is not a numeric version or range
    pub fn low(&self) -> Result<&Version> {
        self.bounds
            .as_ref()
            .map(|(low, _)| low)
            .ok_or_else(|| invalid_version(&self.label))
    }

    /// Newest release covered by this row.
    ///
    /// # Errors
    /// when the label is not a numeric version or range
    pub fn high(&self) -> Result<&Version> {
        self.bounds
            .as_ref()
            .map(|(_, high)| high)
            .ok_or_else(|| invalid_version(&self.label))
    }
}

impl From<&str> for VersionRange {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

// Numeric rows sort by their bounds, everything else goes last by label.
impl Ord for VersionRange {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.bounds, &other.bounds) {
            (Some((low, high)), Some((other_low, other_high))) => low
                .cmp(other_low)
                .then_with(|| high.cmp(other_high))
                .then_with(|| self.label.cmp(&other.label)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for VersionRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionRange {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for VersionRange {}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}
