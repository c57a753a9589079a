//! Browser support dataset
//!
//! The dataset follows the caniuse JSON layout: an `agents` table describing
//! browsers and a feature table where every feature carries
//! `stats: browser -> version -> support string`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{EnumIter, IntoEnumIterator};

use crate::{version::VersionRange, Error, Result};

/// Feature categories kept from strict data files.
pub const STRICT_CATEGORIES: [&str; 3] = ["JS API", "DOM", "Canvas"];

/// Support level of a single browser version, encoded in the dataset by the
/// first character of the support string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum SupportStatus {
    #[serde(rename = "y")]
    Full,
    #[serde(rename = "n")]
    None,
    #[serde(rename = "p")]
    Polyfill,
    #[serde(rename = "u")]
    Unknown,
    #[serde(rename = "a")]
    Partial,
}

impl SupportStatus {
    /// Dataset code of this status.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Full => 'y',
            Self::None => 'n',
            Self::Polyfill => 'p',
            Self::Unknown => 'u',
            Self::Partial => 'a',
        }
    }

    /// Convert a dataset code (case-insensitive) to a status.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::iter().find(|status| status.code() == code)
    }

    /// Human readable status word used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Full => "Full Support",
            Self::None => "No Support",
            Self::Polyfill => "Support through Polyfill",
            Self::Unknown => "Unknown Support",
            Self::Partial => "Partial Support",
        }
    }
}

impl std::fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parsed support string, e.g. `"a x #2"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportCell {
    pub status: SupportStatus,
    /// Note numbers referenced by `#N` tokens, in order of appearance.
    pub note_refs: Vec<String>,
}

/// Browser description from the dataset `agents` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Agent {
    /// Display name used in reports.
    #[serde(default, deserialize_with = "nullable")]
    pub browser: String,
    #[serde(default, deserialize_with = "nullable")]
    pub abbr: String,
}

/// Describe single tracked web-platform feature
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Feature {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// Free text notes shown in the summary.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
    /// Numbered notes referenced from support strings.
    #[serde(default, deserialize_with = "nullable")]
    pub notes_by_num: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "nullable")]
    pub categories: Vec<String>,
    /// browser -> version label -> support string
    #[serde(default, deserialize_with = "nullable")]
    pub stats: BTreeMap<String, BTreeMap<String, Option<String>>>,
}

impl Feature {
    /// Parse the support string of one browser version.
    ///
    /// # Errors
    /// [`Error::MalformedDatasetEntry`] when the cell is missing, empty or
    /// starts with an unknown status code
    pub fn support(&self, id: &str, browser: &str, version: &VersionRange) -> Result<SupportCell> {
        let malformed = |reason: &str| Error::MalformedDatasetEntry {
            feature: id.to_string(),
            browser: browser.to_string(),
            version: version.label().to_string(),
            reason: reason.to_string(),
        };

        let raw = self
            .stats
            .get(browser)
            .and_then(|versions| versions.get(version.label()))
            .and_then(Option::as_deref)
            .ok_or_else(|| malformed("missing support string"))?;

        let code = raw
            .chars()
            .next()
            .ok_or_else(|| malformed("empty support string"))?;
        let status =
            SupportStatus::from_code(code).ok_or_else(|| malformed("unknown support code"))?;

        let note_refs = raw
            .split(' ')
            .filter_map(|token| token.strip_prefix('#'))
            .map(str::to_string)
            .collect();

        Ok(SupportCell { status, note_refs })
    }

    /// Resolve `#N` references through `notes_by_num`, keeping order and
    /// duplicates. Unknown references are dropped.
    #[must_use]
    pub fn resolve_notes(&self, cell: &SupportCell) -> Vec<String> {
        cell.note_refs
            .iter()
            .filter_map(|num| {
                let note = self.notes_by_num.get(num);
                if note.is_none() {
                    tracing::debug!(note = %num, title = %self.title, "unknown note reference");
                }
                note.cloned()
            })
            .collect()
    }

    /// Version rows of a browser in version order.
    #[must_use]
    pub fn versions(&self, browser: &str) -> Vec<VersionRange> {
        let mut versions: Vec<VersionRange> = self
            .stats
            .get(browser)
            .map(|versions| versions.keys().map(|v| VersionRange::new(v.as_str())).collect())
            .unwrap_or_default();
        versions.sort();
        versions
    }

    #[must_use]
    pub fn in_categories(&self, categories: &[&str]) -> bool {
        self.categories
            .iter()
            .any(|category| categories.contains(&category.as_str()))
    }
}

/// Content of a single dataset file.
#[derive(Debug, Clone, Default)]
pub struct DataFile {
    pub agents: BTreeMap<String, Agent>,
    pub features: BTreeMap<String, Feature>,
}

impl DataFile {
    /// Parse a dataset JSON document.
    ///
    /// With an `extension` the feature table is read from that top level key
    /// (`data` for caniuse files); without one, every top level key other
    /// than `agents` is a feature.
    ///
    /// # Errors
    /// when the document is not valid JSON or does not match the layout
    pub fn from_json(content: &str, extension: Option<&str>) -> Result<Self> {
        let mut value: Value = serde_json::from_str(content)?;
        let object = value.as_object_mut();

        let agents = match object.and_then(|o| o.remove("agents")) {
            Some(agents) => serde_json::from_value(agents)?,
            None => BTreeMap::new(),
        };

        let features = match extension {
            Some(extension) => match value.get_mut(extension) {
                Some(features) => serde_json::from_value(features.take())?,
                None => {
                    tracing::warn!(extension, "dataset file has no feature table");
                    BTreeMap::new()
                }
            },
            None => serde_json::from_value(value)?,
        };

        Ok(Self { agents, features })
    }
}

/// Merged, read-only browser support data for one check.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    agents: BTreeMap<String, Agent>,
    features: BTreeMap<String, Feature>,
}

impl Dataset {
    #[must_use]
    pub const fn new(agents: BTreeMap<String, Agent>, features: BTreeMap<String, Feature>) -> Self {
        Self { agents, features }
    }

    #[must_use]
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    #[must_use]
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.get(id)
    }

    #[must_use]
    pub const fn features(&self) -> &BTreeMap<String, Feature> {
        &self.features
    }

    #[must_use]
    pub const fn agents(&self) -> &BTreeMap<String, Agent> {
        &self.agents
    }

    /// Display name of a browser key, falling back to the key itself.
    #[must_use]
    pub fn browser_name<'a>(&'a self, browser: &'a str) -> &'a str {
        self.agents
            .get(browser)
            .map(|agent| agent.browser.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(browser)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Merge data files into a [`Dataset`]. Later files overwrite earlier
/// entries with the same identifier.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    agents: BTreeMap<String, Agent>,
    features: BTreeMap<String, Feature>,
}

impl DatasetBuilder {
    /// Add a file. A `strict` file only contributes features that belong to
    /// one of [`STRICT_CATEGORIES`].
    #[must_use]
    pub fn add(mut self, file: DataFile, strict: bool) -> Self {
        self.agents.extend(file.agents);
        self.features.extend(
            file.features
                .into_iter()
                .filter(|(_, feature)| !strict || feature.in_categories(&STRICT_CATEGORIES)),
        );
        self
    }

    #[must_use]
    pub fn build(self) -> Dataset {
        Dataset::new(self.agents, self.features)
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
