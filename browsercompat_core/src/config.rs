//! Per-browser report/fail thresholds

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    version::{Version, VersionRange},
    Result,
};

/// User thresholds for one browser.
///
/// Versions may be written as strings or numbers. Quote versions with
/// trailing zeros (`"10.10"`), YAML reads the bare number as `10.1`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Minimum version to include in the report.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string"
    )]
    pub report: Option<String>,
    /// Minimum version that must not be unsupported.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string"
    )]
    pub fail: Option<String>,
}

impl BrowserConfig {
    #[must_use]
    pub fn new(report: Option<&str>, fail: Option<&str>) -> Self {
        Self {
            report: report.map(str::to_string),
            fail: fail.map(str::to_string),
        }
    }

    /// Resolve the effective thresholds.
    ///
    /// When only one version is given the other one defaults to it, and a
    /// report version above the fail version is lowered to the fail version.
    ///
    /// # Errors
    /// when one of the versions is not a dotted-numeric version
    pub fn thresholds(&self) -> Result<Thresholds> {
        let report = self.report.as_deref().map(Version::parse).transpose()?;
        let fail = self.fail.as_deref().map(Version::parse).transpose()?;

        let (report, fail) = match (report, fail) {
            (None, None) => (None, None),
            (None, Some(fail)) => (Some(fail.clone()), Some(fail)),
            (Some(report), None) => (Some(report.clone()), Some(report)),
            (Some(report), Some(fail)) if report > fail => (Some(fail.clone()), Some(fail)),
            (Some(report), Some(fail)) => (Some(report), Some(fail)),
        };
        Ok(Thresholds { report, fail })
    }
}

/// Effective thresholds of one browser. `report <= fail` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub report: Option<Version>,
    pub fail: Option<Version>,
}

static UNBOUNDED: Thresholds = Thresholds {
    report: None,
    fail: None,
};

impl Thresholds {
    /// `true` when the newest release of the row is older than the report
    /// version.
    ///
    /// # Errors
    /// when a report version is set and the row is not numeric
    pub fn is_below_report(&self, version: &VersionRange) -> Result<bool> {
        match &self.report {
            Some(report) => Ok(version.high()? < report),
            None => Ok(false),
        }
    }

    /// `true` when the oldest release of the row is at or above the fail
    /// version.
    ///
    /// # Errors
    /// when a fail version is set and the row is not numeric
    pub fn is_required(&self, version: &VersionRange) -> Result<bool> {
        match &self.fail {
            Some(fail) => Ok(version.low()? >= fail),
            None => Ok(false),
        }
    }
}

/// User configuration of a check.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Skip browsers that have no entry in `browsers`.
    #[serde(default)]
    pub ignore_unlisted: bool,
    /// Thresholds keyed by dataset browser key (`chrome`, `ie`, ...).
    #[serde(default)]
    pub browsers: BTreeMap<String, BrowserConfig>,
}

impl CheckConfig {
    /// Resolve the thresholds of every configured browser.
    ///
    /// # Errors
    /// when one of the configured versions is invalid
    pub fn normalize(&self) -> Result<CheckPolicy> {
        let thresholds = self
            .browsers
            .iter()
            .map(|(browser, config)| Ok((browser.clone(), config.thresholds()?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(CheckPolicy {
            ignore_unlisted: self.ignore_unlisted,
            thresholds,
        })
    }
}

/// Normalized [`CheckConfig`] used while classifying.
#[derive(Debug, Clone, Default)]
pub struct CheckPolicy {
    ignore_unlisted: bool,
    thresholds: BTreeMap<String, Thresholds>,
}

impl CheckPolicy {
    /// `true` when the browser must not be classified at all.
    #[must_use]
    pub fn is_skipped(&self, browser: &str) -> bool {
        self.ignore_unlisted && !self.thresholds.contains_key(browser)
    }

    /// Thresholds of a browser, unbounded when it is not configured.
    #[must_use]
    pub fn thresholds(&self, browser: &str) -> &Thresholds {
        self.thresholds.get(browser).unwrap_or(&UNBOUNDED)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Integer(u64),
    Float(f64),
}

fn version_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawVersion>::deserialize(deserializer)?.map(|raw| match raw {
            RawVersion::Text(text) => text,
            RawVersion::Integer(number) => number.to_string(),
            RawVersion::Float(number) => number.to_string(),
        }),
    )
}
