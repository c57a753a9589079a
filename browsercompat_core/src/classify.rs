//! Classification of a single (feature, browser, version) cell

use serde::Serialize;

use crate::{
    config::CheckPolicy,
    dataset::{Feature, SupportStatus},
    version::VersionRange,
    Result,
};

/// A reportable support problem of one feature in one browser version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub status: SupportStatus,
    /// Resolved `#N` notes of the support string.
    pub notes: Vec<String>,
}

/// Outcome of classifying one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The browser is not configured and unlisted browsers are ignored.
    Unlisted,
    /// The row is older than the browser's report version.
    BelowReport,
    Supported,
    Issue {
        issue: Issue,
        /// An unsupported version the user requires to work.
        hard_failure: bool,
    },
}

/// Classify one dataset cell under the browser's thresholds.
///
/// Only [`SupportStatus::None`] can be a hard failure, and only when the
/// oldest release of the row is at or above the browser's fail version.
///
/// # Errors
/// when the cell is malformed or the row can not be compared against a
/// configured threshold
pub fn classify(
    id: &str,
    feature: &Feature,
    browser: &str,
    version: &VersionRange,
    policy: &CheckPolicy,
) -> Result<Verdict> {
    if policy.is_skipped(browser) {
        return Ok(Verdict::Unlisted);
    }

    let thresholds = policy.thresholds(browser);
    if thresholds.is_below_report(version)? {
        return Ok(Verdict::BelowReport);
    }

    let cell = feature.support(id, browser, version)?;
    let issue = |status| Issue {
        status,
        notes: feature.resolve_notes(&cell),
    };

    let verdict = match cell.status {
        SupportStatus::Full => Verdict::Supported,
        SupportStatus::None => Verdict::Issue {
            issue: issue(SupportStatus::None),
            hard_failure: thresholds.is_required(version)?,
        },
        SupportStatus::Polyfill => Verdict::Issue {
            issue: issue(SupportStatus::Polyfill),
            hard_failure: false,
        },
        SupportStatus::Unknown => Verdict::Issue {
            issue: issue(SupportStatus::Unknown),
            hard_failure: false,
        },
        SupportStatus::Partial => Verdict::Issue {
            issue: issue(SupportStatus::Partial),
            hard_failure: false,
        },
    };
    Ok(verdict)
}
