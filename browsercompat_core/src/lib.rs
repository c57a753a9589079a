//! Browsercompat Core - browser compatibility evaluation engine
//!
//! This crate detects web-platform features in source text, classifies their
//! support in every browser version of a dataset against per-browser
//! report/fail thresholds and renders the grouped result.
//!
//! ```text
//! source ─▶ detect_features ─▶ collect_problems ─▶ ReportRenderer ─▶ RenderResult
//!                                 (classify, version)
//! ```

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod render;
pub mod rules;
pub mod version;

pub use aggregate::{collect_problems, GroupedReport, ProblemSet, VersionGroup};
pub use classify::{classify, Issue, Verdict};
pub use config::{BrowserConfig, CheckConfig, CheckPolicy, Thresholds};
pub use dataset::{Agent, DataFile, Dataset, DatasetBuilder, Feature, SupportStatus};
pub use errors::{Error, Result};
pub use render::{Outcome, RenderResult, ReportRenderer};
pub use rules::{detect_features, get_all_rules, parse_rules, Rule, Rules};
pub use version::{Version, VersionRange};

/// Rendering options of a check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Color status words with ANSI escape codes.
    pub colored: bool,
}

/// Find the problems of one source text.
///
/// # Errors
/// when a configured threshold is not a valid version
pub fn find_problems(
    source: &str,
    dataset: &Dataset,
    rules: &Rules,
    config: &CheckConfig,
) -> Result<ProblemSet> {
    let policy = config.normalize()?;
    let detected = detect_features(source, rules);
    tracing::debug!(features = ?detected, "detected features");
    Ok(collect_problems(detected, dataset, &policy))
}

/// Run a full compatibility check of one source text.
///
/// # Errors
/// when a configured threshold is not a valid version
pub fn check_source(
    source: &str,
    dataset: &Dataset,
    rules: &Rules,
    config: &CheckConfig,
    options: CheckOptions,
) -> Result<RenderResult> {
    let problems = find_problems(source, dataset, rules, config)?;
    Ok(ReportRenderer::new(options.colored).render(&problems))
}
