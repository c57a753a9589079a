//! Fold cell classifications into a report structure

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    classify::{classify, Issue, Verdict},
    config::CheckPolicy,
    dataset::{Dataset, Feature},
    version::VersionRange,
    Error,
};

/// Issues of one browser version keyed by feature id.
pub type VersionIssues = BTreeMap<String, Issue>;

/// Everything found by one check.
#[derive(Debug, Clone, Default)]
pub struct ProblemSet {
    /// An unsupported feature was found in a required browser version.
    pub failure: bool,
    /// Every feature with at least one issue.
    pub features: BTreeMap<String, Feature>,
    /// browser display name -> version -> feature id -> issue
    pub browsers: BTreeMap<String, BTreeMap<VersionRange, VersionIssues>>,
}

impl ProblemSet {
    /// `true` when no feature has any issue.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn record(
        &mut self,
        id: &str,
        feature: &Feature,
        browser: &str,
        version: VersionRange,
        issue: Issue,
    ) {
        if !self.features.contains_key(id) {
            self.features.insert(id.to_string(), feature.clone());
        }
        self.browsers
            .entry(browser.to_string())
            .or_default()
            .entry(version)
            .or_default()
            .insert(id.to_string(), issue);
    }

    /// Collapse versions of the same browser that have identical issues.
    ///
    /// Groups keep the order in which they are first seen while walking the
    /// versions from oldest to newest.
    #[must_use]
    pub fn group(&self) -> GroupedReport {
        let browsers = self
            .browsers
            .iter()
            .map(|(browser, versions)| {
                let mut groups: Vec<VersionGroup> = Vec::new();
                for (version, issues) in versions {
                    // issue maps are ordered by feature id, so map equality
                    // compares them canonically
                    match groups.iter_mut().find(|group| group.issues == *issues) {
                        Some(group) => group.versions.push(version.clone()),
                        None => groups.push(VersionGroup {
                            versions: vec![version.clone()],
                            issues: issues.clone(),
                        }),
                    }
                }
                (browser.clone(), groups)
            })
            .collect();

        GroupedReport {
            failure: self.failure,
            browsers,
        }
    }
}

/// Versions of one browser sharing the same issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionGroup {
    pub versions: Vec<VersionRange>,
    pub issues: VersionIssues,
}

impl VersionGroup {
    /// Comma separated version labels, e.g. `"10, 11"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.versions
            .iter()
            .map(VersionRange::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// [`ProblemSet`] with versions grouped per browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedReport {
    pub failure: bool,
    pub browsers: BTreeMap<String, Vec<VersionGroup>>,
}

/// Classify every browser version of every detected feature.
///
/// Malformed cells are logged and skipped so a single bad row does not hide
/// the remaining issues.
#[must_use]
pub fn collect_problems<'a, I>(detected: I, dataset: &Dataset, policy: &CheckPolicy) -> ProblemSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut problems = ProblemSet::default();

    for id in detected {
        let Some(feature) = dataset.feature(id) else {
            debug!(feature = id, "detected feature is not part of the dataset");
            continue;
        };

        for browser in feature.stats.keys() {
            let browser_name = dataset.browser_name(browser);

            for version in feature.versions(browser) {
                match classify(id, feature, browser, &version, policy) {
                    Ok(Verdict::Issue {
                        issue,
                        hard_failure,
                    }) => {
                        if hard_failure {
                            debug!(
                                feature = id,
                                browser = %browser,
                                version = %version,
                                "required version is unsupported"
                            );
                            problems.failure = true;
                        }
                        problems.record(id, feature, browser_name, version, issue);
                    }
                    Ok(Verdict::Unlisted) => break,
                    Ok(Verdict::BelowReport | Verdict::Supported) => {}
                    // `TP`, `all`: normal rows that have no place on a numeric scale
                    Err(Error::InvalidVersionFormat { .. }) => {
                        debug!(
                            feature = id,
                            browser = %browser,
                            version = %version,
                            "non-numeric version row is not compared with thresholds"
                        );
                    }
                    Err(err) => {
                        warn!(
                            feature = id,
                            browser = %browser,
                            version = %version,
                            error = %err,
                            "skipping dataset cell"
                        );
                    }
                }
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::{
        config::{BrowserConfig, CheckConfig},
        dataset::{DataFile, SupportStatus},
    };

    fn dataset() -> Dataset {
        let doc = json!({
            "agents": { "chrome": { "browser": "Chrome" }, "safari": { "browser": "Safari" } },
            "data": {
                "promises": {
                    "title": "Promises",
                    "stats": {
                        "chrome": { "10": "n", "11": "n", "12": "a", "13": "y" },
                        "safari": { "7": "n", "8": "y" }
                    }
                },
                "fetch": {
                    "title": "Fetch",
                    "stats": {
                        "chrome": { "10": "n", "11": "n", "12": "n", "13": "bogus" },
                        "safari": { "7": "u", "8": "y" }
                    }
                }
            }
        })
        .to_string();
        Dataset::builder()
            .add(DataFile::from_json(&doc, Some("data")).expect("valid document"), false)
            .build()
    }

    /// Log lines written while running `f` at warn level and above.
    fn warnings_of(f: impl FnOnce()) -> String {
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().expect("log buffer").extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Captured {
            type Writer = Self;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(captured.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = captured.0.lock().expect("log buffer").clone();
        String::from_utf8(bytes).expect("utf8 logs")
    }

    fn policy(ignore_unlisted: bool, browsers: &[(&str, Option<&str>, Option<&str>)]) -> CheckPolicy {
        CheckConfig {
            ignore_unlisted,
            browsers: browsers
                .iter()
                .map(|(browser, report, fail)| (browser.to_string(), BrowserConfig::new(*report, *fail)))
                .collect(),
        }
        .normalize()
        .expect("valid config")
    }

    #[test]
    fn identical_versions_collapse_into_one_group() {
        let problems = collect_problems(["promises", "fetch"], &dataset(), &policy(false, &[]));
        let report = problems.group();

        let labels: Vec<String> = report.browsers["Chrome"].iter().map(VersionGroup::label).collect();
        assert_eq!(labels, vec!["10, 11", "12"]);

        let labels: Vec<String> = report.browsers["Safari"].iter().map(VersionGroup::label).collect();
        assert_eq!(labels, vec!["7"]);
    }

    #[test]
    fn group_keeps_the_issue_map() {
        let report = collect_problems(["promises"], &dataset(), &policy(false, &[])).group();
        let chrome = &report.browsers["Chrome"];
        assert_eq!(chrome.len(), 2);
        assert_eq!(chrome[0].issues["promises"].status, SupportStatus::None);
        assert_eq!(chrome[1].issues["promises"].status, SupportStatus::Partial);
    }

    #[test]
    fn hard_failure_sets_the_global_flag() {
        let problems = collect_problems(["promises"], &dataset(), &policy(false, &[("safari", None, Some("7"))]));
        assert!(problems.failure);

        let problems = collect_problems(["promises"], &dataset(), &policy(false, &[("safari", None, Some("8"))]));
        assert!(!problems.failure);
        assert!(problems.browsers["Chrome"].contains_key(&VersionRange::new("10")));
    }

    #[test]
    fn unlisted_browsers_contribute_nothing_when_ignored() {
        let problems = collect_problems(
            ["promises", "fetch"],
            &dataset(),
            &policy(true, &[("chrome", None, None)]),
        );
        assert!(!problems.browsers.contains_key("Safari"));
        assert!(problems.browsers.contains_key("Chrome"));
    }

    #[test]
    fn report_version_hides_older_rows() {
        let problems = collect_problems(["promises"], &dataset(), &policy(false, &[("chrome", Some("12"), None)]));
        let versions: Vec<&str> = problems.browsers["Chrome"].keys().map(VersionRange::label).collect();
        assert_eq!(versions, vec!["12"]);
    }

    #[test]
    fn malformed_cells_are_skipped() {
        let problems = collect_problems(["fetch"], &dataset(), &policy(false, &[]));
        let versions: Vec<&str> = problems.browsers["Chrome"].keys().map(VersionRange::label).collect();
        assert_eq!(versions, vec!["10", "11", "12"]);
    }

    #[test]
    fn non_numeric_rows_under_thresholds_are_skipped_quietly() {
        let doc = json!({
            "agents": { "safari": { "browser": "Safari" }, "op_mini": { "browser": "Opera Mini" } },
            "data": {
                "promises": {
                    "title": "Promises",
                    "stats": {
                        "safari": { "7": "n", "TP": "n" },
                        "op_mini": { "all": "n" }
                    }
                }
            }
        })
        .to_string();
        let dataset = Dataset::builder()
            .add(DataFile::from_json(&doc, Some("data")).expect("valid document"), false)
            .build();
        let policy = policy(false, &[("safari", None, Some("7")), ("op_mini", Some("5"), None)]);

        let mut problems = ProblemSet::default();
        let logs = warnings_of(|| problems = collect_problems(["promises"], &dataset, &policy));

        assert_eq!(logs, "");
        assert!(problems.failure);
        let safari: Vec<&str> = problems.browsers["Safari"].keys().map(VersionRange::label).collect();
        assert_eq!(safari, vec!["7"]);
        assert!(!problems.browsers.contains_key("Opera Mini"));
    }

    #[test]
    fn malformed_cells_are_logged() {
        let logs = warnings_of(|| {
            let _ = collect_problems(["fetch"], &dataset(), &policy(false, &[]));
        });
        assert!(logs.contains("skipping dataset cell"));
    }

    #[test]
    fn features_without_issues_are_not_implicated() {
        let problems = collect_problems(["promises", "missing"], &dataset(), &policy(true, &[("chrome", Some("13"), None)]));
        assert!(problems.is_empty());
        assert!(problems.browsers.is_empty());
        assert!(!problems.failure);
    }
}
