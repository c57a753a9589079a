//! Text rendering of a [`ProblemSet`]

use std::{fmt, fmt::Write, sync::OnceLock};

use console::Style;
use regex::Regex;

use crate::{aggregate::ProblemSet, dataset::SupportStatus, Error, Result};

fn newlines() -> &'static Regex {
    static NEWLINES: OnceLock<Regex> = OnceLock::new();
    NEWLINES.get_or_init(|| Regex::new(r"[\r\n]+").expect("newline pattern is a valid regex"))
}

/// Replace every run of line breaks with `separator`.
fn reindent(text: &str, separator: &str) -> String {
    newlines().replace_all(text, separator).into_owned()
}

fn status_style(status: SupportStatus) -> Style {
    match status {
        SupportStatus::Full => Style::new().green(),
        SupportStatus::None => Style::new().red().on_black().bold(),
        SupportStatus::Polyfill => Style::new().white(),
        SupportStatus::Unknown => Style::new().cyan(),
        SupportStatus::Partial => Style::new().yellow().bold(),
    }
}

/// Rendered report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No detected feature has an issue in any reported browser.
    NoProblems,
    Issues {
        /// browser -> version group -> feature listing
        issues: String,
        /// one entry per implicated feature
        summary: String,
    },
}

/// Result of a check, ready to be logged by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub outcome: Outcome,
    pub failure: bool,
}

impl RenderResult {
    /// Convert a failing result to [`Error::Incompatible`].
    ///
    /// # Errors
    /// when an unsupported feature was found in a required browser version
    pub fn ensure_compatible(&self) -> Result<()> {
        if self.failure {
            Err(Error::Incompatible)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::NoProblems => write!(f, "finished browser compatibility check: No Problems!"),
            Outcome::Issues { issues, summary } => {
                writeln!(f, "Encountered the following browser compatibility issues:")?;
                writeln!(f, "{issues}")?;
                writeln!(f, "Summary:")?;
                write!(f, "{summary}")?;
                if !self.failure {
                    write!(f, "\nfinished browser compatibility check")?;
                }
                Ok(())
            }
        }
    }
}

/// Format problem sets as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    colored: bool,
}

impl ReportRenderer {
    #[must_use]
    pub const fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Status word of an issue, colored when enabled.
    #[must_use]
    pub fn status_word(&self, status: SupportStatus) -> String {
        if self.colored {
            status_style(status)
                .force_styling(true)
                .apply_to(status.label())
                .to_string()
        } else {
            status.label().to_string()
        }
    }

    #[must_use]
    pub fn render(&self, problems: &ProblemSet) -> RenderResult {
        if problems.is_empty() {
            return RenderResult {
                outcome: Outcome::NoProblems,
                failure: false,
            };
        }

        RenderResult {
            outcome: Outcome::Issues {
                issues: self.issues(problems),
                summary: Self::summary(problems),
            },
            failure: problems.failure,
        }
    }

    fn issues(&self, problems: &ProblemSet) -> String {
        let mut out = String::new();
        for (browser, groups) in problems.group().browsers {
            let _ = writeln!(out, "Browser: {browser}");
            for group in groups {
                let _ = writeln!(out, "\tVersion: {}", group.label());
                for (id, issue) in &group.issues {
                    let title = problems
                        .features
                        .get(id)
                        .map_or(id.as_str(), |feature| feature.title.as_str());
                    let line = format!("{title}:{}", self.status_word(issue.status));
                    out.push_str("\t\t");
                    out.push_str(&line);

                    if !issue.notes.is_empty() {
                        // continuation lines start under the first note
                        let indent = " ".repeat(console::measure_text_width(&line) + " - ".len());
                        let _ = write!(
                            out,
                            " - {}",
                            reindent(&issue.notes.join(", "), &format!("\n\t\t{indent}"))
                        );
                    }
                    out.push('\n');
                }
            }
        }
        out
    }

    fn summary(problems: &ProblemSet) -> String {
        let mut out = String::new();
        for feature in problems.features.values() {
            let _ = writeln!(out, "{}\n\t\t{}", feature.title, feature.description);
            if !feature.notes.is_empty() {
                let _ = write!(out, "\tNotes:\n\t\t{}", reindent(&feature.notes, "\n\t\t"));
            }
            out.push('\n');
        }
        out
    }
}
