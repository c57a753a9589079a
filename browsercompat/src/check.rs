//! Run compatibility checks of source files with the user settings

use std::{
    fs,
    path::{Path, PathBuf},
};

use browsercompat_core::{
    find_problems, CheckConfig, Dataset, GroupedReport, RenderResult, ReportRenderer, Rules,
};
use serde_derive::Serialize;
use tracing::{debug, info};

use crate::{config::Config, error::Result, rules::active_rules, sources, Settings};

/// Options of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Fetch fresh data files before checking.
    pub download: bool,
    pub colored: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            download: true,
            colored: true,
        }
    }
}

/// Result of checking one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub grouped: GroupedReport,
    pub result: RenderResult,
}

/// JSON view of a [`FileReport`].
#[derive(Debug, Serialize)]
pub struct FileReportJson<'a> {
    pub path: &'a Path,
    #[serde(flatten)]
    pub report: &'a GroupedReport,
}

impl FileReport {
    #[must_use]
    pub fn to_json(&self) -> FileReportJson<'_> {
        FileReportJson {
            path: &self.path,
            report: &self.grouped,
        }
    }
}

/// Everything needed to check files, loaded once per run.
#[derive(Debug)]
pub struct Checker {
    dataset: Dataset,
    rules: Rules,
    config: CheckConfig,
    renderer: ReportRenderer,
}

impl Checker {
    #[must_use]
    pub fn new(dataset: Dataset, rules: Rules, config: CheckConfig, colored: bool) -> Self {
        Self {
            dataset,
            rules,
            config,
            renderer: ReportRenderer::new(colored),
        }
    }

    /// Load rules and data files for the given settings.
    ///
    /// Returns `None` when there is nothing to check, see
    /// [`Settings::requests_check`]. Nothing is loaded in that case.
    ///
    /// # Errors
    /// when the rules can not be parsed or a threshold is not a valid version
    pub fn load(config: &Config, settings: &Settings, options: CheckOptions) -> Result<Option<Self>> {
        if !settings.requests_check() {
            info!("No browser compatibility check requested");
            return Ok(None);
        }

        // reject invalid thresholds before any download
        let check_config = settings.check_config();
        check_config.normalize()?;

        let rules = active_rules(&config.rules_dir())?;
        let data_dir = config.data_dir();

        if options.download && !settings.dont_download {
            download(settings, &data_dir);
        } else {
            debug!("using last downloaded data files");
        }

        let dataset = sources::load_dataset(&settings.sources, &data_dir);
        Ok(Some(Self::new(dataset, rules, check_config, options.colored)))
    }

    /// Check one source text.
    ///
    /// # Errors
    /// when a threshold is not a valid version
    pub fn check_source(&self, path: &Path, source: &str) -> Result<FileReport> {
        let problems = find_problems(source, &self.dataset, &self.rules, &self.config)?;
        Ok(FileReport {
            path: path.to_path_buf(),
            grouped: problems.group(),
            result: self.renderer.render(&problems),
        })
    }

    /// Read and check one file.
    ///
    /// # Errors
    /// when the file can not be read or a threshold is not a valid version
    pub fn check_file(&self, path: &Path) -> Result<FileReport> {
        let source = fs::read_to_string(path)?;
        debug!(path = %path.display(), "checking file");
        self.check_source(path, &source)
    }
}

#[cfg(feature = "download")]
fn download(settings: &Settings, data_dir: &Path) {
    let downloaded = sources::download_all(&settings.sources, data_dir);
    debug!(downloaded, total = settings.sources.len(), "data files downloaded");
}

#[cfg(not(feature = "download"))]
fn download(_settings: &Settings, _data_dir: &Path) {
    debug!("built without download support, using last downloaded data files");
}
