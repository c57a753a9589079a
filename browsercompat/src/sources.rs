//! Browser support data files: download and load them into a [`Dataset`]
//!
//! Every source is stored twice in the data folder: `<file>.new` is written
//! by the last download and `<file>` is the last copy that parsed correctly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use browsercompat_core::{DataFile, Dataset};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Describe a single data file and where to get it from
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DataSource {
    /// File name inside the data folder.
    pub file: String,
    pub url: String,
    /// Top level key holding the feature table (`data` for caniuse files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Keep only features of the JS API, DOM and Canvas categories.
    #[serde(default)]
    pub strict: bool,
}

/// Data files used when the settings do not list any.
#[must_use]
pub fn default_sources() -> Vec<DataSource> {
    [
        (
            "additional.json",
            "https://raw.githubusercontent.com/tbusser/jscc/develop/src/static/data/additional.json",
            true,
        ),
        (
            "caniuse2.json",
            "https://raw.githubusercontent.com/tbusser/jscc/develop/src/static/data/caniuse2.json",
            true,
        ),
        (
            "data.json",
            "https://raw.githubusercontent.com/Fyrd/caniuse/master/data.json",
            false,
        ),
    ]
    .into_iter()
    .map(|(file, url, strict)| DataSource {
        file: file.to_string(),
        url: url.to_string(),
        extension: Some("data".to_string()),
        strict,
    })
    .collect()
}

impl DataSource {
    /// Last copy that parsed correctly.
    #[must_use]
    pub fn backup_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }

    /// Target of the last download.
    #[must_use]
    pub fn download_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.new", self.file))
    }

    /// Load the freshest readable copy of this source.
    ///
    /// A downloaded file that parses replaces the backup copy. When it does
    /// not parse the backup is used, and when both fail the source is skipped.
    #[must_use]
    pub fn load(&self, data_dir: &Path) -> Option<DataFile> {
        let downloaded = self.download_path(data_dir);
        let backup = self.backup_path(data_dir);

        match self.read(&downloaded) {
            Ok(file) => {
                if let Err(err) = fs::copy(&downloaded, &backup) {
                    warn!(path = %backup.display(), error = %err, "could not update backup copy");
                }
                return Some(file);
            }
            Err(err) => {
                warn!(
                    file = %self.file,
                    url = %self.url,
                    error = %err,
                    "unable to parse downloaded file, using backup copy"
                );
            }
        }

        match self.read(&backup) {
            Ok(file) => Some(file),
            Err(err) => {
                warn!(path = %backup.display(), error = %err, "skipping missing file");
                None
            }
        }
    }

    fn read(&self, path: &Path) -> Result<DataFile> {
        let content = fs::read_to_string(path)?;
        Ok(DataFile::from_json(&content, self.extension.as_deref())?)
    }

    /// Fetch the source into `<file>.new`. The file is only written once the
    /// whole body was received.
    ///
    /// # Errors
    /// when the request fails or the file can not be written
    #[cfg(feature = "download")]
    pub fn download(&self, data_dir: &Path) -> Result<()> {
        let body = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .bytes()?;
        fs::write(self.download_path(data_dir), &body)?;
        debug!(url = %self.url, bytes = body.len(), "data file downloaded");
        Ok(())
    }
}

/// Download every source in parallel and return how many succeeded.
///
/// Failed downloads are logged; loading then falls back to the last
/// downloaded copy.
#[cfg(feature = "download")]
pub fn download_all(sources: &[DataSource], data_dir: &Path) -> usize {
    use rayon::prelude::*;

    sources
        .par_iter()
        .filter(|source| match source.download(data_dir) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    url = %source.url,
                    error = %err,
                    "unable to download, using last-downloaded file"
                );
                false
            }
        })
        .count()
}

/// Merge every loadable source, in order, into one dataset.
#[must_use]
pub fn load_dataset(sources: &[DataSource], data_dir: &Path) -> Dataset {
    let dataset = sources
        .iter()
        .filter_map(|source| source.load(data_dir).map(|file| (file, source.strict)))
        .fold(Dataset::builder(), |builder, (file, strict)| {
            builder.add(file, strict)
        })
        .build();
    debug!(features = dataset.features().len(), "dataset loaded");
    dataset
}
