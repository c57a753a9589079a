//! Manage the app configuration by creating, resetting and reading the
//! configuration folder

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use browsercompat_core::{BrowserConfig, CheckConfig};
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    sources::{default_sources, DataSource},
};

const DEFAULT_SETTING_FILE_NAME: &str = "settings.yaml";
const DATA_FOLDER_NAME: &str = "data";
const RULES_FOLDER_NAME: &str = "rules";

/// describe configuration folder
#[derive(Debug, Clone)]
pub struct Config {
    /// Configuration folder path.
    pub root_folder: PathBuf,
    /// config file.
    pub setting_file_path: PathBuf,
}

/// Describe the configuration yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Skip browsers that have no entry in `browsers`.
    #[serde(default)]
    pub ignore_unlisted: bool,
    /// Use the last downloaded data files instead of fetching fresh ones.
    #[serde(default)]
    pub dont_download: bool,
    /// Report/fail thresholds keyed by dataset browser key.
    #[serde(default)]
    pub browsers: BTreeMap<String, BrowserConfig>,
    /// Browser support data files, later sources overwrite earlier ones.
    #[serde(default = "default_sources")]
    pub sources: Vec<DataSource>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_unlisted: false,
            dont_download: false,
            browsers: BTreeMap::new(),
            sources: default_sources(),
        }
    }
}

impl Settings {
    /// Threshold configuration handed to the check engine.
    #[must_use]
    pub fn check_config(&self) -> CheckConfig {
        CheckConfig {
            ignore_unlisted: self.ignore_unlisted,
            browsers: self.browsers.clone(),
        }
    }

    /// `false` when no browser would be classified: none is configured and
    /// unlisted browsers are ignored.
    #[must_use]
    pub fn requests_check(&self) -> bool {
        !self.browsers.is_empty() || !self.ignore_unlisted
    }
}

impl Config {
    /// Get application setting config.
    ///
    /// # Errors
    ///
    /// Will return `Err` error return on load/save config
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let package_name = env!("CARGO_PKG_NAME");

        let config_folder = match path {
            Some(p) => p.to_path_buf(),
            None => match (dirs::config_dir(), dirs::home_dir()) {
                (Some(dir), _) => dir.join(package_name),
                (None, Some(home)) => home.join(format!(".{package_name}")),
                (None, None) => {
                    return Err(Error::Config("could not get directory path".to_string()))
                }
            },
        };

        let setting_config = Self {
            setting_file_path: config_folder.join(DEFAULT_SETTING_FILE_NAME),
            root_folder: config_folder,
        };

        setting_config.create_config_folder()?;
        setting_config.manage_setting_file()?;
        debug!(configuration = ?setting_config, "configuration settings loaded");
        Ok(setting_config)
    }

    /// Folder holding downloaded data files.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root_folder.join(DATA_FOLDER_NAME)
    }

    /// Folder holding user rule files.
    #[must_use]
    pub fn rules_dir(&self) -> PathBuf {
        self.root_folder.join(RULES_FOLDER_NAME)
    }

    /// Convert user settings yaml to struct.
    ///
    /// # Errors
    ///
    /// Will return `Err` has an error when loading the config file
    pub fn get_settings_from_file(&self) -> Result<Settings> {
        Ok(serde_yaml::from_str(&self.read_config_file()?)?)
    }

    /// Create the default config yaml file if not exists.
    ///
    /// # Errors
    ///
    /// Will return `Err` file could not created or loaded
    pub fn manage_setting_file(&self) -> Result<()> {
        if !self.setting_file_path.is_file() {
            debug!(path = %self.setting_file_path.display(), "setting file not found");
            self.create_default_settings_file()?;
        }
        debug!(settings = ?self.get_settings_from_file()?, "setting file loaded");
        Ok(())
    }

    /// Reset user configuration to the default app.
    ///
    /// With `backup` the current settings file is kept next to the new one
    /// and its path is returned.
    ///
    /// # Errors
    ///
    /// Will return `Err` when the settings file could not be moved or written
    pub fn reset_config(&self, backup: bool) -> Result<Option<PathBuf>> {
        let backup_path = if backup && self.setting_file_path.is_file() {
            Some(self.backup()?)
        } else {
            None
        };
        self.create_default_settings_file()?;
        Ok(backup_path)
    }

    /// Create config, data and rules folders if not exist.
    fn create_config_folder(&self) -> Result<()> {
        for folder in [self.root_folder.clone(), self.data_dir(), self.rules_dir()] {
            if folder.is_dir() {
                debug!(path = %folder.display(), "configuration folder found");
            } else {
                fs::create_dir_all(&folder)?;
                debug!(path = %folder.display(), "configuration folder created");
            }
        }
        Ok(())
    }

    /// Create config file from default template.
    fn create_default_settings_file(&self) -> Result<()> {
        self.save_settings_file_from_struct(&Settings::default())
    }

    /// Convert the given config to YAML format and the file.
    fn save_settings_file_from_struct(&self, settings: &Settings) -> Result<()> {
        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.setting_file_path, content)?;
        debug!(path = %self.setting_file_path.display(), settings = ?settings, "settings file created");
        Ok(())
    }

    /// Return config content.
    fn read_config_file(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.setting_file_path)?)
    }

    fn backup(&self) -> Result<PathBuf> {
        let backup_to = self.setting_file_path.with_extension(format!(
            "yaml.{}.bak",
            SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs()
        ));
        fs::rename(&self.setting_file_path, &backup_to)?;
        Ok(backup_to)
    }
}
