//! User settings for the `gtd` command
//!
//! Settings are stored in `~/.config/gtd-records/config.toml` (or the
//! platform equivalent). They only supply defaults for command-line flags;
//! the GTD configuration itself lives in the config record of the data files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Format;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot infer file format for {0}; pass --format")]
    UnknownFormat(PathBuf),

    #[error("Input files mix formats ({0} and {1}); pass --format")]
    MixedFormats(Format, Format),

    #[error("No input files given and none configured")]
    NoFiles,

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Defaults for the command-line interface
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Format used when `--format` is not given and files have no known extension
    pub default_format: Option<Format>,

    /// Files read when a command is given none
    pub files: Vec<PathBuf>,
}

impl Settings {
    /// Returns the settings directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "gtd", "gtd-records").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads settings from the default location, or defaults if there are none
    pub fn load() -> Result<Self> {
        match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from a specific file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| SettingsError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Picks the input files: the given ones, else the configured ones
    pub fn resolve_files(&self, given: &[PathBuf]) -> Result<Vec<PathBuf>, SettingsError> {
        if !given.is_empty() {
            return Ok(given.to_vec());
        }
        if self.files.is_empty() {
            return Err(SettingsError::NoFiles);
        }
        Ok(self.files.iter().map(|path| expand_home(path)).collect())
    }

    /// Picks the format: the flag, else the file extensions, else the default
    pub fn resolve_format(
        &self,
        flag: Option<Format>,
        files: &[PathBuf],
    ) -> Result<Format, SettingsError> {
        if let Some(format) = flag {
            return Ok(format);
        }

        let mut found: Option<Format> = None;
        for path in files {
            let format = match (Format::from_path(path), self.default_format) {
                (Some(format), _) => format,
                (None, Some(default)) => default,
                (None, None) => return Err(SettingsError::UnknownFormat(path.clone())),
            };
            match found {
                Some(previous) if previous != format => {
                    return Err(SettingsError::MixedFormats(previous, format))
                }
                _ => found = Some(format),
            }
        }

        found.or(self.default_format).ok_or(SettingsError::NoFiles)
    }
}

/// Expands a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
