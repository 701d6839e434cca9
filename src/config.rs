//! Run configuration: API credential and output locations. Loaded once at
//! startup and passed explicitly into the pipeline.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::directory::DEFAULT_API_URL;
use crate::error::{ExportError, ExportResult};
use crate::validation;

pub const DEFAULT_CONFIG_PATH: &str = "slackcards.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "contacts";
pub const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_IGNORE_TITLE: &str = "#ignore";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Workspace token presented as the bearer credential on every API call.
    pub token: String,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Members whose job title equals this marker are left out of the
    /// export.
    #[serde(default)]
    pub ignore_title: Option<String>,

    /// Export bot accounts too. Off by default.
    #[serde(default)]
    pub include_bots: bool,

    /// Directory API base URL. Points at Slack unless overridden.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> ExportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ExportError::ConfigMissing {
                    path: path.display().to_string(),
                }
            } else {
                ExportError::Io(e)
            }
        })?;
        let mut config: Config =
            toml::from_str(&raw).map_err(|e| ExportError::ConfigInvalid {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        config.token = validation::non_blank(&config.token, "token")?;
        Ok(config)
    }

    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn cache_dir_or_default(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }

    pub fn ignore_title_or_default(&self) -> &str {
        self.ignore_title.as_deref().unwrap_or(DEFAULT_IGNORE_TITLE)
    }

    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
