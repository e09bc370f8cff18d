use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::openweather::DEFAULT_BASE_URL;

/// Fallback query used on first launch when neither the CLI nor the config
/// file names a location.
pub const FALLBACK_LOCATION: &str = "Vienna";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "Oslo"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap API key. The `OPENWEATHER_API_KEY` environment
    /// variable and the `--api-key` flag both take precedence over this.
    pub api_key: Option<String>,

    /// Location fetched on startup, before the user types anything.
    pub default_location: Option<String>,

    /// Override of the provider endpoint. Rarely useful outside tests.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycard", "skycard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the API key, preferring an explicit override (CLI flag or
    /// environment) over the config file. An empty string counts as unset.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Result<String> {
        override_key
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.as_deref().filter(|key| !key.is_empty()))
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: set the OPENWEATHER_API_KEY environment variable, pass --api-key, \
                     or add `api_key = \"...\"` to the config file."
                )
            })
    }

    /// Initial lookup location: CLI override, then config file, then "Vienna".
    pub fn initial_location(&self, override_location: Option<&str>) -> String {
        override_location
            .filter(|loc| !loc.is_empty())
            .or_else(|| self.default_location.as_deref().filter(|loc| !loc.is_empty()))
            .unwrap_or(FALLBACK_LOCATION)
            .to_string()
    }

    /// Provider endpoint, defaulting to the public OpenWeatherMap API.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
