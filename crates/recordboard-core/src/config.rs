//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the published sheet URL for each discipline and the
//! leaderboard defaults.
//!
//! Configuration is stored at `~/.config/recordboard/config.json`. Source
//! URLs and the cache directory can be overridden from the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Discipline, Gender};
use crate::query::Limit;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "recordboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_COMPETITION_URL: &str = "RECORDBOARD_COMPETITION_URL";
pub const ENV_TRAINING_URL: &str = "RECORDBOARD_TRAINING_URL";
pub const ENV_XC_URL: &str = "RECORDBOARD_XC_URL";
pub const ENV_CACHE_DIR: &str = "RECORDBOARD_CACHE_DIR";

/// Published CSV export URL per discipline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SourceUrls {
    pub competition: Option<String>,
    pub training: Option<String>,
    pub xc: Option<String>,
}

impl SourceUrls {
    pub fn url_for(&self, discipline: Discipline) -> Option<&str> {
        let url = match discipline {
            Discipline::Competition => &self.competition,
            Discipline::Training => &self.training,
            Discipline::CrossCountry => &self.xc,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourceUrls,
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub default_limit: Limit,
    #[serde(default)]
    pub default_gender: Gender,
}

impl Config {
    /// Load the config file (defaults if absent) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Overlay values from the environment. Takes a lookup function so
    /// callers (and tests) control where values come from.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_COMPETITION_URL) {
            self.sources.competition = Some(url);
        }
        if let Some(url) = lookup(ENV_TRAINING_URL) {
            self.sources.training = Some(url);
        }
        if let Some(url) = lookup(ENV_XC_URL) {
            self.sources.xc = Some(url);
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|d| !d.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
