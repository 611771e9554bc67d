use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::{clog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Tuning for the generation manager and the mock generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_min_step_delay_ms")]
    pub min_step_delay_ms: u64,
    #[serde(default = "default_max_step_delay_ms")]
    pub max_step_delay_ms: u64,
    /// Fail a generation that is still running after this many seconds.
    pub timeout_secs: Option<u64>,
}

fn default_min_step_delay_ms() -> u64 {
    500
}

fn default_max_step_delay_ms() -> u64 {
    1500
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_step_delay_ms: default_min_step_delay_ms(),
            max_step_delay_ms: default_max_step_delay_ms(),
            timeout_secs: None,
        }
    }
}

impl GenerationConfig {
    /// Delay bounds between progress milestones; a reversed range is normalized.
    pub fn step_delay(&self) -> (Duration, Duration) {
        let lo = self.min_step_delay_ms.min(self.max_step_delay_ms);
        let hi = self.min_step_delay_ms.max(self.max_step_delay_ms);
        (Duration::from_millis(lo), Duration::from_millis(hi))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn app_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".coursecraft"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("coursecraft.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        clog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            clog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        clog_debug!(
            "Config loaded: step_delay={}..{}ms, timeout={:?}",
            config.generation.min_step_delay_ms,
            config.generation.max_step_delay_ms,
            config.generation.timeout_secs
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                clog_debug!("Creating config directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        clog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}
