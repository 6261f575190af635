use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "NAHW_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Tokens examined after a candidate when looking for its possessor.
    #[serde(default = "default_search_window")]
    pub search_window: usize,
    /// Minimum bare letters left in the stem when splitting an attached pronoun.
    #[serde(default = "default_min_pronoun_stem")]
    pub min_pronoun_stem: usize,
    /// Fan corpus groups out over the rayon pool.
    #[serde(default)]
    pub parallel_corpus: bool,
}

fn default_search_window() -> usize {
    3
}

fn default_min_pronoun_stem() -> usize {
    2
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            search_window: default_search_window(),
            min_pronoun_stem: default_min_pronoun_stem(),
            parallel_corpus: false,
        }
    }
}

impl DetectorConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_window == 0 {
            return Err(ConfigError::InvalidSearchWindow);
        }
        Ok(())
    }
}
