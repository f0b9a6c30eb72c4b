use crate::error::{QdbgError, Result};
use crate::home::QdbgHome;
use crate::search::{ScanDirection, SearchEngine, DEFAULT_PROVIDER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    // Host of the search site, e.g. "you.com"
    pub provider: String,
    // Take the last non-empty stderr line rather than the first
    pub from_bottom: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            from_bottom: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from `home`. A missing file means defaults; nothing is written.
    pub fn new(home: &QdbgHome) -> Result<Self> {
        let config_path = home.config_file();

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| QdbgError::io("failed to read config", path, e))?;
        toml::from_str(&content)
            .map_err(|e| QdbgError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir)
                .map_err(|e| QdbgError::io("failed to create config directory", config_dir, e))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| QdbgError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| QdbgError::io("failed to write config", path, e))?;
        Ok(())
    }

    pub fn search_engine(&self) -> SearchEngine {
        SearchEngine::new(self.search.provider.clone())
    }

    pub fn scan_direction(&self) -> ScanDirection {
        ScanDirection::from_bottom(self.search.from_bottom)
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Try to get system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }
}
