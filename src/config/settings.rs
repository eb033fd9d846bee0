//! Editor settings
//!
//! Small JSON file in the platform config dir. Missing keys fall back to
//! defaults; environment variables override whatever was loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::document::EXPORT_INDENT;
use crate::constants::{env as env_vars, storage};
use crate::persistence::FileSink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dark theme preference for editors that render the document
    #[serde(default)]
    pub dark_mode: bool,

    /// Where the working document is persisted (defaults to the data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Indentation for exported JSON
    #[serde(default = "default_pretty_indent")]
    pub pretty_indent: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pretty_indent() -> usize {
    EXPORT_INDENT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dark_mode: false,
            storage_path: None,
            pretty_indent: default_pretty_indent(),
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(storage::CONFIG_FILENAME);
        path
    }

    /// Load from the default location and apply env overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::path())?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No settings file found, using defaults");
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write settings to {}", path.display()))?;
        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(env_vars::LOG_LEVEL) {
            self.log_level = level.trim().to_lowercase();
        }
        if let Some(path) = lookup(env_vars::STORAGE_PATH).filter(|p| !p.trim().is_empty()) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(env_vars::DARK_MODE) {
            match raw.trim().parse::<bool>() {
                Ok(dark_mode) => self.dark_mode = dark_mode,
                Err(e) => warn!(var = env_vars::DARK_MODE, value = %raw, error = %e, "Ignoring invalid env var"),
            }
        }
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Sink for the working document, honouring `storage_path`
    pub fn storage_sink(&self) -> FileSink {
        match &self.storage_path {
            Some(path) => FileSink::new(path),
            None => FileSink::default(),
        }
    }
}
