//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.janch.toml` in the working directory
//! 4. `~/.config/janch/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::Env;
use crate::i18n::Language;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Terminal color behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Apply the mode process-wide.
    pub fn apply(self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            // Auto defers to colored's own tty and NO_COLOR detection.
            ColorMode::Auto => {}
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "unknown color mode: '{other}'. Supported: auto, always, never"
            )),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            analysis: AnalysisConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: crate::constants::DEFAULT_SERVER_URL.to_string(),
        }
    }
}

/// Analysis behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Ask the backend for Urdu translations alongside English output.
    pub include_urdu: bool,
    /// Reuse cached results for identical code and kind.
    pub cache: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_urdu: false,
            cache: true,
        }
    }
}

/// Presentation configuration.
///
/// `language` drives both the UI chrome and the `language` field sent to the
/// backend, matching the single language toggle the service exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: Language,
    /// Open every result panel instead of only freshly analyzed ones.
    pub expand_all: bool,
    pub color: ColorMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            expand_all: false,
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then a `.janch.toml` in the given directory,
    /// then applies environment variable overrides.
    pub fn load(local_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: directory-local config
        if let Some(dir) = local_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        // Server settings
        if other.server.url != ServerConfig::default().url {
            self.server.url = other.server.url;
        }

        // Analysis settings
        if other.analysis.include_urdu {
            self.analysis.include_urdu = true;
        }
        // Caching defaults on; an explicit off wins over on
        if !other.analysis.cache {
            self.analysis.cache = false;
        }

        // UI settings
        let default_ui = UiConfig::default();
        if other.ui.language != default_ui.language {
            self.ui.language = other.ui.language;
        }
        if other.ui.expand_all {
            self.ui.expand_all = true;
        }
        if other.ui.color != default_ui.color {
            self.ui.color = other.ui.color;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(crate::constants::ENV_SERVER_URL) {
            self.server.url = val;
        }
        if let Ok(val) = env.var(crate::constants::ENV_LANGUAGE) {
            if let Ok(lang) = val.parse::<Language>() {
                self.ui.language = lang;
            } else {
                eprintln!(
                    "Warning: ignoring invalid {} value: {val}",
                    crate::constants::ENV_LANGUAGE
                );
            }
        }
        if let Ok(val) = env.var(crate::constants::ENV_COLOR) {
            if let Ok(mode) = val.parse::<ColorMode>() {
                self.ui.color = mode;
            } else {
                eprintln!(
                    "Warning: ignoring invalid {} value: {val}",
                    crate::constants::ENV_COLOR
                );
            }
        }
        if let Ok(val) = env.var(crate::constants::ENV_CACHE) {
            match val.to_lowercase().as_str() {
                "false" | "0" | "no" | "off" => self.analysis.cache = false,
                "true" | "1" | "yes" | "on" => self.analysis.cache = true,
                _ => eprintln!(
                    "Warning: ignoring invalid {} value: {val}",
                    crate::constants::ENV_CACHE
                ),
            }
        }
    }
}
