//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::catalog::DEFAULT_EXERCISE_TYPE;
use crate::picker::SectionLimits;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "exercise-picker";
const CONFIG_ENV_VAR: &str = "EXERCISE_PICKER_CONFIG_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Display limit '{0}' must be at least 1.")]
    InvalidLimit(&'static str),
    #[error("Recent limit must be at least 1.")]
    InvalidRecentLimit,
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a color name case-insensitively, e.g. `"darkgrey"`.
/// # Errors
/// Returns `ConfigError::InvalidColor` for unknown names.
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str))
        .ok_or_else(|| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

/// Row caps per section.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    pub browse: usize,
    pub logged: usize,
    pub search: usize,
}

impl Default for Limits {
    fn default() -> Self {
        let defaults = SectionLimits::default();
        Self {
            browse: defaults.browse,
            logged: defaults.logged,
            search: defaults.search,
        }
    }
}

impl From<Limits> for SectionLimits {
    fn from(value: Limits) -> Self {
        Self {
            browse: value.browse,
            logged: value.logged,
            search: value.search,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    pub default_exercise_type: String,
    pub recent_limit: u32,
    pub limits: Limits,
    pub type_labels: BTreeMap<String, String>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_exercise_type: DEFAULT_EXERCISE_TYPE.to_string(),
            recent_limit: 8,
            limits: Limits::default(),
            type_labels: BTreeMap::new(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Rejects settings the picker cannot work with.
    /// # Errors
    /// - `ConfigError::InvalidLimit` if any display cap is zero.
    /// - `ConfigError::InvalidRecentLimit` if `recent_limit` is zero.
    /// - `ConfigError::InvalidColor` if the header color is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.browse == 0 {
            return Err(ConfigError::InvalidLimit("browse"));
        }
        if self.limits.logged == 0 {
            return Err(ConfigError::InvalidLimit("logged"));
        }
        if self.limits.search == 0 {
            return Err(ConfigError::InvalidLimit("search"));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::InvalidRecentLimit);
        }
        parse_color(&self.theme.header_color)?;
        Ok(())
    }
}

/// Determines the path to the configuration file.
/// Exposed at crate root as `get_config_path_util`
/// # Errors
/// Returns `ConfigError` if the directory cannot be determined or created.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_path = match std::env::var(CONFIG_ENV_VAR).ok() {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.is_dir() {
                tracing::warn!(
                    "{} points to '{}', which is not a directory. Trying to create it.",
                    CONFIG_ENV_VAR,
                    path.display()
                );
                fs::create_dir_all(&path)?;
            }
            path
        }
        None => {
            let base_config_dir =
                dirs::config_dir().ok_or(ConfigError::CannotDetermineConfigDir)?;
            base_config_dir.join(APP_CONFIG_DIR)
        }
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the TOML file at the given path.
/// A missing file is created with defaults.
/// # Errors
/// Returns `ConfigError` on I/O, parse or validation failure.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        return Ok(default_config);
    }
    let config_content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_content)?;
    config.validate()?;
    Ok(config)
}

/// Saves the configuration to the TOML file.
/// # Errors
/// Returns `ConfigError` on I/O or serialization failure.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_ignores_case() {
        assert_eq!(parse_color("darkgrey").unwrap(), StandardColor::DarkGrey);
        assert!(matches!(parse_color("mauve"), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = toml::from_str("recent_limit = 3\n[limits]\nsearch = 10\n").unwrap();
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.limits.search, 10);
        assert_eq!(config.limits.browse, 40);
        assert_eq!(config.default_exercise_type, "weightlifting");
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut config = Config::default();
        config.limits.logged = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit("logged"))));
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let mut changed = config;
        changed.type_labels.insert("cardio".into(), "Conditioning".into());
        save(&path, &changed).unwrap();
        assert_eq!(load(&path).unwrap(), changed);
    }
}
