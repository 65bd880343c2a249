//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Theme (dark mode)
//! - Audible cue settings
//! - Tick period of the real-time driver
//!
//! Configuration is stored at `~/.config/hiit-timer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

/// Audible cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    /// Ring the bell when an interval starts.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_completion_beeps")]
    pub completion_beeps: u32,
}

/// Tick driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hiit-timer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_true() -> bool {
    true
}
fn default_completion_beeps() -> u32 {
    3
}
fn default_tick_ms() -> u64 {
    1000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            completion_beeps: default_completion_beeps(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("expected a whole number, got '{value}'")))?
                        .into(),
                ),
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = self.to_toml().map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Flip a boolean setting, in memory only. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or does not hold a boolean.
    pub fn toggle(&mut self, key: &str) -> Result<bool, ConfigError> {
        let current = self
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let flipped = match current.as_str() {
            "true" => false,
            "false" => true,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("only on/off settings can be toggled, value is {other}"),
                })
            }
        };
        self.set(key, &flipped.to_string())?;
        Ok(flipped)
    }

    /// The settings as written to `config.toml`.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be serialized.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.ui.dark_mode);
        assert_eq!(parsed.cues.completion_beeps, 3);
        assert_eq!(parsed.timer.tick_ms, 1000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[ui]\ndark_mode = false\n").unwrap();
        assert!(!parsed.ui.dark_mode);
        assert!(parsed.cues.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("ui.dark_mode").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.tick_ms").as_deref(), Some("1000"));
        assert!(cfg.get("ui.missing_key").is_none());
        assert!(cfg.get("ui").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("ui.dark_mode", "false").unwrap();
        cfg.set("cues.completion_beeps", "5").unwrap();
        assert!(!cfg.ui.dark_mode);
        assert_eq!(cfg.cues.completion_beeps, 5);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_value() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("ui.colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("ui", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("ui.dark_mode", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("timer.tick_ms", "-3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.ui.dark_mode);
    }

    #[test]
    fn toggle_flips_booleans_only() {
        let mut cfg = Config::default();
        assert!(!cfg.toggle("ui.dark_mode").unwrap());
        assert!(!cfg.ui.dark_mode);
        assert!(cfg.toggle("ui.dark_mode").unwrap());
        assert!(cfg.ui.dark_mode);

        assert!(matches!(
            cfg.toggle("timer.tick_ms"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.toggle("ui.sound"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(cfg.timer.tick_ms, 1000);
    }

    #[test]
    fn to_toml_matches_saved_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("cues.completion_beeps", "5").unwrap();
        cfg.save_to(&path).unwrap();

        let text = cfg.to_toml().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert!(text.contains("[ui]"));
        assert!(text.contains("completion_beeps = 5"));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.ui.dark_mode);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("ui.dark_mode", "false").unwrap();
        cfg.save_to(&path).unwrap();
        assert!(!Config::load_from(&path).unwrap().ui.dark_mode);
    }

    #[test]
    fn load_from_garbage_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ui = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
