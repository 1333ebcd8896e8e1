//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The calendar to plan into
//! - Default overall and per-event focus time
//! - Whether commits ask for confirmation
//! - Google Calendar API endpoint and token variable
//!
//! Configuration is stored at `~/.config/calgo/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::schedule::FOCUS_TITLE;

/// Planning defaults; command line flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// Overall focus time to allocate per plan, e.g. "2h".
    #[serde(default = "default_focus_duration")]
    pub focus_time: String,
    /// Length of each focus block, e.g. "45m".
    #[serde(default = "default_focus_duration")]
    pub focus_event_duration: String,
    #[serde(default = "default_focus_title")]
    pub focus_title: String,
    #[serde(default = "default_true")]
    pub interactive: bool,
}

/// Google Calendar API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the OAuth bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/calgo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerSettings,
    #[serde(default)]
    pub google: GoogleConfig,
}

// Default functions
fn default_calendar_id() -> String {
    "primary".into()
}
fn default_focus_duration() -> String {
    "45m".into()
}
fn default_focus_title() -> String {
    FOCUS_TITLE.into()
}
fn default_true() -> bool {
    true
}
fn default_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".into()
}
fn default_token_env() -> String {
    "CALGO_GOOGLE_TOKEN".into()
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            focus_time: default_focus_duration(),
            focus_event_duration: default_focus_duration(),
            focus_title: default_focus_title(),
            interactive: true,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

impl PlannerSettings {
    pub fn focus_time(&self) -> Result<Duration, ConfigError> {
        parse_setting("planner.focus_time", &self.focus_time)
    }

    pub fn focus_event_duration(&self) -> Result<Duration, ConfigError> {
        parse_setting("planner.focus_event_duration", &self.focus_event_duration)
    }
}

fn parse_setting(key: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
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
        if key.is_empty() {
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
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("not a leaf setting".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/calgo"),
                message: e.to_string(),
            })
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
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
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
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check that every duration setting parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planner.focus_time()?;
        self.planner.focus_event_duration()?;
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

    /// Set a config value by key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.planner.calendar_id, "primary");
        assert_eq!(parsed.planner.focus_time, "45m");
        assert!(parsed.planner.interactive);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[planner]\nfocus_time = \"2h\"\n").unwrap();
        assert_eq!(parsed.planner.focus_time().unwrap(), Duration::hours(2));
        assert_eq!(parsed.planner.focus_event_duration().unwrap(), Duration::minutes(45));
        assert_eq!(parsed.google.token_env, "CALGO_GOOGLE_TOKEN");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.interactive").as_deref(), Some("true"));
        assert_eq!(cfg.get("planner.focus_event_duration").as_deref(), Some("45m"));
        assert_eq!(cfg.get("planner").as_deref(), None);
        assert!(cfg.get("planner.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("planner.interactive", "false").unwrap();
        cfg.set("planner.focus_time", "1h30m").unwrap();
        cfg.set("google.api_base", "http://localhost:9999").unwrap();

        assert!(!cfg.planner.interactive);
        assert_eq!(cfg.planner.focus_time().unwrap(), Duration::minutes(90));
        assert_eq!(cfg.google.api_base, "http://localhost:9999");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("planner.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("planner.interactive", "not_a_bool").is_err());
        assert!(cfg.set("planner.focus_time", "soon").is_err());
        assert!(cfg.set("planner", "x").is_err());
        // Failed sets leave the config untouched
        assert_eq!(cfg.planner.focus_time, "45m");
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.planner.calendar_id, "primary");
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("planner.calendar_id", "team@example.com").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.planner.calendar_id, "team@example.com");
    }

    #[test]
    fn load_rejects_bad_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner]\nfocus_event_duration = \"later\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
