//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Display format per timer (`hh:mm:ss`, `mm:ss`, `ss`)
//! - Default countdown target
//! - UI tick interval
//!
//! Configuration is stored at `~/.config/timekeep/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::format::DisplayMode;

/// Display format configuration.
///
/// Formats are stored as plain strings; unknown values fall back to
/// `hh:mm:ss` when parsed, they are never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_format")]
    pub stopwatch_format: String,
    #[serde(default = "default_format")]
    pub countdown_format: String,
}

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Target preloaded into a fresh countdown engine, in seconds.
    #[serde(default = "default_countdown_secs")]
    pub default_secs: u64,
}

/// Tick configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    /// Refresh interval for the periodic display tick, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timekeep/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub tick: TickConfig,
}

// Default functions
fn default_format() -> String {
    "hh:mm:ss".into()
}
fn default_countdown_secs() -> u64 {
    30
}
fn default_tick_ms() -> u64 {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            stopwatch_format: default_format(),
            countdown_format: default_format(),
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            default_secs: default_countdown_secs(),
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            countdown: CountdownConfig::default(),
            tick: TickConfig::default(),
        }
    }
}

impl Config {
    pub fn stopwatch_mode(&self) -> DisplayMode {
        DisplayMode::parse(&self.display.stopwatch_format)
    }

    pub fn countdown_mode(&self) -> DisplayMode {
        DisplayMode::parse(&self.display.countdown_format)
    }

    pub fn default_target_ms(&self) -> u64 {
        self.countdown.default_secs.saturating_mul(1000)
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults out on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and save. Returns an error if the key is
    /// unknown or the value does not fit the existing type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value).map_err(invalid)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        self.save()
    }

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
    ) -> Result<(), String> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| e.to_string())?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number"));
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}"))
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
        assert_eq!(parsed.display.stopwatch_format, "hh:mm:ss");
        assert_eq!(parsed.countdown.default_secs, 30);
        assert_eq!(parsed.tick.interval_ms, 50);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[display]\ncountdown_format = \"ss\"\n").unwrap();
        assert_eq!(parsed.display.countdown_format, "ss");
        assert_eq!(parsed.display.stopwatch_format, "hh:mm:ss");
        assert_eq!(parsed.tick.interval_ms, 50);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.stopwatch_format").as_deref(), Some("hh:mm:ss"));
        assert_eq!(cfg.get("countdown.default_secs").as_deref(), Some("30"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_string_and_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "display.countdown_format", "mm:ss").unwrap();
        Config::set_json_value_by_path(&mut json, "tick.interval_ms", "100").unwrap();
        let parsed: Config = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.display.countdown_format, "mm:ss");
        assert_eq!(parsed.tick.interval_ms, 100);
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(Config::set_json_value_by_path(&mut json, "display.nope", "x").is_err());
        assert!(Config::set_json_value_by_path(&mut json, "tick.interval_ms.deeper", "x").is_err());
    }

    #[test]
    fn set_json_value_by_path_rejects_bad_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(Config::set_json_value_by_path(&mut json, "tick.interval_ms", "fast").is_err());
    }

    #[test]
    fn unknown_format_string_falls_back_at_use() {
        let cfg: Config = toml::from_str("[display]\nstopwatch_format = \"what\"\n").unwrap();
        assert_eq!(cfg.stopwatch_mode(), DisplayMode::HoursMinutesSeconds);
    }
}
