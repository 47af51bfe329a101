//! TOML-based application configuration.
//!
//! Stores tuning values that are not user settings:
//! - Default turn length and the presets offered at game setup
//! - Frame interval of the timer loop
//! - Audio and haptic thresholds
//!
//! Configuration is stored at `~/.config/cueflow/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::timer::{TimerDuration, DEFAULT_TIMER_SECS, TIMER_PRESETS};

/// Turn timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

/// Audio cue thresholds, in remaining whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// The ticking loop plays while remaining seconds are in `1..=this`.
    #[serde(default = "default_ticking_threshold")]
    pub ticking_threshold_secs: u64,
    /// One short beep per second while remaining seconds are in `1..=this`.
    #[serde(default = "default_beep_threshold")]
    pub beep_threshold_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_haptic_threshold")]
    pub threshold_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cueflow/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
}

fn default_duration_secs() -> u64 {
    DEFAULT_TIMER_SECS
}
fn default_presets() -> Vec<u64> {
    TIMER_PRESETS.to_vec()
}
fn default_frame_interval_ms() -> u64 {
    16
}
fn default_ticking_threshold() -> u64 {
    10
}
fn default_beep_threshold() -> u64 {
    5
}
fn default_haptic_threshold() -> u64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            presets: default_presets(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ticking_threshold_secs: default_ticking_threshold(),
            beep_threshold_secs: default_beep_threshold(),
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            threshold_secs: default_haptic_threshold(),
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
        if parts.peek().is_none() || key.is_empty() {
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
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                Self::default()
            }
        }
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

    /// Set a value in memory by dot-separated key. The result is validated
    /// before it replaces `self`; call [`Config::save`] to persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values the timer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_duration().map_err(|e| ConfigError::InvalidValue {
            key: "timer.default_duration_secs".into(),
            message: e.to_string(),
        })?;
        if let Some(err) = self
            .timer
            .presets
            .iter()
            .find_map(|secs| TimerDuration::from_secs(*secs).err())
        {
            return Err(ConfigError::InvalidValue {
                key: "timer.presets".into(),
                message: err.to_string(),
            });
        }
        if self.timer.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.frame_interval_ms".into(),
                message: "frame interval must be at least 1 ms".into(),
            });
        }
        Ok(())
    }

    pub fn default_duration(&self) -> Result<TimerDuration, ValidationError> {
        TimerDuration::from_secs(self.timer.default_duration_secs)
    }

    /// Preset durations, skipping any invalid entries.
    pub fn presets(&self) -> Vec<TimerDuration> {
        self.timer
            .presets
            .iter()
            .filter_map(|secs| TimerDuration::from_secs(*secs).ok())
            .collect()
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.timer.frame_interval_ms.max(1))
    }
}
