//! TOML-based engine configuration.
//!
//! Stores:
//! - Default user preferences for requests that carry none
//! - Hour ranges for the morning/afternoon/evening habit windows
//!
//! Configuration is stored at `<config_dir>/timeblock/config.toml`, or at the
//! path in `TIMEBLOCK_CONFIG` when that is set. The engine itself never reads
//! it; callers pass the values in explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::habits::TimeOfDayWindows;
use crate::preferences::UserPreferences;

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub time_of_day: TimeOfDayWindows,
}

impl EngineConfig {
    /// Location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os("TIMEBLOCK_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("timeblock").join("config.toml"))
    }

    /// Load from the default path, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load_or_default() -> Self {
        let loaded = Self::path().and_then(|path| {
            if path.exists() {
                Self::load_from(&path)
            } else {
                Ok(Self::default())
            }
        });

        loaded.unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to a specific file, creating parent directories.
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
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key, e.g.
    /// `preferences.wakeTime` or `timeOfDay.morning`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&json, |current, part| current.get(part))?;

        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Strings are taken verbatim,
    /// anything else is parsed as JSON (`timeOfDay.evening '[18, 23]'`).
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values of the wrong shape.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::ParseFailed(format!("unknown config key: {key}"));
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };

        let mut current = &mut json;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        let object = current.as_object_mut().ok_or_else(unknown)?;
        let new_value = match object.get(leaf) {
            Some(serde_json::Value::String(_)) => serde_json::Value::String(value.to_string()),
            Some(_) => serde_json::from_str(value)
                .map_err(|e| ConfigError::ParseFailed(format!("invalid value for {key}: {e}")))?,
            // Optional and skipped when unset, so it may be absent
            None if key == "preferences.dailySchedule" => {
                serde_json::from_str(value)
                    .map_err(|e| ConfigError::ParseFailed(format!("invalid value for {key}: {e}")))?
            }
            None => return Err(unknown()),
        };
        object.insert(leaf.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }
}
