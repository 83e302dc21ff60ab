//! Watcher configuration management

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub watcher: WatcherSettings,
    /// Scenario replay configuration
    #[serde(default)]
    pub replay: ReplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherSettings {
    pub log_level: String,
    /// Capacity of the event bridge between the session and the monitor
    #[serde(default = "WatcherSettings::default_event_capacity")]
    pub event_capacity: usize,
}

/// Scenario replay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaySettings {
    /// Path to a TOML scenario file driving the replay session
    #[serde(default)]
    pub scenario: Option<PathBuf>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watcher: WatcherSettings {
                log_level: "info".to_string(),
                event_capacity: WatcherSettings::default_event_capacity(),
            },
            replay: ReplaySettings::default(),
        }
    }
}

impl WatcherSettings {
    fn default_event_capacity() -> usize {
        256
    }
}

impl WatcherConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/usb-disk-monitor/watcher.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: WatcherConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("usb-disk-monitor").join("watcher.toml")
        } else {
            PathBuf::from(".config/usb-disk-monitor/watcher.toml")
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.watcher.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.watcher.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.watcher.event_capacity == 0 {
            return Err(anyhow!("event_capacity must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.watcher.log_level, "info");
        assert_eq!(config.replay.scenario, None);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = WatcherConfig::default();
        config.watcher.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.toml");

        let mut config = WatcherConfig::default();
        config.watcher.log_level = "debug".to_string();
        config.replay.scenario = Some(PathBuf::from("/tmp/demo.toml"));
        config.save(&path).unwrap();

        let loaded = WatcherConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.watcher.log_level, "debug");
        assert_eq!(loaded.replay.scenario, Some(PathBuf::from("/tmp/demo.toml")));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = WatcherConfig::load(Some(PathBuf::from("/nonexistent/watcher.toml")));
        assert!(result.is_err());
    }
}
