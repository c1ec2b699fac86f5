// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::stats::RouteMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_LOGBOOK_FILE: &str = "flights.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OurAirports-style CSV overlaid on the bundled airport table
    pub airports_csv: Option<PathBuf>,
    pub route_mode: RouteMode,
    /// Country shown first in stamp and country lists
    pub home_country: Option<String>,
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub log_level: String,
    /// Flight log location; defaults to `flights.json` in the config root
    pub logbook_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            airports_csv: None,
            route_mode: RouteMode::default(),
            home_country: None,
            log_level: "info".to_string(),
            logbook_path: None,
        }
    }
}

impl Settings {
    pub fn logbook_path(&self) -> PathBuf {
        self.logbook_path
            .clone()
            .unwrap_or_else(|| crate::get_config_root().join(DEFAULT_LOGBOOK_FILE))
    }
}

#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: PathBuf,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub fn new() -> Self {
        Self {
            config_path: crate::get_config_root().join(SETTINGS_FILE),
        }
    }

    pub fn with_path(path: &Path) -> Self {
        Self {
            config_path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// A missing file yields defaults.
    pub fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read settings.json")?;

        serde_json::from_str(&content).context("Failed to parse settings.json")
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.config_path, content).context("Failed to write settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::with_path(&dir.path().join("settings.json"));
        let settings = manager.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::with_path(&dir.path().join("nested").join("settings.json"));

        let settings = Settings {
            route_mode: RouteMode::Symmetric,
            home_country: Some("India".into()),
            logbook_path: Some(dir.path().join("log.json")),
            ..Default::default()
        };
        manager.save(&settings).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.logbook_path(), dir.path().join("log.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "route_mode": "symmetric" }"#).unwrap();

        let loaded = SettingsManager::with_path(&path).load().unwrap();
        assert_eq!(loaded.route_mode, RouteMode::Symmetric);
        assert_eq!(loaded.log_level, "info");
        assert!(loaded.airports_csv.is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = SettingsManager::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }
}
