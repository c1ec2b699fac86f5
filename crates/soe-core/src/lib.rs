// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

pub mod admin;
pub mod airlines;
pub mod airports;
pub mod countries;
pub mod flight;
pub mod geo;
pub mod import;
pub mod logbook;
pub mod routes;
pub mod settings;
pub mod stamps;
pub mod stats;
pub mod timeline;

pub use airports::{AirportInfo, AirportResolver, AirportTable};
pub use flight::{FlightRecord, FlightStatus};
pub use stats::{aggregate, AggregateOptions, TripStats};

use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoeError {
    #[error("Invalid reference data: {0}")]
    ReferenceData(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Environment variable that relocates the config root (used by tests and
/// portable installs).
pub const CONFIG_DIR_ENV: &str = "SOE_CONFIG_DIR";

/// Directory holding `settings.json` and the default flight log.
pub fn get_config_root() -> PathBuf {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    directories::ProjectDirs::from("org", "sinceonearth", "SinceOnEarth")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".sinceonearth"))
}

/// Normalizes an airport or airline code: trimmed, uppercased, `None` when blank.
pub fn normalize_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" del "), Some("DEL".to_string()));
        assert_eq!(normalize_code("6e"), Some("6E".to_string()));
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code(""), None);
    }
}
