// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::flight::{FlightRecord, FlightStatus};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One user's flights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightLog {
    #[serde(default)]
    pub flights: Vec<FlightRecord>,
}

/// Partial update for a logged flight. `None` leaves a field alone; an empty
/// string clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPatch {
    pub date: Option<String>,
    pub airline_code: Option<String>,
    pub airline_name: Option<String>,
    pub flight_number: Option<String>,
    pub departure_code: Option<String>,
    pub arrival_code: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub departure_terminal: Option<String>,
    pub arrival_terminal: Option<String>,
    pub aircraft_type: Option<String>,
    pub status: Option<FlightStatus>,
}

fn patch_text(target: &mut Option<String>, value: &Option<String>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            let new = if v.is_empty() { None } else { Some(v.to_string()) };
            let changed = *target != new;
            *target = new;
            changed
        }
        None => false,
    }
}

impl FlightPatch {
    pub fn apply(&self, flight: &mut FlightRecord) {
        patch_text(&mut flight.date, &self.date);
        patch_text(&mut flight.airline_code, &self.airline_code);
        patch_text(&mut flight.airline_name, &self.airline_name);
        patch_text(&mut flight.flight_number, &self.flight_number);
        patch_text(&mut flight.departure_time, &self.departure_time);
        patch_text(&mut flight.arrival_time, &self.arrival_time);
        patch_text(&mut flight.departure_terminal, &self.departure_terminal);
        patch_text(&mut flight.arrival_terminal, &self.arrival_terminal);
        patch_text(&mut flight.aircraft_type, &self.aircraft_type);

        // Cached coordinates belong to the old airport
        if patch_text(&mut flight.departure_code, &self.departure_code) {
            flight.departure_lat = None;
            flight.departure_lon = None;
        }
        if patch_text(&mut flight.arrival_code, &self.arrival_code) {
            flight.arrival_lat = None;
            flight.arrival_lon = None;
        }

        if let Some(status) = self.status {
            flight.status = status;
        }
    }
}

impl FlightLog {
    pub fn from_flights(flights: Vec<FlightRecord>) -> Self {
        let mut flight_log = Self::default();
        flight_log.add_all(flights);
        flight_log
    }

    /// Stores a flight and returns its id. Missing or colliding ids are
    /// replaced with a fresh UUID.
    pub fn add(&mut self, mut flight: FlightRecord) -> String {
        let usable = flight
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && self.get(id).is_none())
            .map(str::to_string);
        let id = usable.unwrap_or_else(|| Uuid::new_v4().to_string());
        flight.id = Some(id.clone());
        self.flights.push(flight);
        id
    }

    pub fn add_all<I>(&mut self, flights: I) -> usize
    where
        I: IntoIterator<Item = FlightRecord>,
    {
        flights.into_iter().map(|f| self.add(f)).count()
    }

    pub fn get(&self, id: &str) -> Option<&FlightRecord> {
        self.flights.iter().find(|f| f.id.as_deref() == Some(id))
    }

    pub fn update(&mut self, id: &str, patch: &FlightPatch) -> Option<&FlightRecord> {
        let flight = self
            .flights
            .iter_mut()
            .find(|f| f.id.as_deref() == Some(id))?;
        patch.apply(flight);
        Some(&*flight)
    }

    pub fn remove(&mut self, id: &str) -> Option<FlightRecord> {
        let index = self
            .flights
            .iter()
            .position(|f| f.id.as_deref() == Some(id))?;
        Some(self.flights.remove(index))
    }

    /// Seeds an empty log. A log that already has flights is left untouched
    /// and `0` is returned.
    pub fn import_default(&mut self, flights: Vec<FlightRecord>) -> usize {
        if !self.flights.is_empty() {
            log::info!(
                "Flight log already has {} flights, skipping default import",
                self.flights.len()
            );
            return 0;
        }
        self.add_all(flights)
    }

    /// Newest first; undated flights go last in entry order.
    pub fn sorted_by_date(&self) -> Vec<&FlightRecord> {
        let mut flights: Vec<&FlightRecord> = self.flights.iter().collect();
        flights.sort_by(|a, b| match (a.calendar_date(), b.calendar_date()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

/// JSON file holding a [`FlightLog`].
#[derive(Debug, Clone)]
pub struct LogbookStore {
    path: PathBuf,
}

impl LogbookStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty log. A bare JSON array of flights is
    /// accepted too.
    pub fn load(&self) -> Result<FlightLog> {
        if !self.path.exists() {
            return Ok(FlightLog::default());
        }

        let content = fs::read_to_string(&self.path).context("Failed to read flight log")?;
        if content.trim_start().starts_with('[') {
            let flights: Vec<FlightRecord> =
                serde_json::from_str(&content).context("Failed to parse flight list")?;
            return Ok(FlightLog::from_flights(flights));
        }

        serde_json::from_str(&content).context("Failed to parse flight log")
    }

    pub fn save(&self, flight_log: &FlightLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create flight log directory")?;
            }
        }

        // Always create a backup first
        if self.path.exists() {
            let bak_path = self.path.with_extension("bak");
            fs::copy(&self.path, &bak_path).context("Failed to create flight log backup")?;
        }

        let content =
            serde_json::to_string_pretty(flight_log).context("Failed to serialize flight log")?;
        fs::write(&self.path, content).context("Failed to write flight log")?;

        log::info!(
            "Saved {} flights to {}",
            flight_log.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str) -> FlightRecord {
        FlightRecord {
            date: Some(date.into()),
            ..FlightRecord::between("DEL", "BOM")
        }
    }

    #[test]
    fn test_add_assigns_ids() {
        let mut log = FlightLog::default();
        let a = log.add(dated("2024-01-01"));
        let b = log.add(FlightRecord {
            id: Some("mine".into()),
            ..dated("2024-01-02")
        });
        let c = log.add(FlightRecord {
            id: Some("mine".into()),
            ..dated("2024-01-03")
        });

        assert!(Uuid::parse_str(&a).is_ok());
        assert_eq!(b, "mine");
        assert_ne!(c, "mine");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_update_and_remove() {
        let mut log = FlightLog::default();
        let mut flight = dated("2024-01-01");
        flight.departure_lat = Some(28.5562);
        flight.departure_lon = Some(77.1);
        flight.aircraft_type = Some("A320".into());
        let id = log.add(flight);

        let patch = FlightPatch {
            departure_code: Some("bom".into()),
            arrival_code: Some("BLR".into()),
            aircraft_type: Some(String::new()),
            status: Some(FlightStatus::Cancelled),
            ..Default::default()
        };
        let updated = log.update(&id, &patch).unwrap();
        assert_eq!(updated.departure_code.as_deref(), Some("bom"));
        assert_eq!(updated.departure_lat, None);
        assert_eq!(updated.aircraft_type, None);
        assert_eq!(updated.status, FlightStatus::Cancelled);
        assert_eq!(updated.date.as_deref(), Some("2024-01-01"));

        assert!(log.update("missing", &patch).is_none());
        assert!(log.remove(&id).is_some());
        assert!(log.remove(&id).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_import_default_only_when_empty() {
        let mut log = FlightLog::default();
        assert_eq!(log.import_default(vec![dated("2024-01-01"), dated("2024-02-01")]), 2);
        assert_eq!(log.import_default(vec![dated("2024-03-01")]), 0);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_sorted_by_date() {
        let log = FlightLog::from_flights(vec![
            dated("2023-05-01"),
            FlightRecord::between("DEL", "BOM"),
            dated("2024-01-01"),
        ]);
        let dates: Vec<Option<&str>> = log
            .sorted_by_date()
            .iter()
            .map(|f| f.date.as_deref())
            .collect();
        assert_eq!(dates, vec![Some("2024-01-01"), Some("2023-05-01"), None]);
    }

    #[test]
    fn test_store_roundtrip_with_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("flights.json");
        let store = LogbookStore::new(&path);

        assert!(store.load().unwrap().is_empty());

        let mut log = FlightLog::default();
        log.add(dated("2024-01-01"));
        store.save(&log).unwrap();
        assert!(!temp_dir.path().join("flights.bak").exists());

        log.add(dated("2024-02-01"));
        store.save(&log).unwrap();
        assert!(temp_dir.path().join("flights.bak").exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, log);

        let backup = LogbookStore::new(temp_dir.path().join("flights.bak"));
        assert_eq!(backup.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_bare_array() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("export.json");
        fs::write(
            &path,
            r#"[{"date":"2024-01-01","departure_code":"DEL","arrival_code":"BOM"}]"#,
        )
        .unwrap();

        let log = LogbookStore::new(&path).load().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.flights[0].id.is_some());
    }
}
