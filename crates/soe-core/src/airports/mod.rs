// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

pub mod data;

use crate::countries;
use crate::geo::Coordinate;
use crate::{normalize_code, SoeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reference entry for one airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl AirportInfo {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Looks up airports by IATA/ICAO code.
///
/// Implementations match codes case-insensitively. An unknown code is an
/// ordinary `None`, many regional codes are simply missing from reference sets.
pub trait AirportResolver {
    fn resolve(&self, code: &str) -> Option<&AirportInfo>;
}

impl<R: AirportResolver + ?Sized> AirportResolver for &R {
    fn resolve(&self, code: &str) -> Option<&AirportInfo> {
        (**self).resolve(code)
    }
}

/// Plain maps work as resolvers as long as their keys are uppercase codes.
impl AirportResolver for HashMap<String, AirportInfo> {
    fn resolve(&self, code: &str) -> Option<&AirportInfo> {
        self.get(&normalize_code(code)?)
    }
}

/// Immutable in-memory airport table.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    by_code: HashMap<String, AirportInfo>,
}

/// One row of an OurAirports-style `airports.csv`. Only the columns we use.
#[derive(Debug, Deserialize)]
struct AirportCsvRow {
    ident: String,
    #[serde(default)]
    iata_code: String,
    latitude_deg: Option<f64>,
    longitude_deg: Option<f64>,
    #[serde(default)]
    municipality: String,
    #[serde(default)]
    iso_country: String,
}

impl AirportTable {
    /// Builds a table, keeping the first entry per code and dropping entries
    /// whose coordinates are out of range.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = AirportInfo>,
    {
        let mut table = Self::default();
        for entry in entries {
            table.insert_if_absent(entry);
        }
        table
    }

    /// The dataset shipped with the application. Built once per process.
    pub fn bundled() -> &'static AirportTable {
        data::bundled_table()
    }

    pub fn from_json_str(content: &str) -> Result<Self, SoeError> {
        let entries: Vec<AirportInfo> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SoeError> {
        let file = File::open(path)?;
        let entries: Vec<AirportInfo> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_entries(entries))
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self, SoeError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parses an OurAirports-style CSV. Rows are indexed by IATA code, and by
    /// ident when that key is still free.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SoeError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["ident", "latitude_deg", "longitude_deg"] {
            if !headers.iter().any(|h| h == required) {
                return Err(SoeError::ReferenceData(format!(
                    "airports CSV is missing the '{}' column",
                    required
                )));
            }
        }

        let mut table = Self::default();
        let mut bad_rows = 0usize;

        for result in rdr.deserialize::<AirportCsvRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    bad_rows += 1;
                    log::debug!("Skipping unreadable airport row: {}", e);
                    continue;
                }
            };

            let (lat, lon) = match (row.latitude_deg, row.longitude_deg) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    bad_rows += 1;
                    continue;
                }
            };

            let keys = [row.iata_code.as_str(), row.ident.as_str()];
            for key in keys {
                if let Some(code) = normalize_code(key) {
                    table.insert_if_absent(AirportInfo {
                        code,
                        lat,
                        lon,
                        city: row.municipality.trim().to_string(),
                        country: countries::display_name(&row.iso_country),
                    });
                }
            }
        }

        log::info!(
            "Loaded {} airport codes from CSV ({} rows skipped)",
            table.len(),
            bad_rows
        );
        Ok(table)
    }

    /// Adds every entry of `other` whose code this table does not know yet.
    pub fn fill_from(&mut self, other: &AirportTable) {
        for entry in other.by_code.values() {
            self.insert_if_absent(entry.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportInfo> {
        self.by_code.values()
    }

    fn insert_if_absent(&mut self, mut entry: AirportInfo) {
        let Some(code) = normalize_code(&entry.code) else {
            return;
        };
        if !entry.coordinate().is_valid() {
            log::warn!(
                "Rejecting airport {} with invalid coordinates ({}, {})",
                code,
                entry.lat,
                entry.lon
            );
            return;
        }
        entry.code = code.clone();
        self.by_code.entry(code).or_insert(entry);
    }
}

impl AirportResolver for AirportTable {
    fn resolve(&self, code: &str) -> Option<&AirportInfo> {
        self.by_code.get(&normalize_code(code)?)
    }
}
