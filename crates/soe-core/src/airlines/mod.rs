// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::normalize_code;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub code: String,
    pub name: String,
    pub country: String,
}

/// Carrier lookup keyed by IATA designator. Entries keep file order.
#[derive(Debug, Clone, Default)]
pub struct AirlineDirectory {
    entries: Vec<AirlineInfo>,
    by_code: HashMap<String, usize>,
}

static BUNDLED: OnceLock<AirlineDirectory> = OnceLock::new();

impl AirlineDirectory {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = AirlineInfo>,
    {
        let mut directory = Self::default();
        for mut airline in entries {
            let Some(code) = normalize_code(&airline.code) else {
                continue;
            };
            if directory.by_code.contains_key(&code) {
                continue;
            }
            airline.code = code.clone();
            directory.by_code.insert(code, directory.entries.len());
            directory.entries.push(airline);
        }
        directory
    }

    pub fn bundled() -> &'static AirlineDirectory {
        BUNDLED.get_or_init(|| {
            match serde_json::from_str::<Vec<AirlineInfo>>(include_str!("airlines.json")) {
                Ok(entries) => Self::from_entries(entries),
                Err(e) => {
                    log::error!("Bundled airlines.json is unreadable: {}", e);
                    Self::default()
                }
            }
        })
    }

    pub fn by_code(&self, code: &str) -> Option<&AirlineInfo> {
        let index = *self.by_code.get(&normalize_code(code)?)?;
        self.entries.get(index)
    }

    /// Resolves user input to a known carrier: by code first, then by exact
    /// (case-insensitive) name.
    pub fn normalize(&self, input: &str) -> Option<&AirlineInfo> {
        if let Some(airline) = self.by_code(input) {
            return Some(airline);
        }
        let wanted = input.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|a| a.name.to_uppercase() == wanted)
    }

    /// One entry per distinct name+country, sorted by name. The first entry
    /// in file order wins.
    pub fn all_unique(&self) -> Vec<&AirlineInfo> {
        let mut seen = HashSet::new();
        let mut airlines: Vec<&AirlineInfo> = self
            .entries
            .iter()
            .filter(|a| seen.insert((a.name.as_str(), a.country.as_str())))
            .collect();
        airlines.sort_by(|a, b| a.name.cmp(&b.name));
        airlines
    }

    /// Substring search over name and code.
    pub fn search(&self, query: &str) -> Vec<&AirlineInfo> {
        let q = query.trim().to_lowercase();
        let mut hits: Vec<&AirlineInfo> = self
            .entries
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&q) || a.code.to_lowercase().contains(&q))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
