// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

//! Trip statistics derived from a flight list.
//!
//! Everything here is recomputed from scratch on each call: no caches, no
//! shared state. Data-quality problems in individual records (unknown
//! airports, missing codes, bad cached coordinates) reduce what a record
//! contributes but never fail the aggregation.

use crate::airports::{AirportInfo, AirportResolver};
use crate::flight::{FlightRecord, FlightStatus};
use crate::geo::{haversine_km, Coordinate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Whether `A→B` and `B→A` count as one route or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    #[default]
    Directional,
    Symmetric,
}

/// Airport pair identifying a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteKey {
    pub from: String,
    pub to: String,
}

impl RouteKey {
    /// In symmetric mode the pair is stored in lexical order.
    pub fn new(from: &str, to: &str, mode: RouteMode) -> Self {
        let (from, to) = match mode {
            RouteMode::Symmetric if to < from => (to, from),
            _ => (from, to),
        };
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Route counts go over the wire as `[{from, to, count}]`. Codes are free
/// text, so no joined string key survives every input.
mod route_list {
    use super::RouteKey;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize)]
    struct RouteCount {
        from: String,
        to: String,
        count: u32,
    }

    pub fn serialize<S>(
        routes: &BTreeMap<RouteKey, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        routes
            .iter()
            .map(|(key, count)| RouteCount {
                from: key.from.clone(),
                to: key.to.clone(),
                count: *count,
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<RouteKey, u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<RouteCount>::deserialize(deserializer)?;
        let mut routes = BTreeMap::new();
        for RouteCount { from, to, count } in list {
            *routes.entry(RouteKey { from, to }).or_insert(0) += count;
        }
        Ok(routes)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOptions {
    pub route_mode: RouteMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub upcoming: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    fn record(&mut self, status: FlightStatus) {
        match status {
            FlightStatus::Upcoming => self.upcoming += 1,
            FlightStatus::Completed => self.completed += 1,
            FlightStatus::Cancelled => self.cancelled += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripStats {
    pub total_flights: usize,
    pub unique_airlines: usize,
    pub unique_airports: usize,
    pub unique_countries: usize,
    pub total_distance_km: f64,
    /// Visited countries, sorted.
    pub countries: Vec<String>,
    /// Every airport code seen, sorted. Includes unresolved codes.
    pub airports: Vec<String>,
    #[serde(with = "route_list")]
    pub routes: BTreeMap<RouteKey, u32>,
    pub status: StatusCounts,
    /// Codes that had no reference entry. Their distance/country share is omitted.
    pub unresolved_airports: Vec<String>,
    /// Indices of records without both endpoint codes.
    pub malformed_records: Vec<usize>,
}

impl TripStats {
    /// Distance rounded to whole kilometers, for display.
    pub fn rounded_distance_km(&self) -> u64 {
        self.total_distance_km.round() as u64
    }

    /// Routes ordered by descending frequency.
    pub fn top_routes(&self, limit: usize) -> Vec<(&RouteKey, u32)> {
        let mut routes: Vec<(&RouteKey, u32)> =
            self.routes.iter().map(|(k, v)| (k, *v)).collect();
        routes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        routes.truncate(limit);
        routes
    }
}

/// Folds a flight list into [`TripStats`].
pub fn aggregate<R>(flights: &[FlightRecord], resolver: &R, options: &AggregateOptions) -> TripStats
where
    R: AirportResolver + ?Sized,
{
    let mut airlines = HashSet::new();
    let mut airports = BTreeSet::new();
    let mut countries = BTreeSet::new();
    let mut unresolved = BTreeSet::new();
    let mut routes = BTreeMap::new();
    let mut malformed = Vec::new();
    let mut status = StatusCounts::default();
    let mut total_distance_km = 0.0;

    for (index, flight) in flights.iter().enumerate() {
        status.record(flight.status);

        if let Some(key) = flight.airline_key() {
            airlines.insert(key);
        }

        let (Some(from), Some(to)) = (flight.departure(), flight.arrival()) else {
            log::debug!("Record #{} has no complete route; counted only", index);
            malformed.push(index);
            continue;
        };

        let dep = resolver.resolve(&from);
        let arr = resolver.resolve(&to);

        for (code, info) in [(&from, dep), (&to, arr)] {
            match info {
                Some(airport) => {
                    let country = crate::countries::display_name(&airport.country);
                    if !country.is_empty() {
                        countries.insert(country);
                    }
                }
                None => {
                    unresolved.insert(code.clone());
                }
            }
        }

        if let Some(km) = leg_distance(flight, dep, arr) {
            total_distance_km += km;
        }

        *routes
            .entry(RouteKey::new(&from, &to, options.route_mode))
            .or_insert(0u32) += 1;

        airports.insert(from);
        airports.insert(to);
    }

    if !unresolved.is_empty() {
        log::debug!(
            "{} airport codes could not be resolved: {:?}",
            unresolved.len(),
            unresolved
        );
    }

    TripStats {
        total_flights: flights.len(),
        unique_airlines: airlines.len(),
        unique_airports: airports.len(),
        unique_countries: countries.len(),
        total_distance_km,
        countries: countries.into_iter().collect(),
        airports: airports.into_iter().collect(),
        routes,
        status,
        unresolved_airports: unresolved.into_iter().collect(),
        malformed_records: malformed,
    }
}

/// Great-circle length of a single flight, if both ends can be placed.
pub fn flight_distance_km<R>(flight: &FlightRecord, resolver: &R) -> Option<f64>
where
    R: AirportResolver + ?Sized,
{
    let dep = flight.departure().and_then(|c| resolver.resolve(&c));
    let arr = flight.arrival().and_then(|c| resolver.resolve(&c));
    leg_distance(flight, dep, arr)
}

/// Cached coordinates on the record win over a lookup; invalid cached values
/// fall back to the resolved airports.
fn leg_distance(
    flight: &FlightRecord,
    dep: Option<&AirportInfo>,
    arr: Option<&AirportInfo>,
) -> Option<f64> {
    let cached = flight.cached_coordinates();
    let valid_cached = cached.filter(|(a, b)| a.is_valid() && b.is_valid());
    if cached.is_some() && valid_cached.is_none() {
        log::warn!(
            "Ignoring invalid cached coordinates on {}",
            flight.route_label()
        );
    }

    let (from, to): (Coordinate, Coordinate) = match valid_cached {
        Some(pair) => pair,
        None => (dep?.coordinate(), arr?.coordinate()),
    };

    match haversine_km(from, to) {
        Ok(km) => Some(km),
        Err(e) => {
            log::warn!("No distance for {}: {}", flight.route_label(), e);
            None
        }
    }
}
