// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

//! Map-ready route data: legs, airport nodes and globe arcs.

use crate::airports::AirportResolver;
use crate::geo::{haversine_km, mercator_normalized, unwrap_longitude, Coordinate};
use crate::stats::RouteKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const ARC_ALTITUDE_SCALE_KM: f64 = 20_000.0;
const MIN_ARC_ALTITUDE: f64 = 0.05;
const MAX_ARC_ALTITUDE: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub count: u32,
}

/// An airport placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportNode {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub country: String,
}

impl AirportNode {
    /// Flat-map position in `[0, 1]` on both axes.
    pub fn mercator(&self) -> (f32, f32) {
        mercator_normalized(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Sorted by descending count, then by route.
    pub legs: Vec<RouteLeg>,
    /// Resolvable airports used by any leg, sorted by code.
    pub nodes: Vec<AirportNode>,
}

impl RouteSummary {
    pub fn node(&self, code: &str) -> Option<&AirportNode> {
        self.nodes
            .binary_search_by(|n| n.code.as_str().cmp(code))
            .ok()
            .map(|i| &self.nodes[i])
    }
}

/// Arc drawn on a globe for one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapArc {
    pub from: String,
    pub to: String,
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    /// May lie outside `[-180, 180]` so the arc takes the short way round.
    pub end_lon: f64,
    pub distance_km: f64,
    pub altitude: f64,
    pub count: u32,
}

pub fn summarize<R>(routes: &BTreeMap<RouteKey, u32>, resolver: &R) -> RouteSummary
where
    R: AirportResolver + ?Sized,
{
    let mut legs: Vec<RouteLeg> = routes
        .iter()
        .map(|(key, count)| RouteLeg {
            from: key.from.clone(),
            to: key.to.clone(),
            count: *count,
        })
        .collect();
    legs.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });

    let codes: BTreeSet<&str> = routes
        .keys()
        .flat_map(|key| [key.from.as_str(), key.to.as_str()])
        .collect();

    let nodes = codes
        .into_iter()
        .filter_map(|code| resolver.resolve(code))
        .map(|airport| AirportNode {
            code: airport.code.clone(),
            lat: airport.lat,
            lon: airport.lon,
            city: airport.city.clone(),
            country: airport.country.clone(),
        })
        .collect();

    RouteSummary { legs, nodes }
}

/// Legs whose endpoints are both on the map, as globe arcs.
pub fn arcs(summary: &RouteSummary) -> Vec<MapArc> {
    summary
        .legs
        .iter()
        .filter_map(|leg| {
            let start = summary.node(&leg.from)?;
            let end = summary.node(&leg.to)?;
            let distance_km = match haversine_km(
                Coordinate {
                    lat: start.lat,
                    lon: start.lon,
                },
                Coordinate {
                    lat: end.lat,
                    lon: end.lon,
                },
            ) {
                Ok(km) => km,
                Err(e) => {
                    log::warn!("Dropping arc {}-{}: {}", leg.from, leg.to, e);
                    return None;
                }
            };

            Some(MapArc {
                from: leg.from.clone(),
                to: leg.to.clone(),
                start_lat: start.lat,
                start_lon: start.lon,
                end_lat: end.lat,
                end_lon: unwrap_longitude(start.lon, end.lon),
                distance_km,
                altitude: arc_altitude(distance_km),
                count: leg.count,
            })
        })
        .collect()
}

/// Longer flights get taller arcs, within fixed bounds.
pub fn arc_altitude(distance_km: f64) -> f64 {
    (distance_km / ARC_ALTITUDE_SCALE_KM).clamp(MIN_ARC_ALTITUDE, MAX_ARC_ALTITUDE)
}
