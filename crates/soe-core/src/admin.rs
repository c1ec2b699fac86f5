// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::logbook::FlightLog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Totals across every user's flight log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_flights: usize,
    pub total_airlines: usize,
    pub total_airports: usize,
}

#[derive(Default)]
struct Partial {
    flights: usize,
    airlines: HashSet<String>,
    airports: HashSet<String>,
}

impl Partial {
    fn from_log(flight_log: &FlightLog) -> Self {
        let mut partial = Partial {
            flights: flight_log.len(),
            ..Default::default()
        };
        for flight in &flight_log.flights {
            if let Some(key) = flight.airline_key() {
                partial.airlines.insert(key);
            }
            partial.airports.extend(flight.departure());
            partial.airports.extend(flight.arrival());
        }
        partial
    }

    fn merge(mut self, other: Partial) -> Self {
        self.flights += other.flights;
        self.airlines.extend(other.airlines);
        self.airports.extend(other.airports);
        self
    }
}

impl AdminStats {
    /// One log per user. Logs are folded in parallel.
    pub fn collect(logs: &[FlightLog]) -> Self {
        let merged = logs
            .par_iter()
            .map(Partial::from_log)
            .reduce(Partial::default, Partial::merge);

        Self {
            total_users: logs.len(),
            total_flights: merged.flights,
            total_airlines: merged.airlines.len(),
            total_airports: merged.airports.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::FlightRecord;

    fn flight(from: &str, to: &str, airline: &str) -> FlightRecord {
        FlightRecord {
            airline_code: Some(airline.into()),
            ..FlightRecord::between(from, to)
        }
    }

    #[test]
    fn test_totals_across_users() {
        let logs = vec![
            FlightLog::from_flights(vec![flight("DEL", "BOM", "6E"), flight("BOM", "DEL", "ai")]),
            FlightLog::from_flights(vec![flight("del", "HEL", "AY")]),
            FlightLog::default(),
        ];
        let stats = AdminStats::collect(&logs);
        assert_eq!(
            stats,
            AdminStats {
                total_users: 3,
                total_flights: 3,
                total_airlines: 3,
                total_airports: 3,
            }
        );
    }

    #[test]
    fn test_no_users() {
        assert_eq!(AdminStats::collect(&[]), AdminStats::default());
    }
}
