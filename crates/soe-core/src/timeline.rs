// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::flight::FlightRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Flights split into upcoming and past by calendar date.
///
/// A flight dated today counts as past. Upcoming flights are ordered soonest
/// first, past flights most recent first. Records without a usable date land
/// in `undated` in their original order.
#[derive(Debug, Clone, Default)]
pub struct Timeline<'a> {
    pub upcoming: Vec<&'a FlightRecord>,
    pub past: Vec<&'a FlightRecord>,
    pub undated: Vec<&'a FlightRecord>,
}

impl<'a> Timeline<'a> {
    pub fn build(flights: &'a [FlightRecord], today: NaiveDate) -> Self {
        let mut upcoming = Vec::new();
        let mut past = Vec::new();
        let mut undated = Vec::new();

        for flight in flights {
            match flight.calendar_date() {
                Some(date) if date > today => upcoming.push((date, flight)),
                Some(date) => past.push((date, flight)),
                None => undated.push(flight),
            }
        }

        // Stable sorts keep entry order for flights on the same day
        upcoming.sort_by_key(|(date, _)| *date);
        past.sort_by(|a, b| b.0.cmp(&a.0));

        Self {
            upcoming: upcoming.into_iter().map(|(_, f)| f).collect(),
            past: past.into_iter().map(|(_, f)| f).collect(),
            undated,
        }
    }

    /// Years that have past flights, newest first.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .past
            .iter()
            .filter_map(|f| f.calendar_date())
            .map(|d| d.year())
            .collect();
        years.into_iter().rev().collect()
    }

    pub fn past_in_year(&self, year: i32) -> Vec<&'a FlightRecord> {
        self.past
            .iter()
            .copied()
            .filter(|f| f.calendar_date().map(|d| d.year()) == Some(year))
            .collect()
    }

    pub fn next_flight(&self) -> Option<&'a FlightRecord> {
        self.upcoming.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(id: &str, date: &str) -> FlightRecord {
        FlightRecord {
            id: Some(id.into()),
            date: Some(date.into()),
            ..FlightRecord::between("DEL", "BOM")
        }
    }

    fn ids(flights: &[&FlightRecord]) -> Vec<String> {
        flights.iter().filter_map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_split_by_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let flights = vec![
            dated("a", "2024-05-31"),
            dated("b", "2024-06-01"),
            dated("c", "2024-06-02"),
            dated("d", "2025-01-10"),
            dated("e", "whenever"),
        ];
        let timeline = Timeline::build(&flights, today);

        assert_eq!(ids(&timeline.upcoming), vec!["c", "d"]);
        assert_eq!(ids(&timeline.past), vec!["b", "a"]);
        assert_eq!(ids(&timeline.undated), vec!["e"]);
        assert_eq!(timeline.next_flight().and_then(|f| f.id.as_deref()), Some("c"));
    }

    #[test]
    fn test_years_and_filter() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let flights = vec![
            dated("a", "2019-03-01"),
            dated("b", "2023-12-24T08:00:00Z"),
            dated("c", "2023-01-02"),
            dated("d", "2030-01-01"),
        ];
        let timeline = Timeline::build(&flights, today);

        assert_eq!(timeline.years(), vec![2023, 2019]);
        assert_eq!(ids(&timeline.past_in_year(2023)), vec!["b", "c"]);
        assert!(timeline.past_in_year(2030).is_empty());
    }

    #[test]
    fn test_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let timeline = Timeline::build(&[], today);
        assert!(timeline.years().is_empty());
        assert!(timeline.next_flight().is_none());
    }
}
