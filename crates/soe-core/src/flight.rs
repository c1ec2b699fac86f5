// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use crate::geo::Coordinate;
use crate::normalize_code;
use chrono::NaiveDate;
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::{satisfy, space0},
    combinator::{all_consuming, opt, verify},
    sequence::tuple,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Upcoming,
    #[default]
    Completed,
    Cancelled,
}

impl FlightStatus {
    /// Maps loose status strings (including flight-tracker wording such as
    /// "landed" or "scheduled") onto a status. Unknown values are treated as
    /// completed, which is what imported history almost always is.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "upcoming" | "scheduled" | "active" | "departed" | "delayed" | "on time" => {
                FlightStatus::Upcoming
            }
            "cancelled" | "canceled" => FlightStatus::Cancelled,
            _ => FlightStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Upcoming => "upcoming",
            FlightStatus::Completed => "completed",
            FlightStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlightError {
    #[error("Unknown flight status: {0}")]
    UnknownStatus(String),
    #[error("Invalid flight designator: {0}")]
    InvalidDesignator(String),
}

impl FromStr for FlightStatus {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(FlightStatus::Upcoming),
            "completed" => Ok(FlightStatus::Completed),
            "cancelled" => Ok(FlightStatus::Cancelled),
            other => Err(FlightError::UnknownStatus(other.to_string())),
        }
    }
}

/// One logged flight. Every field is optional: records come from manual
/// entry, CSV exports and lookups, and any of them may be incomplete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Calendar date, `YYYY-MM-DD` (a full timestamp is tolerated).
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
    pub status: FlightStatus,
    pub departure_lat: Option<f64>,
    pub departure_lon: Option<f64>,
    pub arrival_lat: Option<f64>,
    pub arrival_lon: Option<f64>,
}

impl FlightRecord {
    /// A bare record between two airports; handy for tests and quick entry.
    pub fn between(from: &str, to: &str) -> Self {
        Self {
            departure_code: Some(from.to_string()),
            arrival_code: Some(to.to_string()),
            ..Default::default()
        }
    }

    pub fn departure(&self) -> Option<String> {
        self.departure_code.as_deref().and_then(normalize_code)
    }

    pub fn arrival(&self) -> Option<String> {
        self.arrival_code.as_deref().and_then(normalize_code)
    }

    /// Key used to count distinct carriers: the normalized code when present,
    /// otherwise the trimmed, lowercased display name.
    pub fn airline_key(&self) -> Option<String> {
        if let Some(code) = self.airline_code.as_deref().and_then(normalize_code) {
            return Some(code);
        }
        let name = self.airline_name.as_deref()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_lowercase())
        }
    }

    /// Endpoint coordinates stored on the record itself, when all four are set.
    pub fn cached_coordinates(&self) -> Option<(Coordinate, Coordinate)> {
        match (
            self.departure_lat,
            self.departure_lon,
            self.arrival_lat,
            self.arrival_lon,
        ) {
            (Some(dlat), Some(dlon), Some(alat), Some(alon)) => Some((
                Coordinate {
                    lat: dlat,
                    lon: dlon,
                },
                Coordinate {
                    lat: alat,
                    lon: alon,
                },
            )),
            _ => None,
        }
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self.date.as_deref()?)
    }

    pub fn designator(&self) -> Option<FlightDesignator> {
        let number = self.flight_number.as_deref()?.trim();
        match self.airline_code.as_deref().and_then(normalize_code) {
            Some(airline) if !number.to_uppercase().starts_with(&airline) => {
                FlightDesignator::parse(&format!("{}{}", airline, number)).ok()
            }
            _ => FlightDesignator::parse(number).ok(),
        }
    }

    /// "From → To" label, with `?` for a missing side.
    pub fn route_label(&self) -> String {
        format!(
            "{} → {}",
            self.departure().unwrap_or_else(|| "?".to_string()),
            self.arrival().unwrap_or_else(|| "?".to_string())
        )
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// A marketing flight designator such as `6E2263` or `UAL 1234`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDesignator {
    pub airline: String,
    pub number: String,
    pub suffix: Option<char>,
}

fn icao_airline(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, |c: char| c.is_ascii_alphabetic())(input)
}

fn iata_airline(input: &str) -> IResult<&str, &str> {
    verify(
        take_while_m_n(2, 2, |c: char| c.is_ascii_alphanumeric()),
        |s: &str| s.chars().any(|c| c.is_ascii_alphabetic()),
    )(input)
}

fn flight_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 4, |c: char| c.is_ascii_digit())(input)
}

fn designator(input: &str) -> IResult<&str, (&str, &str, &str, Option<char>)> {
    all_consuming(tuple((
        alt((icao_airline, iata_airline)),
        space0,
        flight_digits,
        opt(satisfy(|c| c.is_ascii_alphabetic())),
    )))(input)
}

impl FlightDesignator {
    pub fn parse(input: &str) -> Result<Self, FlightError> {
        let upper = input.trim().to_uppercase();
        match designator(&upper) {
            Ok((_, (airline, _, number, suffix))) => Ok(Self {
                airline: airline.to_string(),
                number: number.to_string(),
                suffix,
            }),
            Err(_) => Err(FlightError::InvalidDesignator(input.to_string())),
        }
    }
}

impl fmt::Display for FlightDesignator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.airline, self.number)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix)?;
        }
        Ok(())
    }
}
