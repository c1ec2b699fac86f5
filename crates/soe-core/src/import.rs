// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

//! Flight history CSV import and export.
//!
//! Import understands Flighty exports and our own export format. Header
//! names are matched case-insensitively against a list of aliases, so column
//! order and spelling (`Flight Number`, `flight_number`, `Flight`) do not
//! matter. Rows that cannot become a usable flight are reported, not fatal.

use crate::flight::{parse_calendar_date, FlightDesignator, FlightRecord, FlightStatus};
use crate::normalize_code;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV header has no '{0}' column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub flights: Vec<FlightRecord>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Id,
    Date,
    Airline,
    AirlineCode,
    AirlineName,
    Flight,
    From,
    To,
    DepartureTime,
    ArrivalTime,
    DepartureTerminal,
    ArrivalTerminal,
    Aircraft,
    Status,
    Canceled,
    DepartureLat,
    DepartureLon,
    ArrivalLat,
    ArrivalLon,
}

const COLUMN_ALIASES: &[(Column, &[&str])] = &[
    (Column::Id, &["id"]),
    (Column::Date, &["date", "flight date"]),
    (Column::Airline, &["airline"]),
    (Column::AirlineCode, &["airline code", "carrier code"]),
    (Column::AirlineName, &["airline name", "carrier"]),
    (Column::Flight, &["flight", "flight number", "flight no", "flight no."]),
    (Column::From, &["from", "departure", "departure code", "origin"]),
    (Column::To, &["to", "arrival", "arrival code", "destination"]),
    (
        Column::DepartureTime,
        &["departure time", "dep time", "gate departure (scheduled)"],
    ),
    (
        Column::ArrivalTime,
        &["arrival time", "arr time", "gate arrival (scheduled)"],
    ),
    (Column::DepartureTerminal, &["departure terminal", "dep terminal"]),
    (Column::ArrivalTerminal, &["arrival terminal", "arr terminal"]),
    (
        Column::Aircraft,
        &["aircraft type", "aircraft type name", "aircraft"],
    ),
    (Column::Status, &["status"]),
    (Column::Canceled, &["canceled", "cancelled"]),
    (Column::DepartureLat, &["departure lat"]),
    (Column::DepartureLon, &["departure lon"]),
    (Column::ArrivalLat, &["arrival lat"]),
    (Column::ArrivalLon, &["arrival lon"]),
];

const EXPORT_HEADER: [&str; 17] = [
    "id",
    "date",
    "airline_code",
    "airline_name",
    "flight_number",
    "departure_code",
    "arrival_code",
    "departure_time",
    "arrival_time",
    "departure_terminal",
    "arrival_terminal",
    "aircraft_type",
    "status",
    "departure_lat",
    "departure_lon",
    "arrival_lat",
    "arrival_lon",
];

fn time_pattern() -> Option<&'static Regex> {
    static TIME: OnceLock<Option<Regex>> = OnceLock::new();
    TIME.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").ok()).as_ref()
}

fn airline_code_pattern() -> Option<&'static Regex> {
    static CODE: OnceLock<Option<Regex>> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{2,3}$").ok()).as_ref()
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace('_', " ")
}

/// First header position for every known column.
fn map_columns(headers: &csv::StringRecord) -> HashMap<Column, usize> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut columns = HashMap::new();
    for (column, aliases) in COLUMN_ALIASES {
        if let Some(index) = normalized
            .iter()
            .position(|h| aliases.contains(&h.as_str()))
        {
            columns.insert(*column, index);
        }
    }
    columns
}

/// Reduces `07:05`, `7:05 PM` or `2019-05-12T07:05:00` to 24-hour `HH:MM`.
pub fn normalize_time(value: &str) -> Option<String> {
    let caps = time_pattern()?.captures(value)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    let lower = value.to_lowercase();
    if lower.ends_with("pm") && hour < 12 {
        hour += 12;
    } else if lower.ends_with("am") && hour == 12 {
        hour = 0;
    }
    Some(format!("{:02}:{:02}", hour, minute))
}

/// `YYYY-MM-DD`, with or without a time part, or `YYYY/MM/DD`.
fn normalize_date(value: &str) -> Option<NaiveDate> {
    parse_calendar_date(value).or_else(|| {
        let head = value.trim().get(..10)?;
        NaiveDate::parse_from_str(head, "%Y/%m/%d").ok()
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<Column, usize>,
}

impl<'a> Row<'a> {
    fn get(&self, column: Column) -> Option<&'a str> {
        let value = self.record.get(*self.columns.get(&column)?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn owned(&self, column: Column) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn number(&self, column: Column) -> Option<f64> {
        self.get(column)?.parse().ok()
    }
}

fn row_to_flight(row: &Row<'_>) -> Result<FlightRecord, String> {
    let date = row
        .get(Column::Date)
        .and_then(normalize_date)
        .ok_or_else(|| "missing or unreadable date".to_string())?;
    let departure = row
        .get(Column::From)
        .and_then(normalize_code)
        .ok_or_else(|| "missing departure airport".to_string())?;
    let arrival = row
        .get(Column::To)
        .and_then(normalize_code)
        .ok_or_else(|| "missing arrival airport".to_string())?;

    let mut airline_code = row.get(Column::AirlineCode).and_then(normalize_code);
    let mut airline_name = row.owned(Column::AirlineName);

    // A bare "Airline" column holds either a designator or a display name
    if let Some(airline) = row.get(Column::Airline) {
        if airline_code_pattern().is_some_and(|re| re.is_match(airline)) {
            airline_code = airline_code.or_else(|| normalize_code(airline));
        } else if airline_name.is_none() {
            airline_name = Some(airline.to_string());
        }
    }

    let mut flight_number = row.owned(Column::Flight);
    if let Some(designator) = flight_number
        .as_deref()
        .and_then(|f| FlightDesignator::parse(f).ok())
    {
        let same_airline = airline_code
            .as_deref()
            .map_or(true, |code| code == designator.airline);
        if same_airline {
            airline_code.get_or_insert_with(|| designator.airline.clone());
            let mut number = designator.number.clone();
            if let Some(suffix) = designator.suffix {
                number.push(suffix);
            }
            flight_number = Some(number);
        }
    }

    let mut status = row
        .get(Column::Status)
        .map(FlightStatus::parse_lenient)
        .unwrap_or_default();
    if row.get(Column::Canceled).is_some_and(is_truthy) {
        status = FlightStatus::Cancelled;
    }

    Ok(FlightRecord {
        id: row.owned(Column::Id),
        date: Some(date.format("%Y-%m-%d").to_string()),
        airline_code,
        airline_name,
        flight_number,
        departure_code: Some(departure),
        arrival_code: Some(arrival),
        departure_time: row.get(Column::DepartureTime).and_then(normalize_time),
        arrival_time: row.get(Column::ArrivalTime).and_then(normalize_time),
        departure_terminal: row.owned(Column::DepartureTerminal),
        arrival_terminal: row.owned(Column::ArrivalTerminal),
        aircraft_type: row.owned(Column::Aircraft),
        status,
        departure_lat: row.number(Column::DepartureLat),
        departure_lon: row.number(Column::DepartureLon),
        arrival_lat: row.number(Column::ArrivalLat),
        arrival_lon: row.number(Column::ArrivalLon),
    })
}

pub fn import_csv<R: Read>(reader: R) -> Result<ImportReport, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = map_columns(rdr.headers()?);
    for (column, name) in [
        (Column::Date, "date"),
        (Column::From, "from"),
        (Column::To, "to"),
    ] {
        if !columns.contains_key(&column) {
            return Err(ImportError::MissingColumn(name));
        }
    }

    let mut report = ImportReport::default();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let row = Row {
            record: &record,
            columns: &columns,
        };
        match row_to_flight(&row) {
            Ok(flight) => report.flights.push(flight),
            Err(reason) => {
                log::debug!("Skipping CSV line {}: {}", line, reason);
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    log::info!(
        "Imported {} flights ({} rows skipped)",
        report.flights.len(),
        report.skipped.len()
    );
    Ok(report)
}

pub fn import_file<P: AsRef<Path>>(path: P) -> Result<ImportReport, ImportError> {
    import_csv(File::open(path)?)
}

fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes flights in the format `import_csv` reads back.
pub fn export_csv<W: Write>(writer: W, flights: &[FlightRecord]) -> Result<(), ImportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;

    for f in flights {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        wtr.write_record([
            text(&f.id),
            text(&f.date),
            text(&f.airline_code),
            text(&f.airline_name),
            text(&f.flight_number),
            text(&f.departure_code),
            text(&f.arrival_code),
            text(&f.departure_time),
            text(&f.arrival_time),
            text(&f.departure_terminal),
            text(&f.arrival_terminal),
            text(&f.aircraft_type),
            f.status.to_string(),
            opt_number(f.departure_lat),
            opt_number(f.departure_lon),
            opt_number(f.arrival_lat),
            opt_number(f.arrival_lon),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
