// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;
use std::path::PathBuf;

use soe_core::airlines::AirlineDirectory;
use soe_core::countries::home_first;
use soe_core::flight::FlightDesignator;
use soe_core::geo::haversine_km;
use soe_core::import::{export_csv, import_file};
use soe_core::logbook::{FlightLog, FlightPatch, LogbookStore};
use soe_core::routes::{arcs, summarize};
use soe_core::settings::{Settings, SettingsManager};
use soe_core::stamps::earned_stamps;
use soe_core::stats::{aggregate, AggregateOptions, RouteMode};
use soe_core::timeline::Timeline;
use soe_core::{AirportResolver, AirportTable, FlightRecord, FlightStatus};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Flight log file (defaults to flights.json in the config directory)
    #[arg(short, long, env = "SOE_LOGBOOK")]
    logbook: Option<PathBuf>,

    /// OurAirports-style airports.csv to extend the bundled airport list
    #[arg(short, long, env = "SOE_AIRPORTS")]
    airports: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Treat A→B and B→A as the same route
    #[arg(long, global = true)]
    symmetric: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Travel statistics for the logged flights
    Stats {
        /// Only flights in this calendar year
        #[arg(long)]
        year: Option<i32>,
        /// Leave out flights that have not happened yet
        #[arg(long)]
        past: bool,
    },
    /// Route frequencies and map nodes
    Routes {
        /// Emit globe arcs instead of legs
        #[arg(long)]
        arcs: bool,
    },
    /// Great-circle distance between two airports
    Distance { from: String, to: String },
    /// Look up an airport by code
    Airport { code: String },
    /// Search airlines by name or code
    Airline { query: String },
    /// List logged flights
    List {
        #[arg(long, conflicts_with = "past")]
        upcoming: bool,
        #[arg(long)]
        past: bool,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Log a flight
    Add {
        from: String,
        to: String,
        /// Flight date, YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Designator such as 6E2263 or "AI 670"
        #[arg(short, long)]
        flight: Option<String>,
        /// Airline code or name
        #[arg(long)]
        airline: Option<String>,
        #[arg(long)]
        departure_time: Option<String>,
        #[arg(long)]
        arrival_time: Option<String>,
        #[arg(long)]
        aircraft: Option<String>,
        /// upcoming, completed or cancelled
        #[arg(long)]
        status: Option<FlightStatus>,
    },
    /// Change fields of a logged flight
    Edit {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        status: Option<FlightStatus>,
        #[arg(long)]
        aircraft: Option<String>,
    },
    /// Delete a logged flight
    Remove { id: String },
    /// Import a flight history CSV
    Import {
        csv: PathBuf,
        /// Only import into an empty log
        #[arg(long)]
        default: bool,
    },
    /// Export the log as CSV
    Export { csv: PathBuf },
    /// Country stamps earned so far
    Stamps,
    /// Totals across several users' flight logs
    Admin {
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },
}

fn init_logging(verbose: u8, settings: &Settings) {
    let level = match verbose {
        0 => settings.log_level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn load_airports(path: Option<&PathBuf>) -> Result<AirportTable> {
    let mut table = AirportTable::bundled().clone();
    if let Some(path) = path {
        let extra = AirportTable::load_csv(path)
            .with_context(|| format!("Failed to load airports from {}", path.display()))?;
        table.fill_from(&extra);
    }
    Ok(table)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_flight(flight: &FlightRecord) {
    let designator = flight
        .designator()
        .map(|d| d.to_string())
        .or_else(|| flight.flight_number.clone())
        .unwrap_or_default();
    println!(
        "{:<36} {:<10} {:<8} {:<14} {}",
        flight.id.as_deref().unwrap_or("-"),
        flight.date.as_deref().unwrap_or("----------"),
        designator,
        flight.route_label(),
        flight.status
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = SettingsManager::new().load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable settings: {:#}", e);
        Settings::default()
    });
    init_logging(cli.verbose, &settings);

    let logbook_path = cli
        .logbook
        .clone()
        .unwrap_or_else(|| settings.logbook_path());
    let store = LogbookStore::new(&logbook_path);
    let airports_csv = cli.airports.as_ref().or(settings.airports_csv.as_ref());
    let options = AggregateOptions {
        route_mode: if cli.symmetric {
            RouteMode::Symmetric
        } else {
            settings.route_mode
        },
    };
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Stats { year, past } => {
            let table = load_airports(airports_csv)?;
            let log = store.load()?;
            let flights: Vec<FlightRecord> = log
                .flights
                .iter()
                .filter(|f| !past || f.calendar_date().is_some_and(|d| d <= today))
                .filter(|f| year.is_none() || f.calendar_date().map(|d| d.year()) == year)
                .cloned()
                .collect();

            let mut stats = aggregate(&flights, &table, &options);
            if let Some(home) = &settings.home_country {
                home_first(&mut stats.countries, home, |c| c.as_str());
            }
            if cli.json {
                return print_json(&stats);
            }

            println!("Flights:   {}", stats.total_flights);
            println!("Airlines:  {}", stats.unique_airlines);
            println!("Airports:  {}", stats.unique_airports);
            println!("Countries: {}", stats.unique_countries);
            println!("Distance:  {} km", stats.rounded_distance_km());
            println!(
                "Status:    {} completed, {} upcoming, {} cancelled",
                stats.status.completed, stats.status.upcoming, stats.status.cancelled
            );
            if !stats.countries.is_empty() {
                println!("Visited:   {}", stats.countries.join(", "));
            }
            for (route, count) in stats.top_routes(5) {
                println!("  {:<10} x{}", route.to_string(), count);
            }
            if !stats.unresolved_airports.is_empty() {
                println!(
                    "Unknown airports (no distance): {}",
                    stats.unresolved_airports.join(", ")
                );
            }
        }
        Commands::Routes { arcs: as_arcs } => {
            let table = load_airports(airports_csv)?;
            let log = store.load()?;
            let stats = aggregate(&log.flights, &table, &options);
            let summary = summarize(&stats.routes, &table);

            if as_arcs {
                let arcs = arcs(&summary);
                if cli.json {
                    return print_json(&arcs);
                }
                for arc in arcs {
                    println!(
                        "{}-{} {:>8.0} km  alt {:.2}  x{}",
                        arc.from, arc.to, arc.distance_km, arc.altitude, arc.count
                    );
                }
            } else {
                if cli.json {
                    return print_json(&summary);
                }
                for leg in &summary.legs {
                    println!("{}-{} x{}", leg.from, leg.to, leg.count);
                }
                println!("{} airports on the map", summary.nodes.len());
                for node in &summary.nodes {
                    let (x, y) = node.mercator();
                    println!(
                        "  {:<5} {:<20} {:<14} map ({:.3}, {:.3})",
                        node.code, node.city, node.country, x, y
                    );
                }
            }
        }
        Commands::Distance { from, to } => {
            let table = load_airports(airports_csv)?;
            let a = table
                .resolve(&from)
                .ok_or_else(|| anyhow!("Unknown airport '{}'", from))?;
            let b = table
                .resolve(&to)
                .ok_or_else(|| anyhow!("Unknown airport '{}'", to))?;
            let km = haversine_km(a.coordinate(), b.coordinate())?;
            if cli.json {
                return print_json(&serde_json::json!({
                    "from": a.code,
                    "to": b.code,
                    "distance_km": km,
                }));
            }
            println!("{} → {}: {:.0} km", a.code, b.code, km);
        }
        Commands::Airport { code } => {
            let table = load_airports(airports_csv)?;
            let airport = table
                .resolve(&code)
                .ok_or_else(|| anyhow!("Unknown airport '{}'", code))?;
            if cli.json {
                return print_json(airport);
            }
            println!(
                "{}  {}, {}  ({:.4}, {:.4})",
                airport.code, airport.city, airport.country, airport.lat, airport.lon
            );
        }
        Commands::Airline { query } => {
            let hits = AirlineDirectory::bundled().search(&query);
            if cli.json {
                return print_json(&hits);
            }
            if hits.is_empty() {
                println!("No airline matching '{}'", query);
            }
            for airline in hits {
                println!("{:<3} {:<32} {}", airline.code, airline.name, airline.country);
            }
        }
        Commands::List {
            upcoming,
            past,
            year,
        } => {
            let log = store.load()?;
            let timeline = Timeline::build(&log.flights, today);
            let flights: Vec<&FlightRecord> = if upcoming {
                timeline.upcoming.clone()
            } else if let Some(year) = year {
                timeline.past_in_year(year)
            } else if past {
                timeline.past.clone()
            } else {
                log.sorted_by_date()
            };

            if cli.json {
                return print_json(&flights);
            }
            for flight in &flights {
                print_flight(flight);
            }
            println!("{} flights", flights.len());
        }
        Commands::Add {
            from,
            to,
            date,
            flight,
            airline,
            departure_time,
            arrival_time,
            aircraft,
            status,
        } => {
            let calendar_date = soe_core::flight::parse_calendar_date(&date)
                .ok_or_else(|| anyhow!("Date must be YYYY-MM-DD, got '{}'", date))?;

            let mut record = FlightRecord {
                date: Some(calendar_date.format("%Y-%m-%d").to_string()),
                departure_time,
                arrival_time,
                aircraft_type: aircraft,
                status: status.unwrap_or(if calendar_date > today {
                    FlightStatus::Upcoming
                } else {
                    FlightStatus::Completed
                }),
                ..FlightRecord::between(&from, &to)
            };

            if let Some(flight) = flight {
                let designator = FlightDesignator::parse(&flight)?;
                record.airline_code = Some(designator.airline.clone());
                record.flight_number = Some(match designator.suffix {
                    Some(suffix) => format!("{}{}", designator.number, suffix),
                    None => designator.number.clone(),
                });
            }

            if let Some(airline) = airline {
                match AirlineDirectory::bundled().normalize(&airline) {
                    Some(info) => {
                        record.airline_code.get_or_insert_with(|| info.code.clone());
                        record.airline_name = Some(info.name.clone());
                    }
                    None => record.airline_name = Some(airline),
                }
            } else if let Some(code) = record.airline_code.as_deref() {
                record.airline_name = AirlineDirectory::bundled()
                    .by_code(code)
                    .map(|a| a.name.clone());
            }

            // Cache endpoint coordinates when both airports are known
            let table = load_airports(airports_csv)?;
            if let (Some(dep), Some(arr)) = (table.resolve(&from), table.resolve(&to)) {
                record.departure_lat = Some(dep.lat);
                record.departure_lon = Some(dep.lon);
                record.arrival_lat = Some(arr.lat);
                record.arrival_lon = Some(arr.lon);
            }

            let mut log = store.load()?;
            let id = log.add(record);
            store.save(&log)?;
            println!("Added flight {}", id);
        }
        Commands::Edit {
            id,
            date,
            from,
            to,
            status,
            aircraft,
        } => {
            let patch = FlightPatch {
                date,
                departure_code: from,
                arrival_code: to,
                status,
                aircraft_type: aircraft,
                ..Default::default()
            };
            let mut log = store.load()?;
            let updated = log
                .update(&id, &patch)
                .ok_or_else(|| anyhow!("No flight with id '{}'", id))?;
            print_flight(updated);
            store.save(&log)?;
        }
        Commands::Remove { id } => {
            let mut log = store.load()?;
            let removed = log
                .remove(&id)
                .ok_or_else(|| anyhow!("No flight with id '{}'", id))?;
            store.save(&log)?;
            println!("Removed {}", removed.route_label());
        }
        Commands::Import { csv, default } => {
            let report = import_file(&csv)
                .with_context(|| format!("Failed to import {}", csv.display()))?;
            for skipped in &report.skipped {
                log::warn!("Line {} skipped: {}", skipped.line, skipped.reason);
            }

            let mut log = store.load()?;
            let added = if default {
                log.import_default(report.flights)
            } else {
                log.add_all(report.flights)
            };
            if added > 0 {
                store.save(&log)?;
            }
            println!(
                "Imported {} flights ({} rows skipped), log now has {}",
                added,
                report.skipped.len(),
                log.len()
            );
        }
        Commands::Export { csv } => {
            let log = store.load()?;
            let file = File::create(&csv)
                .with_context(|| format!("Failed to create {}", csv.display()))?;
            export_csv(file, &log.sorted_by_date().into_iter().cloned().collect::<Vec<_>>())?;
            println!("Exported {} flights to {}", log.len(), csv.display());
        }
        Commands::Stamps => {
            let table = load_airports(airports_csv)?;
            let log = store.load()?;
            let stats = aggregate(&log.flights, &table, &options);
            let mut stamps = earned_stamps(&stats.countries);
            if let Some(home) = &settings.home_country {
                home_first(&mut stamps, home, |s| s.stamp.iso_code.as_str());
            }
            if cli.json {
                return print_json(&stamps);
            }

            let earned = stamps.iter().filter(|s| s.achieved).count();
            println!("{} of {} stamps", earned, stamps.len());
            for status in &stamps {
                let mark = if status.achieved { "[x]" } else { "[ ]" };
                println!("{} {} ({})", mark, status.stamp.name, status.stamp.iso_code);
            }
        }
        Commands::Admin { logs } => {
            let mut all = Vec::with_capacity(logs.len());
            for path in &logs {
                let user_log: FlightLog = LogbookStore::new(path)
                    .load()
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                all.push(user_log);
            }
            let totals = soe_core::admin::AdminStats::collect(&all);
            if cli.json {
                return print_json(&totals);
            }
            println!("Users:    {}", totals.total_users);
            println!("Flights:  {}", totals.total_flights);
            println!("Airlines: {}", totals.total_airlines);
            println!("Airports: {}", totals.total_airports);
        }
    }

    Ok(())
}
