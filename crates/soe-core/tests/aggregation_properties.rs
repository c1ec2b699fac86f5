use soe_core::airports::{AirportInfo, AirportTable};
use soe_core::geo::{distance_km, MAX_DISTANCE_KM};
use soe_core::stats::{aggregate, AggregateOptions, RouteKey, RouteMode, TripStats};
use soe_core::{AirportResolver, FlightRecord};

fn flight(from: &str, to: &str, airline: &str) -> FlightRecord {
    FlightRecord {
        airline_code: Some(airline.into()),
        ..FlightRecord::between(from, to)
    }
}

fn sample_history() -> Vec<FlightRecord> {
    vec![
        flight("DEL", "BOM", "6E"),
        flight("BOM", "DXB", "EK"),
        flight("DXB", "LHR", "EK"),
        flight("LHR", "EWR", "BA"),
        flight("EWR", "ATL", "UA"),
        flight("ATL", "CDG", "DL"),
        flight("CDG", "SIN", "AF"),
        flight("SIN", "DEL", "SQ"),
        flight("ZZZ", "DEL", "AI"),
    ]
}

// ============================================================================
// Distance
// ============================================================================

#[test]
fn test_distance_symmetry_over_bundled_airports() {
    let table = AirportTable::bundled();
    let airports: Vec<&AirportInfo> = table.iter().collect();

    for a in &airports {
        for b in &airports {
            let there = distance_km(a.lat, a.lon, b.lat, b.lon).unwrap();
            let back = distance_km(b.lat, b.lon, a.lat, a.lon).unwrap();
            assert!((there - back).abs() < 1e-6, "{}-{}", a.code, b.code);
            assert!(there <= MAX_DISTANCE_KM + 1e-9);
        }
        assert_eq!(distance_km(a.lat, a.lon, a.lat, a.lon).unwrap(), 0.0);
    }
}

// ============================================================================
// Aggregation scenarios
// ============================================================================

#[test]
fn test_delhi_mumbai_return_trip() {
    let flights = vec![flight("DEL", "BOM", "6E"), flight("BOM", "DEL", "6E")];
    let stats = aggregate(&flights, AirportTable::bundled(), &AggregateOptions::default());

    assert_eq!(stats.total_flights, 2);
    assert_eq!(stats.unique_airports, 2);
    assert!((stats.total_distance_km - 2274.1).abs() < 1.0);
    assert_eq!(stats.routes.len(), 2);
    assert!(stats.routes.values().all(|count| *count == 1));
    assert_eq!(stats.countries, vec!["India".to_string()]);
}

#[test]
fn test_unknown_departure_degrades_gracefully() {
    let flights = vec![flight("ZZZ", "DEL", "AI")];
    let stats = aggregate(&flights, AirportTable::bundled(), &AggregateOptions::default());

    assert_eq!(stats.total_flights, 1);
    assert_eq!(stats.unique_airports, 2);
    assert_eq!(stats.total_distance_km, 0.0);
    assert_eq!(stats.unique_countries, 1);
    assert_eq!(stats.unresolved_airports, vec!["ZZZ".to_string()]);
}

#[test]
fn test_aggregation_is_idempotent() {
    let flights = sample_history();
    let options = AggregateOptions::default();
    let first = aggregate(&flights, AirportTable::bundled(), &options);
    let second = aggregate(&flights, AirportTable::bundled(), &options);
    assert_eq!(first, second);
}

#[test]
fn test_aggregation_is_monotonic() {
    let flights = sample_history();
    let table = AirportTable::bundled();
    let options = AggregateOptions::default();

    let mut previous = TripStats::default();
    for n in 1..=flights.len() {
        let stats = aggregate(&flights[..n], table, &options);
        assert_eq!(stats.total_flights, previous.total_flights + 1);
        assert!(stats.unique_airlines >= previous.unique_airlines);
        assert!(stats.unique_airports >= previous.unique_airports);
        assert!(stats.unique_countries >= previous.unique_countries);
        assert!(stats.total_distance_km >= previous.total_distance_km);
        previous = stats;
    }
}

#[test]
fn test_around_the_world() {
    let stats = aggregate(
        &sample_history(),
        AirportTable::bundled(),
        &AggregateOptions::default(),
    );

    assert_eq!(stats.total_flights, 9);
    assert_eq!(stats.unique_airlines, 8);
    assert_eq!(stats.unique_airports, 9);
    // India, UAE, UK, USA, France, Singapore
    assert_eq!(stats.unique_countries, 6);
    assert!(stats.total_distance_km > 35_000.0);
    assert!(stats.total_distance_km < 45_000.0);
}

#[test]
fn test_symmetric_mode_folds_return_legs() {
    let flights = vec![
        flight("DEL", "BOM", "6E"),
        flight("BOM", "DEL", "6E"),
        flight("DEL", "BOM", "AI"),
    ];
    let options = AggregateOptions {
        route_mode: RouteMode::Symmetric,
    };
    let stats = aggregate(&flights, AirportTable::bundled(), &options);
    assert_eq!(stats.routes.len(), 1);
    assert_eq!(
        stats.routes.get(&RouteKey::new("DEL", "BOM", RouteMode::Symmetric)),
        Some(&3)
    );
}

#[test]
fn test_custom_table_overrides_bundled() {
    let mut table = AirportTable::from_entries(vec![AirportInfo {
        code: "ZZZ".into(),
        lat: 28.0,
        lon: 77.0,
        city: "Somewhere".into(),
        country: "India".into(),
    }]);
    table.fill_from(AirportTable::bundled());
    assert!(table.resolve("DEL").is_some());

    let stats = aggregate(
        &[flight("ZZZ", "DEL", "AI")],
        &table,
        &AggregateOptions::default(),
    );
    assert!(stats.total_distance_km > 0.0);
    assert!(stats.unresolved_airports.is_empty());
}

// ============================================================================
// Mixed airport sources
// ============================================================================

const OURAIRPORTS_ROWS: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,gps_code,iata_code,local_code
26556,VICG,medium_airport,Chandigarh International Airport,30.6735,76.788498,1012,AS,IN,IN-CH,Chandigarh,yes,VICG,IXC,
3384,KJFK,large_airport,John F Kennedy International Airport,40.639447,-73.779317,13,NA,US,US-NY,New York,yes,KJFK,JFK,
";

fn bundled_with_csv() -> AirportTable {
    let extra = AirportTable::from_csv_reader(OURAIRPORTS_ROWS.as_bytes()).unwrap();
    let mut table = AirportTable::bundled().clone();
    table.fill_from(&extra);
    table
}

#[test]
fn test_country_counted_once_across_sources() {
    let table = bundled_with_csv();
    let flights = vec![
        flight("DEL", "IXC", "6E"),
        flight("EWR", "JFK", "UA"),
    ];
    let stats = aggregate(&flights, &table, &AggregateOptions::default());

    assert_eq!(stats.unique_countries, 2);
    assert_eq!(stats.countries, vec!["India".to_string(), "USA".to_string()]);
    assert!(stats.unresolved_airports.is_empty());
}
