// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SinceOnEarth contributors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Longest possible great-circle distance (half the circumference).
pub const MAX_DISTANCE_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting NaN, infinities and out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        let coord = Self { lat, lon };
        coord.validate()?;
        Ok(coord)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

/// Great-circle distance in kilometers using the Haversine formula.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> Result<f64, GeoError> {
    from.validate()?;
    to.validate()?;

    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    Ok(EARTH_RADIUS_KM * c)
}

/// Convenience wrapper over [`haversine_km`] for raw degree pairs.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, GeoError> {
    haversine_km(
        Coordinate {
            lat: lat1,
            lon: lon1,
        },
        Coordinate {
            lat: lat2,
            lon: lon2,
        },
    )
}

/// Returns the destination longitude shifted by ±360 when the route would
/// otherwise be drawn the long way round across the antimeridian.
pub fn unwrap_longitude(from_lon: f64, to_lon: f64) -> f64 {
    let diff = to_lon - from_lon;
    if diff.abs() > 180.0 {
        if diff > 0.0 {
            to_lon - 360.0
        } else {
            to_lon + 360.0
        }
    } else {
        to_lon
    }
}

/// Latitude where the square Web Mercator map ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Normalized Web Mercator position (0.0 to 1.0 on both axes). Latitudes
/// beyond [`MAX_MERCATOR_LAT`] land on the map edge.
pub fn mercator_normalized(lat: f64, lon: f64) -> (f32, f32) {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;
    (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEL: Coordinate = Coordinate {
        lat: 28.5562,
        lon: 77.1000,
    };
    const BOM: Coordinate = Coordinate {
        lat: 19.0896,
        lon: 72.8656,
    };

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(DEL, DEL).unwrap(), 0.0);
        let origin = Coordinate { lat: 0.0, lon: 0.0 };
        assert_eq!(haversine_km(origin, origin).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let there = haversine_km(DEL, BOM).unwrap();
        let back = haversine_km(BOM, DEL).unwrap();
        assert!((there - back).abs() < 1e-9);

        let lis = Coordinate {
            lat: 38.7813,
            lon: -9.1359,
        };
        let sin = Coordinate {
            lat: 1.3644,
            lon: 103.9915,
        };
        assert!((haversine_km(lis, sin).unwrap() - haversine_km(sin, lis).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_delhi_mumbai() {
        let d = haversine_km(DEL, BOM).unwrap();
        assert!((d - 1137.05).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_bound() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0).unwrap();
        assert!((d - MAX_DISTANCE_KM).abs() < 1e-6);
        assert!((d - 20015.0).abs() < 1.0);

        let poles = distance_km(90.0, 0.0, -90.0, 0.0).unwrap();
        assert!(poles <= MAX_DISTANCE_KM + 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(matches!(
            distance_km(f64::NAN, 0.0, 10.0, 10.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(distance_km(91.0, 0.0, 10.0, 10.0).is_err());
        assert!(distance_km(0.0, 0.0, 10.0, -180.5).is_err());
        assert!(distance_km(0.0, f64::INFINITY, 10.0, 10.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_unwrap_longitude() {
        // Tokyo -> San Francisco crosses the antimeridian eastbound
        assert!((unwrap_longitude(139.78, -122.38) - 237.62).abs() < 1e-9);
        assert!((unwrap_longitude(-122.38, 139.78) - -220.22).abs() < 1e-9);
        assert_eq!(unwrap_longitude(77.1, 72.8656), 72.8656);
    }

    #[test]
    fn test_mercator_center() {
        let (x, y) = mercator_normalized(0.0, 0.0);
        assert!((x - 0.5).abs() < 1e-6);
        assert!((y - 0.5).abs() < 1e-6);
        let (_, north) = mercator_normalized(60.0, 0.0);
        assert!(north < 0.5);
    }

    #[test]
    fn test_mercator_poles_stay_on_map() {
        let (x, top) = mercator_normalized(90.0, 180.0);
        let (_, bottom) = mercator_normalized(-90.0, -180.0);
        assert!(top.is_finite() && bottom.is_finite());
        assert!(top.abs() < 1e-4);
        assert!((bottom - 1.0).abs() < 1e-4);
        assert_eq!(x, 1.0);
    }
}
