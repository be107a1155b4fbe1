use crate::error::AlertError;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Police station the distances are measured against when nothing else is configured.
pub const DEFAULT_STATION: Coordinates = Coordinates {
    lat: 14.5547,
    lon: 121.0244,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, AlertError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(AlertError::validation("lat and lon must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AlertError::validation(format!("lat {} out of range", lat)));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AlertError::validation(format!("lon {} out of range", lon)));
        }
        Ok(Self { lat, lon })
    }
}

/// A named area matched by independent lat/lon deltas (a box, not a circle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub range: f64,
}

impl Zone {
    pub fn new(name: &str, lat: f64, lon: f64, range: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            range,
        }
    }

    fn contains(&self, c: Coordinates) -> bool {
        (c.lat - self.lat).abs() < self.range && (c.lon - self.lon).abs() < self.range
    }
}

pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new("Barangay Rizal", 14.5547, 121.0244, 0.01),
        Zone::new("Barangay Pembo", 14.5500, 121.0500, 0.01),
        Zone::new("Barangay Comembo", 14.5400, 121.0400, 0.01),
        Zone::new("Barangay Fort Bonifacio", 14.5350, 121.0450, 0.01),
        Zone::new("Barangay Western Bicutan", 14.5200, 121.0350, 0.01),
    ]
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub location: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone)]
pub struct GeoResolver {
    zones: Vec<Zone>,
    station: Coordinates,
}

impl GeoResolver {
    pub fn new(zones: Vec<Zone>, station: Coordinates) -> Self {
        Self { zones, station }
    }

    /// First zone in table order wins, even when a later zone's center is closer.
    pub fn locate(&self, c: Coordinates) -> &str {
        self.zones
            .iter()
            .find(|zone| zone.contains(c))
            .map(|zone| zone.name.as_str())
            .unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn resolve(&self, c: Coordinates) -> Resolution {
        Resolution {
            location: self.locate(c).to_string(),
            distance_km: haversine_km(c, self.station),
        }
    }
}

impl Default for GeoResolver {
    fn default() -> Self {
        Self::new(default_zones(), DEFAULT_STATION)
    }
}
