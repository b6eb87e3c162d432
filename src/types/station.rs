//! Defines the data structures representing Meteostat weather stations and their metadata,
//! as far as the record lookup needs them: location, names and the daily/hourly inventory.
//! Also includes implementations necessary for spatial indexing using the `rstar` crate.

use chrono::NaiveDate;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- Data Structures ---

/// Represents a single Meteostat weather station and its associated metadata.
///
/// This mirrors the relevant part of the Meteostat `lite.json` station list. Fields that the
/// reconciliation does not use (identifiers, monthly and normals inventory) are not kept.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The unique Meteostat station identifier (e.g., "12375").
    pub id: String,
    /// The country code where the station is located (e.g., "PL").
    pub country: String,
    /// The region code (state, province, etc.), if available.
    pub region: Option<String>,
    /// A map of station names in different languages (e.g., {"en": "Warsaw-Okecie"}).
    pub name: HashMap<String, String>,
    /// Geographical location details (latitude, longitude, elevation).
    pub location: Location,
    /// Information about the availability periods for daily and hourly data.
    pub inventory: Inventory,
}

impl Station {
    /// The English station name, falling back to any available name.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .get("en")
            .or_else(|| self.name.values().next())
            .map(String::as_str)
    }
}

/// Stores the data availability ranges a station reports for daily and hourly data.
///
/// Gaps might exist within these ranges; they only say where the provider *claims* coverage.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Inventory {
    /// The reported start and end dates for daily data.
    pub daily: DateRange,
    /// The reported start and end dates for hourly data.
    pub hourly: DateRange,
}

/// Represents a validity window with optional start and end dates.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// The earliest date for which data is reported available, if known.
    pub start: Option<NaiveDate>,
    /// The latest date for which data is reported available, if known.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A window with both bounds present.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// A window without inventory. Never contains any date.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `date` lies inside the window (inclusive on both ends).
    ///
    /// A missing bound means the provider reports no inventory, so nothing matches.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }
}

/// Represents the geographical location of a weather station.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
    /// Elevation above sea level in meters, if available.
    pub elevation: Option<i32>,
}

// --- R-Tree Implementations ---

/// Lets the R-tree index stations by their (latitude, longitude) point.
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

impl PointDistance for Station {
    /// Squared Euclidean distance in degree space. Only used to order nearest-neighbour
    /// candidates; the real distance is computed with haversine during ranking.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_contains_inclusive_bounds() {
        let range = DateRange::between(date(2000, 1, 1), date(2000, 12, 31));
        assert!(range.contains(date(2000, 1, 1)));
        assert!(range.contains(date(2000, 6, 15)));
        assert!(range.contains(date(2000, 12, 31)));
        assert!(!range.contains(date(1999, 12, 31)));
        assert!(!range.contains(date(2001, 1, 1)));
    }

    #[test]
    fn test_date_range_missing_bound_never_matches() {
        assert!(!DateRange::empty().contains(date(2000, 1, 1)));
        assert!(!DateRange::new(Some(date(1990, 1, 1)), None).contains(date(2000, 1, 1)));
        assert!(!DateRange::new(None, Some(date(2010, 1, 1))).contains(date(2000, 1, 1)));
    }

    #[test]
    fn test_station_deserializes_from_lite_json() {
        let json = r#"{
            "id": "12375",
            "name": {"en": "Warsaw-Okecie"},
            "country": "PL",
            "region": "MZ",
            "identifiers": {"national": null, "wmo": "12375", "icao": "EPWA"},
            "location": {"latitude": 52.1667, "longitude": 20.9667, "elevation": 107},
            "timezone": "Europe/Warsaw",
            "inventory": {
                "model": {"start": "2020-01-01", "end": "2025-01-01"},
                "hourly": {"start": "1931-01-01", "end": "2025-04-20"},
                "daily": {"start": "1951-01-01", "end": "2025-04-18"},
                "monthly": {"start": 1951, "end": 2022},
                "normals": {"start": 1961, "end": 2020}
            }
        }"#;

        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, "12375");
        assert_eq!(station.display_name(), Some("Warsaw-Okecie"));
        assert_eq!(station.inventory.daily.start, Some(date(1951, 1, 1)));
        assert!(station.inventory.hourly.contains(date(1931, 1, 1)));
    }
}
