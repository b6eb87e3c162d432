//! A station as seen by the reconciliation: an identifier, how far it is from the target
//! location and the two validity windows of its records.

use crate::types::station::{DateRange, Station};
use serde::Serialize;

/// A candidate station for reconciliation, carrying its distance to the target location.
///
/// Immutable once built. The `daily` and `hourly` windows are the provider's inventory for the
/// station's daily and hourly records; a date outside a window is never looked up in the
/// corresponding series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationCandidate {
    /// The Meteostat station identifier.
    pub id: String,
    /// Human-readable name, if the provider has one.
    pub name: Option<String>,
    /// Great-circle distance to the target location in kilometers.
    pub distance_km: f64,
    /// Validity window of the station's daily records.
    pub daily: DateRange,
    /// Validity window of the station's hourly records.
    pub hourly: DateRange,
}

impl StationCandidate {
    pub fn new(
        id: impl Into<String>,
        distance_km: f64,
        daily: DateRange,
        hourly: DateRange,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            distance_km,
            daily,
            hourly,
        }
    }

    /// Builds a candidate from provider metadata and a precomputed distance.
    pub fn from_station(station: &Station, distance_km: f64) -> Self {
        Self {
            id: station.id.clone(),
            name: station.display_name().map(str::to_owned),
            distance_km,
            daily: station.inventory.daily,
            hourly: station.inventory.hourly,
        }
    }
}
