//! Orders candidate stations by proximity to the target location.
//!
//! Ranking is pure: it drops every station at or beyond the distance threshold and sorts the
//! rest closest first, breaking distance ties by station identifier so that the order (and
//! therefore the reconciled timeline) never depends on input order.

use crate::types::candidate::StationCandidate;
use crate::types::station::{Location, Station};
use crate::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;

/// Ranks candidates whose distance is already known.
///
/// Keeps stations with `distance_km < max_distance_km` and returns them ordered by ascending
/// distance, then by `id`. An empty result is a valid outcome ("no coverage"), not an error.
pub fn rank_candidates(
    candidates: Vec<StationCandidate>,
    max_distance_km: f64,
) -> Vec<StationCandidate> {
    let mut ranked: Vec<StationCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.distance_km < max_distance_km)
        .collect();

    ranked.sort_by(|a, b| {
        OrderedFloat(a.distance_km)
            .cmp(&OrderedFloat(b.distance_km))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

/// Ranks provider stations around `target`, computing each distance with the haversine formula.
pub fn rank_stations<'a>(
    stations: impl IntoIterator<Item = &'a Station>,
    target: LatLon,
    max_distance_km: f64,
) -> Vec<StationCandidate> {
    let candidates = stations
        .into_iter()
        .map(|station| {
            let distance_km = distance_km(target, &station.location);
            StationCandidate::from_station(station, distance_km)
        })
        .collect();
    rank_candidates(candidates, max_distance_km)
}

/// Great-circle distance in kilometers between `target` and a station location.
pub(crate) fn distance_km(target: LatLon, location: &Location) -> f64 {
    distance(
        HaversineLocation {
            latitude: target.0,
            longitude: target.1,
        },
        HaversineLocation {
            latitude: location.latitude,
            longitude: location.longitude,
        },
        Units::Kilometers,
    )
}
