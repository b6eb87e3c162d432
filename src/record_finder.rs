//! The main entry point: finds the stations around a location, loads their records and
//! reconciles them into one daily-maximum timeline.

use crate::error::RecordError;
use crate::series::store::SeriesStore;
use crate::stations::locate_station::StationLocator;
use crate::timeline::engine::build_timeline;
use crate::timeline::query::QueryResult;
use crate::timeline::Timeline;
use crate::types::candidate::StationCandidate;
use crate::types::date_span::DateSpan;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::frame_fetcher::FrameFetcher;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::PathBuf;

const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
const DEFAULT_STATION_LIMIT: usize = 10;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use meteo_records::LatLon;
///
/// let warsaw = LatLon(52.2297, 21.0122);
/// assert_eq!(warsaw.0, 52.2297);
/// assert_eq!(warsaw.1, 21.0122);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Client that answers "what was the hottest day-of-year on record here".
///
/// Create an instance using [`RecordFinder::new()`] for the default cache directory or
/// [`RecordFinder::with_cache_folder()`] for a custom one. Station metadata and downloaded
/// records are cached on disk and reused between runs.
///
/// # Examples
///
/// ```no_run
/// # use meteo_records::{LatLon, RecordError, RecordFinder};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), RecordError> {
/// let finder = RecordFinder::new().await?;
/// let result = finder
///     .record_for_day()
///     .location(LatLon(52.2297, 21.0122))
///     .start(NaiveDate::from_ymd_opt(1951, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
///     .day(29)
///     .month(7)
///     .call()
///     .await?;
/// if let Some(year) = result.max_year() {
///     println!("hottest 29 July was in {}", year);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RecordFinder {
    fetcher: FrameFetcher,
    station_locator: StationLocator,
}

#[bon]
impl RecordFinder {
    /// Creates a client that caches into `cache_folder`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::CacheDirCreation`] if the directory cannot be created, or a
    /// [`RecordError::LocateStation`] variant if the station list cannot be loaded.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, RecordError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| RecordError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            station_locator: StationLocator::new(&cache_folder).await?,
            fetcher: FrameFetcher::new(&cache_folder),
        })
    }

    /// Creates a client using the platform cache directory (e.g. `~/.cache/meteo_records_cache`
    /// on Linux).
    pub async fn new() -> Result<Self, RecordError> {
        let cache_folder = get_cache_dir().map_err(RecordError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Ranked stations around `location`, closest first.
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.max_distance_km(f64)`: Optional, defaults to `50.0`. Stations at exactly this
    ///   distance are excluded.
    /// * `.station_limit(usize)`: Optional, defaults to `10`.
    #[builder]
    pub fn find_stations(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Vec<StationCandidate> {
        let max_distance_km = max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
        let station_limit = station_limit.unwrap_or(DEFAULT_STATION_LIMIT);
        self.station_locator
            .query(location, station_limit, max_distance_km)
    }

    /// Loads the records of every station within `span` into a [`SeriesStore`].
    pub async fn load_series(
        &self,
        stations: &[StationCandidate],
        span: DateSpan,
    ) -> Result<SeriesStore, RecordError> {
        Ok(self.fetcher.load_store(stations, span).await?)
    }

    /// Reconciles the records of the stations around `location` into one timeline.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Timeline`] if `start` is after `end`, or a
    /// [`RecordError::WeatherData`] variant if a station's records cannot be loaded. A
    /// station the provider has no records for contributes nothing instead of failing.
    #[builder]
    pub async fn timeline(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Result<Timeline, RecordError> {
        let span = DateSpan::new(start, end)?;
        let stations = self
            .find_stations()
            .location(location)
            .maybe_max_distance_km(max_distance_km)
            .maybe_station_limit(station_limit)
            .call();

        if stations.is_empty() {
            warn!(
                "No stations within range of ({}, {}), timeline will be empty",
                location.0, location.1
            );
        } else {
            info!(
                "Reconciling {} over {} stations: {}",
                span,
                stations.len(),
                stations
                    .iter()
                    .map(|s| s.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let store = self.load_series(&stations, span).await?;
        Ok(build_timeline(&stations, &store, span))
    }

    /// Reconciles a timeline and returns the highest maximum observed on `day`/`month`
    /// across the years of the range.
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub async fn record_for_day(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
        day: u32,
        month: u32,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Result<QueryResult, RecordError> {
        let timeline = self
            .timeline()
            .location(location)
            .start(start)
            .end(end)
            .maybe_max_distance_km(max_distance_km)
            .maybe_station_limit(station_limit)
            .call()
            .await?;
        Ok(timeline.same_calendar_day(day, month)?)
    }
}
