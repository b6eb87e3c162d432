use crate::series::daily::DailySeries;
use crate::series::hourly::HourlySeries;
use crate::series::store::{SeriesStore, StationSeries};
use crate::types::candidate::StationCandidate;
use crate::types::date_span::DateSpan;
use crate::types::frequency::Frequency;
use crate::weather_data::data_loader::WeatherDataLoader;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::extract::{extract_daily_series, extract_hourly_series};
use log::{info, warn};
use polars::prelude::LazyFrame;
use std::collections::{hash_map::Entry, HashMap};
use std::path::Path;
use tokio::sync::Mutex;

pub struct FrameFetcher {
    loader: WeatherDataLoader,
    lazyframe_cache: Mutex<HashMap<(String, Frequency), LazyFrame>>,
}

impl FrameFetcher {
    pub fn new(cache_dir: &Path) -> Self {
        Self::with_loader(WeatherDataLoader::new(cache_dir))
    }

    pub(crate) fn with_loader(loader: WeatherDataLoader) -> Self {
        Self {
            loader,
            lazyframe_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Gets the LazyFrame for a station and frequency, using the in-memory cache if possible.
    pub async fn get_cache_lazyframe(
        &self,
        station: &str,
        frequency: Frequency,
    ) -> Result<LazyFrame, WeatherDataError> {
        let key = (station.to_string(), frequency);

        {
            let cache = self.lazyframe_cache.lock().await;
            if let Some(cached_frame) = cache.get(&key) {
                return Ok(cached_frame.clone());
            }
        }

        // Loading may download; don't hold the lock across it.
        let loaded_frame = self.loader.get_frame(frequency, station).await?;

        let mut cache = self.lazyframe_cache.lock().await;
        match cache.entry(key) {
            // Someone else loaded it meanwhile; keep theirs.
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(loaded_frame.clone());
                Ok(loaded_frame)
            }
        }
    }

    /// Like [`Self::get_cache_lazyframe`], but a missing provider file yields `None`.
    async fn optional_lazyframe(
        &self,
        station: &str,
        frequency: Frequency,
    ) -> Result<Option<LazyFrame>, WeatherDataError> {
        match self.get_cache_lazyframe(station, frequency).await {
            Ok(frame) => Ok(Some(frame)),
            Err(e) if e.is_not_found() => {
                warn!(
                    "No {} data published for station {}, treating it as empty",
                    frequency, station
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Loads both series of one station, restricted to `span`, and aggregates the hourly one.
    pub async fn station_series(
        &self,
        station: &str,
        span: DateSpan,
    ) -> Result<StationSeries, WeatherDataError> {
        let daily = match self.optional_lazyframe(station, Frequency::Daily).await? {
            Some(frame) => extract_daily_series(frame, station, span)?,
            None => DailySeries::new(),
        };
        let hourly = match self.optional_lazyframe(station, Frequency::Hourly).await? {
            Some(frame) => extract_hourly_series(frame, station, span)?,
            None => HourlySeries::new(),
        };
        info!(
            "Loaded station {}: {} daily rows, {} hourly readings within {}",
            station,
            daily.len(),
            hourly.len(),
            span
        );
        Ok(StationSeries::new(daily, hourly))
    }

    /// Builds the series store for every candidate. All fetching and hourly aggregation
    /// happens here, before any reconciliation.
    pub async fn load_store(
        &self,
        stations: &[StationCandidate],
        span: DateSpan,
    ) -> Result<SeriesStore, WeatherDataError> {
        let mut loaded = Vec::with_capacity(stations.len());
        for station in stations {
            let series = self.station_series(&station.id, span).await?;
            loaded.push((station.id.clone(), series));
        }
        Ok(loaded.into_iter().collect())
    }
}
