//! Per-station observation series with the hourly aggregation cached up front.

use crate::series::daily::DailySeries;
use crate::series::hourly::{DailyFromHourly, HourlySeries};
use chrono::NaiveDate;
use std::collections::HashMap;

/// The two raw series of one station plus its hourly-derived daily maxima.
///
/// The derived series is computed once, when the value is built, and never again.
#[derive(Debug, Clone, Default)]
pub struct StationSeries {
    daily: DailySeries,
    hourly: HourlySeries,
    daily_from_hourly: DailyFromHourly,
}

impl StationSeries {
    pub fn new(daily: DailySeries, hourly: HourlySeries) -> Self {
        let daily_from_hourly = hourly.aggregate_to_daily();
        Self {
            daily,
            hourly,
            daily_from_hourly,
        }
    }

    pub fn daily(&self) -> &DailySeries {
        &self.daily
    }

    pub fn hourly(&self) -> &HourlySeries {
        &self.hourly
    }

    pub fn daily_from_hourly(&self) -> &DailyFromHourly {
        &self.daily_from_hourly
    }
}

/// Read-only lookup of every candidate station's series, keyed by station id.
///
/// Built once before reconciliation starts; there is no way to mutate it afterwards.
///
/// # Examples
///
/// ```
/// use meteo_records::{DailySeries, HourlySeries, SeriesStore, StationSeries};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let daily: DailySeries = [(day, Some(4.2))].into_iter().collect();
/// let hourly: HourlySeries = [(day.and_hms_opt(13, 0, 0).unwrap(), 5.0)].into_iter().collect();
///
/// let store: SeriesStore = [("12375".to_string(), StationSeries::new(daily, hourly))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(store.daily_max("12375", day), Some(4.2));
/// assert_eq!(store.hourly_derived_max("12375", day), Some(5.0));
/// assert_eq!(store.daily_max("unknown", day), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    stations: HashMap<String, StationSeries>,
}

impl SeriesStore {
    /// The provider's daily maximum for `station` on `date`.
    ///
    /// Absent when the station is unknown, the date has no row, or the row has no value.
    pub fn daily_max(&self, station: &str, date: NaiveDate) -> Option<f64> {
        self.stations.get(station)?.daily.get(date)
    }

    /// The maximum of `station`'s hourly readings on `date`, from the cached aggregation.
    pub fn hourly_derived_max(&self, station: &str, date: NaiveDate) -> Option<f64> {
        self.stations.get(station)?.daily_from_hourly.get(date)
    }

    pub fn get(&self, station: &str) -> Option<&StationSeries> {
        self.stations.get(station)
    }

    pub fn contains(&self, station: &str) -> bool {
        self.stations.contains_key(station)
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<(String, StationSeries)> for SeriesStore {
    fn from_iter<T: IntoIterator<Item = (String, StationSeries)>>(iter: T) -> Self {
        Self {
            stations: iter.into_iter().collect(),
        }
    }
}
