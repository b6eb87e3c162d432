//! Hourly readings and their collapse into one maximum per calendar day.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A station's instantaneous hourly temperatures, keyed by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    readings: BTreeMap<NaiveDateTime, f64>,
}

impl HourlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, timestamp: NaiveDateTime) -> Option<f64> {
        self.readings.get(&timestamp).copied()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.readings.iter().map(|(ts, value)| (*ts, *value))
    }

    /// See [`aggregate_to_daily`].
    pub fn aggregate_to_daily(&self) -> DailyFromHourly {
        aggregate_to_daily(self)
    }
}

impl FromIterator<(NaiveDateTime, f64)> for HourlySeries {
    /// NaN readings are dropped; a later reading for the same timestamp replaces an earlier one.
    fn from_iter<T: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: T) -> Self {
        let readings = iter
            .into_iter()
            .filter(|(_, value)| !value.is_nan())
            .collect();
        Self { readings }
    }
}

/// Daily maxima derived from a station's hourly readings.
///
/// Only days with at least one hourly reading have an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyFromHourly {
    maxima: BTreeMap<NaiveDate, f64>,
}

impl DailyFromHourly {
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.maxima.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.maxima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.maxima.iter().map(|(date, value)| (*date, *value))
    }
}

/// Collapses hourly readings into the maximum reading of each calendar day.
///
/// Days without readings are absent from the result rather than defaulted.
pub fn aggregate_to_daily(hourly: &HourlySeries) -> DailyFromHourly {
    let mut maxima = BTreeMap::new();
    for (timestamp, value) in hourly.iter() {
        match maxima.entry(timestamp.date()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                if value > *slot.get() {
                    slot.insert(value);
                }
            }
        }
    }
    DailyFromHourly { maxima }
}
