//! Reconciles several ranked stations into one daily timeline.
//!
//! For each day the stations are tried strictly in rank order. Within a station the provider's
//! daily record is tried before the station's own hourly-derived maximum; only when a station
//! yields nothing from either source does the next station get a turn. A daily window that
//! covers the date but has no value for it falls through to the same station's hourly check.

use crate::series::store::SeriesStore;
use crate::timeline::{Reading, SourceKind, Timeline, TimelineEntry};
use crate::types::candidate::StationCandidate;
use crate::types::date_span::DateSpan;
use chrono::NaiveDate;
use log::debug;

/// Builds the timeline for every day of `span` from stations ranked closest first.
///
/// Missing data is never an error: a day no station covers is an empty entry. An empty
/// `stations` slice therefore gives a timeline of empty entries.
pub fn build_timeline(
    stations: &[StationCandidate],
    store: &SeriesStore,
    span: DateSpan,
) -> Timeline {
    let entries: Vec<TimelineEntry> = span
        .days()
        .map(|date| TimelineEntry {
            date,
            reading: resolve_day(stations, store, date),
        })
        .collect();

    let timeline = Timeline::from_entries(span, entries);
    debug!(
        "Reconciled {} days over {} from {} stations, {} days with a value",
        timeline.len(),
        span,
        stations.len(),
        timeline.covered_days()
    );
    timeline
}

/// The first value any station offers for `date`, walking `stations` in order.
pub fn resolve_day(
    stations: &[StationCandidate],
    store: &SeriesStore,
    date: NaiveDate,
) -> Option<Reading> {
    stations
        .iter()
        .find_map(|station| resolve_station(station, store, date))
}

fn resolve_station(
    station: &StationCandidate,
    store: &SeriesStore,
    date: NaiveDate,
) -> Option<Reading> {
    if station.daily.contains(date) {
        if let Some(tmax) = store.daily_max(&station.id, date) {
            return Some(Reading {
                tmax,
                station: station.id.clone(),
                source: SourceKind::Daily,
            });
        }
    }
    if station.hourly.contains(date) {
        if let Some(tmax) = store.hourly_derived_max(&station.id, date) {
            return Some(Reading {
                tmax,
                station: station.id.clone(),
                source: SourceKind::HourlyDerived,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::daily::DailySeries;
    use crate::series::hourly::HourlySeries;
    use crate::series::store::StationSeries;
    use crate::stations::ranking::rank_candidates;
    use crate::types::station::DateRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wide_window() -> DateRange {
        DateRange::between(date(1900, 1, 1), date(2100, 12, 31))
    }

    fn station(id: &str, distance_km: f64) -> StationCandidate {
        StationCandidate::new(id, distance_km, wide_window(), wide_window())
    }

    fn series(daily: &[(NaiveDate, Option<f64>)], hourly: &[(NaiveDate, u32, f64)]) -> StationSeries {
        let daily: DailySeries = daily.iter().copied().collect();
        let hourly: HourlySeries = hourly
            .iter()
            .map(|(d, hour, value)| (d.and_hms_opt(*hour, 0, 0).unwrap(), *value))
            .collect();
        StationSeries::new(daily, hourly)
    }

    fn store(entries: Vec<(&str, StationSeries)>) -> SeriesStore {
        entries
            .into_iter()
            .map(|(id, series)| (id.to_string(), series))
            .collect()
    }

    fn single_day(d: NaiveDate) -> DateSpan {
        DateSpan::single(d)
    }

    #[test]
    fn test_closer_station_hourly_beats_farther_station_daily() {
        let day = date(2020, 7, 29);
        let store = store(vec![
            ("near", series(&[(day, None)], &[(day, 10, 24.0), (day, 14, 26.5)])),
            ("far", series(&[(day, Some(30.0))], &[])),
        ]);
        let ranked = rank_candidates(vec![station("far", 20.0), station("near", 3.0)], 50.0);

        let timeline = build_timeline(&ranked, &store, single_day(day));
        let reading = timeline.get(day).unwrap().reading.clone().unwrap();
        assert_eq!(reading.tmax, 26.5);
        assert_eq!(reading.station, "near");
        assert_eq!(reading.source, SourceKind::HourlyDerived);
    }

    #[test]
    fn test_station_daily_beats_its_own_hourly() {
        let day = date(2020, 7, 29);
        let store = store(vec![(
            "A",
            series(&[(day, Some(27.0))], &[(day, 15, 28.4)]),
        )]);

        let timeline = build_timeline(&[station("A", 1.0)], &store, single_day(day));
        let reading = timeline.get(day).unwrap().reading.clone().unwrap();
        assert_eq!(reading.tmax, 27.0);
        assert_eq!(reading.source, SourceKind::Daily);
    }

    #[test]
    fn test_daily_window_without_value_falls_through_to_same_station_hourly() {
        let day = date(2005, 12, 25);
        let store = store(vec![
            ("A", series(&[], &[(day, 12, 1.5)])),
            ("B", series(&[(day, Some(4.0))], &[])),
        ]);
        let ranked = vec![station("A", 1.0), station("B", 2.0)];

        let timeline = build_timeline(&ranked, &store, single_day(day));
        let reading = timeline.get(day).unwrap().reading.clone().unwrap();
        assert_eq!(reading.station, "A");
        assert_eq!(reading.tmax, 1.5);
    }

    #[test]
    fn test_window_match_alone_does_not_stop_the_scan() {
        let day = date(2005, 12, 25);
        let store = store(vec![
            ("A", series(&[(day, None)], &[])),
            ("B", series(&[], &[(day, 0, -3.0), (day, 12, 2.0)])),
        ]);
        let ranked = vec![station("A", 1.0), station("B", 2.0)];

        let timeline = build_timeline(&ranked, &store, single_day(day));
        let reading = timeline.get(day).unwrap().reading.clone().unwrap();
        assert_eq!(reading.station, "B");
        assert_eq!(reading.tmax, 2.0);
        assert_eq!(reading.source, SourceKind::HourlyDerived);
    }

    #[test]
    fn test_values_outside_validity_windows_are_ignored() {
        let day = date(1960, 6, 1);
        let near = StationCandidate::new(
            "near",
            1.0,
            DateRange::between(date(1970, 1, 1), date(2020, 12, 31)),
            DateRange::empty(),
        );
        let far = StationCandidate::new(
            "far",
            9.0,
            DateRange::empty(),
            DateRange::between(date(1950, 1, 1), date(1965, 12, 31)),
        );
        let store = store(vec![
            ("near", series(&[(day, Some(22.0))], &[(day, 12, 23.0)])),
            ("far", series(&[(day, Some(19.0))], &[(day, 12, 18.0)])),
        ]);

        let timeline = build_timeline(&[near, far], &store, single_day(day));
        let reading = timeline.get(day).unwrap().reading.clone().unwrap();
        assert_eq!(reading.station, "far");
        assert_eq!(reading.tmax, 18.0);
        assert_eq!(reading.source, SourceKind::HourlyDerived);
    }

    #[test]
    fn test_uncovered_day_is_absent() {
        let span = DateSpan::new(date(2020, 1, 1), date(2020, 1, 3)).unwrap();
        let store = store(vec![(
            "A",
            series(&[(date(2020, 1, 1), Some(1.0))], &[(date(2020, 1, 3), 6, 2.0)]),
        )]);

        let timeline = build_timeline(&[station("A", 1.0)], &store, span);
        let values: Vec<_> = timeline.iter().map(|e| e.tmax()).collect();
        assert_eq!(values, vec![Some(1.0), None, Some(2.0)]);
    }

    #[test]
    fn test_one_entry_per_day_without_gaps() {
        let span = DateSpan::new(date(2019, 2, 20), date(2020, 3, 10)).unwrap();
        let timeline = build_timeline(&[station("A", 1.0)], &SeriesStore::default(), span);

        assert_eq!(timeline.len(), span.len_days());
        let dates: Vec<_> = timeline.iter().map(|e| e.date).collect();
        assert_eq!(dates, span.days().collect::<Vec<_>>());
        assert!(dates.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn test_empty_ranking_gives_all_absent_timeline() {
        let span = DateSpan::new(date(2021, 1, 1), date(2021, 12, 31)).unwrap();
        let store = store(vec![("A", series(&[(date(2021, 5, 5), Some(20.0))], &[]))]);

        let timeline = build_timeline(&[], &store, span);
        assert_eq!(timeline.len(), 365);
        assert!(timeline.iter().all(|e| e.reading.is_none()));
    }

    #[test]
    fn test_station_missing_from_store_is_skipped() {
        let day = date(2021, 5, 5);
        let store = store(vec![("B", series(&[(day, Some(20.0))], &[]))]);
        let ranked = vec![station("A", 1.0), station("B", 2.0)];

        let timeline = build_timeline(&ranked, &store, single_day(day));
        assert_eq!(timeline.get(day).unwrap().tmax(), Some(20.0));
    }

    #[test]
    fn test_rebuilding_gives_identical_timeline() {
        let span = DateSpan::new(date(2020, 7, 1), date(2020, 7, 31)).unwrap();
        let store = store(vec![
            (
                "A",
                series(
                    &[(date(2020, 7, 3), Some(25.2)), (date(2020, 7, 4), None)],
                    &[(date(2020, 7, 4), 14, 26.1), (date(2020, 7, 9), 13, 30.3)],
                ),
            ),
            ("B", series(&[(date(2020, 7, 9), Some(31.0)), (date(2020, 7, 10), Some(29.9))], &[])),
        ]);
        let ranked = vec![station("A", 4.0), station("B", 11.0)];

        let first = build_timeline(&ranked, &store, span);
        let second = build_timeline(&ranked, &store, span);
        assert_eq!(first, second);
        assert_eq!(first.get(date(2020, 7, 9)).unwrap().tmax(), Some(30.3));
        assert_eq!(first.get(date(2020, 7, 10)).unwrap().tmax(), Some(29.9));
        assert_eq!(first.covered_days(), 4);
    }
}
