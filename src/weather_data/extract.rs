//! Turns provider frames into the in-memory series the reconciliation works on.

use crate::series::daily::DailySeries;
use crate::series::hourly::HourlySeries;
use crate::types::date_span::DateSpan;
use crate::weather_data::error::WeatherDataError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Restricts a frame with a `date` column (as `YYYY-MM-DD` strings) to `span`.
/// ISO dates order lexicographically, so string comparison is enough.
fn within_span(span: DateSpan) -> Expr {
    col("date")
        .gt_eq(lit(span.start().format(DATE_FORMAT).to_string()))
        .and(col("date").lt_eq(lit(span.end().format(DATE_FORMAT).to_string())))
}

fn parse_date(station: &str, value: Option<&str>) -> Result<NaiveDate, WeatherDataError> {
    value
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        .ok_or_else(|| WeatherDataError::UnexpectedData {
            message: format!("unparseable date {:?}", value),
            station: station.to_string(),
        })
}

/// Collects the `tmax` column of a daily frame within `span`.
/// Rows with an empty `tmax` are kept as empty slots.
pub fn extract_daily_series(
    frame: LazyFrame,
    station: &str,
    span: DateSpan,
) -> Result<DailySeries, WeatherDataError> {
    let df = frame
        .select([
            col("date").cast(DataType::String),
            col("tmax").cast(DataType::Float64),
        ])
        .filter(within_span(span))
        .collect()?;

    let dates = df.column("date")?.str()?;
    let tmax = df.column("tmax")?.f64()?;

    dates
        .into_iter()
        .zip(tmax.into_iter())
        .map(|(date, value)| -> Result<_, WeatherDataError> {
            Ok((parse_date(station, date)?, value))
        })
        .collect()
}

/// Collects the `temp` readings of an hourly frame within `span`. Empty readings are dropped.
pub fn extract_hourly_series(
    frame: LazyFrame,
    station: &str,
    span: DateSpan,
) -> Result<HourlySeries, WeatherDataError> {
    let df = frame
        .select([
            col("date").cast(DataType::String),
            col("hour").cast(DataType::Int64),
            col("temp").cast(DataType::Float64),
        ])
        .filter(
            within_span(span)
                .and(col("hour").is_not_null())
                .and(col("temp").is_not_null()),
        )
        .collect()?;

    let dates = df.column("date")?.str()?;
    let hours = df.column("hour")?.i64()?;
    let temps = df.column("temp")?.f64()?;

    dates
        .into_iter()
        .zip(hours.into_iter())
        .zip(temps.into_iter())
        .filter_map(|((date, hour), temp)| Some((date, hour?, temp?)))
        .map(|(date, hour, temp)| -> Result<_, WeatherDataError> {
            let time = u32::try_from(hour)
                .ok()
                .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
                .ok_or_else(|| WeatherDataError::UnexpectedData {
                    message: format!("hour {} out of range", hour),
                    station: station.to_string(),
                })?;
            Ok((NaiveDateTime::new(parse_date(station, date)?, time), temp))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
        DateSpan::new(start, end).unwrap()
    }

    fn daily_frame() -> LazyFrame {
        df!(
            "date" => ["2020-07-27", "2020-07-28", "2020-07-29", "2020-07-30"],
            "tavg" => [Some(20.0), Some(21.0), Some(22.0), Some(23.0)],
            "tmax" => [Some(26.0), Some(27.4), None, Some(31.0)],
        )
        .unwrap()
        .lazy()
    }

    fn hourly_frame() -> LazyFrame {
        df!(
            "date" => ["2020-07-28", "2020-07-29", "2020-07-29", "2020-07-29", "2020-07-30"],
            "hour" => [Some(23i64), Some(0), Some(14), None, Some(1)],
            "temp" => [Some(19.0), Some(18.5), Some(29.2), Some(40.0), None],
        )
        .unwrap()
        .lazy()
    }

    #[test]
    fn test_daily_series_within_span_keeps_empty_slots() -> Result<(), WeatherDataError> {
        let series = extract_daily_series(
            daily_frame(),
            "A",
            span(date(2020, 7, 28), date(2020, 7, 29)),
        )?;

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2020, 7, 28)), Some(27.4));
        assert_eq!(series.get(date(2020, 7, 29)), None);
        assert_eq!(series.get(date(2020, 7, 30)), None);
        Ok(())
    }

    #[test]
    fn test_hourly_series_drops_incomplete_rows() -> Result<(), WeatherDataError> {
        let series = extract_hourly_series(
            hourly_frame(),
            "A",
            span(date(2020, 7, 29), date(2020, 7, 30)),
        )?;

        assert_eq!(series.len(), 2);
        let daily = series.aggregate_to_daily();
        assert_eq!(daily.get(date(2020, 7, 29)), Some(29.2));
        assert_eq!(daily.get(date(2020, 7, 30)), None);
        Ok(())
    }

    #[test]
    fn test_garbage_date_is_reported() {
        let frame = df!("date" => ["29/07/2020"], "tmax" => [Some(1.0)])
            .unwrap()
            .lazy();
        let result = extract_daily_series(
            frame,
            "A",
            span(date(1000, 1, 1), date(9999, 12, 31)),
        );
        assert!(matches!(result, Err(WeatherDataError::UnexpectedData { .. })));
    }
}
