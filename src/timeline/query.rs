//! Same-calendar-day statistics across the years of a timeline.

use crate::timeline::error::TimelineError;
use crate::timeline::Timeline;
use chrono::Datelike;
use serde::Serialize;

/// A value recorded on the queried calendar day in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub tmax: f64,
}

/// Every year with a value on the queried calendar day, and the highest of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDayRecord {
    pub day: u32,
    pub month: u32,
    /// In ascending year order. Years without a value are left out.
    pub occurrences: Vec<YearValue>,
    /// The highest value; on a tie, the earliest year.
    pub max: YearValue,
}

/// Outcome of a calendar-day query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryResult {
    Found(CalendarDayRecord),
    /// No year on the timeline has a value for that day (or the day does not exist).
    NoData,
}

impl QueryResult {
    pub fn is_found(&self) -> bool {
        matches!(self, QueryResult::Found(_))
    }

    pub fn record(&self) -> Option<&CalendarDayRecord> {
        match self {
            QueryResult::Found(record) => Some(record),
            QueryResult::NoData => None,
        }
    }

    pub fn occurrences(&self) -> &[YearValue] {
        self.record().map_or(&[], |record| &record.occurrences)
    }

    pub fn max_year(&self) -> Option<i32> {
        self.record().map(|record| record.max.year)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.record().map(|record| record.max.tmax)
    }
}

/// Collects the values of every `day`/`month` on `timeline` and picks the highest.
///
/// `day` and `month` are only range-checked (1..=31, 1..=12); a combination that never occurs
/// on the calendar, like 30 February, simply finds nothing.
///
/// # Errors
///
/// [`TimelineError::InvalidDay`] or [`TimelineError::InvalidMonth`] for out-of-range input.
///
/// # Examples
///
/// ```
/// use meteo_records::{build_timeline, same_calendar_day, DateSpan, SeriesStore};
/// use chrono::NaiveDate;
///
/// let span = DateSpan::new(
///     NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
/// )?;
/// let timeline = build_timeline(&[], &SeriesStore::default(), span);
///
/// let result = same_calendar_day(&timeline, 29, 7)?;
/// assert!(!result.is_found());
/// # Ok::<(), meteo_records::TimelineError>(())
/// ```
pub fn same_calendar_day(
    timeline: &Timeline,
    day: u32,
    month: u32,
) -> Result<QueryResult, TimelineError> {
    if !(1..=31).contains(&day) {
        return Err(TimelineError::InvalidDay(day));
    }
    if !(1..=12).contains(&month) {
        return Err(TimelineError::InvalidMonth(month));
    }

    let occurrences: Vec<YearValue> = timeline
        .iter()
        .filter(|entry| entry.date.day() == day && entry.date.month() == month)
        .filter_map(|entry| {
            entry.tmax().map(|tmax| YearValue {
                year: entry.date.year(),
                tmax,
            })
        })
        .collect();

    let Some(max) = highest(&occurrences) else {
        return Ok(QueryResult::NoData);
    };

    Ok(QueryResult::Found(CalendarDayRecord {
        day,
        month,
        occurrences,
        max,
    }))
}

// Strict comparison keeps the first (earliest) of equal maxima.
fn highest(occurrences: &[YearValue]) -> Option<YearValue> {
    let mut iter = occurrences.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |best, candidate| {
        if candidate.tmax > best.tmax {
            candidate
        } else {
            best
        }
    }))
}
