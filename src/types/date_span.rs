//! The inclusive date range a timeline is built over.

use crate::timeline::error::TimelineError;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// An inclusive, non-inverted range of calendar days.
///
/// Construction validates `start <= end`, so everything downstream can iterate it without
/// re-checking.
///
/// # Examples
///
/// ```
/// use meteo_records::DateSpan;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let span = DateSpan::new(start, end).unwrap();
/// assert_eq!(span.len_days(), 4); // 2024 is a leap year
///
/// assert!(DateSpan::new(end, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Creates a span covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedDateRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimelineError> {
        if start > end {
            return Err(TimelineError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A span of exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the span, both ends included.
    pub fn len_days(&self) -> usize {
        // Non-negative by construction.
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every day of the span in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| {
            day.checked_add_days(Days::new(1)).filter(|next| *next <= end)
        })
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = DateSpan::new(date(2020, 1, 2), date(2020, 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::InvertedDateRange { start, end }
                if start == date(2020, 1, 2) && end == date(2020, 1, 1)
        ));
    }

    #[test]
    fn test_days_iterates_inclusive_without_gaps() {
        let span = DateSpan::new(date(2019, 12, 30), date(2020, 1, 2)).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(
            days,
            vec![
                date(2019, 12, 30),
                date(2019, 12, 31),
                date(2020, 1, 1),
                date(2020, 1, 2)
            ]
        );
        assert_eq!(span.len_days(), days.len());
    }

    #[test]
    fn test_single_day_span() {
        let span = DateSpan::single(date(2021, 7, 29));
        assert_eq!(span.len_days(), 1);
        assert_eq!(span.days().count(), 1);
        assert!(span.contains(date(2021, 7, 29)));
        assert!(!span.contains(date(2021, 7, 30)));
    }

    #[test]
    fn test_span_ending_on_max_date_terminates() {
        let span = DateSpan::new(NaiveDate::MAX.pred_opt().unwrap(), NaiveDate::MAX).unwrap();
        assert_eq!(span.days().count(), 2);
    }
}
