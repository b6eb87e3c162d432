//! The reconciled daily timeline and the operations on it.
//!
//! A [`Timeline`] holds exactly one entry per day of its [`DateSpan`]. Each entry either
//! carries the resolved maximum temperature together with the station and source that supplied
//! it, or is empty because no ranked station had a usable value that day.

pub mod engine;
pub mod error;
pub mod export;
pub mod query;

use crate::timeline::error::TimelineError;
use crate::timeline::query::{same_calendar_day, QueryResult};
use crate::types::date_span::DateSpan;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Which of a station's two series supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The provider's own daily maximum.
    Daily,
    /// The maximum of the station's hourly readings for that day.
    HourlyDerived,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Daily => "daily",
            SourceKind::HourlyDerived => "hourly",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved daily maximum and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub tmax: f64,
    pub station: String,
    pub source: SourceKind,
}

/// One day of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    /// `None` when no ranked station had a value for this day.
    pub reading: Option<Reading>,
}

impl TimelineEntry {
    pub fn tmax(&self) -> Option<f64> {
        self.reading.as_ref().map(|reading| reading.tmax)
    }
}

/// The gap-free, date-ordered sequence of resolved daily maxima.
///
/// Built by [`engine::build_timeline`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    span: DateSpan,
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub(crate) fn from_entries(span: DateSpan, entries: Vec<TimelineEntry>) -> Self {
        debug_assert_eq!(entries.len(), span.len_days());
        Self { span, entries }
    }

    pub fn span(&self) -> DateSpan {
        self.span
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built timeline: a span has at least one day.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for `date`, or `None` if `date` is outside the span.
    pub fn get(&self, date: NaiveDate) -> Option<&TimelineEntry> {
        if !self.span.contains(date) {
            return None;
        }
        let offset = (date - self.span.start()).num_days();
        self.entries.get(usize::try_from(offset).ok()?)
    }

    /// Number of days that have a value.
    pub fn covered_days(&self) -> usize {
        self.entries.iter().filter(|e| e.reading.is_some()).count()
    }

    /// The highest value on the whole timeline with its date. Ties go to the earliest date.
    pub fn max(&self) -> Option<(NaiveDate, f64)> {
        let mut best: Option<(NaiveDate, f64)> = None;
        for entry in &self.entries {
            let Some(tmax) = entry.tmax() else {
                continue;
            };
            match best {
                Some((_, current)) if tmax <= current => {}
                _ => best = Some((entry.date, tmax)),
            }
        }
        best
    }

    /// Shorthand for [`same_calendar_day`] on this timeline.
    pub fn same_calendar_day(&self, day: u32, month: u32) -> Result<QueryResult, TimelineError> {
        same_calendar_day(self, day, month)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
