use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Date range starts at {start}, after its end {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Day of month {0} is outside 1..=31")]
    InvalidDay(u32),

    #[error("Month {0} is outside 1..=12")]
    InvalidMonth(u32),

    #[error("Failed to build DataFrame from timeline")]
    FrameBuild(#[source] PolarsError),

    #[error("Failed to create CSV file '{0}'")]
    CsvCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to write timeline CSV to '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),
}
