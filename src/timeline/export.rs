//! Tabular export of a timeline.

use crate::timeline::error::TimelineError;
use crate::timeline::{Timeline, TimelineEntry};
use log::info;
use polars::prelude::*;
use std::path::Path;

impl Timeline {
    /// Converts the timeline into a `DataFrame` with the columns
    /// `date`, `source_type`, `station` and `tmax`. Empty days have nulls in the last three.
    pub fn to_frame(&self) -> Result<DataFrame, TimelineError> {
        let dates: Vec<String> = self
            .iter()
            .map(|entry| entry.date.format("%Y-%m-%d").to_string())
            .collect();
        let sources: Vec<Option<&str>> = self
            .iter()
            .map(|entry| entry.reading.as_ref().map(|r| r.source.as_str()))
            .collect();
        let stations: Vec<Option<&str>> = self
            .iter()
            .map(|entry| entry.reading.as_ref().map(|r| r.station.as_str()))
            .collect();
        let tmax: Vec<Option<f64>> = self.iter().map(TimelineEntry::tmax).collect();

        df!(
            "date" => dates,
            "source_type" => sources,
            "station" => stations,
            "tmax" => tmax,
        )
        .map_err(TimelineError::FrameBuild)
    }

    /// Writes the timeline as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<(), TimelineError> {
        let mut df = self.to_frame()?;
        let mut file = std::fs::File::create(path)
            .map_err(|e| TimelineError::CsvCreate(path.to_path_buf(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| TimelineError::CsvWrite(path.to_path_buf(), e))?;
        info!("Wrote {} timeline rows to {:?}", df.height(), path);
        Ok(())
    }
}
