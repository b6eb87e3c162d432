mod error;
mod record_finder;
mod series;
mod stations;
mod timeline;
mod types;
mod utils;
mod weather_data;

pub use error::RecordError;
pub use record_finder::*;

pub use types::candidate::StationCandidate;
pub use types::date_span::DateSpan;
pub use types::frequency::Frequency;
pub use types::station::*;

pub use series::daily::DailySeries;
pub use series::hourly::{aggregate_to_daily, DailyFromHourly, HourlySeries};
pub use series::store::{SeriesStore, StationSeries};

pub use stations::locate_station::StationLocator;
pub use stations::ranking::{rank_candidates, rank_stations};

pub use timeline::engine::{build_timeline, resolve_day};
pub use timeline::query::{same_calendar_day, CalendarDayRecord, QueryResult, YearValue};
pub use timeline::{Reading, SourceKind, Timeline, TimelineEntry};

pub use stations::error::LocateStationError;
pub use timeline::error::TimelineError;
pub use weather_data::error::WeatherDataError;
