//! Prints every year's maximum for one calendar day near a location, and the record.
//!
//! Usage: `cargo run --example record_for_day -- [day month [lat lon [out.csv]]]`

use chrono::NaiveDate;
use meteo_records::{LatLon, RecordError, RecordFinder};
use std::env;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), RecordError> {
    let args: Vec<String> = env::args().skip(1).collect();

    let day: u32 = parse_arg(&args, 0, "day", 29);
    let month: u32 = parse_arg(&args, 1, "month", 7);
    let location = LatLon(
        parse_arg(&args, 2, "latitude", 52.2297),
        parse_arg(&args, 3, "longitude", 21.0122),
    );
    let csv_path = args.get(4).map(PathBuf::from);

    let start = NaiveDate::from_ymd_opt(1900, 7, 23).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

    let finder = RecordFinder::new().await?;
    let stations = finder.find_stations().location(location).call();
    println!("Using {} stations:", stations.len());
    for station in &stations {
        println!(
            "  {} {:<30} {:>6.1} km",
            station.id,
            station.name.as_deref().unwrap_or("-"),
            station.distance_km
        );
    }

    let timeline = finder
        .timeline()
        .location(location)
        .start(start)
        .end(end)
        .call()
        .await?;
    println!(
        "Timeline {}: {} of {} days have a value",
        timeline.span(),
        timeline.covered_days(),
        timeline.len()
    );

    let result = timeline.same_calendar_day(day, month)?;
    for occurrence in result.occurrences() {
        println!("{}: {:.1} °C", occurrence.year, occurrence.tmax);
    }
    match (result.max_year(), result.max_value()) {
        (Some(year), Some(value)) => {
            println!("Record for {:02}-{:02}: {:.1} °C in {}", day, month, value, year)
        }
        _ => println!("No data for {:02}-{:02}", day, month),
    }

    if let Some(path) = csv_path {
        timeline.write_csv(&path)?;
        println!("Wrote timeline to {}", path.display());
    }

    Ok(())
}

/// The `index`th argument parsed as `T`, or `default` when it is not given.
/// Exits with a usage message when it is given but malformed.
fn parse_arg<T: FromStr>(args: &[String], index: usize, name: &str, default: T) -> T {
    match args.get(index) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("invalid {}: {:?}", name, raw);
            eprintln!("usage: record_for_day [day month [lat lon [out.csv]]]");
            process::exit(2)
        }),
    }
}
