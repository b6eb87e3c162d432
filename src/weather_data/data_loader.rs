use crate::types::frequency::Frequency;
use crate::weather_data::error::WeatherDataError;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

const BULK_URL: &str = "https://bulk.meteostat.net/v2";

/// Downloads Meteostat bulk CSV files and keeps them as parquet in the cache directory.
pub struct WeatherDataLoader {
    cache_dir: PathBuf,
    base_url: String,
    download_client: Client,
}

impl WeatherDataLoader {
    pub fn new(cache_dir: &Path) -> WeatherDataLoader {
        Self::with_base_url(cache_dir, BULK_URL)
    }

    /// Loader that downloads from `base_url` instead of the Meteostat bulk endpoint.
    pub(crate) fn with_base_url(
        cache_dir: &Path,
        base_url: impl Into<String>,
    ) -> WeatherDataLoader {
        WeatherDataLoader {
            cache_dir: cache_dir.to_path_buf(),
            base_url: base_url.into(),
            download_client: Client::new(),
        }
    }

    /// Loads the full record of `station` at `frequency`.
    /// Handles caching and downloading. Returns a LazyFrame with schema-specific column names.
    pub async fn get_frame(
        &self,
        frequency: Frequency,
        station: &str,
    ) -> Result<LazyFrame, WeatherDataError> {
        let cache_filename = format!("{}{}.parquet", frequency.cache_file_prefix(), station);
        let parquet_path = self.cache_dir.join(&cache_filename);

        if fs::metadata(&parquet_path).await.is_ok() {
            info!(
                "Cache hit for {} data for station {} at {:?}",
                frequency, station, parquet_path
            );
        } else {
            warn!(
                "Cache miss for {} data for station {}. Downloading and processing.",
                frequency, station
            );

            let raw_bytes = self.download(frequency, station).await?;
            let df = Self::csv_to_dataframe(raw_bytes, station, frequency).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| WeatherDataError::CacheDirCreation(self.cache_dir.clone(), e))?;

            Self::cache_dataframe(df, &parquet_path).await?;
            info!(
                "Cached {} data for station {} to {:?}",
                frequency, station, parquet_path
            );
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| WeatherDataError::ParquetScan(parquet_path.clone(), e))
    }

    /// Downloads and decompresses the bulk file of one station.
    async fn download(
        &self,
        frequency: Frequency,
        station: &str,
    ) -> Result<Vec<u8>, WeatherDataError> {
        let url = format!(
            "{}/{}/{}.csv.gz",
            self.base_url.trim_end_matches('/'),
            frequency.path_segment(),
            station
        );
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url, e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(stream_reader);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(WeatherDataError::DownloadIo)?;
        info!(
            "Downloaded and decompressed {} bytes for station {}",
            decompressed.len(),
            station
        );
        Ok(decompressed)
    }

    /// Parses raw CSV bytes (without header) into a DataFrame using a blocking task.
    /// Assigns column names based on the frequency schema.
    async fn csv_to_dataframe(
        bytes: Vec<u8>,
        station: &str,
        frequency: Frequency,
    ) -> Result<DataFrame, WeatherDataError> {
        let station_owned = station.to_string();
        let schema_names = frequency.get_schema_column_names();

        task::spawn_blocking(move || {
            let csv_io_error = |e| WeatherDataError::CsvReadIo {
                station: station_owned.clone(),
                source: e,
            };
            let mut temp_file = NamedTempFile::new().map_err(csv_io_error)?;
            temp_file.write_all(&bytes).map_err(csv_io_error)?;
            temp_file.flush().map_err(csv_io_error)?;

            let mut df = CsvReadOptions::default()
                .with_has_header(false)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .and_then(|reader| reader.finish())
                .map_err(|e| WeatherDataError::CsvReadPolars {
                    station: station_owned.clone(),
                    source: e,
                })?;

            if df.width() != schema_names.len() {
                warn!(
                    "CSV column count ({}) does not match schema length ({}) for station {} and type {}",
                    df.width(),
                    schema_names.len(),
                    station_owned,
                    frequency
                );
                return Err(WeatherDataError::SchemaMismatch {
                    station: station_owned,
                    data_type: frequency,
                    expected: schema_names.len(),
                    found: df.width(),
                });
            }

            df.set_column_names(schema_names.iter().copied())
                .map_err(|e| WeatherDataError::ColumnRenameError {
                    station: station_owned,
                    source: e,
                })?;

            Ok(df)
        })
        .await?
    }

    /// Writes a DataFrame to a parquet file on a blocking thread.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), WeatherDataError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| WeatherDataError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| WeatherDataError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), WeatherDataError>(())
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY_CSV: &str = "\
2020-07-28,22.1,15.0,27.4,0.0,,200,10.1,,1015.2,
2020-07-29,23.0,16.2,,1.2,,210,8.3,,1013.9,
2020-07-30,24.5,17.1,31.0,0.0,,190,6.5,,1012.0,
";

    #[tokio::test]
    async fn test_csv_to_dataframe_names_columns() -> Result<(), WeatherDataError> {
        let df = WeatherDataLoader::csv_to_dataframe(
            DAILY_CSV.as_bytes().to_vec(),
            "12375",
            Frequency::Daily,
        )
        .await?;

        assert_eq!(df.shape(), (3, 11));
        assert_eq!(
            df.get_column_names(),
            [
                "date", "tavg", "tmin", "tmax", "prcp", "snow", "wdir", "wspd", "wpgt", "pres",
                "tsun",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_with_wrong_width_is_schema_mismatch() {
        let result = WeatherDataLoader::csv_to_dataframe(
            b"2020-07-28,22.1,15.0\n".to_vec(),
            "12375",
            Frequency::Daily,
        )
        .await;

        assert!(matches!(
            result,
            Err(WeatherDataError::SchemaMismatch {
                expected: 11,
                found: 3,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_cached_parquet_is_served_without_download() -> Result<(), WeatherDataError> {
        let dir = tempfile::tempdir()?;
        let df = WeatherDataLoader::csv_to_dataframe(
            DAILY_CSV.as_bytes().to_vec(),
            "12375",
            Frequency::Daily,
        )
        .await?;
        let path = dir.path().join("daily-12375.parquet");
        WeatherDataLoader::cache_dataframe(df, &path).await?;

        let loader = WeatherDataLoader::new(dir.path());
        let frame = loader.get_frame(Frequency::Daily, "12375").await?.collect()?;
        assert_eq!(frame.height(), 3);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires network access to bulk.meteostat.net"]
    async fn test_download_daily_frame() -> Result<(), WeatherDataError> {
        let dir = tempfile::tempdir()?;
        let loader = WeatherDataLoader::new(dir.path());
        let frame = loader.get_frame(Frequency::Daily, "12375").await?.collect()?;
        assert!(frame.height() > 20_000);
        assert_eq!(frame.width(), 11);
        Ok(())
    }
}
