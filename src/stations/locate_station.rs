use crate::stations::error::LocateStationError;
use crate::stations::ranking::rank_stations;
use crate::types::candidate::StationCandidate;
use crate::types::station::Station;
use crate::LatLon;
use async_compression::tokio::bufread::GzipDecoder;
use bincode::config::{Configuration, Fixint, LittleEndian};
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use rstar::{RTree, AABB};
use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

const DATA_URL: &str = "https://bulk.meteostat.net/v2/stations/lite.json.gz";
const BINCODE_CACHE_FILE_NAME: &str = "stations_lite.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();
// Mean Earth radius used by `haversine` for kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;
const ENVELOPE_MARGIN_DEG: f64 = 0.01;

/// Spatial index over the provider's station list.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<Station>,
}

impl StationLocator {
    /// Loads the station list from the bincode cache in `cache_dir`, downloading it first if
    /// the cache does not exist yet.
    pub async fn new(cache_dir: &Path) -> Result<Self, LocateStationError> {
        let cache_file = cache_dir.join(BINCODE_CACHE_FILE_NAME);

        let stations: Vec<Station> = if cache_file.exists() {
            let path_clone = cache_file.clone();
            tokio::task::spawn_blocking(move || Self::get_cached_stations(&path_clone)).await??
        } else {
            warn!("Station cache not found. Fetching from URL: {}", DATA_URL);
            let stations = Self::fetch_stations().await?;
            Self::cache_stations(stations.clone(), &cache_file).await?;
            stations
        };

        Ok(Self::from_stations(stations))
    }

    /// Indexes an already materialized station list.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        StationLocator {
            rtree: RTree::bulk_load(stations),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    fn get_cached_stations(cache_path: &Path) -> Result<Vec<Station>, LocateStationError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| LocateStationError::CacheRead(cache_path.to_path_buf(), e))?;
        let (decoded_stations, _) =
            bincode::serde::decode_from_slice::<Vec<Station>, _>(&bytes, BINCODE_CONFIG).map_err(
                |e| LocateStationError::CacheDecode(cache_path.to_path_buf(), Box::new(e)),
            )?;
        Ok(decoded_stations)
    }

    async fn fetch_stations() -> Result<Vec<Station>, LocateStationError> {
        let client = Client::new();
        let response = client
            .get(DATA_URL)
            .send()
            .await
            .map_err(|e| LocateStationError::NetworkRequest(DATA_URL.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.status() {
                    Some(status) => LocateStationError::HttpStatus {
                        url: DATA_URL.to_string(),
                        status,
                        source: e,
                    },
                    None => LocateStationError::NetworkRequest(DATA_URL.to_string(), e),
                });
            }
        };
        let stream = response.bytes_stream().map_err(io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let gzip_decoder = GzipDecoder::new(BufReader::new(stream_reader));
        let mut decoder_reader = BufReader::new(gzip_decoder);
        let mut decompressed_json = Vec::with_capacity(20_000_000);
        decoder_reader.read_to_end(&mut decompressed_json).await?;

        let parse_start = std::time::Instant::now();
        let stations = tokio::task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<Station>>(&decompressed_json)
                .map_err(LocateStationError::from)
        })
        .await??;
        info!(
            "Parsed {} stations from JSON in {:?}",
            stations.len(),
            parse_start.elapsed()
        );
        Ok(stations)
    }

    async fn cache_stations(
        stations: Vec<Station>,
        cache_path: &Path,
    ) -> Result<(), LocateStationError> {
        let cache_start = std::time::Instant::now();
        let bincode_data = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(stations, BINCODE_CONFIG)
                .map_err(|e| LocateStationError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(&cache_path, &bincode_data)
            .await
            .map_err(|e| LocateStationError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Serialized and wrote station cache ({} bytes) to {} in {:?}",
            bincode_data.len(),
            cache_path.display(),
            cache_start.elapsed()
        );
        Ok(())
    }

    /// Finds up to `n_results` stations closer than `max_distance_km` to `target`, ranked
    /// closest first.
    ///
    /// The R-tree works in raw degrees, where a degree of longitude shrinks towards the
    /// poles, so its nearest-neighbour order is not the great-circle order. Every station in a
    /// degree envelope covering the search radius is therefore ranked with haversine before
    /// truncating.
    pub fn query(
        &self,
        target: LatLon,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<StationCandidate> {
        if n_results == 0 || max_distance_km.is_nan() || max_distance_km <= 0.0 {
            return vec![];
        }

        let in_range = search_envelopes(target, max_distance_km)
            .into_iter()
            .flat_map(|envelope| self.rtree.locate_in_envelope(&envelope));

        let mut ranked = rank_stations(in_range, target, max_distance_km);
        ranked.truncate(n_results);
        ranked
    }
}

/// Degree envelopes (as `[latitude, longitude]` boxes) that together contain every point
/// within `radius_km` of `target`. A box crossing the antimeridian is split in two.
fn search_envelopes(target: LatLon, radius_km: f64) -> Vec<AABB<[f64; 2]>> {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees() + ENVELOPE_MARGIN_DEG;
    let lat_min = target.0 - lat_delta;
    let lat_max = target.0 + lat_delta;

    let whole_world = |lat_min: f64, lat_max: f64| {
        vec![AABB::from_corners(
            [lat_min.max(-90.0), -180.0],
            [lat_max.min(90.0), 180.0],
        )]
    };

    // The box reaches a pole, or the radius spans every meridian.
    let cos_lat = target.0.to_radians().cos();
    if lat_min <= -90.0 || lat_max >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
        return whole_world(lat_min, lat_max);
    }
    let ratio = angular.sin() / cos_lat;
    if ratio >= 1.0 {
        return whole_world(lat_min, lat_max);
    }
    let lon_delta = ratio.asin().to_degrees() + ENVELOPE_MARGIN_DEG;
    if lon_delta >= 180.0 {
        return whole_world(lat_min, lat_max);
    }

    let lon_min = target.1 - lon_delta;
    let lon_max = target.1 + lon_delta;
    let mut envelopes = vec![AABB::from_corners(
        [lat_min, lon_min.max(-180.0)],
        [lat_max, lon_max.min(180.0)],
    )];
    if lon_min < -180.0 {
        envelopes.push(AABB::from_corners(
            [lat_min, lon_min + 360.0],
            [lat_max, 180.0],
        ));
    }
    if lon_max > 180.0 {
        envelopes.push(AABB::from_corners(
            [lat_min, -180.0],
            [lat_max, lon_max - 360.0],
        ));
    }
    envelopes
}
