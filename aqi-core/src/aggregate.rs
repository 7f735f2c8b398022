//! Turn a raw provider response into a [`StationResult`].
//!
//! PurpleAir returns one record per sensor channel; a station has two.
//! The PM2.5 concentration arrives as a *string* field, so each record is
//! parsed individually and bad records are skipped instead of failing the
//! whole batch.

use serde::Deserialize;

use crate::error::CoreError;
use crate::model::{SensorReading, StationResult};

#[derive(Debug, Deserialize)]
struct PaResponse {
    results: Vec<PaRecord>,
}

#[derive(Debug, Deserialize)]
struct PaRecord {
    #[serde(rename = "PM2_5Value")]
    pm2_5_value: Option<String>,
    #[serde(rename = "Lat")]
    lat: Option<f64>,
    #[serde(rename = "Lon")]
    lon: Option<f64>,
}

/// Parse a provider response body and collect its usable readings.
///
/// Fails with [`CoreError::Parse`] when the payload is not an object or
/// `results` is not an array. Records with a missing or non-numeric
/// `PM2_5Value` are filtered out, so the average later runs over the
/// surviving values only. Coordinates come from the first record; both
/// channels of a station share them.
pub fn aggregate(body: &str) -> Result<StationResult, CoreError> {
    let parsed: PaResponse = serde_json::from_str(body).map_err(CoreError::Parse)?;

    let sensors = parsed
        .results
        .iter()
        .filter_map(|r| {
            let pm25 = r.pm2_5_value.as_ref()?.trim().parse::<f64>().ok()?;
            Some(SensorReading { pm25 })
        })
        .collect();

    let first = parsed.results.first();

    Ok(StationResult {
        sensors,
        latitude: first.and_then(|r| r.lat),
        longitude: first.and_then(|r| r.lon),
    })
}
