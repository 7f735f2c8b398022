use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aqi::aqi_from_pm25;

/// One PM2.5 reading from a single sensor channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub pm25: f64,
}

/// Everything extracted from one provider response for one station.
///
/// A station carries two co-located sensor channels; readings that failed
/// to parse are already filtered out by the aggregator, so `sensors` holds
/// only usable values (possibly none).
#[derive(Debug, Clone, PartialEq)]
pub struct StationResult {
    pub sensors: Vec<SensorReading>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StationResult {
    /// Mean PM2.5 over the usable readings. NaN when there are none; the
    /// converter maps NaN to "no AQI" rather than panicking, matching the
    /// degenerate-average contract.
    pub fn average_pm25(&self) -> f64 {
        let sum: f64 = self.sensors.iter().map(|s| s.pm25).sum();
        sum / self.sensors.len() as f64
    }

    /// Link to the station on the PurpleAir map, derived from the first
    /// record's coordinates (both channels share them).
    pub fn map_url(&self) -> Option<String> {
        let (lat, lon) = (self.latitude?, self.longitude?);
        Some(format!(
            "https://www.purpleair.com/map?opt=1/mAQI/a10/cC0#10/{lat}/{lon}"
        ))
    }
}

/// A converted sample, created once per successful fetch and consumed
/// immediately to refresh the indicator. Never retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AqiSample {
    pub average_pm25: f64,
    pub aqi: Option<u16>,
    pub fetched_at: DateTime<Utc>,
}

impl AqiSample {
    pub fn new(average_pm25: f64, fetched_at: DateTime<Utc>) -> Self {
        Self {
            average_pm25,
            aqi: aqi_from_pm25(average_pm25),
            fetched_at,
        }
    }
}

/// Severity bucket the indicator colors by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Neutral,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Severity {
    /// All thresholds are strict: an AQI of exactly 150 is still Orange,
    /// and an AQI of 0 renders in the neutral color.
    pub fn from_aqi(aqi: Option<u16>) -> Self {
        match aqi {
            Some(v) if v > 150 => Severity::Red,
            Some(v) if v > 100 => Severity::Orange,
            Some(v) if v > 50 => Severity::Yellow,
            Some(v) if v > 0 => Severity::Green,
            _ => Severity::Neutral,
        }
    }
}

/// The only externally visible artifact: what the indicator surface shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorState {
    pub label: String,
    pub severity: Severity,
    /// Set once fetches have failed for several consecutive ticks, so a
    /// surface can hint that the value on screen is old.
    pub stale: bool,
}

impl IndicatorState {
    /// The placeholder shown until the first successful sample arrives.
    pub fn neutral() -> Self {
        Self {
            label: "AQI".to_string(),
            severity: Severity::Neutral,
            stale: false,
        }
    }

    /// State for a converted sample; an undefined AQI renders as the
    /// neutral placeholder rather than an error.
    pub fn for_sample(sample: &AqiSample) -> Self {
        match sample.aqi {
            Some(aqi) => Self {
                label: format!("{aqi}\u{aa}"),
                severity: Severity::from_aqi(Some(aqi)),
                stale: false,
            },
            None => Self::neutral(),
        }
    }
}
