//! Core library for the PurpleAir AQI indicator.
//!
//! This crate defines:
//! - The EPA breakpoint conversion from PM2.5 to an AQI value
//! - Aggregation of a station's two sensor channels into one average
//! - The timer-driven poller that feeds an indicator surface
//! - Configuration handling and the provider abstraction
//!
//! It is used by `aqi-indicator`, but can also be reused by other binaries
//! or services that want an AQI value without the on-screen surface.

pub mod aggregate;
pub mod aqi;
pub mod config;
pub mod error;
pub mod indicator;
pub mod model;
pub mod poller;
pub mod provider;

pub use aggregate::aggregate;
pub use aqi::aqi_from_pm25;
pub use config::Config;
pub use error::CoreError;
pub use indicator::IndicatorSink;
pub use model::{AqiSample, IndicatorState, SensorReading, Severity, StationResult};
pub use poller::Poller;
pub use provider::{SensorProvider, purpleair::PurpleAirProvider};
