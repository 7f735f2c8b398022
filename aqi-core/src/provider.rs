use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::CoreError;

pub mod purpleair;

/// Source of raw station data.
///
/// Implementations return the response body as-is; decoding lives in
/// [`crate::aggregate`] so it stays testable without a network. The poller
/// issues exactly one fetch per due tick, with no retry or backoff.
#[async_trait]
pub trait SensorProvider: Send + Sync + Debug {
    async fn fetch_station(&self) -> Result<String, CoreError>;
}
