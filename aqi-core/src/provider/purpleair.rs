use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::SensorProvider;
use crate::error::CoreError;

const BASE_URL: &str = "https://www.purpleair.com/json";

/// The original relied on platform socket defaults; a bounded timeout is a
/// deliberate hardening deviation so a hung request cannot stall the poll
/// loop past the next refresh.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches the public per-station JSON feed for one fixed sensor id.
#[derive(Debug, Clone)]
pub struct PurpleAirProvider {
    sensor_id: u32,
    http: Client,
}

impl PurpleAirProvider {
    pub fn new(sensor_id: u32) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { sensor_id, http }
    }

    pub fn sensor_id(&self) -> u32 {
        self.sensor_id
    }
}

#[async_trait]
impl SensorProvider for PurpleAirProvider {
    async fn fetch_station(&self) -> Result<String, CoreError> {
        let res = self
            .http
            .get(BASE_URL)
            .query(&[("show", self.sensor_id)])
            .send()
            .await
            .map_err(CoreError::Network)?
            // A non-2xx answer counts as a transport failure: the poller
            // treats it exactly like a connection error and retries on the
            // next tick.
            .error_for_status()
            .map_err(CoreError::Network)?;

        let body = res.text().await.map_err(CoreError::Network)?;

        debug!(sensor_id = self.sensor_id, bytes = body.len(), "fetched station feed");
        Ok(body)
    }
}
