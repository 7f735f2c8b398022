use thiserror::Error;

/// Everything that can go wrong between a timer tick and an indicator
/// update. None of these are fatal: the poller recovers all of them
/// locally and the process keeps running.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Transport, DNS or HTTP-status failure talking to the provider.
    #[error("sensor request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered, but the payload was not the expected shape
    /// (top level not an object, `results` not an array, ...).
    #[error("could not parse sensor response: {0}")]
    Parse(#[source] serde_json::Error),

    /// A well-formed response that contained no usable sensor values,
    /// so the average is undefined.
    #[error("no usable sensor readings in response")]
    NoData,
}
