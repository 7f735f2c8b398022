//! Boundary to whatever surface actually renders the indicator.
//!
//! The status-bar icon, menu and click handling are platform glue and live
//! outside this crate; all a surface gets from the core is the latest
//! [`IndicatorState`] and, once known, the map link to open on click.

use crate::model::IndicatorState;

pub trait IndicatorSink {
    /// Show a new state. Called from a single task, so implementations
    /// never see concurrent updates; last write wins.
    fn update(&mut self, state: &IndicatorState);

    /// Provide the station's map URL. Called at most once per process,
    /// after the first successful fetch.
    fn set_map_url(&mut self, url: &str);
}

/// Sink that records every update. Test double, also handy for wiring up a
/// surface before it can render.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub updates: Vec<IndicatorState>,
    pub map_url: Option<String>,
}

impl IndicatorSink for RecordingSink {
    fn update(&mut self, state: &IndicatorState) {
        self.updates.push(state.clone());
    }

    fn set_map_url(&mut self, url: &str) {
        self.map_url = Some(url.to_string());
    }
}
