//! Time-driven orchestration: fetch, aggregate, convert, push.
//!
//! One `Poller` value owns every piece of mutable state (last fetch time,
//! cached map URL, last pushed indicator state), and both the tick path
//! and the fetch-completion path run inside the same task, so there is
//! never a concurrent writer and no locking.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::error::CoreError;
use crate::indicator::IndicatorSink;
use crate::model::{AqiSample, IndicatorState};
use crate::provider::SensorProvider;

/// Consecutive recovered failures before the on-screen value is flagged
/// as stale. Transient blips self-heal on the next tick and stay quiet.
pub const STALE_AFTER_FAILURES: u32 = 3;

pub struct Poller<P, S> {
    provider: P,
    sink: S,
    refresh_interval: TimeDelta,

    /// Time of the last fetch that reached the provider. Gates whether a
    /// tick actually hits the network. Not advanced on network failure,
    /// so the next tick retries immediately.
    last_fetched: Option<DateTime<Utc>>,

    /// Computed from the first successful response and then frozen for
    /// the lifetime of the process.
    map_url: Option<String>,

    last_state: IndicatorState,
    consecutive_failures: u32,
}

impl<P, S> Poller<P, S>
where
    P: SensorProvider,
    S: IndicatorSink,
{
    pub fn new(provider: P, sink: S, refresh_interval: Duration) -> Self {
        let refresh_interval =
            TimeDelta::from_std(refresh_interval).unwrap_or(TimeDelta::MAX);

        Self {
            provider,
            sink,
            refresh_interval,
            last_fetched: None,
            map_url: None,
            last_state: IndicatorState::neutral(),
            consecutive_failures: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    /// Run forever on a fixed tick. The first tick fires immediately, so
    /// startup does not wait out a full tick interval before fetching.
    pub async fn run(mut self, tick_interval: Duration) {
        self.sink.update(&self.last_state);

        let mut ticks = tokio::time::interval(tick_interval);
        loop {
            ticks.tick().await;
            self.tick_at(Utc::now()).await;
        }
    }

    /// One freshness check, with an explicit clock so tests don't sleep.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) {
        if !self.is_due(now) {
            return;
        }

        match self.fetch_sample(now).await {
            Ok(sample) => {
                info!(average_pm25 = sample.average_pm25, aqi = ?sample.aqi, "sample converted");
                self.consecutive_failures = 0;
                self.push(IndicatorState::for_sample(&sample));
            }
            Err(CoreError::NoData) => {
                // A fetch that worked but carried nothing usable still
                // resets the indicator, it just has no value to show.
                warn!("response contained no usable readings");
                self.consecutive_failures = 0;
                self.push(IndicatorState::neutral());
            }
            Err(err) => {
                // Recovered: the previous state stays on screen and the
                // next tick retries.
                warn!(error = %err, "fetch failed, keeping previous indicator state");
                self.consecutive_failures += 1;
                if self.consecutive_failures >= STALE_AFTER_FAILURES && !self.last_state.stale {
                    let mut stale = self.last_state.clone();
                    stale.stale = true;
                    self.push(stale);
                }
            }
        }
    }

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetched {
            None => true,
            Some(last) => now.signed_duration_since(last) >= self.refresh_interval,
        }
    }

    async fn fetch_sample(&mut self, now: DateTime<Utc>) -> Result<AqiSample, CoreError> {
        let body = self.provider.fetch_station().await?;

        // The provider answered, so the freshness clock advances even if
        // the payload turns out to be malformed below. Only transport
        // failures leave it untouched.
        self.last_fetched = Some(now);

        let station = aggregate(&body)?;

        if self.map_url.is_none() {
            if let Some(url) = station.map_url() {
                debug!(%url, "caching station map link");
                self.sink.set_map_url(&url);
                self.map_url = Some(url);
            }
        }

        if station.sensors.is_empty() {
            return Err(CoreError::NoData);
        }

        Ok(AqiSample::new(station.average_pm25(), now))
    }

    fn push(&mut self, state: IndicatorState) {
        self.sink.update(&state);
        self.last_state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::RecordingSink;
    use crate::model::Severity;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    const TWO_SENSOR_BODY: &str = r#"{"results":[
        {"PM2_5Value":"38.0","Lat":37.77,"Lon":-122.42},
        {"PM2_5Value":"42.0","Lat":37.77,"Lon":-122.42}
    ]}"#;

    #[derive(Debug, Default)]
    struct FakeProviderInner {
        script: Mutex<VecDeque<Result<String, CoreError>>>,
        calls: AtomicUsize,
    }

    #[derive(Debug, Clone, Default)]
    struct FakeProvider {
        inner: Arc<FakeProviderInner>,
    }

    impl FakeProvider {
        fn push_ok(&self, body: &str) {
            self.inner
                .script
                .lock()
                .unwrap()
                .push_back(Ok(body.to_string()));
        }

        fn push_err(&self, err: CoreError) {
            self.inner.script.lock().unwrap().push_back(Err(err));
        }

        fn calls(&self) -> usize {
            self.inner.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SensorProvider for FakeProvider {
        async fn fetch_station(&self) -> Result<String, CoreError> {
            self.inner.calls.fetch_add(1, Ordering::SeqCst);
            self.inner
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("fake provider script exhausted")
        }
    }

    /// Build a real transport error without touching the network: an
    /// invalid URL fails inside the request builder.
    async fn network_error() -> CoreError {
        let err = reqwest::Client::new()
            .get("this is not a url")
            .send()
            .await
            .expect_err("invalid url must fail before any I/O");
        CoreError::Network(err)
    }

    fn poller(provider: FakeProvider) -> Poller<FakeProvider, RecordingSink> {
        Poller::new(provider, RecordingSink::default(), Duration::from_secs(600))
    }

    #[tokio::test]
    async fn first_tick_fetches_and_pushes_sample() {
        let provider = FakeProvider::default();
        provider.push_ok(TWO_SENSOR_BODY);

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(poller.last_fetched(), Some(now));

        let sink = poller.sink();
        // avg 40.0 -> AQI 112 -> orange
        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0].label, "112\u{aa}");
        assert_eq!(sink.updates[0].severity, Severity::Orange);
        assert_eq!(
            sink.map_url.as_deref(),
            Some("https://www.purpleair.com/map?opt=1/mAQI/a10/cC0#10/37.77/-122.42")
        );
    }

    #[tokio::test]
    async fn tick_within_refresh_interval_is_a_no_op() {
        let provider = FakeProvider::default();
        provider.push_ok(TWO_SENSOR_BODY);

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;
        poller.tick_at(now + TimeDelta::seconds(30)).await;
        poller.tick_at(now + TimeDelta::seconds(599)).await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(poller.sink().updates.len(), 1);
    }

    #[tokio::test]
    async fn tick_after_refresh_interval_fetches_again() {
        let provider = FakeProvider::default();
        provider.push_ok(TWO_SENSOR_BODY);
        provider.push_ok(TWO_SENSOR_BODY);

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;
        poller.tick_at(now + TimeDelta::seconds(600)).await;

        assert_eq!(provider.calls(), 2);
        assert_eq!(poller.sink().updates.len(), 2);
    }

    #[tokio::test]
    async fn network_failure_keeps_state_and_retries_next_tick() {
        let provider = FakeProvider::default();
        provider.push_err(network_error().await);
        provider.push_ok(TWO_SENSOR_BODY);

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;

        // Nothing pushed, freshness clock untouched.
        assert!(poller.sink().updates.is_empty());
        assert_eq!(poller.last_fetched(), None);

        // The very next tick retries instead of waiting out the interval.
        poller.tick_at(now + TimeDelta::seconds(30)).await;
        assert_eq!(provider.calls(), 2);
        assert_eq!(poller.sink().updates.len(), 1);
    }

    #[tokio::test]
    async fn parse_failure_keeps_state_but_advances_clock() {
        let provider = FakeProvider::default();
        provider.push_ok("not json at all");

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;

        assert!(poller.sink().updates.is_empty());
        // The provider did answer, so the next tick is not due yet.
        assert_eq!(poller.last_fetched(), Some(now));
        poller.tick_at(now + TimeDelta::seconds(30)).await;
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn empty_results_push_neutral_state() {
        let provider = FakeProvider::default();
        provider.push_ok(r#"{"results":[]}"#);

        let mut poller = poller(provider.clone());
        poller.tick_at(Utc::now()).await;

        let sink = poller.sink();
        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0], IndicatorState::neutral());
    }

    #[tokio::test]
    async fn map_url_is_cached_after_first_success() {
        let provider = FakeProvider::default();
        provider.push_ok(TWO_SENSOR_BODY);
        provider.push_ok(
            r#"{"results":[{"PM2_5Value":"5.0","Lat":51.5,"Lon":-0.1}]}"#,
        );

        let mut poller = poller(provider.clone());
        let now = Utc::now();
        poller.tick_at(now).await;
        poller.tick_at(now + TimeDelta::seconds(600)).await;

        // Still the first station's link, never recomputed.
        assert_eq!(
            poller.sink().map_url.as_deref(),
            Some("https://www.purpleair.com/map?opt=1/mAQI/a10/cC0#10/37.77/-122.42")
        );
    }

    #[tokio::test]
    async fn repeated_failures_flag_the_state_as_stale() {
        let provider = FakeProvider::default();
        provider.push_ok(TWO_SENSOR_BODY);
        for _ in 0..STALE_AFTER_FAILURES {
            provider.push_err(network_error().await);
        }

        let mut poller = poller(provider.clone());
        let mut now = Utc::now();
        poller.tick_at(now).await;

        for _ in 0..STALE_AFTER_FAILURES {
            now += TimeDelta::seconds(600);
            poller.tick_at(now).await;
        }

        let sink = poller.sink();
        // Initial sample, then one stale re-push at the threshold.
        assert_eq!(sink.updates.len(), 2);
        assert_eq!(sink.updates[1].label, "112\u{aa}");
        assert!(sink.updates[1].stale);

        // Recovery clears the flag.
        provider.push_ok(TWO_SENSOR_BODY);
        now += TimeDelta::seconds(600);
        poller.tick_at(now).await;
        let last = poller.sink().updates.last().unwrap();
        assert!(!last.stale);
    }
}
