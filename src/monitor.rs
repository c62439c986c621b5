use std::time::{Duration, Instant};

use crate::display::DisplaySink;
use crate::session::DeviceSession;
use crate::stream::{DeviceProvider, DisplaySeries, RollingMean};
use crate::types::{DeviceCandidate, DisplayUpdate, Reading, UserCommand};

/// Tunables for the monitor. The defaults are the contract: a 250-point
/// window sampled once a second on Arduino-vendor devices, with one-second
/// retry, backoff and watchdog delays.
#[derive(Clone, Copy, Debug)]
pub struct MonitorConfig {
    /// USB vendor id devices must report. 0x2341 is Arduino SA.
    pub vendor_id: u16,
    /// Rolling window and display series capacity.
    pub window: usize,
    /// Sample clock period.
    pub tick_period: Duration,
    /// Delay before re-polling when no device is present.
    pub retry_delay: Duration,
    /// Delay before re-polling after an open failure or hardware error.
    pub backoff_delay: Duration,
    /// Silence window after which a bound device is considered suspect.
    pub watchdog_window: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            vendor_id: 0x2341,
            window: 250,
            tick_period: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
            backoff_delay: Duration::from_secs(1),
            watchdog_window: Duration::from_secs(1),
        }
    }
}

/// Discovery state machine plus sample clock.
///
/// All state lives on one thread. `step(now)` advances whatever is due: it
/// drains the serial link first (fresh data postpones the watchdog), then any
/// due poll deadline, then the sample-clock tick. Deadlines are one-shot
/// `Option<Instant>` fields; re-arming replaces the pending deadline of that
/// class and firing takes it, so duplicate timers cannot exist. Tests drive
/// `step` with synthetic instants.
pub struct Monitor<P: DeviceProvider, S: DisplaySink> {
    provider: P,
    sink: S,
    config: MonitorConfig,
    session: Option<DeviceSession>,
    selected: Option<String>,
    latest: Reading,
    mean1: RollingMean,
    mean2: RollingMean,
    series1: DisplaySeries,
    series2: DisplaySeries,
    retry_at: Option<Instant>,
    watchdog_at: Option<Instant>,
    tick_at: Instant,
}

impl<P: DeviceProvider, S: DisplaySink> Monitor<P, S> {
    pub fn new(provider: P, sink: S, config: MonitorConfig, now: Instant) -> Self {
        Self {
            provider,
            sink,
            config,
            session: None,
            selected: None,
            latest: Reading::default(),
            mean1: RollingMean::with_capacity(config.window),
            mean2: RollingMean::with_capacity(config.window),
            series1: DisplaySeries::new(config.window),
            series2: DisplaySeries::new(config.window),
            // First poll runs immediately; first tick lands one period in.
            retry_at: Some(now),
            watchdog_at: None,
            tick_at: now + config.tick_period,
        }
    }

    /// Applies one inbound user event.
    pub fn handle(&mut self, command: UserCommand, now: Instant) {
        match command {
            UserCommand::Select(id) => self.select(id, now),
            UserCommand::Refresh => self.refresh(now),
            UserCommand::ResetSeries => self.reset_series(),
        }
    }

    /// Advances everything that is due. Safe to call as often as the host
    /// loop likes; nothing happens until a deadline passes or data arrives.
    pub fn step(&mut self, now: Instant) {
        self.drain_session(now);
        if self.watchdog_at.map_or(false, |at| now >= at) {
            self.watchdog_at = None;
            self.poll_devices(now);
        }
        if self.retry_at.map_or(false, |at| now >= at) {
            self.retry_at = None;
            self.poll_devices(now);
        }
        if now >= self.tick_at {
            self.tick(now);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    pub fn bound_device(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.device_id())
    }

    pub fn latest_reading(&self) -> Reading {
        self.latest
    }

    pub fn means(&self) -> (f64, f64) {
        (self.mean1.mean(), self.mean2.mean())
    }

    pub fn series(&self) -> (&DisplaySeries, &DisplaySeries) {
        (&self.series1, &self.series2)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ---- serial data ----

    fn drain_session(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.drain() {
            Ok(readings) => {
                if let Some(last) = readings.last() {
                    // Last write wins; records between ticks overwrite each other.
                    self.latest = *last;
                    self.watchdog_at = Some(now + self.config.watchdog_window);
                }
            }
            Err(e) => {
                log::warn!("{e}");
                self.close_session();
                self.retry_at = Some(now + self.config.backoff_delay);
            }
        }
    }

    // ---- discovery ----

    fn poll_devices(&mut self, now: Instant) {
        let vendor = self.config.vendor_id;
        let candidates: Vec<DeviceCandidate> = match self.provider.list_devices() {
            Ok(all) => all.into_iter().filter(|c| c.vendor_id == vendor).collect(),
            Err(e) => {
                log::warn!("device listing failed: {e}");
                Vec::new()
            }
        };
        if candidates.is_empty() {
            self.close_session();
            self.sink.present_unavailable();
            self.retry_at = Some(now + self.config.retry_delay);
            return;
        }
        log::debug!("{} candidate device(s)", candidates.len());
        self.sink.present_candidates(&candidates);
        let chosen = self.choose(&candidates);
        self.open_device(chosen, now);
    }

    /// Previously selected id when still available, else the first candidate,
    /// which then becomes the selection.
    fn choose(&mut self, candidates: &[DeviceCandidate]) -> String {
        if let Some(id) = &self.selected {
            if candidates.iter().any(|c| &c.id == id) {
                return id.clone();
            }
        }
        let first = candidates[0].id.clone();
        self.selected = Some(first.clone());
        first
    }

    fn open_device(&mut self, id: String, now: Instant) {
        if self.session.as_ref().map(|s| s.device_id()) == Some(id.as_str()) {
            // Healthy session; polling again must not tear it down.
            return;
        }
        self.close_session();
        match DeviceSession::open(&mut self.provider, &id) {
            Ok(session) => {
                log::info!("opened {id}");
                self.session = Some(session);
                self.retry_at = None;
                self.watchdog_at = Some(now + self.config.watchdog_window);
            }
            Err(e) => {
                log::warn!("{e}");
                self.retry_at = Some(now + self.config.backoff_delay);
            }
        }
    }

    /// Closing loses the data source: both channels drop to the neutral zero
    /// baseline and the watchdog disarms. No-op when already closed.
    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("closed {}", session.device_id());
            self.latest = Reading::default();
            self.watchdog_at = None;
        }
    }

    // ---- inbound events ----

    fn select(&mut self, id: String, now: Instant) {
        self.selected = Some(id);
        self.refresh(now);
    }

    /// Immediate poll; cancels any pending scheduled poll first so a stale
    /// deadline cannot fire a duplicate.
    fn refresh(&mut self, now: Instant) {
        self.retry_at = None;
        self.watchdog_at = None;
        self.poll_devices(now);
    }

    /// Cosmetic reset: the rendered series go flat but the rolling windows
    /// and running means are untouched.
    fn reset_series(&mut self) {
        self.series1.reset();
        self.series2.reset();
    }

    // ---- sample clock ----

    fn tick(&mut self, now: Instant) {
        // Read the mailbox exactly once per tick.
        let Reading { sensor1, sensor2 } = self.latest;
        let mean1 = self.mean1.observe(sensor1);
        let mean2 = self.mean2.observe(sensor2);
        self.series1.push(sensor1);
        self.series2.push(sensor2);
        self.sink.on_display_update(DisplayUpdate {
            sensor1,
            sensor2,
            mean1,
            mean2,
        });
        // Fixed-rate schedule with a lag clamp: a stalled host loop gets one
        // late tick, not a burst of catch-up ticks.
        self.tick_at += self.config.tick_period;
        if self.tick_at <= now {
            self.tick_at = now + self.config.tick_period;
        }
    }
}
