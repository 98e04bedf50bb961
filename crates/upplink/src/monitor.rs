use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::DEFAULT_INTERVAL_SECONDS;
use crate::alarm::{Alarm, AlarmSink};
use crate::error::MonitorError;
use crate::probe::{DEFAULT_PROBE_TIMEOUT, Prober};
use crate::status::ConnectivityStatus;
use crate::validation::validate_interval;

/// Receiver of status updates, called from the monitor's own task
///
/// Implementations marshal to their preferred context (UI loop, event bus,
/// test channel); the monitor makes no assumptions about threading beyond
/// `Send + Sync`. Updates arrive in strict per-cycle order.
pub trait StatusSink: Send + Sync {
    /// One delivery per cycle (and per manual check). An error here is
    /// treated as an unrecoverable internal fault: it terminates the
    /// session after a single [`StatusSink::on_fault`] notification.
    fn on_status(&self, status: ConnectivityStatus, at: DateTime<Utc>) -> anyhow::Result<()>;

    /// Terminal error notification for a faulted session
    fn on_fault(&self, _message: &str) {}
}

/// Tunables for a monitor, mirroring what the original tool exposed
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub interval_seconds: u64,
    pub probe_timeout: Duration,
    pub alarm_frequency_hz: u32,
    pub alarm_tone_duration_ms: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            alarm_frequency_hz: 800,
            alarm_tone_duration_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
}

/// State shared between the loop task and the caller-facing methods
struct MonitorCore {
    prober: Arc<dyn Prober>,
    status_sink: Arc<dyn StatusSink>,
    alarm: Alarm,
    interval_seconds: AtomicU64,
    probe_timeout: Duration,
    // One coarse lock over {status, sink delivery, alarm transition} keeps
    // concurrent check-now and scheduled cycles from interleaving updates.
    status: Mutex<ConnectivityStatus>,
}

impl MonitorCore {
    /// One probe, bounded by the configured timeout even if the prober
    /// misbehaves. Elapsed means unreachable.
    async fn probe_once(&self) -> bool {
        timeout(self.probe_timeout, self.prober.probe()).await.unwrap_or(false)
    }

    /// Status write, sink delivery, and alarm transition for one result
    fn apply(&self, reachable: bool) -> Result<ConnectivityStatus, MonitorError> {
        let mut status = self.status.lock().expect("status lock poisoned");
        let next = ConnectivityStatus::from_reachable(reachable);
        *status = next;
        self.status_sink
            .on_status(next, Utc::now())
            .map_err(|e| MonitorError::StatusDelivery(e.to_string()))?;
        if reachable {
            self.alarm.silence();
        } else {
            self.alarm.engage();
        }
        Ok(next)
    }

    /// Session teardown: silence the alarm, revert status to unknown.
    /// Deliberately no sink delivery; the caller renders the idle state.
    fn reset(&self) {
        self.alarm.silence();
        *self.status.lock().expect("status lock poisoned") = ConnectivityStatus::Unknown;
    }
}

/// One live run of the loop: a fresh cancellation handle plus the task
struct Session {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Connectivity monitor
///
/// Owns at most one background session at a time. `start` spawns the
/// polling loop, `stop` cancels and joins it, `check_now` runs a single
/// out-of-cadence probe through the same status/alarm path.
pub struct Monitor {
    core: Arc<MonitorCore>,
    session: Mutex<Option<Session>>,
}

impl Monitor {
    pub fn new(
        prober: Arc<dyn Prober>,
        status_sink: Arc<dyn StatusSink>,
        alarm_sink: Arc<dyn AlarmSink>,
        settings: MonitorSettings,
    ) -> Result<Self, MonitorError> {
        validate_interval(settings.interval_seconds)
            .to_result()
            .map_err(|_| MonitorError::InvalidInterval(settings.interval_seconds))?;

        let core = MonitorCore {
            prober,
            status_sink,
            alarm: Alarm::new(
                alarm_sink,
                settings.alarm_frequency_hz,
                settings.alarm_tone_duration_ms,
            ),
            interval_seconds: AtomicU64::new(settings.interval_seconds),
            probe_timeout: settings.probe_timeout,
            status: Mutex::new(ConnectivityStatus::Unknown),
        };

        Ok(Self { core: Arc::new(core), session: Mutex::new(None) })
    }

    /// Begin a monitoring session.
    ///
    /// Fails with [`MonitorError::AlreadyRunning`] if a session is live;
    /// callers wanting restart semantics stop the old session first.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut session = self.session.lock().expect("session lock poisoned");
        if let Some(live) = session.as_ref() {
            if !live.handle.is_finished() {
                return Err(MonitorError::AlreadyRunning);
            }
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let core = self.core.clone();
        let handle = tokio::spawn(run_loop(core, cancel_rx));
        *session = Some(Session { cancel: cancel_tx, handle });

        info!(interval_seconds = self.interval(), "monitor started");
        Ok(())
    }

    /// Cancel the live session, if any, and wait for it to wind down.
    ///
    /// Idempotent; stopping an idle monitor is a no-op. On return the
    /// status is `Unknown` and the alarm is silent.
    pub async fn stop(&self) {
        let session = self.session.lock().expect("session lock poisoned").take();
        let Some(session) = session else { return };

        // The receiver may already be gone if the session faulted
        let _ = session.cancel.send(true);
        if let Err(e) = session.handle.await {
            if e.is_panic() {
                error!(error = %e, "monitor task panicked during shutdown");
            }
        }
        info!("monitor stopped");
    }

    /// One probe outside the scheduled cadence, applying the same
    /// status/alarm update. Does not touch the session or its timer.
    pub async fn check_now(&self) -> Result<ConnectivityStatus, MonitorError> {
        let reachable = self.core.probe_once().await;
        self.core.apply(reachable)
    }

    /// Change the polling interval. Takes effect at the top of the next
    /// cycle; an in-progress wait is not shortened.
    pub fn set_interval(&self, interval_seconds: u64) -> Result<(), MonitorError> {
        validate_interval(interval_seconds)
            .to_result()
            .map_err(|_| MonitorError::InvalidInterval(interval_seconds))?;
        self.core.interval_seconds.store(interval_seconds, Ordering::Relaxed);
        Ok(())
    }

    pub fn interval(&self) -> u64 {
        self.core.interval_seconds.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> MonitorState {
        match self.session.lock().expect("session lock poisoned").as_ref() {
            Some(live) if !live.handle.is_finished() => MonitorState::Running,
            _ => MonitorState::Idle,
        }
    }

    pub fn status(&self) -> ConnectivityStatus {
        *self.core.status.lock().expect("status lock poisoned")
    }

    pub fn alarm_sounding(&self) -> bool {
        self.core.alarm.is_sounding()
    }
}

/// The session loop: probe, report, wait, until cancelled or faulted
async fn run_loop(core: Arc<MonitorCore>, mut cancel: watch::Receiver<bool>) {
    loop {
        let reachable = tokio::select! {
            _ = cancel.changed() => break,
            reachable = core.probe_once() => reachable,
        };
        // A result that raced with cancellation is discarded, not reported
        if *cancel.borrow() {
            break;
        }

        match core.apply(reachable) {
            Ok(status) => debug!(%status, "cycle complete"),
            Err(e) => {
                error!(error = %e, "monitor session faulted");
                core.status_sink.on_fault(&e.to_string());
                break;
            }
        }

        // Re-read so interval changes land on the next cycle
        let wait = Duration::from_secs(core.interval_seconds.load(Ordering::Relaxed));
        tokio::select! {
            _ = cancel.changed() => break,
            () = tokio::time::sleep(wait) => {}
        }
    }
    core.reset();
}
