//! Cooperative tick scheduling
//!
//! The series advances on a fixed period, driven by the UI frame loop
//! rather than a preemptive timer: each frame polls the [`Ticker`] and the
//! whole advance-render-display sequence runs synchronously inside that
//! frame. "A timer handle exists or not" maps to the presence of the next
//! due time.
//!
//! Start and stop are idempotent: starting while running cancels the
//! pending tick and reschedules (two live schedules are impossible by
//! construction), stopping while stopped is a no-op.

use std::time::{Duration, Instant};

/// Recurring-task handle owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    /// Create a stopped ticker with the given period
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// The configured period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the period; takes effect from the next (re)schedule
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.next_due.is_some() {
            // Reschedule the pending tick under the new period
            self.next_due = Some(Instant::now() + interval);
        }
    }

    /// Whether a tick is currently scheduled
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedule the next tick one period from `now`
    ///
    /// Starting while already running cancels the pending tick and
    /// reschedules; duplicate schedules cannot accumulate.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Cancel the pending tick, if any; returns whether one was cancelled
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Cancel and immediately reschedule from `now`
    pub fn restart(&mut self, now: Instant) {
        self.stop();
        self.start(now);
    }

    /// Fire at most one tick
    ///
    /// Returns true when the pending tick is due, scheduling the next one
    /// a full period from `now` (a stalled frame does not cause a burst of
    /// catch-up ticks).
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time until the pending tick, for frame-loop repaint scheduling
    ///
    /// Zero when already due; `None` when stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
