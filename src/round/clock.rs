//! Wall-clock seam and the per-round elapsed timer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current time. Injected so rounds can be driven deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for daily puzzle selection (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep one handle
/// and give another to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += Duration::seconds(secs);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Elapsed-seconds timer for one round.
///
/// `elapsed_seconds` never decreases while running and is fixed once frozen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundClock {
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    running: bool,
}

impl RoundClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.elapsed_seconds = 0;
        self.running = true;
    }

    /// Recompute elapsed seconds. Returns true when the displayed value changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }
        let Some(started) = self.started_at else {
            return false;
        };
        let secs = now.signed_duration_since(started).num_seconds().max(0) as u64;
        if secs > self.elapsed_seconds {
            self.elapsed_seconds = secs;
            true
        } else {
            false
        }
    }

    /// Take a final reading and stop. Returns true only for the call that actually stopped it.
    pub fn freeze(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }
        self.tick(now);
        self.running = false;
        true
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn tick_is_monotonic() {
        let mut clock = RoundClock::new();
        clock.start(t0());
        assert!(clock.tick(t0() + Duration::seconds(5)));
        assert_eq!(clock.elapsed_seconds(), 5);
        // A clock that appears to go backwards never lowers the reading
        assert!(!clock.tick(t0() + Duration::seconds(2)));
        assert_eq!(clock.elapsed_seconds(), 5);
    }

    #[test]
    fn freeze_stops_exactly_once() {
        let mut clock = RoundClock::new();
        clock.start(t0());
        assert!(clock.freeze(t0() + Duration::seconds(7)));
        assert!(!clock.freeze(t0() + Duration::seconds(9)));
        assert!(!clock.tick(t0() + Duration::seconds(60)));
        assert_eq!(clock.elapsed_seconds(), 7);
        assert!(!clock.is_running());
    }

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = RoundClock::new();
        assert!(!clock.tick(t0()));
        assert!(!clock.freeze(t0()));
        assert_eq!(clock.started_at(), None);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(t0());
        let handle = clock.clone();
        handle.advance_secs(30);
        assert_eq!(clock.now(), t0() + Duration::seconds(30));
        assert_eq!(clock.today(), t0().date_naive());
    }
}
