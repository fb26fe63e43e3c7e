//! Time sources for the session machine

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate, TimeDelta};

/// Wall-clock and monotonic time, swappable in tests
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Monotonic time used for countdown timers
    fn instant(&self) -> Instant;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the OS
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    start: DateTime<Local>,
    base: Instant,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            start,
            base: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.start + TimeDelta::milliseconds(self.elapsed.get().as_millis() as i64)
    }

    fn instant(&self) -> Instant {
        self.base + self.elapsed.get()
    }
}
