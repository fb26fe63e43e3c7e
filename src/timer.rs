//! Cancellable one-second timer slot
//!
//! A single slot holds at most one recurring timer. Scheduling always cancels
//! whatever was armed before, and every firing carries the id it was armed
//! with so a callback from a cancelled timer can be recognised and dropped.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Armed {
    id: TimerId,
    next_due: Instant,
    period: Duration,
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    next_id: u64,
    armed: Option<Armed>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a recurring timer; the first firing is one period after `now`
    pub fn schedule(&mut self, now: Instant, period: Duration) -> TimerId {
        self.cancel();
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.armed = Some(Armed {
            id,
            next_due: now + period,
            period,
        });
        id
    }

    /// Returns true if a timer was armed
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn current(&self) -> Option<TimerId> {
        self.armed.as_ref().map(|a| a.id)
    }

    pub fn is_current(&self, id: TimerId) -> bool {
        self.current() == Some(id)
    }

    /// Fire once if the armed timer is due at `now`, returning the instant
    /// the period actually ended.
    ///
    /// Call repeatedly to catch up on missed periods.
    pub fn poll(&mut self, now: Instant) -> Option<(TimerId, Instant)> {
        let armed = self.armed.as_mut()?;
        if now < armed.next_due {
            return None;
        }
        let due = armed.next_due;
        armed.next_due += armed.period;
        Some((armed.id, due))
    }
}
