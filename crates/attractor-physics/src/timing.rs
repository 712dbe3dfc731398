//! Host-side clocks: per-frame delta and the attractor refresh period

use crate::constants::DT_SCALE_MS;
use std::time::{Duration, Instant};

/// Measures the interval between consecutive frames.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Time since the previous tick. The reference point moves to `now` in the
    /// same call, so no interval is counted twice.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        elapsed
    }
}

/// Simulation time step for an elapsed wall-clock interval. Never negative.
pub fn dt_from_elapsed(elapsed: Duration, speed: f32) -> f32 {
    let ms = elapsed.as_secs_f32() * 1000.0;
    ms / DT_SCALE_MS * speed.max(0.0)
}

/// Fires once per `period`, polled from the event loop.
#[derive(Clone, Copy, Debug)]
pub struct RefreshTicker {
    period: Duration,
    last: Instant,
}

impl RefreshTicker {
    /// Ticks owed after a long stall are capped at this many.
    pub const MAX_CATCH_UP: u32 = 10;

    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, last: now }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of whole periods elapsed since the last fired tick.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        if self.period.is_zero() || elapsed < self.period {
            return 0;
        }

        let due = elapsed.as_nanos() / self.period.as_nanos();
        if due > Self::MAX_CATCH_UP as u128 {
            self.last = now;
            return Self::MAX_CATCH_UP;
        }

        let due = due as u32;
        self.last += self.period * due;
        due
    }

    /// Instant the next tick becomes due
    pub fn next_deadline(&self) -> Instant {
        self.last + self.period
    }
}
