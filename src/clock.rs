//! Time sources for the particle simulation.
//!
//! Particle lifetimes are measured in wall-clock milliseconds while motion is
//! integrated in fixed 60 FPS frames, so the clock only decides *when*
//! particles die, never how far they move.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Duration of one simulated frame in milliseconds (60 FPS).
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time, measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually driven clock. Clones share the same time, so a test can keep one
/// copy and hand the other to a `ParticleSystem`.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set_ms(ms);
        clock
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Advance by `frames` whole 60 FPS frames.
    pub fn advance_frames(&self, frames: u32) {
        self.advance_ms(FRAME_MS * frames as f64);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shares_time_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_ms(250.0);
        assert!((clock.now_ms() - 250.0).abs() < f64::EPSILON);

        clock.set_ms(10.0);
        assert!((handle.now_ms() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_frames() {
        let clock = ManualClock::starting_at(100.0);
        clock.advance_frames(60);
        assert!((clock.now_ms() - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
