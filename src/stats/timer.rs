//! Monotonic interval stopwatch used by every measurement.

use std::time::{Duration, Instant};

/// Stopwatch over `Instant`, never the wall clock.
///
/// Elapsed time is always "now minus the recorded start", whether or not the
/// timer is running. `stop` only clears the running flag, so callers read the
/// elapsed value first and stop afterwards.
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            running: false,
        }
    }

    /// Record the current instant and mark running
    pub fn start(&mut self) {
        self.start = Instant::now();
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Re-capture the start instant and clear the running flag
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Saturates at `u64::MAX` (about 584 years).
    pub fn elapsed_nanoseconds(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    pub fn elapsed_microseconds(&self) -> f64 {
        self.elapsed_nanoseconds() as f64 / 1_000.0
    }

    pub fn elapsed_milliseconds(&self) -> f64 {
        self.elapsed_nanoseconds() as f64 / 1_000_000.0
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn start_and_stop_toggle_running() {
        let mut timer = Timer::new();
        assert!(!timer.is_running());
        timer.start();
        assert!(timer.is_running());
        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn elapsed_is_readable_before_stop() {
        let mut timer = Timer::new();
        timer.start();
        thread::sleep(Duration::from_millis(2));
        assert!(timer.is_running());
        assert!(timer.elapsed_nanoseconds() >= 2_000_000);
    }

    #[test]
    fn stop_keeps_the_start_instant() {
        let mut timer = Timer::new();
        timer.start();
        thread::sleep(Duration::from_millis(2));
        let before = timer.elapsed_nanoseconds();
        timer.stop();
        assert!(timer.elapsed_nanoseconds() >= before);
    }

    #[test]
    fn reset_recaptures_start() {
        let mut timer = Timer::new();
        timer.start();
        thread::sleep(Duration::from_millis(5));
        timer.reset();
        assert!(!timer.is_running());
        assert!(timer.elapsed() < Duration::from_millis(5));
    }

    #[test]
    fn unit_conversions_agree() {
        let mut timer = Timer::new();
        timer.start();
        thread::sleep(Duration::from_millis(1));
        timer.stop();
        let ms = timer.elapsed_milliseconds();
        let us = timer.elapsed_microseconds();
        // read back to back, so only monotonic growth is guaranteed
        assert!(us / 1_000.0 <= timer.elapsed_milliseconds());
        assert!(ms >= 1.0);
        assert!(timer.elapsed_seconds() >= 0.001);
    }
}
