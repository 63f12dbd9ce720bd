//! Session timer with one-second ticks
//!
//! Counts how long the player has spent on the current puzzle or game. The
//! timer is frame-driven: the owning context feeds it the time elapsed since
//! the previous frame through [`SessionTimer::advance`], and the timer turns
//! that into whole-second ticks, carrying the remainder to the next frame.
//!
//! # Lifecycle
//!
//! ```text
//! stopped(0) --restart--> running --stop--> stopped(n) --start--> running
//!     ^                                                               |
//!     +---------------------------cancel------------------------------+
//! ```
//!
//! A stopped timer ignores `advance`, so a frame arriving after teardown can
//! never move the clock of a finished session.

use std::time::Duration;

/// Interval between timer ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Restartable, cancelable elapsed-seconds counter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTimer {
    elapsed_secs: u64,
    carry: Duration,
    is_running: bool,
}

impl SessionTimer {
    /// Reset to zero and start counting
    pub fn restart(&mut self) {
        self.elapsed_secs = 0;
        self.carry = Duration::ZERO;
        self.is_running = true;
    }

    /// Resume counting from the current value
    pub fn start(&mut self) {
        self.is_running = true;
    }

    /// Freeze the current value
    pub fn stop(&mut self) {
        self.is_running = false;
        self.carry = Duration::ZERO;
    }

    /// Stop and reset to zero
    pub fn cancel(&mut self) {
        self.stop();
        self.elapsed_secs = 0;
    }

    /// Feed frame time into the timer, returning how many ticks fired
    pub fn advance(&mut self, delta: Duration) -> u64 {
        if !self.is_running {
            return 0;
        }

        self.carry += delta;
        let mut ticks = 0;
        while self.carry >= TICK_INTERVAL {
            self.carry -= TICK_INTERVAL;
            ticks += 1;
        }
        self.elapsed_secs += ticks;
        ticks
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Elapsed time as `mm:ss`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_default_is_stopped_at_zero() {
        let timer = SessionTimer::default();
        assert_eq!(timer.elapsed_secs(), 0);
        assert!(!timer.is_running(), "Timer should start paused");
    }

    #[test]
    fn test_timer_ticks_once_per_second() {
        //! Partial seconds carry across frames
        let mut timer = SessionTimer::default();
        timer.restart();

        assert_eq!(timer.advance(Duration::from_millis(600)), 0);
        assert_eq!(timer.advance(Duration::from_millis(600)), 1);
        assert_eq!(timer.elapsed_secs(), 1);

        assert_eq!(timer.advance(Duration::from_millis(2_800)), 3);
        assert_eq!(timer.elapsed_secs(), 4);
    }

    #[test]
    fn test_stopped_timer_ignores_frames() {
        let mut timer = SessionTimer::default();
        timer.restart();
        timer.advance(Duration::from_secs(5));
        timer.stop();

        assert_eq!(timer.advance(Duration::from_secs(10)), 0);
        assert_eq!(timer.elapsed_secs(), 5, "Stopped timer keeps its value");

        timer.start();
        timer.advance(Duration::from_secs(1));
        assert_eq!(timer.elapsed_secs(), 6, "Resumed timer continues counting");
    }

    #[test]
    fn test_cancel_resets_to_zero() {
        let mut timer = SessionTimer::default();
        timer.restart();
        timer.advance(Duration::from_secs(42));
        timer.cancel();

        assert_eq!(timer.elapsed_secs(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_display_format() {
        let mut timer = SessionTimer::default();
        timer.restart();
        timer.advance(Duration::from_secs(125));
        assert_eq!(timer.display(), "02:05");
    }
}
