//! Song timer.
//!
//! The timer never runs in the background: the current tick is projected
//! on demand from a wall-clock delta, so no drift accumulates and no
//! thread synchronization is needed. The event loop's redraw tick merely
//! triggers recomputation for display.

use crate::song::{TICK_INTERVAL_MS, TICK_MAX};
use std::time::Instant;

/// The monotonic tick clock driving recording and playback position.
///
/// While running, the tick is `elapsed / TICK_INTERVAL_MS` past the tick
/// at which the clock last started. While stopped, it holds at the
/// stop/seek position.
#[derive(Debug, Clone, Copy)]
pub struct SongTimer {
    /// Wall-clock epoch of the current run; None while stopped.
    started_at: Option<Instant>,

    /// Song tick at which the timer was last started, stopped, or
    /// repositioned.
    resume_tick: u32,

    /// Largest tick value seen so far. Bounds the scroll range and the
    /// recorded length of the song.
    max_tick: u32,
}

impl SongTimer {
    /// Creates a stopped timer at tick 0.
    pub fn new() -> Self {
        Self {
            started_at: None,
            resume_tick: 0,
            max_tick: 0,
        }
    }

    /// Returns true while the clock is advancing.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts the clock from the current position. No-op if already
    /// running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Stops the clock, freezing the position at the projected current
    /// tick. No-op if already stopped.
    pub fn stop(&mut self) {
        if self.started_at.is_some() {
            self.resume_tick = self.current_tick(false);
            self.started_at = None;
        }
    }

    /// Stops the clock and rewinds to the beginning of the song.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.resume_tick = 0;
    }

    /// Returns the current tick.
    ///
    /// While stopped this returns the held position; with `auto_start`
    /// set, a stopped timer is started first and the held position
    /// returned, so the first recorded note lands exactly where the clock
    /// begins. Every call raises the max-tick watermark. The projection
    /// is capped at the end of the song timeline so a runaway recording
    /// cannot push the position past the bounded fret map.
    pub fn current_tick(&mut self, auto_start: bool) -> u32 {
        let tick = match self.started_at {
            Some(epoch) => {
                let elapsed = epoch.elapsed().as_millis() as u64 / TICK_INTERVAL_MS;
                (elapsed as u32)
                    .saturating_add(self.resume_tick)
                    .min(TICK_MAX - 1)
            }
            None => {
                if auto_start {
                    self.started_at = Some(Instant::now());
                }
                self.resume_tick
            }
        };

        if tick > self.max_tick {
            self.max_tick = tick;
        }
        tick
    }

    /// Returns the largest tick seen so far.
    pub fn max_tick(&self) -> u32 {
        self.max_tick
    }

    /// Raises the max-tick watermark, typically after loading a song.
    pub fn set_max_tick(&mut self, tick: u32) {
        if tick > self.max_tick {
            self.max_tick = tick;
        }
    }

    /// Repositions a stopped timer, clamped to the recorded length.
    /// Callers gate this on the timer being stopped; seeking a running
    /// timer would shift its epoch retroactively.
    pub fn seek(&mut self, tick: u32) {
        self.resume_tick = tick.min(self.max_tick);
    }
}

impl Default for SongTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_new_timer_is_stopped_at_zero() {
        let mut timer = SongTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.current_tick(false), 0);
        assert_eq!(timer.max_tick(), 0);
    }

    #[test]
    fn test_stopped_tick_is_stable() {
        let mut timer = SongTimer::new();
        timer.set_max_tick(50);
        timer.seek(30);

        // Repeated reads without auto-start return the same value and
        // leave the timer stopped
        assert_eq!(timer.current_tick(false), 30);
        assert_eq!(timer.current_tick(false), 30);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_auto_start_returns_resume_tick() {
        let mut timer = SongTimer::new();
        timer.set_max_tick(10);
        timer.seek(10);

        assert_eq!(timer.current_tick(true), 10);
        assert!(timer.is_running());
    }

    #[test]
    fn test_running_clock_advances() {
        let mut timer = SongTimer::new();
        timer.start();
        sleep(Duration::from_millis(3 * TICK_INTERVAL_MS));
        // OS sleep can overshoot but never undershoots
        assert!(timer.current_tick(false) >= 3);
    }

    #[test]
    fn test_stop_freezes_position() {
        let mut timer = SongTimer::new();
        timer.start();
        sleep(Duration::from_millis(2 * TICK_INTERVAL_MS));

        let before = timer.current_tick(false);
        timer.stop();
        let frozen = timer.current_tick(false);

        assert!(frozen >= before);
        assert_eq!(timer.current_tick(false), frozen);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_reset_rewinds_to_zero() {
        let mut timer = SongTimer::new();
        timer.set_max_tick(40);
        timer.seek(40);
        timer.start();
        timer.reset();

        assert!(!timer.is_running());
        assert_eq!(timer.current_tick(false), 0);
        // The watermark survives a rewind
        assert_eq!(timer.max_tick(), 40);
    }

    #[test]
    fn test_seek_clamps_to_max_tick() {
        let mut timer = SongTimer::new();
        timer.set_max_tick(100);
        timer.seek(500);
        assert_eq!(timer.current_tick(false), 100);
    }

    #[test]
    fn test_max_tick_tracks_reads() {
        let mut timer = SongTimer::new();
        timer.set_max_tick(20);
        timer.seek(20);
        assert_eq!(timer.current_tick(false), 20);
        assert_eq!(timer.max_tick(), 20);

        timer.set_max_tick(5); // never lowers
        assert_eq!(timer.max_tick(), 20);
    }
}
