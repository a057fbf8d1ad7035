//! Frame clock
//!
//! Turns host timestamps (milliseconds, monotonic) into per-frame deltas.
//! The delta is clamped so a backgrounded window doesn't fling every
//! particle across the screen on its first frame back.

use std::collections::VecDeque;

/// Upper bound on a single frame's simulation step, in seconds
pub const DEFAULT_DT_MAX: f32 = 0.05;

/// Number of raw frame times kept for FPS reporting
const SAMPLE_COUNT: usize = 60;

/// Time values handed to every layer for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Host timestamp in milliseconds
    pub now_ms: f64,
    /// Clamped delta in seconds
    pub dt: f32,
    /// Sum of clamped deltas since the clock started, in seconds
    pub elapsed: f32,
}

/// Clamped-delta clock with a rolling frame-time window
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt_max: f32,
    last_ms: Option<f64>,
    elapsed: f32,
    frame_times: VecDeque<f32>,
}

impl FrameClock {
    pub fn new(dt_max: f32) -> Self {
        Self {
            dt_max: dt_max.max(0.0),
            last_ms: None,
            elapsed: 0.0,
            frame_times: VecDeque::with_capacity(SAMPLE_COUNT),
        }
    }

    /// Advance to `now_ms`. The first tick has `dt = 0`; a timestamp that goes
    /// backwards also yields `dt = 0`. A non-finite timestamp repeats the
    /// previous one.
    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let now_ms = if now_ms.is_finite() {
            now_ms
        } else {
            self.last_ms.unwrap_or(0.0)
        };
        let raw = self
            .last_ms
            .map_or(0.0, |last| ((now_ms - last) / 1000.0) as f32);
        self.last_ms = Some(now_ms);

        if self.frame_times.len() == SAMPLE_COUNT {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(raw.max(0.0));

        let dt = raw.clamp(0.0, self.dt_max);
        self.elapsed += dt;

        Frame {
            now_ms,
            dt,
            elapsed: self.elapsed,
        }
    }

    /// Timestamp of the most recent tick (0 before the first one)
    pub fn now_ms(&self) -> f64 {
        self.last_ms.unwrap_or(0.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn dt_max(&self) -> f32 {
        self.dt_max
    }

    /// Average frame time over the sample window, in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }

    /// Average frames per second over the sample window
    pub fn avg_fps(&self) -> f32 {
        let ms = self.avg_frame_time_ms();
        if ms > 0.0 {
            1000.0 / ms
        } else {
            0.0
        }
    }

    /// Min/max FPS from the sample window
    pub fn min_max_fps(&self) -> (f32, f32) {
        let timed = self.frame_times.iter().copied().filter(|&dt| dt > 0.0);
        let (min_dt, max_dt) = timed.fold((f32::INFINITY, 0.0_f32), |(lo, hi), dt| {
            (lo.min(dt), hi.max(dt))
        });
        if max_dt <= 0.0 {
            return (0.0, 0.0);
        }
        (1.0 / max_dt, 1.0 / min_dt)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_DT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_has_zero_dt() {
        let mut clock = FrameClock::default();
        let frame = clock.tick(1234.0);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.elapsed, 0.0);
        assert_eq!(frame.now_ms, 1234.0);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        let frame = clock.tick(16.0);
        assert!((frame.dt - 0.016).abs() < 1e-6);

        // Tab was in the background for five seconds
        let frame = clock.tick(5016.0);
        assert_eq!(frame.dt, DEFAULT_DT_MAX);
        assert!((frame.elapsed - 0.066).abs() < 1e-5);
    }

    #[test]
    fn test_backwards_time_is_zero_dt() {
        let mut clock = FrameClock::default();
        clock.tick(100.0);
        let frame = clock.tick(50.0);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(clock.now_ms(), 50.0);
    }

    #[test]
    fn test_non_finite_time_is_zero_dt() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        let frame = clock.tick(f64::NAN);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.elapsed, 0.0);
        assert_eq!(frame.now_ms, 0.0);

        let frame = clock.tick(f64::INFINITY);
        assert_eq!(frame.dt, 0.0);

        // Recovers on the next real timestamp
        let frame = clock.tick(16.0);
        assert!((frame.dt - 0.016).abs() < 1e-6);
        assert!(frame.elapsed.is_finite());
    }

    #[test]
    fn test_nan_before_first_tick() {
        let mut clock = FrameClock::default();
        let frame = clock.tick(f64::NAN);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.now_ms, 0.0);
        assert!(clock.tick(20.0).dt.is_finite());
    }

    #[test]
    fn test_fps_window() {
        let mut clock = FrameClock::default();
        let mut now = 0.0;
        for _ in 0..10 {
            clock.tick(now);
            now += 20.0;
        }
        assert!((clock.avg_fps() - 50.0).abs() < 6.0);
        let (min, max) = clock.min_max_fps();
        assert!((min - 50.0).abs() < 0.5);
        assert!((max - 50.0).abs() < 0.5);
    }
}
