use crate::error::Result;
use crate::metrics::ring_buffer::RingBuffer;
use crate::metrics::stats;
use std::time::{Duration, Instant};

pub const DEFAULT_FRAME_HISTORY: usize = 120;
pub const DEFAULT_MAX_WINDOW: Duration = Duration::from_secs(5);

/// Turns successive ticks into frame deltas and keeps the worst frame of the
/// current window.
#[derive(Debug, Clone)]
pub struct FrameClock {
    samples: RingBuffer<f64>,
    last_tick: Instant,
    window: Duration,
    window_start: Instant,
    window_max: f64,
}

impl FrameClock {
    pub fn new(history: usize, window: Duration) -> Self {
        Self::starting_at(Instant::now(), history, window)
    }

    pub fn starting_at(start: Instant, history: usize, window: Duration) -> Self {
        Self {
            samples: RingBuffer::new(history),
            last_tick: start,
            window,
            window_start: start,
            window_max: 0.0,
        }
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Returns the seconds elapsed since the previous tick (or construction).
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let delta = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.samples.push(delta);

        if delta > self.window_max {
            self.window_max = delta;
        }

        if now.saturating_duration_since(self.window_start) > self.window {
            self.window_start = now;
            self.window_max = 0.0;
        }

        delta
    }

    /// Largest delta seen since the window last rolled over.
    pub fn window_max(&self) -> f64 {
        self.window_max
    }

    pub fn last_delta(&self) -> Option<f64> {
        self.samples.latest()
    }

    pub fn fps(&self) -> f64 {
        match stats::mean(&self.samples.to_vec()) {
            Ok(mean) if mean > 0.0 => 1.0 / mean,
            _ => 0.0,
        }
    }

    pub fn median_frame_time(&self) -> Result<f64> {
        stats::median(&self.samples.to_vec())
    }

    pub fn samples(&self) -> &RingBuffer<f64> {
        &self.samples
    }

    pub fn reset_window(&mut self, now: Instant) {
        self.window_start = now;
        self.window_max = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_HISTORY, DEFAULT_MAX_WINDOW)
    }
}
