/// A frame longer than this visibly stutters at 60 FPS (one dropped frame is
/// about 16.7 ms).
pub const DEFAULT_PAUSE_THRESHOLD_S: f64 = 0.020;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PauseStats {
    pub pause_count: u64,
    pub longest_pause_s: f64,
}

/// Frame-time proxy for stop-the-world pauses.
///
/// Any long frame counts, whatever caused it: scheduler jitter, terminal I/O
/// and GC pauses all look the same from here.
#[derive(Debug, Clone)]
pub struct PauseDetector {
    threshold_s: f64,
    stats: PauseStats,
}

impl PauseDetector {
    pub fn new(threshold_s: f64) -> Self {
        Self {
            threshold_s,
            stats: PauseStats::default(),
        }
    }

    pub fn evaluate(&mut self, delta_s: f64, monitoring_active: bool) {
        if !monitoring_active {
            return;
        }

        if delta_s > self.threshold_s {
            self.stats.pause_count += 1;
            self.stats.longest_pause_s = self.stats.longest_pause_s.max(delta_s);
        }
    }

    pub fn stats(&self) -> PauseStats {
        self.stats
    }

    pub fn threshold_s(&self) -> f64 {
        self.threshold_s
    }

    pub fn reset(&mut self) {
        self.stats = PauseStats::default();
    }
}

impl Default for PauseDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PAUSE_THRESHOLD_S)
    }
}
