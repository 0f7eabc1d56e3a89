use std::time::{Duration, Instant};

pub const DEFAULT_STABILIZATION_PERIOD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Stabilizing,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    Activated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitoringState {
    pub active: bool,
    pub start_time: Instant,
    pub stabilization_period: Duration,
}

/// Holds monitoring off for a warm-up period after start or reset, so
/// allocator and startup noise stays out of the statistics.
#[derive(Debug, Clone)]
pub struct StabilizationGate {
    phase: GatePhase,
    start_time: Instant,
    period: Duration,
}

impl StabilizationGate {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    pub fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            phase: GatePhase::Stabilizing,
            start_time: start,
            period,
        }
    }

    /// Reports `Activated` on the first poll at or past the period, and never
    /// again until the next reset.
    pub fn poll(&mut self, now: Instant) -> Option<GateTransition> {
        if self.phase == GatePhase::Active {
            return None;
        }

        if now.saturating_duration_since(self.start_time) >= self.period {
            self.phase = GatePhase::Active;
            return Some(GateTransition::Activated);
        }

        None
    }

    pub fn reset(&mut self, now: Instant) {
        self.phase = GatePhase::Stabilizing;
        self.start_time = now;
    }

    pub fn is_active(&self) -> bool {
        self.phase == GatePhase::Active
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.phase {
            GatePhase::Active => Duration::ZERO,
            GatePhase::Stabilizing => self
                .period
                .saturating_sub(now.saturating_duration_since(self.start_time)),
        }
    }

    pub fn state(&self) -> MonitoringState {
        MonitoringState {
            active: self.is_active(),
            start_time: self.start_time,
            stabilization_period: self.period,
        }
    }
}

impl Default for StabilizationGate {
    fn default() -> Self {
        Self::new(DEFAULT_STABILIZATION_PERIOD)
    }
}
