//! Deliberate garbage generation.
//!
//! Each tick allocates a batch of fixed-size buffers and keeps only the newest
//! `retention_cap` of them alive, so the rest become reclaimable every frame.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use strum::Display;

pub const DEFAULT_OBJECT_SIZE: usize = 1000;
pub const DEFAULT_RETENTION_CAP: usize = 1000;
pub const DEFAULT_OBJECTS_PER_LEVEL: [usize; 3] = [100, 1_000, 10_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum StressLevel {
    #[default]
    #[strum(to_string = "1")]
    Low,
    #[strum(to_string = "2")]
    Medium,
    #[strum(to_string = "3")]
    High,
}

impl StressLevel {
    pub fn index(self) -> usize {
        match self {
            StressLevel::Low => 0,
            StressLevel::Medium => 1,
            StressLevel::High => 2,
        }
    }
}

impl TryFrom<u8> for StressLevel {
    type Error = AppError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            1 => Ok(StressLevel::Low),
            2 => Ok(StressLevel::Medium),
            3 => Ok(StressLevel::High),
            other => Err(AppError::InvalidStressLevel(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StressConfig {
    pub enabled: bool,
    pub level: StressLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressSettings {
    #[serde(default = "default_object_size")]
    pub object_size: usize,

    #[serde(default = "default_retention_cap")]
    pub retention_cap: usize,

    #[serde(default = "default_objects_per_level")]
    pub objects_per_level: [usize; 3],
}

impl Default for StressSettings {
    fn default() -> Self {
        Self {
            object_size: default_object_size(),
            retention_cap: default_retention_cap(),
            objects_per_level: default_objects_per_level(),
        }
    }
}

fn default_object_size() -> usize {
    DEFAULT_OBJECT_SIZE
}

fn default_retention_cap() -> usize {
    DEFAULT_RETENTION_CAP
}

fn default_objects_per_level() -> [usize; 3] {
    DEFAULT_OBJECTS_PER_LEVEL
}

pub struct StressGenerator {
    config: StressConfig,
    settings: StressSettings,
    retained: VecDeque<Vec<u8>>,
    objects_created: u64,
    last_tick_duration: Duration,
}

impl StressGenerator {
    pub fn new(settings: StressSettings) -> Self {
        Self {
            config: StressConfig::default(),
            retained: VecDeque::with_capacity(settings.retention_cap),
            settings,
            objects_created: 0,
            last_tick_duration: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) {
        let started = Instant::now();

        if self.config.enabled {
            let count = self.objects_per_tick();
            for _ in 0..count {
                self.retained.push_back(vec![0u8; self.settings.object_size]);
            }
            self.objects_created += count as u64;

            let surplus = self
                .retained
                .len()
                .saturating_sub(self.settings.retention_cap);
            self.retained.drain(..surplus);
        }

        self.last_tick_duration = started.elapsed();
    }

    pub fn toggle(&mut self) -> bool {
        self.config.enabled = !self.config.enabled;
        self.config.enabled
    }

    pub fn set_level(&mut self, level: u8) -> Result<()> {
        self.config.level = StressLevel::try_from(level)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.retained.clear();
        self.objects_created = 0;
    }

    pub fn objects_per_tick(&self) -> usize {
        self.settings.objects_per_level[self.config.level.index()]
    }

    pub fn config(&self) -> StressConfig {
        self.config
    }

    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    pub fn retained_bytes(&self) -> usize {
        self.retained.iter().map(Vec::len).sum()
    }

    pub fn objects_created(&self) -> u64 {
        self.objects_created
    }

    pub fn last_tick_duration(&self) -> Duration {
        self.last_tick_duration
    }
}

impl Default for StressGenerator {
    fn default() -> Self {
        Self::new(StressSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_generator_allocates_nothing() {
        let mut generator = StressGenerator::default();
        for _ in 0..10 {
            generator.tick();
        }
        assert_eq!(generator.objects_created(), 0);
        assert_eq!(generator.retained_count(), 0);
    }

    #[test]
    fn test_level_two_stabilizes_at_retention_cap() {
        let mut generator = StressGenerator::default();
        generator.set_level(2).unwrap();
        assert!(generator.toggle());

        for n in 1..=5u64 {
            generator.tick();
            assert_eq!(generator.retained_count(), 1000usize.min(n as usize * 1000));
            assert_eq!(generator.objects_created(), n * 1000);
        }
        assert_eq!(generator.retained_bytes(), 1000 * DEFAULT_OBJECT_SIZE);
    }

    #[test]
    fn test_low_level_grows_until_cap() {
        let mut generator = StressGenerator::default();
        generator.toggle();

        for n in 1..=12usize {
            generator.tick();
            assert_eq!(generator.retained_count(), 1000.min(n * 100));
        }
        assert_eq!(generator.objects_created(), 1_200);
    }

    #[test]
    fn test_set_level_validates_range() {
        let mut generator = StressGenerator::default();
        assert!(matches!(
            generator.set_level(4),
            Err(AppError::InvalidStressLevel(4))
        ));
        assert!(generator.set_level(0).is_err());

        generator.set_level(3).unwrap();
        assert_eq!(generator.config().level, StressLevel::High);
        assert_eq!(generator.objects_per_tick(), 10_000);
        assert_eq!(generator.config().level.to_string(), "3");
    }

    #[test]
    fn test_reset_drops_retained_objects() {
        let mut generator = StressGenerator::default();
        generator.toggle();
        generator.tick();
        generator.reset();

        assert_eq!(generator.retained_count(), 0);
        assert_eq!(generator.objects_created(), 0);
        assert!(generator.config().enabled);
    }
}
