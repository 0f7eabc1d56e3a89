//! Startup configuration, read once from TOML. Every field falls back to its
//! default, so an empty or missing file is valid.

use crate::error::Result;
use crate::gc::types::GcFilter;
use crate::stress::StressSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// Frames longer than this count as suspected pauses.
    #[serde(default = "default_pause_threshold_ms")]
    pub pause_threshold_ms: f64,

    #[serde(default = "default_stabilization_secs")]
    pub stabilization_secs: f64,

    /// Length of the rolling "max frame time" window.
    #[serde(default = "default_frame_window_secs")]
    pub frame_window_secs: f64,

    #[serde(default = "default_frame_history")]
    pub frame_history: usize,

    #[serde(default)]
    pub stress: StressSettings,

    #[serde(default)]
    pub gc: GcFilter,

    #[serde(default)]
    pub features: Features,
}

/// Optional parts of the overlay and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "default_true")]
    pub stress: bool,

    #[serde(default = "default_true")]
    pub gc_stats: bool,

    #[serde(default = "default_true")]
    pub object_scaling: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            stress: true,
            gc_stats: true,
            object_scaling: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            pause_threshold_ms: default_pause_threshold_ms(),
            stabilization_secs: default_stabilization_secs(),
            frame_window_secs: default_frame_window_secs(),
            frame_history: default_frame_history(),
            stress: StressSettings::default(),
            gc: GcFilter::default(),
            features: Features::default(),
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise the per-user config file if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(crate::error::AppError::Config(
                "target_fps must be at least 1".to_string(),
            ));
        }
        if self.frame_history == 0 {
            return Err(crate::error::AppError::Config(
                "frame_history must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("pause_threshold_ms", self.pause_threshold_ms),
            ("stabilization_secs", self.stabilization_secs),
            ("frame_window_secs", self.frame_window_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::error::AppError::Config(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }
        for (name, secs) in [
            ("stabilization_secs", self.stabilization_secs),
            ("frame_window_secs", self.frame_window_secs),
        ] {
            Duration::try_from_secs_f64(secs).map_err(|e| {
                crate::error::AppError::Config(format!("{} is out of range: {}", name, e))
            })?;
        }
        Ok(())
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    pub fn pause_threshold_s(&self) -> f64 {
        self.pause_threshold_ms / 1000.0
    }

    pub fn stabilization_period(&self) -> Duration {
        Duration::from_secs_f64(self.stabilization_secs)
    }

    pub fn frame_window(&self) -> Duration {
        Duration::from_secs_f64(self.frame_window_secs)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "gc-pulse", "gc-pulse")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_log_path() -> PathBuf {
    directories::ProjectDirs::from("dev", "gc-pulse", "gc-pulse")
        .map(|dirs| dirs.data_dir().join("gc-pulse.log"))
        .unwrap_or_else(|| PathBuf::from("gc-pulse.log"))
}

fn default_target_fps() -> u32 {
    60
}

fn default_pause_threshold_ms() -> f64 {
    20.0
}

fn default_stabilization_secs() -> f64 {
    3.0
}

fn default_frame_window_secs() -> f64 {
    5.0
}

fn default_frame_history() -> usize {
    120
}

fn default_true() -> bool {
    true
}
