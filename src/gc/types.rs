use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Severity of a runtime log record, ordered from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn from_decoration(text: &str) -> Option<Self> {
        match text.trim() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warning" | "warn" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// One line of the runtime's diagnostic stream, with any unified-logging
/// decorations split off.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub uptime_s: Option<f64>,
    pub level: Option<LogLevel>,
    pub tags: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapTransition {
    pub before_bytes: u64,
    pub after_bytes: u64,
    pub capacity_bytes: u64,
}

impl HeapTransition {
    pub fn reclaimed_bytes(&self) -> u64 {
        self.before_bytes.saturating_sub(self.after_bytes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcEvent {
    pub message: String,
    pub duration_ms: Option<f64>,
    pub gc_id: Option<u64>,
    pub heap: Option<HeapTransition>,
    pub received_at: DateTime<Local>,
}

impl GcEvent {
    pub fn is_timed(&self) -> bool {
        self.duration_ms.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GcAggregate {
    pub collections: u64,
    pub total_time_ms: f64,
    pub max_time_ms: f64,
    pub last_time_ms: f64,
}

impl GcAggregate {
    pub fn avg_time_ms(&self) -> f64 {
        if self.collections > 0 {
            self.total_time_ms / self.collections as f64
        } else {
            0.0
        }
    }

    pub(crate) fn fold(&mut self, duration_ms: f64) {
        self.collections += 1;
        self.total_time_ms += duration_ms;
        self.last_time_ms = duration_ms;
        if duration_ms > self.max_time_ms {
            self.max_time_ms = duration_ms;
        }
    }
}

/// Decides which log records are GC events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcFilter {
    /// Tagged records match when their tag set is exactly this tag.
    #[serde(default = "default_gc_tag")]
    pub gc_tag: String,

    /// Untagged records match when the message contains this text.
    #[serde(default = "default_substring")]
    pub substring: String,

    #[serde(default = "default_min_level")]
    pub min_level: LogLevel,
}

impl GcFilter {
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(level) = record.level {
            if level < self.min_level {
                return false;
            }
        }

        if record.tags.is_empty() {
            record.message.contains(&self.substring)
        } else {
            record.tags.len() == 1 && record.tags[0] == self.gc_tag
        }
    }
}

impl Default for GcFilter {
    fn default() -> Self {
        Self {
            gc_tag: default_gc_tag(),
            substring: default_substring(),
            min_level: default_min_level(),
        }
    }
}

fn default_gc_tag() -> String {
    "gc".to_string()
}

fn default_substring() -> String {
    "GC".to_string()
}

fn default_min_level() -> LogLevel {
    LogLevel::Info
}
