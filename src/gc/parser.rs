//! Text parsing for runtime GC log lines.
//!
//! Lines may carry JVM unified-logging decorations, e.g.
//! `[1.234s][info][gc] GC(3) Pause Young (Normal) 24M->3M(256M) 2.345ms`.
//! Undecorated lines are taken whole. Everything here is best-effort: a line
//! that matches the GC filter but carries no duration is still an event, just
//! an untimed one.

use crate::gc::types::{GcEvent, GcFilter, HeapTransition, LogLevel, LogRecord};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

static DECORATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]*)\]").unwrap());

static UPTIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)s$").unwrap());

static TAG_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(?:\s*,\s*[a-z][a-z0-9_]*)*$").unwrap());

static DURATION_MS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*ms\b").unwrap());

static GC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bGC\((\d+)\)").unwrap());

static HEAP_TRANSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)([KMG])->(\d+)([KMG])\((\d+)([KMG])\)").unwrap());

pub fn parse_record(line: &str) -> LogRecord {
    let line = line.trim_end();
    let mut rest = line;
    let mut uptime_s = None;
    let mut level = None;
    let mut tags = Vec::new();
    let mut recognized = false;

    while let Some(caps) = DECORATION.captures(rest) {
        let whole = caps.get(0).map_or(0, |m| m.end());
        let decoration = caps[1].trim();

        if let Some(parsed) = LogLevel::from_decoration(decoration) {
            level = Some(parsed);
            recognized = true;
        } else if let Some(up) = UPTIME.captures(decoration) {
            uptime_s = up[1].parse::<f64>().ok();
            recognized = true;
        } else if TAG_SET.is_match(decoration) {
            tags = decoration
                .split(',')
                .map(|tag| tag.trim().to_string())
                .collect();
            recognized = true;
        }

        rest = &rest[whole..];
    }

    if !recognized {
        return LogRecord {
            uptime_s: None,
            level: None,
            tags: Vec::new(),
            message: line.trim().to_string(),
        };
    }

    LogRecord {
        uptime_s,
        level,
        tags,
        message: rest.trim().to_string(),
    }
}

/// First number followed by an `ms` unit.
pub fn extract_duration_ms(text: &str) -> Option<f64> {
    DURATION_MS
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

pub fn extract_gc_id(text: &str) -> Option<u64> {
    GC_ID
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
}

pub fn extract_heap_transition(text: &str) -> Option<HeapTransition> {
    let caps = HEAP_TRANSITION.captures(text)?;

    let to_bytes = |value: &str, unit: &str| -> Option<u64> {
        let value = value.parse::<u64>().ok()?;
        let scale = match unit {
            "K" => 1024,
            "M" => 1024 * 1024,
            "G" => 1024 * 1024 * 1024,
            _ => return None,
        };
        value.checked_mul(scale)
    };

    Some(HeapTransition {
        before_bytes: to_bytes(&caps[1], &caps[2])?,
        after_bytes: to_bytes(&caps[3], &caps[4])?,
        capacity_bytes: to_bytes(&caps[5], &caps[6])?,
    })
}

/// Turns a raw line into a GC event when the filter accepts it.
pub fn classify(line: &str, filter: &GcFilter) -> Option<GcEvent> {
    let record = parse_record(line);
    if !filter.matches(&record) {
        return None;
    }

    Some(GcEvent {
        duration_ms: extract_duration_ms(&record.message),
        gc_id: extract_gc_id(&record.message),
        heap: extract_heap_transition(&record.message),
        message: record.message,
        received_at: Local::now(),
    })
}
