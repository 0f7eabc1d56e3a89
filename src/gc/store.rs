use crate::gc::parser;
use crate::gc::types::{GcAggregate, GcEvent, GcFilter};
use parking_lot::Mutex;

#[derive(Default)]
struct StoreInner {
    aggregate: GcAggregate,
    events: Vec<GcEvent>,
}

/// Shared GC statistics. The aggregate and the event log sit behind one lock,
/// so a snapshot never mixes fields from two different updates.
#[derive(Default)]
pub struct GcStatsStore {
    inner: Mutex<StoreInner>,
}

impl GcStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event is logged; only events with a duration reach the aggregate.
    pub fn record(&self, event: GcEvent) {
        let mut inner = self.inner.lock();
        if let Some(duration_ms) = event.duration_ms {
            inner.aggregate.fold(duration_ms);
        }
        inner.events.push(event);
    }

    /// Classifies a raw log line and records it. Returns whether it was a GC event.
    pub fn ingest_line(&self, line: &str, filter: &GcFilter) -> bool {
        match parser::classify(line, filter) {
            Some(event) => {
                self.record(event);
                true
            }
            None => false,
        }
    }

    pub fn read(&self) -> GcAggregate {
        self.inner.lock().aggregate
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn events(&self) -> Vec<GcEvent> {
        self.inner.lock().events.clone()
    }

    /// Newest last.
    pub fn recent_events(&self, count: usize) -> Vec<GcEvent> {
        let inner = self.inner.lock();
        let skip = inner.events.len().saturating_sub(count);
        inner.events[skip..].to_vec()
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.aggregate = GcAggregate::default();
        inner.events.clear();
    }
}
