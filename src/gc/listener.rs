use crate::gc::store::GcStatsStore;
use crate::gc::types::{GcAggregate, GcFilter};
use crate::runtime::source::LogSource;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerStatus {
    Idle,
    Listening(String),
    Unavailable(String),
    Ended,
}

impl fmt::Display for ListenerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerStatus::Idle => write!(f, "no log source"),
            ListenerStatus::Listening(source) => write!(f, "listening to {}", source),
            ListenerStatus::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            ListenerStatus::Ended => write!(f, "log stream ended"),
        }
    }
}

/// Background subscriber that drains a runtime log stream into a
/// [`GcStatsStore`].
pub struct GcListener {
    store: Arc<GcStatsStore>,
    filter: GcFilter,
    status: Arc<RwLock<ListenerStatus>>,
    handle: Option<JoinHandle<()>>,
    target_pid: Option<u32>,
}

impl GcListener {
    pub fn new(filter: GcFilter) -> Self {
        Self {
            store: Arc::new(GcStatsStore::new()),
            filter,
            status: Arc::new(RwLock::new(ListenerStatus::Idle)),
            handle: None,
            target_pid: None,
        }
    }

    /// Opens `source` and starts draining it on a tokio task. Calling this
    /// again once a task exists, or after the source proved unavailable, does
    /// nothing. An unopenable source is logged once and leaves all
    /// statistics at zero.
    pub async fn enable<S>(&mut self, mut source: S)
    where
        S: LogSource + 'static,
    {
        if self.handle.is_some() {
            tracing::debug!("GC listener already running");
            return;
        }
        if matches!(*self.status.read(), ListenerStatus::Unavailable(_)) {
            return;
        }

        if let Err(e) = source.open().await {
            tracing::warn!(error = %e, "GC log source unavailable; GC statistics disabled");
            *self.status.write() = ListenerStatus::Unavailable(e.to_string());
            return;
        }

        let description = source.describe();
        tracing::info!(source = %description, "GC listener started");
        self.target_pid = source.target_pid();
        *self.status.write() = ListenerStatus::Listening(description);

        let store = self.store.clone();
        let status = self.status.clone();
        let filter = self.filter.clone();
        self.handle = Some(tokio::spawn(async move {
            drain(source, store, status, filter).await;
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn reset(&self) {
        self.store.reset();
    }

    pub fn read(&self) -> GcAggregate {
        self.store.read()
    }

    pub fn store(&self) -> Arc<GcStatsStore> {
        self.store.clone()
    }

    pub fn status(&self) -> ListenerStatus {
        self.status.read().clone()
    }

    pub fn target_pid(&self) -> Option<u32> {
        self.target_pid
    }
}

impl Default for GcListener {
    fn default() -> Self {
        Self::new(GcFilter::default())
    }
}

async fn drain<S: LogSource>(
    mut source: S,
    store: Arc<GcStatsStore>,
    status: Arc<RwLock<ListenerStatus>>,
    filter: GcFilter,
) {
    loop {
        match source.next_line().await {
            Ok(Some(line)) => {
                if store.ingest_line(&line, &filter) {
                    tracing::trace!(line = %line, "GC event");
                }
            }
            Ok(None) => {
                tracing::info!("GC log stream ended");
                *status.write() = ListenerStatus::Ended;
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "GC log stream failed");
                *status.write() = ListenerStatus::Unavailable(e.to_string());
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::source::{ChannelSource, FileTailSource};
    use std::time::Duration;

    async fn wait_for<F: Fn() -> bool>(condition: F) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_listener_aggregates_channel_lines() {
        let (tx, source) = ChannelSource::new();
        let mut listener = GcListener::default();
        listener.enable(source).await;
        assert!(matches!(listener.status(), ListenerStatus::Listening(_)));

        tx.send("[1.0s][info][gc] GC(0) Pause Young (Normal) 10M->2M(64M) 4.0ms".into())
            .unwrap();
        tx.send("[1.1s][info][gc] Using G1".into()).unwrap();
        tx.send("[1.2s][info][gc] GC(1) Pause Young (Normal) 12M->2M(64M) 6.0ms".into())
            .unwrap();
        tx.send("unrelated output".into()).unwrap();

        let store = listener.store();
        wait_for(|| store.event_count() == 3).await;

        let aggregate = listener.read();
        assert_eq!(aggregate.collections, 2);
        assert_eq!(aggregate.total_time_ms, 10.0);
        assert_eq!(aggregate.max_time_ms, 6.0);
        assert_eq!(aggregate.last_time_ms, 6.0);

        listener.reset();
        assert_eq!(listener.read(), GcAggregate::default());
        assert!(listener.is_running());

        tx.send("GC pause 2.0ms".into()).unwrap();
        wait_for(|| store.read().collections == 1).await;
    }

    #[tokio::test]
    async fn test_enable_is_idempotent() {
        let (tx, first) = ChannelSource::new();
        let (_unused, second) = ChannelSource::new();
        let mut listener = GcListener::default();

        listener.enable(first).await;
        listener.enable(second).await;

        tx.send("GC 1.0ms".into()).unwrap();
        let store = listener.store();
        wait_for(|| store.read().collections == 1).await;
    }

    #[tokio::test]
    async fn test_unavailable_source_degrades_to_no_data() {
        let mut listener = GcListener::default();
        listener
            .enable(FileTailSource::new("/nonexistent/gc-pulse/gc.log"))
            .await;

        assert!(matches!(listener.status(), ListenerStatus::Unavailable(_)));
        assert!(!listener.is_running());
        assert_eq!(listener.read(), GcAggregate::default());

        let (tx, source) = ChannelSource::new();
        listener.enable(source).await;
        assert!(matches!(listener.status(), ListenerStatus::Unavailable(_)));
        drop(tx);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_listener() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut listener = GcListener::default();
        listener
            .enable(
                FileTailSource::new(file.path())
                    .from_start(true)
                    .poll_interval(Duration::from_millis(5)),
            )
            .await;

        file.write_all(b"GC(0) Pause 1.0ms\n\xff\xfe junk\nGC(1) Pause 2.0ms\n")
            .unwrap();
        file.flush().unwrap();

        let store = listener.store();
        wait_for(|| store.read().collections == 2).await;
        assert_eq!(listener.read().total_time_ms, 3.0);
        assert!(matches!(listener.status(), ListenerStatus::Listening(_)));
        assert!(listener.is_running());
    }

    #[tokio::test]
    async fn test_stream_end_keeps_statistics() {
        let (tx, source) = ChannelSource::new();
        let mut listener = GcListener::default();
        listener.enable(source).await;

        tx.send("GC(0) pause 3.5ms".into()).unwrap();
        drop(tx);

        let status = listener.status.clone();
        wait_for(|| *status.read() == ListenerStatus::Ended).await;
        assert_eq!(listener.read().collections, 1);
        assert_eq!(listener.status().to_string(), "log stream ended");
    }
}
