use gc_pulse::gc::{GcAggregate, GcListener, ListenerStatus};
use gc_pulse::runtime::source::ChannelSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const EVENTS: usize = 2_000;

fn consistent(aggregate: &GcAggregate) -> bool {
    if aggregate.collections == 0 {
        return aggregate.total_time_ms == 0.0
            && aggregate.max_time_ms == 0.0
            && aggregate.last_time_ms == 0.0;
    }
    aggregate.max_time_ms <= aggregate.total_time_ms
        && aggregate.last_time_ms <= aggregate.max_time_ms
        && aggregate.total_time_ms <= aggregate.max_time_ms * aggregate.collections as f64
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_snapshots_are_never_torn_while_resetting() {
    let (tx, source) = ChannelSource::new();
    let mut listener = GcListener::default();
    listener.enable(source).await;
    assert!(matches!(listener.status(), ListenerStatus::Listening(_)));

    let store = listener.store();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let store = store.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            let mut reads = 0u64;
            while !done.load(Ordering::Relaxed) {
                let snapshot = store.read();
                assert!(consistent(&snapshot), "torn snapshot: {:?}", snapshot);
                reads += 1;
            }
            reads
        })
    };

    let resetter = {
        let store = store.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                store.reset();
                std::thread::sleep(Duration::from_micros(200));
            }
        })
    };

    for i in 0..EVENTS {
        let ms = 1.0 + (i % 7) as f64;
        tx.send(format!(
            "[{}.000s][info][gc] GC({}) Pause Young (Normal) 24M->3M(256M) {:.3}ms",
            i, i, ms
        ))
        .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    done.store(true, Ordering::Relaxed);

    let reads = reader.join().unwrap();
    resetter.join().unwrap();
    assert!(reads > 0);

    let last = store.read();
    assert!(consistent(&last));
}

#[tokio::test]
async fn test_closed_stream_keeps_collected_data() {
    let (tx, source) = ChannelSource::new();
    let mut listener = GcListener::default();
    listener.enable(source).await;

    tx.send("[0.5s][info][gc] GC(0) Pause Full (System.gc()) 30M->5M(64M) 12.500ms".into())
        .unwrap();
    drop(tx);

    for _ in 0..200 {
        if listener.status() == ListenerStatus::Ended && !listener.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(listener.status(), ListenerStatus::Ended);
    let aggregate = listener.read();
    assert_eq!(aggregate.collections, 1);
    assert_eq!(aggregate.max_time_ms, 12.5);
    assert!(!listener.is_running());
}
