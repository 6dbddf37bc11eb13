//! Integration tests for the cancellation bag under real async work.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use keel::{CancelBag, ClosureCancel, SignalCancel};

fn init_tracing() {
    // Surfaces the bag's debug events in test output; later calls are no-ops.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_supersession_aborts_previous_task() -> Result<()> {
    init_tracing();
    let bag = CancelBag::new();

    let first = tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    bag.add_task("refresh", &first);

    let second = tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
    });
    bag.add_task("refresh", &second);

    // The first task was aborted by the supersession, the second still runs.
    let err = tokio::time::timeout(Duration::from_secs(1), first)
        .await?
        .unwrap_err();
    assert!(err.is_cancelled());
    tokio::time::timeout(Duration::from_secs(1), second).await??;
    Ok(())
}

#[tokio::test]
async fn test_cancel_requests_do_not_wait_for_completion() -> Result<()> {
    init_tracing();
    let bag = CancelBag::new();
    let (handle, mut cancel_rx) = SignalCancel::pair();

    let finished = Arc::new(AtomicUsize::new(0));
    let marker = finished.clone();
    let task = tokio::spawn(async move {
        let _ = (&mut cancel_rx).await;
        // Simulated wind-down after the cancellation checkpoint.
        tokio::time::sleep(Duration::from_millis(50)).await;
        marker.fetch_add(1, Ordering::SeqCst);
    });
    bag.add("download", Arc::new(handle));

    // cancel() returns once the signal is fired, not once the work stops.
    assert!(bag.cancel("download").is_some());
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    tokio::time::timeout(Duration::from_secs(1), task).await??;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_handle_cancelled_exactly_once_under_contention() {
    let bag = CancelBag::new();
    let cancels = Arc::new(AtomicUsize::new(0));
    const TASKS: usize = 100;
    const KEYS: usize = 10;

    let mut join = Vec::new();
    for i in 0..TASKS {
        let bag = bag.clone();
        let cancels = cancels.clone();
        join.push(tokio::spawn(async move {
            let key = format!("key-{}", i % KEYS);
            let counted = cancels.clone();
            bag.add(
                key.clone(),
                Arc::new(ClosureCancel::new(move || {
                    counted.fetch_add(1, Ordering::SeqCst);
                })),
            );
            if i % 3 == 0 {
                bag.cancel(&key);
            }
        }));
    }
    for task in join {
        task.await.unwrap();
    }

    // Drain whatever survived; between supersession, explicit cancels and the
    // drain, every handle ever added is cancelled exactly once.
    bag.cancel_all();
    assert!(bag.is_empty());
    assert_eq!(cancels.load(Ordering::SeqCst), TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cancel_same_key_fires_once() {
    let bag = CancelBag::new();
    let cancels = Arc::new(AtomicUsize::new(0));
    let counted = cancels.clone();
    bag.add(
        "contended",
        Arc::new(ClosureCancel::new(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        })),
    );

    let mut join = Vec::new();
    for _ in 0..16 {
        let bag = bag.clone();
        join.push(tokio::spawn(async move { bag.cancel("contended").is_some() }));
    }
    let mut winners = 0;
    for task in join {
        if task.await.unwrap() {
            winners += 1;
        }
    }

    // Exactly one caller removed the entry and the handle fired once.
    assert_eq!(winners, 1);
    assert_eq!(cancels.load(Ordering::SeqCst), 1);
}
