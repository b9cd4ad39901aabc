//! Integration tests for the runtime facade.

use core_async::sync::{CancellationToken, Mutex};
use core_async::{select, task, time};
use std::sync::Arc;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[core_async::test]
async fn test_panicking_task_reports_join_error() {
    let handle = task::spawn(async {
        panic!("boom");
    });

    let err = handle.await.unwrap_err();
    assert!(err.is_panic());
    assert_eq!(task::describe_join_error(&err), "task panicked");
}

#[core_async::test(start_paused = true)]
async fn test_sleep_honours_paused_clock() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_secs(8)).await;
    assert!(start.elapsed() >= time::Duration::from_secs(8));
}

#[core_async::test(start_paused = true)]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[core_async::test]
async fn test_mutex_across_tasks() {
    let counter = Arc::new(Mutex::new(0));
    let mut handles = Vec::new();

    for _ in 0..8 {
        let counter = Arc::clone(&counter);
        handles.push(task::spawn(async move {
            *counter.lock().await += 1;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(*counter.lock().await, 8);
}

#[core_async::test(start_paused = true)]
async fn test_cancellation_interrupts_sleep() {
    let token = CancellationToken::new();
    let child = token.child_token();

    let waiter = task::spawn(async move {
        select! {
            _ = time::sleep(time::Duration::from_secs(3600)) => false,
            _ = child.cancelled() => true,
        }
    });

    token.cancel();
    assert!(waiter.await.unwrap());
}

#[test]
fn test_block_on() {
    let value = core_async::runtime::block_on(async { 7 }).unwrap();
    assert_eq!(value, 7);
}
