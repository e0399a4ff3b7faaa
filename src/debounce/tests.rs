//! Tests for the debounce module

use super::*;
use futures::channel::mpsc;
use futures::{stream, StreamExt};
use std::time::Duration;
use tokio::time;
use tokio_test::{assert_pending, assert_ready, task};

const DELAY: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn test_emits_only_after_quiet_period() {
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = task::spawn(debounce(rx, DELAY));

    tx.unbounded_send("a").unwrap();
    assert_pending!(debounced.poll_next());

    time::advance(Duration::from_millis(200)).await;
    tx.unbounded_send("ab").unwrap();
    assert_pending!(debounced.poll_next());

    time::advance(Duration::from_millis(200)).await;
    tx.unbounded_send("abc").unwrap();
    assert_pending!(debounced.poll_next());

    time::advance(Duration::from_millis(499)).await;
    assert_pending!(debounced.poll_next());

    time::advance(Duration::from_millis(1)).await;
    assert_eq!(assert_ready!(debounced.poll_next()), Some("abc"));

    // Nothing new was typed
    time::advance(Duration::from_secs(5)).await;
    assert_pending!(debounced.poll_next());
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_emit_separately() {
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = task::spawn(rx.debounce(DELAY));

    tx.unbounded_send(1).unwrap();
    assert_pending!(debounced.poll_next());
    time::advance(DELAY).await;
    assert_eq!(assert_ready!(debounced.poll_next()), Some(1));

    tx.unbounded_send(2).unwrap();
    tx.unbounded_send(3).unwrap();
    assert_pending!(debounced.poll_next());
    time::advance(DELAY).await;
    assert_eq!(assert_ready!(debounced.poll_next()), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_flushes_pending_value_when_input_ends() {
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = task::spawn(debounce(rx, DELAY));

    tx.unbounded_send("phone").unwrap();
    assert_pending!(debounced.poll_next());
    drop(tx);

    assert_eq!(assert_ready!(debounced.poll_next()), Some("phone"));
    assert_eq!(assert_ready!(debounced.poll_next()), None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_ends_immediately() {
    let values: Vec<u32> = debounce(stream::empty::<u32>(), DELAY).collect().await;
    assert!(values.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_collects_settled_values_from_timed_input() {
    // (value, delay before it is emitted)
    let typed = vec![
        ("l", 0),
        ("la", 100),
        ("lap", 100),
        ("lapt", 800),
        ("lapto", 100),
        ("laptop", 100),
    ];
    let input = stream::iter(typed).then(|(value, wait)| async move {
        time::sleep(Duration::from_millis(wait)).await;
        value
    });

    let settled: Vec<&str> = input.debounce(DELAY).collect().await;
    assert_eq!(settled, vec!["lap", "laptop"]);
}
