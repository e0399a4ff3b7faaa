//! Tests for the retry module

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn fast_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_attempts(3)
        .delay(Duration::from_millis(1000))
        .build()
}

// ============================================================================
// Backoff Tests
// ============================================================================

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
}

#[test]
fn test_linear_backoff() {
    let policy = RetryPolicy::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(100),
            Duration::from_millis(250),
        )
        .build();
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(250));
}

#[test]
fn test_exponential_backoff() {
    let policy = RetryPolicy::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
        .build();
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    assert_eq!(policy.delay_for(10), Duration::from_secs(1));
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_third_attempt() {
    let token = CancellationToken::new();
    let mut calls = 0;
    let started = Instant::now();

    let result = fast_policy()
        .run(&token, |attempt| {
            calls += 1;
            async move {
                if attempt < 3 {
                    Err(Error::http_status(503, ""))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(calls, 3);
    assert!(started.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_budget() {
    let token = CancellationToken::new();
    let mut calls = 0;

    let result: crate::Result<()> = fast_policy()
        .run(&token, |_| {
            calls += 1;
            async { Err(Error::Timeout { timeout_ms: 10_000 }) }
        })
        .await;

    assert!(matches!(result, Err(Error::Timeout { .. })));
    assert_eq!(calls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_error_is_not_retried() {
    let token = CancellationToken::new();
    let mut calls = 0;

    let result: crate::Result<()> = fast_policy()
        .run(&token, |_| {
            calls += 1;
            async { Err(Error::Cancelled) }
        })
        .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(calls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_error_stops_immediately() {
    let token = CancellationToken::new();
    let mut calls = 0;

    let result: crate::Result<()> = fast_policy()
        .run(&token, |_| {
            calls += 1;
            async { Err(Error::config("bad base url")) }
        })
        .await;

    assert!(matches!(result, Err(Error::Config { .. })));
    assert_eq!(calls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay_aborts_chain() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel();
    });

    let mut calls = 0;
    let started = Instant::now();
    let result: crate::Result<()> = fast_policy()
        .run(&token, |_| {
            calls += 1;
            async { Err(Error::http_status(500, "")) }
        })
        .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(calls, 1);
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test]
async fn test_pre_cancelled_token_never_calls() {
    let token = CancellationToken::new();
    token.cancel();
    let mut calls = 0;

    let result: crate::Result<()> = RetryPolicy::default()
        .run(&token, |_| {
            calls += 1;
            async { Ok(()) }
        })
        .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_no_retry_policy() {
    let token = CancellationToken::new();
    let mut calls = 0;

    let result: crate::Result<()> = RetryPolicy::no_retry()
        .run(&token, |_| {
            calls += 1;
            async { Err(Error::http_status(500, "")) }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls, 1);
}
