use anyhow::{Result, anyhow};
use emocopy_lp::{models::retry::RetryConfig, utils::retry_with_backoff};
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use tokio::time::Instant;

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay_ms: 50,
        max_delay_ms: 500,
        backoff_multiplier: 2,
    }
}

/// Test: Successful calls complete without retry
#[tokio::test]
async fn test_successful_operation_no_retry() -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result = retry_with_backoff(&fast_config(3), || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>("story")
        }
    })
    .await?;

    assert_eq!(result, "story");
    assert_eq!(attempts.load(Ordering::SeqCst), 1, "Should only attempt once");

    Ok(())
}

/// Test: A provider that recovers is retried until it answers
#[tokio::test]
async fn test_transient_failures_are_retried() -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result = retry_with_backoff(&fast_config(5), || {
        let counter = Arc::clone(&counter);
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(anyhow!("openai returned status 503 Service Unavailable"))
            } else {
                Ok("story")
            }
        }
    })
    .await?;

    assert_eq!(result, "story");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    Ok(())
}

/// Test: Permanent failures exhaust the attempt budget and surface the last error
#[tokio::test]
async fn test_permanent_failure_exhausts_retries() -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result = retry_with_backoff(&fast_config(4), || {
        let counter = Arc::clone(&counter);
        async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Err::<String, _>(anyhow!("attempt {} failed", attempt))
        }
    })
    .await;

    let error = result.expect_err("Should fail after max attempts");
    assert_eq!(error.to_string(), "attempt 4 failed");
    assert_eq!(attempts.load(Ordering::SeqCst), 4);

    Ok(())
}

/// Test: Delays grow exponentially within the jitter band
#[tokio::test]
async fn test_exponential_backoff_timing() -> Result<()> {
    let config = RetryConfig {
        max_attempts: 4,
        initial_delay_ms: 100,
        max_delay_ms: 1000,
        backoff_multiplier: 2,
    };

    let start = Instant::now();
    let attempt_times = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let times = Arc::clone(&attempt_times);

    let _ = retry_with_backoff(&config, || {
        let times = Arc::clone(&times);
        async move {
            times.lock().await.push(start.elapsed().as_millis());
            Err::<String, _>(anyhow!("Fail"))
        }
    })
    .await;

    let times = attempt_times.lock().await;

    assert_eq!(times.len(), 4);
    assert!(times[0] < 50, "First attempt should be immediate");

    for i in 1..times.len() {
        let delay = times[i] - times[i - 1];
        let nominal = config.initial_delay_ms * config.backoff_multiplier.pow(i as u32 - 1);

        assert!(
            delay >= (nominal * 8 / 10) as u128 && delay <= (nominal * 13 / 10) as u128,
            "Delay {} should be close to {}ms (actual: {}ms)",
            i,
            nominal,
            delay
        );
    }

    Ok(())
}

/// Test: The delay never exceeds the configured cap
#[tokio::test]
async fn test_max_delay_cap_respected() -> Result<()> {
    let config = RetryConfig {
        max_attempts: 6,
        initial_delay_ms: 100,
        max_delay_ms: 300,
        backoff_multiplier: 2,
    };

    let start = Instant::now();
    let attempt_times = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let times = Arc::clone(&attempt_times);

    let _ = retry_with_backoff(&config, || {
        let times = Arc::clone(&times);
        async move {
            times.lock().await.push(start.elapsed().as_millis());
            Err::<String, _>(anyhow!("Fail"))
        }
    })
    .await;

    let times = attempt_times.lock().await;

    for i in 3..times.len() {
        let delay = times[i] - times[i - 1];
        assert!(
            delay <= (config.max_delay_ms * 13 / 10) as u128,
            "Delay should not exceed max_delay_ms cap"
        );
    }

    Ok(())
}
