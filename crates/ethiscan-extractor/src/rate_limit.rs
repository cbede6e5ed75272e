//! Retry with exponential backoff for the analysis client.
//!
//! Only transient failures (HTTP 429, network errors) are retried; everything
//! else is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Upper bound on a server-supplied `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 60;

fn is_retriable(err: &ClientError) -> bool {
    matches!(err, ClientError::RateLimited { .. } | ClientError::Http(_))
}

/// Wait before retry `attempt` (0-based): `backoff_base_secs * 2^attempt`,
/// raised to the server's `Retry-After` (capped) for rate-limit responses.
fn backoff_delay(err: &ClientError, backoff_base_secs: u64, attempt: u32) -> Duration {
    let exponential = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let secs = match err {
        ClientError::RateLimited {
            retry_after_secs, ..
        } => exponential.max((*retry_after_secs).min(MAX_RETRY_AFTER_SECS)),
        _ => exponential,
    };
    Duration::from_secs(secs)
}

/// Runs `operation`, retrying transient failures up to `max_retries` extra
/// times, waiting [`backoff_delay`] between attempts. Non-retriable errors
/// and the final failure are returned as is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => err,
            Err(err) => return Err(err),
        };

        let delay = backoff_delay(&err, backoff_base_secs, attempt);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay.as_secs(),
            error = %err,
            "transient client error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const ENDPOINT: &str = "https://analyze.example.com/api/analyze";

    fn rate_limited() -> ClientError {
        ClientError::RateLimited {
            domain: "analyze.example.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    /// Drives `retry_with_backoff` with zero backoff; `outcome` sees the
    /// 0-based call number. Returns the result and the number of calls made.
    async fn drive(
        max_retries: u32,
        outcome: impl Fn(u32) -> Result<u32, ClientError>,
    ) -> (Result<u32, ClientError>, u32) {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(max_retries, 0, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let out = outcome(n);
            async move { out }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, calls) = drive(3, |_| Ok(42)).await;
        assert_eq!(result.expect("ok"), 42);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let (result, calls) = drive(3, |n| if n < 2 { Err(rate_limited()) } else { Ok(99) }).await;
        assert_eq!(result.expect("ok"), 99);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn last_error_surfaces_once_retries_run_out() {
        let (result, calls) = drive(2, |_| Err(rate_limited())).await;
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(ClientError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let (result, calls) = drive(0, |_| Err(rate_limited())).await;
        assert_eq!(calls, 1);
        assert!(result.is_err());
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let err = ClientError::UnexpectedStatus {
            status: 500,
            url: ENDPOINT.to_owned(),
        };
        assert_eq!(backoff_delay(&err, 1, 0), Duration::from_secs(1));
        assert_eq!(backoff_delay(&err, 1, 3), Duration::from_secs(8));
        assert_eq!(backoff_delay(&err, 0, 5), Duration::ZERO);
    }

    #[test]
    fn delay_honours_retry_after_for_rate_limits() {
        let err = ClientError::RateLimited {
            domain: "analyze.example.com".to_owned(),
            retry_after_secs: 30,
        };
        assert_eq!(backoff_delay(&err, 1, 0), Duration::from_secs(30));
        // Exponential backoff wins once it exceeds Retry-After.
        assert_eq!(backoff_delay(&err, 1, 6), Duration::from_secs(64));
    }

    #[test]
    fn retry_after_is_capped() {
        let err = ClientError::RateLimited {
            domain: "analyze.example.com".to_owned(),
            retry_after_secs: 86_400,
        };
        assert_eq!(
            backoff_delay(&err, 0, 0),
            Duration::from_secs(MAX_RETRY_AFTER_SECS)
        );
    }

    #[tokio::test]
    async fn permanent_errors_fail_fast() {
        let (result, calls) = drive(3, |_| {
            Err(ClientError::NotFound {
                url: ENDPOINT.to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ClientError::NotFound { .. })));

        let (result, calls) = drive(3, |_| {
            Err(ClientError::UnexpectedStatus {
                status: 503,
                url: ENDPOINT.to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus { status: 503, .. })
        ));

        let (result, calls) = drive(3, |_| {
            let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
            Err(ClientError::Deserialize {
                context: "analysis response".to_owned(),
                source,
            })
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ClientError::Deserialize { .. })));
    }
}
