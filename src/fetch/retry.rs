use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{FetchError, FetchRequest, Transport};

/// Bounded retry with linear backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Wait after failed attempt `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Fetch a response body, retrying on transport errors, non-2xx statuses and empty bodies.
///
/// Every failure is retried the same way; the error of the final attempt is returned.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    request: &FetchRequest,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetch_once(transport, request).await {
            Ok(body) => {
                debug!("Fetched {} ({} bytes) on attempt {}", request.url, body.len(), attempt);
                return Ok(body);
            }
            Err(err) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                    attempt, max_attempts, request.url, err, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!("Giving up on {} after {} attempts: {}", request.url, attempt, err);
                return Err(err);
            }
        }
    }
}

async fn fetch_once(transport: &dyn Transport, request: &FetchRequest) -> Result<String, FetchError> {
    let response = transport.get(request).await?;

    if !(200..300).contains(&response.status) {
        return Err(FetchError::Status {
            status: response.status,
            url: request.url.clone(),
        });
    }

    if response.body.is_empty() {
        return Err(FetchError::EmptyBody(request.url.clone()));
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchResponse, MockTransport};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;
    use tokio_test::{assert_err, assert_ok};

    fn ok(body: &str) -> Result<FetchResponse, FetchError> {
        Ok(FetchResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_with_increasing_delay() {
        let calls: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();

        let mut transport = MockTransport::new();
        transport.expect_get().times(3).returning(move |_| {
            let mut calls = recorded.lock().unwrap();
            calls.push(Instant::now());
            if calls.len() < 3 {
                Err(FetchError::Transport("connection reset".to_string()))
            } else {
                ok("payload")
            }
        });

        let request = FetchRequest::new("https://example.com/page");
        let body = assert_ok!(fetch_with_retry(&transport, &request, &RetryPolicy::default()).await);
        assert_eq!(body, "payload");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        let first_gap = calls[1] - calls[0];
        let second_gap = calls[2] - calls[1];
        assert!(first_gap >= Duration::from_secs(1) && first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_secs(2) && second_gap < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_stops_after_max_attempts() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(4)
            .returning(|_| Err(FetchError::Transport("timed out".to_string())));

        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(10),
        };
        let request = FetchRequest::new("https://example.com/page");
        let err = assert_err!(fetch_with_retry(&transport, &request, &policy).await);
        assert_eq!(err, FetchError::Transport("timed out".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_retried_like_server_error() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(3).returning(|_| {
            Ok(FetchResponse {
                status: 404,
                body: "missing".to_string(),
            })
        });

        let request = FetchRequest::new("https://example.com/gone");
        let err = assert_err!(fetch_with_retry(&transport, &request, &RetryPolicy::default()).await);
        assert_eq!(
            err,
            FetchError::Status {
                status: 404,
                url: "https://example.com/gone".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_body_counts_as_failure() {
        let mut attempts = 0;
        let mut transport = MockTransport::new();
        transport.expect_get().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 { ok("") } else { ok("<html></html>") }
        });

        let request = FetchRequest::new("https://example.com/page");
        let body = assert_ok!(fetch_with_retry(&transport, &request, &RetryPolicy::default()).await);
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_sleep() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(FetchResponse { status: 500, body: "oops".to_string() }));

        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(60),
        };
        let request = FetchRequest::new("https://example.com/page");
        let started = std::time::Instant::now();
        assert_err!(fetch_with_retry(&transport, &request, &policy).await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_delay_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(3));
    }
}
