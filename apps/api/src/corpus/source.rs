use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::corpus::CorpusError;

/// Timeout and retry budget for fetching the protocol page.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    pub backoff: Duration,
    /// Ceiling on any single retry delay.
    pub max_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl FetchPolicy {
    /// Delay before `attempt` (1-based retry index): `backoff * 2^(attempt - 1)`,
    /// saturating and capped at `max_backoff`.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Where the raw protocol page comes from. Swappable so the loader can be
/// exercised without the network.
#[async_trait]
pub trait ProtocolSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String, CorpusError>;
}

/// Fetches the protocol page over HTTP with a bounded retry budget.
///
/// Transport errors, timeouts, 429 and 5xx are retried with exponential
/// backoff; any other non-success status fails at once. Once the budget is
/// spent the fetch fails terminally and callers fall back to default links.
pub struct HttpProtocolSource {
    client: Client,
    url: String,
    policy: FetchPolicy,
}

impl HttpProtocolSource {
    pub fn new(url: impl Into<String>, policy: FetchPolicy) -> Result<Self, CorpusError> {
        let client = Client::builder().timeout(policy.timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            policy,
        })
    }
}

#[async_trait]
impl ProtocolSource for HttpProtocolSource {
    async fn fetch_page(&self) -> Result<String, CorpusError> {
        let mut last_error: Option<CorpusError> = None;

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.retry_delay(attempt);
                warn!(
                    "Protocol fetch attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(&self.url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CorpusError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                warn!("Protocol page returned {status}");
                last_error = Some(CorpusError::Status(status.as_u16()));
                continue;
            }

            if !status.is_success() {
                return Err(CorpusError::Status(status.as_u16()));
            }

            match response.text().await {
                Ok(body) => {
                    debug!("Fetched protocol page ({} bytes)", body.len());
                    return Ok(body);
                }
                Err(e) => last_error = Some(CorpusError::Http(e)),
            }
        }

        Err(last_error.unwrap_or(CorpusError::Exhausted {
            attempts: self.policy.max_attempts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::get, Router};

    fn fast_policy(max_attempts: u32) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_millis(200),
            max_attempts,
            backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    /// Fails with `fail_with` for the first `failures` hits, then serves a page.
    async fn flaky_server(failures: u32, fail_with: StatusCode) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let router = Router::new()
            .route(
                "/",
                get(move |State(hits): State<Arc<AtomicU32>>| async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        (fail_with, String::new())
                    } else {
                        (StatusCode::OK, "<html>protocol</html>".to_string())
                    }
                }),
            )
            .with_state(hits.clone());
        (serve(router).await, hits)
    }

    #[tokio::test]
    async fn test_fetch_succeeds_first_try() {
        let (url, hits) = flaky_server(0, StatusCode::OK).await;
        let source = HttpProtocolSource::new(url, fast_policy(3)).unwrap();
        assert_eq!(source.fetch_page().await.unwrap(), "<html>protocol</html>");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let (url, hits) = flaky_server(2, StatusCode::SERVICE_UNAVAILABLE).await;
        let source = HttpProtocolSource::new(url, fast_policy(3)).unwrap();
        assert!(source.fetch_page().await.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (url, hits) = flaky_server(10, StatusCode::BAD_GATEWAY).await;
        let source = HttpProtocolSource::new(url, fast_policy(2)).unwrap();
        let err = source.fetch_page().await.unwrap_err();
        assert!(matches!(err, CorpusError::Status(502)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (url, hits) = flaky_server(10, StatusCode::NOT_FOUND).await;
        let source = HttpProtocolSource::new(url, fast_policy(3)).unwrap();
        let err = source.fetch_page().await.unwrap_err();
        assert!(matches!(err, CorpusError::Status(404)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let router = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "too late"
            }),
        );
        let url = serve(router).await;
        let source = HttpProtocolSource::new(url, fast_policy(2)).unwrap();
        assert!(matches!(
            source.fetch_page().await.unwrap_err(),
            CorpusError::Http(_)
        ));
    }

    #[test]
    fn test_retry_delay_doubles_then_caps() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.retry_delay(1), Duration::from_millis(500));
        assert_eq!(policy.retry_delay(2), Duration::from_millis(1000));
        assert_eq!(policy.retry_delay(4), Duration::from_millis(4000));
        assert_eq!(policy.retry_delay(20), Duration::from_secs(30));
        assert_eq!(policy.retry_delay(33), Duration::from_secs(30));
        assert_eq!(policy.retry_delay(u32::MAX), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_large_attempt_budget_runs_to_completion() {
        let (url, hits) = flaky_server(u32::MAX, StatusCode::SERVICE_UNAVAILABLE).await;
        let policy = FetchPolicy {
            timeout: Duration::from_millis(200),
            max_attempts: 40,
            backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        };
        let source = HttpProtocolSource::new(url, policy).unwrap();
        let err = source.fetch_page().await.unwrap_err();
        assert!(matches!(err, CorpusError::Status(503)));
        assert_eq!(hits.load(Ordering::SeqCst), 40);
    }

    #[tokio::test]
    async fn test_zero_attempts_reports_exhausted() {
        let source = HttpProtocolSource::new("http://127.0.0.1:9/", fast_policy(0)).unwrap();
        assert!(matches!(
            source.fetch_page().await.unwrap_err(),
            CorpusError::Exhausted { attempts: 0 }
        ));
    }
}
