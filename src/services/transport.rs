/// Catalog transport
///
/// One logical GET against the catalog API: bounded retries with linear
/// backoff, an independent timeout per attempt, and an optional Redis-backed
/// freshness window so identical queries within the TTL skip the network.
///
/// Without an API key every call short-circuits to
/// `CatalogError::MissingCredential` before touching the network.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{CatalogError, CatalogResult},
};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

/// Retry budget and timing for catalog requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one; total attempts = `max_retries + 1`
    pub max_retries: u32,
    pub attempt_timeout: Duration,
    /// Delay before retry `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            attempt_timeout: Duration::from_secs(10),
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs `op` until it succeeds, fails permanently, or the budget runs out
///
/// Each attempt is raced against `policy.attempt_timeout`; an attempt that
/// times out is dropped (cancelling the in-flight request) and counts as a
/// failure. `op` receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> CatalogResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = match tokio::time::timeout(policy.attempt_timeout, op(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(policy.attempt_timeout)),
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_retryable() {
            return Err(error);
        }

        if attempt > policy.max_retries {
            tracing::error!(
                request = %label,
                attempts = attempt,
                error = %error,
                "Catalog request failed, retries exhausted"
            );
            return Err(CatalogError::Exhausted {
                attempts: attempt,
                last: Box::new(error),
            });
        }

        let delay = policy.backoff(attempt);
        tracing::warn!(
            request = %label,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Catalog request failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[derive(Clone)]
pub struct Transport {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    policy: RetryPolicy,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl Transport {
    pub fn new(api_key: Option<String>, api_url: String, policy: RetryPolicy) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.filter(|key| !key.is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
            policy,
            cache: None,
            cache_ttl: 300,
        }
    }

    /// Serves repeated identical queries from `cache` for `ttl_secs`
    pub fn with_cache(mut self, cache: Cache, ttl_secs: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl_secs;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// GETs `path` with `params` and parses the JSON body into `T`
    pub async fn get_json<T, P>(&self, path: &str, params: &P, key: CacheKey) -> CatalogResult<T>
    where
        T: DeserializeOwned + Serialize,
        P: Serialize + ?Sized,
    {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingCredential)?;
        let url = format!("{}{}", self.api_url, path);

        cached!(self.cache.as_ref(), key, self.cache_ttl, async {
            with_retry(&self.policy, path, |_| self.attempt::<T, P>(&url, api_key, params)).await
        })
    }

    /// A single attempt: send, check status, parse
    async fn attempt<T, P>(&self, url: &str, api_key: &str, params: &P) -> CatalogResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, url = %url, "Failed to deserialize catalog response");
            CatalogError::Parse(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            attempt_timeout: Duration::from_millis(200),
            base_delay: Duration::from_millis(1),
        }
    }

    fn transient() -> CatalogError {
        CatalogError::Upstream {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_one_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_retry(&fast_policy(2), "test", |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 1 {
                    Err(transient())
                } else {
                    Ok("payload")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_makes_budget_plus_one_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CatalogResult<()> = with_retry(&fast_policy(3), "test", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(CatalogError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, CatalogError::Upstream { status: 503, .. }));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failed_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let policy = RetryPolicy {
            max_retries: 1,
            attempt_timeout: Duration::from_millis(10),
            base_delay: Duration::from_millis(1),
        };

        let result = with_retry(&policy, "test", |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 1 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_status_uses_full_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CatalogResult<()> = with_retry(&fast_policy(2), "test", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CatalogError::Upstream {
                    status: 401,
                    body: String::new(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(CatalogError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, CatalogError::Upstream { status: 401, .. }));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CatalogResult<()> = with_retry(&fast_policy(2), "test", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(CatalogError::MissingCredential) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(CatalogError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let transport = Transport::new(None, "http://127.0.0.1:9".to_string(), fast_policy(2));
        assert!(!transport.has_credential());

        let result: CatalogResult<serde_json::Value> = transport
            .get_json("/discover/movie", &[("page", "1")], CacheKey::Discover("x".to_string()))
            .await;

        assert!(matches!(result, Err(CatalogError::MissingCredential)));
    }

    #[test]
    fn test_empty_key_means_no_credential() {
        let transport = Transport::new(
            Some(String::new()),
            "http://test.local/".to_string(),
            RetryPolicy::default(),
        );
        assert!(!transport.has_credential());
        assert_eq!(transport.api_url, "http://test.local");
    }
}
