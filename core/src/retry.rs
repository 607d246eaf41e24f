//! Retry policy for calls against the items API.
//!
//! The host still does all I/O: `RetryPolicy::execute` takes the executor and
//! the sleeper as closures and only decides whether and when to call them
//! again.

use std::time::Duration;

use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per-attempt deadline the host should enforce on its HTTP call.
    pub request_timeout: Duration,
    /// Retries after the first attempt; 1 means at most two attempts.
    pub max_retries: u32,
    /// Base delay; the wait before retry `n` (0-based) is `retry_delay * (n + 1)`.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.retry_delay.saturating_mul(retry.saturating_add(1))
    }

    /// Whether a failure after `retries_done` retries earns another attempt.
    pub fn should_retry(&self, error: &ApiError, retries_done: u32) -> bool {
        retries_done < self.max_retries && error.is_retryable()
    }

    /// Run `request` through `execute` and `parse`, retrying retryable
    /// failures. `sleep` is called with the backoff before each retry.
    pub fn execute<T, E, P, S>(
        &self,
        request: &HttpRequest,
        mut execute: E,
        parse: P,
        mut sleep: S,
    ) -> Result<T, ApiError>
    where
        E: FnMut(&HttpRequest) -> Result<HttpResponse, ApiError>,
        P: Fn(HttpResponse) -> Result<T, ApiError>,
        S: FnMut(Duration),
    {
        let mut retries_done = 0;
        loop {
            let error = match execute(request).and_then(&parse) {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !self.should_retry(&error, retries_done) {
                return Err(error);
            }

            let delay = self.backoff(retries_done);
            retries_done += 1;
            warn!(
                attempt = retries_done,
                max_retries = self.max_retries,
                method = request.method.as_str(),
                path = %request.path,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "retrying request"
            );
            sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::client::ItemsClient;
    use crate::types::TestData;

    fn server_error() -> HttpResponse {
        HttpResponse::new(
            500,
            r#"{"success":false,"message":"Internal server error","error":"Database connection failed"}"#,
        )
    }

    fn success() -> HttpResponse {
        HttpResponse::new(
            200,
            r#"{"success":true,"data":{"timestamp":1,"random":0.9},"message":"Request successful!"}"#,
        )
    }

    #[test]
    fn default_policy_matches_client_settings() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.request_timeout, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
    }

    #[test]
    fn retries_a_server_error_once_then_succeeds() {
        let client = ItemsClient::new("http://localhost:8080");
        let responses = RefCell::new(vec![success(), server_error()]);
        let mut slept = Vec::new();

        let data: TestData = RetryPolicy::default()
            .execute(
                &client.build_test(),
                |_| Ok(responses.borrow_mut().pop().unwrap()),
                |r| client.parse_test(r),
                |d| slept.push(d),
            )
            .unwrap();

        assert_eq!(data.random, 0.9);
        assert_eq!(slept, vec![Duration::from_secs(1)]);
        assert!(responses.borrow().is_empty());
    }

    #[test]
    fn gives_up_after_max_retries() {
        let client = ItemsClient::new("http://localhost:8080");
        let mut calls = 0;
        let mut slept = Vec::new();

        let err = RetryPolicy::default()
            .execute(
                &client.build_test(),
                |_| {
                    calls += 1;
                    Ok(server_error())
                },
                |r| client.parse_test(r),
                |d| slept.push(d),
            )
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(calls, 2);
        assert_eq!(slept.len(), 1);
    }

    #[test]
    fn transport_failures_and_timeouts_are_retried() {
        let client = ItemsClient::new("http://localhost:8080");
        let policy = RetryPolicy {
            max_retries: 3,
            ..RetryPolicy::default()
        };
        let mut outcomes = vec![
            Ok(success()),
            Ok(HttpResponse::new(408, r#"{"success":false,"message":"Request timeout"}"#)),
            Err(ApiError::Transport("connection refused".to_string())),
        ];
        let mut slept = Vec::new();

        let result = policy.execute(
            &client.build_test(),
            |_| outcomes.pop().unwrap(),
            |r| client.parse_test(r),
            |d| slept.push(d),
        );

        assert!(result.is_ok());
        assert_eq!(slept, vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn client_errors_are_not_retried() {
        let client = ItemsClient::new("http://localhost:8080");
        let mut calls = 0;

        let err = RetryPolicy::default()
            .execute(
                &client.build_delete_item(99),
                |_| {
                    calls += 1;
                    Ok(HttpResponse::new(404, r#"{"success":false,"message":"Item not found"}"#))
                },
                |r| client.parse_delete_item(r),
                |_| panic!("must not sleep"),
            )
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn no_retry_policy_makes_one_attempt() {
        let policy = RetryPolicy::no_retry();
        assert!(!policy.should_retry(&ApiError::Transport("x".to_string()), 0));
    }
}
