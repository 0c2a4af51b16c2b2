use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{error::PipelineError, warning};

/// Bounded retry for `429 Too Many Requests`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further retry.
    pub base_delay: Duration,
    /// Longest delay worth waiting for. A `Retry-After` above it aborts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based). A server-provided
    /// `Retry-After` wins over the computed backoff.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.base_delay.saturating_mul(2u32.saturating_pow(attempt)))
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Sends the request produced by `build`, retrying on `429` per `policy`.
///
/// `build` is called once per attempt because a request builder is consumed
/// by sending it. Any response other than `429` is returned as is, including
/// other error statuses.
///
/// # Errors
///
/// - [`PipelineError::CatalogRequestFailed`] with status 429 once the retry
///   ceiling is reached or the server asks for a delay above `max_delay`
/// - [`PipelineError::Http`] for network failures
pub async fn send_with_retry<F>(
    policy: &RetryPolicy,
    context: &str,
    mut build: F,
) -> Result<Response, PipelineError>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 0;

    loop {
        let response = build().send().await?;
        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }

        if attempt >= policy.max_retries {
            warning!(
                "Rate limit persisted after {} retries ({})",
                policy.max_retries,
                context
            );
            return Err(PipelineError::catalog(429, context));
        }

        let delay = policy.backoff(attempt, retry_after(&response));
        if delay > policy.max_delay {
            warning!(
                "Retry after has reached an abnormal high of {} seconds ({})",
                delay.as_secs(),
                context
            );
            return Err(PipelineError::catalog(429, context));
        }

        attempt += 1;
        warning!(
            "Rate limited ({}), retry {}/{} in {} ms",
            context,
            attempt,
            policy.max_retries,
            delay.as_millis()
        );
        sleep(delay).await;
    }
}
