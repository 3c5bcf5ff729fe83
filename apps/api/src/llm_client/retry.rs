//! Resilient invoker — time-budgeted retry around a single completion call.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::llm_client::LlmError;

/// Retry policy for one completion call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total wall-clock budget across all attempts and backoff sleeps.
    pub time_budget: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Bounded retries for generic API errors. Rate limits and transport
    /// failures are bounded by `time_budget` only.
    pub max_api_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(30),
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(8),
            max_api_retries: 2,
        }
    }
}

impl RetryPolicy {
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

enum Disposition {
    Fatal,
    UntilBudget,
    Bounded,
}

fn classify(err: &LlmError) -> Disposition {
    match err {
        LlmError::Http(e) if e.is_decode() => Disposition::Fatal,
        LlmError::RateLimited { .. } | LlmError::Http(_) => Disposition::UntilBudget,
        LlmError::Api { .. } => Disposition::Bounded,
        LlmError::Auth(_)
        | LlmError::NotConfigured
        | LlmError::EmptyContent
        | LlmError::Decode(_)
        | LlmError::Timeout(_) => Disposition::Fatal,
    }
}

/// Runs `call` until it succeeds, fails non-transiently, or the time budget
/// would be exceeded by the next backoff. Each attempt is cut off at the
/// budget left. The last error is surfaced.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let started = Instant::now();
    let mut retries = 0u32;
    let mut api_retries = 0u32;

    loop {
        let remaining = policy.time_budget.saturating_sub(started.elapsed());
        let err = match tokio::time::timeout(remaining, call()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => err,
            Err(_) => {
                warn!("Completion attempt {} ran past the retry budget", retries + 1);
                return Err(LlmError::Timeout(policy.time_budget));
            }
        };

        match classify(&err) {
            Disposition::Fatal => return Err(err),
            Disposition::Bounded if api_retries >= policy.max_api_retries => return Err(err),
            Disposition::Bounded => api_retries += 1,
            Disposition::UntilBudget => {}
        }

        let mut delay = policy.backoff_for(retries);
        if let LlmError::RateLimited {
            retry_after: Some(hint),
            ..
        } = &err
        {
            delay = delay.max(*hint);
        }

        if started.elapsed() + delay > policy.time_budget {
            warn!(
                "Retry budget of {}ms exhausted after {} retries: {err}",
                policy.time_budget.as_millis(),
                retries
            );
            return Err(err);
        }

        retries += 1;
        warn!(
            "Completion attempt {} failed ({err}), retrying after {}ms...",
            retries,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
    }
}
