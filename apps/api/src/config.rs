use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::retry::RetryPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup only on malformed values; every variable is optional.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when unset or blank; tailoring then fails fast with AI_NOT_CONFIGURED.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub retry_budget: Duration,
    pub max_api_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            retry_budget: Duration::from_millis(
                parse_env("TAILOR_RETRY_BUDGET_MS", 30_000)
                    .context("TAILOR_RETRY_BUDGET_MS must be a number of milliseconds")?,
            ),
            max_api_retries: parse_env("TAILOR_MAX_API_RETRIES", 2)
                .context("TAILOR_MAX_API_RETRIES must be a non-negative integer")?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_api_retries: self.max_api_retries,
            ..RetryPolicy::default()
        }
        .with_time_budget(self.retry_budget)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_defaults_when_unset() {
        let v: u32 = parse_env("TAILOR_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn test_retry_policy_reflects_config() {
        let config = Config {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".into(),
            retry_budget: Duration::from_millis(5_000),
            max_api_retries: 4,
        };
        let policy = config.retry_policy();
        assert_eq!(policy.time_budget, Duration::from_millis(5_000));
        assert_eq!(policy.max_api_retries, 4);
        assert_eq!(policy.initial_backoff, RetryPolicy::default().initial_backoff);
    }
}
