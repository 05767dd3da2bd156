//! Retry decorator for whole request-and-decode attempts.
//!
//! Each attempt is expected to open a fresh request and a fresh
//! `ParseSession`. Whether an attempt is retried is decided by
//! [`DecodeError::is_retryable`].
//!
//! # Example
//!
//! ```rust,no_run
//! use doubao_stream::core::tts::doubao::{DecoderSettings, decode_response};
//! use doubao_stream::utils::retry::{RetryPolicy, with_retry};
//!
//! # async fn run(client: reqwest::Client) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = DecoderSettings::default();
//! let audio = with_retry(&RetryPolicy::default(), |_attempt| {
//!     let request = client.post("https://example.com/tts").body("{}");
//!     let settings = settings.clone();
//!     async move {
//!         let response = request.send().await?;
//!         decode_response(response, &settings).await
//!     }
//! })
//! .await?;
//! # let _ = audio;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::tts::doubao::{DecodeError, DecodeResult};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles after every failed attempt.
    #[default]
    Exponential,
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

impl FromStr for Backoff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "exponential" => Ok(Self::Exponential),
            other => Err(format!(
                "Invalid backoff '{other}'. Must be 'fixed' or 'exponential'"
            )),
        }
    }
}

/// Attempt count and delay schedule for [`with_retry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Must be at least 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default)]
    pub backoff: Backoff,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after `failed_attempts` attempts have failed.
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let millis = match self.backoff {
            Backoff::Fixed => self.base_delay_ms,
            Backoff::Exponential => self
                .base_delay_ms
                .saturating_mul(2u64.saturating_pow(failed_attempts.saturating_sub(1))),
        };
        Duration::from_millis(millis)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("retry max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of attempts.
///
/// `operation` receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> DecodeResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DecodeError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!("Retryable error on attempt {}: {}", attempt, e);
                debug!(
                    "Retry attempt {} after {}ms delay ({} backoff)",
                    attempt + 1,
                    delay.as_millis(),
                    policy.backoff
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_retryable() {
                    warn!("Giving up after {} attempts: {}", attempt, e);
                }
                return Err(e);
            }
        }
    }
}
