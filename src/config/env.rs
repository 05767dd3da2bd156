//! Environment variable loading.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `DOUBAO_MIN_CHUNK_SIZE` | `decoder.min_chunk_size` |
//! | `DOUBAO_MAX_LINE_BYTES` | `decoder.max_line_bytes` |
//! | `DOUBAO_LOG_LABEL` | `decoder.label` |
//! | `DOUBAO_RETRY_MAX_ATTEMPTS` | `retry.max_attempts` |
//! | `DOUBAO_RETRY_DELAY_MS` | `retry.base_delay_ms` |
//! | `DOUBAO_RETRY_BACKOFF` | `retry.backoff` (`fixed` or `exponential`) |

use std::env;
use std::str::FromStr;

use crate::utils::retry::Backoff;

pub(crate) const MIN_CHUNK_SIZE_VAR: &str = "DOUBAO_MIN_CHUNK_SIZE";
pub(crate) const MAX_LINE_BYTES_VAR: &str = "DOUBAO_MAX_LINE_BYTES";
pub(crate) const LOG_LABEL_VAR: &str = "DOUBAO_LOG_LABEL";
pub(crate) const RETRY_MAX_ATTEMPTS_VAR: &str = "DOUBAO_RETRY_MAX_ATTEMPTS";
pub(crate) const RETRY_DELAY_MS_VAR: &str = "DOUBAO_RETRY_DELAY_MS";
pub(crate) const RETRY_BACKOFF_VAR: &str = "DOUBAO_RETRY_BACKOFF";

/// Values read from the environment; `None` when a variable is unset or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub min_chunk_size: Option<usize>,
    pub max_line_bytes: Option<usize>,
    pub label: Option<String>,
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub backoff: Option<Backoff>,
}

impl EnvConfig {
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            min_chunk_size: parse_var(MIN_CHUNK_SIZE_VAR)?,
            max_line_bytes: parse_var(MAX_LINE_BYTES_VAR)?,
            label: read_var(LOG_LABEL_VAR),
            max_attempts: parse_var(RETRY_MAX_ATTEMPTS_VAR)?,
            base_delay_ms: parse_var(RETRY_DELAY_MS_VAR)?,
            backoff: parse_var(RETRY_BACKOFF_VAR)?,
        })
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    read_var(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| format!("Invalid value for {key} ('{value}'): {e}"))
        })
        .transpose()
}

#[cfg(test)]
pub(crate) fn cleanup_env_vars() {
    unsafe {
        env::remove_var(MIN_CHUNK_SIZE_VAR);
        env::remove_var(MAX_LINE_BYTES_VAR);
        env::remove_var(LOG_LABEL_VAR);
        env::remove_var(RETRY_MAX_ATTEMPTS_VAR);
        env::remove_var(RETRY_DELAY_MS_VAR);
        env::remove_var(RETRY_BACKOFF_VAR);
    }
}
