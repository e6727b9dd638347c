//! Process configuration read from `STOCKLEDGER_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use stockledger_infra::{BackoffStrategy, LedgerConfig, RetryPolicy};
use stockledger_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "STOCKLEDGER_BIND_ADDR";
pub const LOCK_TIMEOUT_VAR: &str = "STOCKLEDGER_LOCK_TIMEOUT_MS";
pub const MAX_ATTEMPTS_VAR: &str = "STOCKLEDGER_MAX_ATTEMPTS";
pub const RETRY_DELAY_VAR: &str = "STOCKLEDGER_RETRY_DELAY_MS";
pub const RETRY_BACKOFF_VAR: &str = "STOCKLEDGER_RETRY_BACKOFF";
pub const RETRY_MAX_DELAY_VAR: &str = "STOCKLEDGER_RETRY_MAX_DELAY_MS";
pub const LOG_FORMAT_VAR: &str = "STOCKLEDGER_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RETRY_MAX_DELAY_MS: &str = "100";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub ledger: LedgerConfig,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            ledger: LedgerConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR, |v| {
            v.trim().parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;

        let defaults = LedgerConfig::default();
        let lock_timeout_ms = parse_var(
            &lookup,
            LOCK_TIMEOUT_VAR,
            &defaults.lock_timeout.as_millis().to_string(),
            positive_u64,
        )?;
        let max_attempts = parse_var(
            &lookup,
            MAX_ATTEMPTS_VAR,
            &defaults.retry.max_attempts.to_string(),
            |v| u32::try_from(positive_u64(v)?).map_err(|e| e.to_string()),
        )?;
        let retry_delay_ms = parse_var(
            &lookup,
            RETRY_DELAY_VAR,
            &defaults.retry.base_delay.as_millis().to_string(),
            |v| v.trim().parse::<u64>().map_err(|e| e.to_string()),
        )?;
        let backoff = parse_var(&lookup, RETRY_BACKOFF_VAR, "fixed", |v| {
            v.parse::<BackoffStrategy>().map_err(|e| e.to_string())
        })?;
        let retry_delay = Duration::from_millis(retry_delay_ms);
        let retry = match backoff {
            BackoffStrategy::Fixed => RetryPolicy::fixed(max_attempts, retry_delay),
            BackoffStrategy::Exponential => {
                let max_delay_ms = parse_var(
                    &lookup,
                    RETRY_MAX_DELAY_VAR,
                    DEFAULT_RETRY_MAX_DELAY_MS,
                    |v| match v.trim().parse::<u64>() {
                        Ok(n) if n < retry_delay_ms => {
                            Err(format!("must be at least {RETRY_DELAY_VAR} ({retry_delay_ms})"))
                        }
                        Ok(n) => Ok(n),
                        Err(e) => Err(e.to_string()),
                    },
                )?;
                RetryPolicy::exponential(
                    max_attempts,
                    retry_delay,
                    Duration::from_millis(max_delay_ms),
                )
            }
        };
        let log_format = parse_var(&lookup, LOG_FORMAT_VAR, "json", |v| {
            v.parse::<LogFormat>().map_err(|e| e.to_string())
        })?;

        Ok(Self {
            bind_addr,
            ledger: LedgerConfig {
                lock_timeout: Duration::from_millis(lock_timeout_ms),
                retry,
            },
            log_format,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    parse(&value).map_err(|reason| ConfigError::Invalid {
        var,
        value,
        reason,
    })
}

fn positive_u64(value: &str) -> Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
