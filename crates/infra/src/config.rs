//! Process configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `STOCKLEDGER_BIND_ADDR` | `0.0.0.0:8080` |
//! | `STOCKLEDGER_DEFAULT_REORDER_LEVEL` | `5` (must be >= 0) |
//! | `STOCKLEDGER_LOG_FORMAT` | `json` (`json` or `pretty`) |
//!
//! Unset variables fall back to the default; set but invalid ones are errors.

use std::net::SocketAddr;

use thiserror::Error;

use stockledger_inventory::DEFAULT_REORDER_LEVEL;
use stockledger_observability::LogFormat;

use crate::ledger::LedgerConfig;

pub const BIND_ADDR_VAR: &str = "STOCKLEDGER_BIND_ADDR";
pub const DEFAULT_REORDER_LEVEL_VAR: &str = "STOCKLEDGER_DEFAULT_REORDER_LEVEL";
pub const LOG_FORMAT_VAR: &str = "STOCKLEDGER_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub ledger: LedgerConfig,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            ledger: LedgerConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(BIND_ADDR_VAR, &bind_addr, e))?;

        let default_reorder_level = match lookup(DEFAULT_REORDER_LEVEL_VAR) {
            None => DEFAULT_REORDER_LEVEL,
            Some(raw) => {
                let level = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| ConfigError::invalid(DEFAULT_REORDER_LEVEL_VAR, &raw, e))?;
                if level < 0 {
                    return Err(ConfigError::invalid(
                        DEFAULT_REORDER_LEVEL_VAR,
                        &raw,
                        "must be zero or greater",
                    ));
                }
                level
            }
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT_VAR, &raw, e))?,
        };

        Ok(Self {
            bind_addr,
            ledger: LedgerConfig {
                default_reorder_level,
            },
            log_format,
        })
    }
}
