//! Option defaults from the environment
//!
//! [`DispatchConfig`] holds defaults a host may load once at startup. Every
//! field is optional; an unset field leaves the built-in default alone.
//! [`DispatchOptions::from_config`](crate::DispatchOptions::from_config)
//! applies them, and setters called afterwards override them.
//!
//! Environment:
//! - `RPCDISP_DEBUG`: `1/true/yes/on` or `0/false/no/off`
//! - `RPCDISP_TRIM_LOG_VALUES`: same boolean forms
//! - `RPCDISP_BATCH_MODE`: `sequential` or `parallel`

use crate::batch::BatchMode;
use std::env;
use thiserror::Error;

pub const DEBUG_VAR: &str = "RPCDISP_DEBUG";
pub const TRIM_LOG_VALUES_VAR: &str = "RPCDISP_TRIM_LOG_VALUES";
pub const BATCH_MODE_VAR: &str = "RPCDISP_BATCH_MODE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a boolean (1/true/yes/on or 0/false/no/off), got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("RPCDISP_BATCH_MODE must be \"sequential\" or \"parallel\", got {0:?}")]
    InvalidBatchMode(String),
}

/// Default option values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    pub debug: Option<bool>,
    pub trim_log_values: Option<bool>,
    pub batch_mode: Option<BatchMode>,
}

impl DispatchConfig {
    /// Read defaults from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read defaults through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let debug = read(DEBUG_VAR)
            .map(|value| parse_bool(DEBUG_VAR, value))
            .transpose()?;
        let trim_log_values = read(TRIM_LOG_VALUES_VAR)
            .map(|value| parse_bool(TRIM_LOG_VALUES_VAR, value))
            .transpose()?;
        let batch_mode = read(BATCH_MODE_VAR)
            .map(|value| value.parse::<BatchMode>())
            .transpose()?;

        Ok(Self {
            debug,
            trim_log_values,
            batch_mode,
        })
    }

    /// Layer `overrides` on top of these defaults
    pub fn merge(self, overrides: DispatchConfig) -> Self {
        Self {
            debug: overrides.debug.or(self.debug),
            trim_log_values: overrides.trim_log_values.or(self.trim_log_values),
            batch_mode: overrides.batch_mode.or(self.batch_mode),
        }
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}
