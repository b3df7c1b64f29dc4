//! Per-query configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the debounce delay, in milliseconds
pub const DEBOUNCE_ENV: &str = "PLACES_DEBOUNCE_MS";

/// Settings of one query
///
/// An absent debounce means the query kind's default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Debounce delay in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl QueryConfig {
    /// Configuration with the kind defaults
    #[must_use]
    pub const fn new() -> Self {
        Self { debounce_ms: None }
    }

    /// Override the debounce delay
    ///
    /// Delays beyond `u64::MAX` milliseconds are clamped.
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The configured delay, or `default`
    #[must_use]
    pub fn debounce_or(&self, default: Duration) -> Duration {
        self.debounce_ms.map_or(default, Duration::from_millis)
    }

    /// Read overrides from the process environment
    ///
    /// Unset variables keep the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when [`DEBOUNCE_ENV`] is set but
    /// is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debounce_ms = match lookup(DEBOUNCE_ENV) {
            Some(value) => {
                let millis = value.trim().parse::<u64>().map_err(|source| {
                    ConfigError::InvalidNumber {
                        name: DEBOUNCE_ENV,
                        value: value.clone(),
                        source,
                    }
                })?;
                Some(millis)
            },
            None => None,
        };

        Ok(Self { debounce_ms })
    }
}
