use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConfigError;

/// Lock tuning shared by every `FileLock` built from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Seconds to wait before escalating (fractions allowed)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Delay between acquisition attempts
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Decision used on timeout when the caller injects no escalation
    #[serde(default)]
    pub on_timeout: TimeoutPolicy,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            on_timeout: TimeoutPolicy::default(),
        }
    }
}

impl LockConfig {
    /// Timeout as a `Duration`.
    ///
    /// Negative or NaN values clamp to zero and infinity maps to
    /// `Duration::MAX`, so an unvalidated config never panics here.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Checks value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeout_secs.is_finite() || self.timeout_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                reason: format!(
                    "must be a finite number >= 0, got {}",
                    self.timeout_secs
                ),
            });
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// What happens when the wait runs out and nobody is asked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Fail with a timeout error
    #[default]
    Abort,
    /// Remove the existing marker and take the lock
    Force,
}

fn default_timeout_secs() -> f64 {
    10.0
}

fn default_poll_interval_ms() -> u64 {
    50
}
