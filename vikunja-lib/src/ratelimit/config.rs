use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::ConfigError;

/// Default number of requests admitted per window
pub const DEFAULT_MAX_REQUESTS: u32 = 500;

/// Default length of a rate limiting window, one minute
pub const DEFAULT_TIME_WINDOW: Duration = Duration::from_secs(60);

/// Fixed-window quota applied to all requests of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Length of a window
    #[serde(default = "default_time_window", with = "humantime_serde")]
    pub time_window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            time_window: default_time_window(),
        }
    }
}

const fn default_max_requests() -> u32 {
    DEFAULT_MAX_REQUESTS
}

const fn default_time_window() -> Duration {
    DEFAULT_TIME_WINDOW
}

impl RateLimitConfig {
    /// Create a `RateLimitConfig` from CLI options, using defaults for missing values
    #[must_use]
    pub fn from_options(max_requests: Option<u32>, time_window: Option<Duration>) -> Self {
        Self {
            max_requests: max_requests.unwrap_or(DEFAULT_MAX_REQUESTS),
            time_window: time_window.unwrap_or(DEFAULT_TIME_WINDOW),
        }
    }

    /// Same as [`RateLimitConfig::from_options`] with the window given in
    /// milliseconds, the unit used by the `VIKUNJA_API_RATE_LIMIT_WINDOW`
    /// environment variable.
    #[must_use]
    pub fn from_millis(max_requests: Option<u32>, time_window_ms: Option<u64>) -> Self {
        Self::from_options(max_requests, time_window_ms.map(Duration::from_millis))
    }

    /// Check that the quota can ever admit a request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if either value is zero.
    pub fn validate(&self) -> Result<(NonZeroU32, Duration), ConfigError> {
        let max_requests = NonZeroU32::new(self.max_requests).ok_or_else(|| {
            ConfigError::InvalidRateLimit("maximum requests must be positive".to_string())
        })?;
        if self.time_window.is_zero() {
            return Err(ConfigError::InvalidRateLimit(
                "time window must be positive".to_string(),
            ));
        }
        Ok((max_requests, self.time_window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_limit_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 500);
        assert_eq!(config.time_window, Duration::from_millis(60_000));
    }

    #[test]
    fn test_from_millis() {
        let config = RateLimitConfig::from_millis(Some(2), Some(100));
        assert_eq!(config.max_requests, 2);
        assert_eq!(config.time_window, Duration::from_millis(100));

        let config = RateLimitConfig::from_millis(None, None);
        assert_eq!(config, RateLimitConfig::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = RateLimitConfig::from_millis(Some(0), None);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRateLimit(_))
        ));

        let config = RateLimitConfig::from_millis(None, Some(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRateLimit(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = RateLimitConfig {
            max_requests: 15,
            time_window: Duration::from_millis(200),
        };

        let toml = toml::to_string(&config).unwrap();
        let deserialized: RateLimitConfig = toml::from_str(&toml).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RateLimitConfig = toml::from_str("time_window = \"5s\"").unwrap();
        assert_eq!(config.max_requests, DEFAULT_MAX_REQUESTS);
        assert_eq!(config.time_window, Duration::from_secs(5));
    }
}
