//! Connection settings of a [`Client`](crate::Client).

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::ConfigError;
use crate::ratelimit::RateLimitConfig;

/// Versioned path segment every API URL ends with
pub const API_PATH: &str = "/api/v1";

/// Normalize a user supplied API URL.
///
/// Trailing slashes are stripped and [`API_PATH`] is appended unless the URL
/// already ends with it. Applying the function twice gives the same result
/// as applying it once.
///
/// ```
/// use vikunja_lib::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://host/"), "http://host/api/v1");
/// assert_eq!(normalize_base_url("http://host/api/v1/"), "http://host/api/v1");
/// ```
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with(API_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_PATH}")
    }
}

/// Validated client settings: where to send requests, how to authenticate
/// and how many requests to allow per window.
#[derive(Debug)]
pub struct ClientConfig {
    api_url: String,
    token: SecretString,
    rate_limit: RateLimitConfig,
}

impl ClientConfig {
    /// Validate and normalize user supplied settings
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - `api_url` is not a valid http(s) URL
    /// - `api_url` has a query string or fragment
    /// - `token` is empty
    /// - the rate limit has a zero quota or window
    pub fn new(
        api_url: &str,
        token: SecretString,
        rate_limit: RateLimitConfig,
    ) -> Result<Self, ConfigError> {
        let normalized = normalize_base_url(api_url.trim());
        let parsed = Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
            url: api_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(api_url.to_string()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::QueryOrFragment(api_url.to_string()));
        }
        if token.expose_secret().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        rate_limit.validate()?;

        Ok(Self {
            api_url: normalized,
            token,
            rate_limit,
        })
    }

    /// The normalized API URL, ending in [`API_PATH`]
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The bearer token sent with every request
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The configured quota
    #[must_use]
    pub const fn rate_limit(&self) -> &RateLimitConfig {
        &self.rate_limit
    }

    pub(crate) fn set_token(&mut self, token: SecretString) {
        self.token = token;
    }

    /// Join a request path onto the API URL with exactly one `/` between
    /// them. The path may or may not start with a slash.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{path}", self.api_url))
    }
}
