use serde::Serialize;
use strum::{Display, EnumIter};
use thiserror::Error;

/// The closed set of ways a request against the Vikunja API can fail.
///
/// Every outcome other than a successful `2xx` response resolves to exactly
/// one of these kinds. Callers branch on the kind and may read
/// [`DomainError::code`] for the finer-grained value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum ErrorKind {
    /// No connection reached the server
    Network,
    /// The server explicitly signaled a request timeout (HTTP 408)
    Timeout,
    /// The server answered with a success status but the body was unusable
    InvalidResponse,
    /// Malformed request or bad input, as judged by the server
    Validation,
    /// Authentication or authorization failure
    Auth,
    /// The referenced resource does not exist
    NotFound,
    /// Unclassified server-side failure
    Server,
}

impl ErrorKind {
    /// The code carried by errors of this kind when neither the server nor
    /// the HTTP status supplies one.
    #[must_use]
    pub const fn default_code(self) -> u32 {
        match self {
            Self::Network => 0,
            Self::Timeout => 408,
            Self::InvalidResponse | Self::Validation => 400,
            Self::Auth => 403,
            Self::NotFound => 404,
            Self::Server => 500,
        }
    }

    /// The message used when no better description is available.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Network => "Network error occurred",
            Self::Timeout => "Request timeout",
            Self::InvalidResponse => "Invalid response format",
            Self::Validation => "Validation error",
            Self::Auth => "Authentication error",
            Self::NotFound => "Resource not found",
            Self::Server => "Internal server error",
        }
    }
}

/// A typed failure produced by the request pipeline.
///
/// The `code` is the application error code when the service supplied one
/// in the recognized range (e.g. `3001` for "project does not exist"),
/// otherwise the HTTP status, otherwise [`ErrorKind::default_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[error("{message}")]
pub struct DomainError {
    kind: ErrorKind,
    code: u32,
    message: String,
}

impl DomainError {
    /// Create an error from all of its parts
    #[must_use]
    pub fn new(kind: ErrorKind, code: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Create an error with the kind's default code and message
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_code(), kind.default_message())
    }

    /// The connection to the server could not be established or was lost
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, ErrorKind::Network.default_code(), message)
    }

    /// The server returned a success status with an unusable body
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        let kind = ErrorKind::InvalidResponse;
        Self::new(kind, kind.default_code(), message)
    }

    /// The request could not be built from the caller's input
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        let kind = ErrorKind::Validation;
        Self::new(kind, kind.default_code(), message)
    }

    /// The category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Application error code, HTTP status or client-side default
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.code
    }

    /// Human-readable description
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the referenced resource was absent
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Errors raised while assembling a [`Client`](crate::Client).
///
/// These never result from a request; they indicate that the configuration
/// itself is unusable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The API URL could not be parsed
    #[error("API URL `{url}` is not a valid URL: {source}")]
    InvalidUrl {
        /// The URL as given by the user
        url: String,
        /// Underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// The API URL does not use a scheme we can send requests to
    #[error("API URL `{0}` must use the http or https scheme")]
    UnsupportedScheme(String),

    /// The API URL carries a query string or fragment, which cannot be
    /// combined with request paths
    #[error("API URL `{0}` must not contain a query or fragment")]
    QueryOrFragment(String),

    /// No token was configured
    #[error("API token cannot be empty")]
    EmptyToken,

    /// Rate limit values must be positive
    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    /// The default HTTP transport could not be created
    #[error("Failed to build HTTP client: {0}")]
    BuildTransport(#[source] reqwest::Error),
}
