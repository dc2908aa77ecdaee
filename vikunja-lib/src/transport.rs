//! The seam between the request pipeline and the network.
//!
//! [`Client`](crate::Client) hands fully built requests to a [`Transport`]
//! and receives the status and raw body back. The default
//! [`ReqwestTransport`] talks HTTP through reqwest; tests and embedders can
//! inject their own implementation.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::ConfigError;

/// A timeout for only the connect phase of the default transport.
const CONNECT_TIMEOUT: u64 = 10;
/// TCP keepalive
/// See <https://tldp.org/HOWTO/TCP-Keepalive-HOWTO/overview.html> for more info
const TCP_KEEPALIVE: u64 = 60;

/// A request ready to be sent
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL
    pub url: Url,
    /// Headers, including authorization and content type
    pub headers: HeaderMap,
    /// Serialized JSON payload, if any
    pub body: Option<Vec<u8>>,
}

/// What came back from the server, before any interpretation.
///
/// The status is known as soon as the headers arrive. Reading the body
/// afterwards may still fail, e.g. when the connection drops mid-transfer.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status
    pub status: StatusCode,
    /// The complete response body, or why it could not be read
    pub body: Result<Vec<u8>, TransportError>,
}

impl TransportResponse {
    /// Create a response from a status and body
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Ok(body.into()),
        }
    }

    /// Create a response whose body could not be read
    #[must_use]
    pub const fn unreadable(status: StatusCode, error: TransportError) -> Self {
        Self {
            status,
            body: Err(error),
        }
    }
}

/// The request never produced a response (connection refused, DNS
/// failure) or its body could not be read.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Create an error with a description only
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_connect() {
            format!("Failed to connect: {e}")
        } else if e.is_body() || e.is_decode() {
            format!("Failed to read response body: {e}")
        } else {
            e.to_string()
        };
        Self {
            message,
            source: Some(Box::new(e)),
        }
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Execute `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response headers were received.
    /// Any status code, including errors, counts as a response; a body that
    /// fails to arrive is reported inside [`TransportResponse::body`].
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// The default [`Transport`], backed by [reqwest](https://docs.rs/reqwest).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport sending the given user agent
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the user agent is invalid or the underlying
    /// reqwest client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, ConfigError> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE))
            .build()
            .map_err(ConfigError::BuildTransport)?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(TransportError::from);

        Ok(TransportResponse { status, body })
    }
}
