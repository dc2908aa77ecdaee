//! Dispatcher for requests against the Vikunja API.
//!
//! This module defines two structs, [`Client`] and [`ClientBuilder`].
//! `Client` sends requests and classifies their outcome.
//! `ClientBuilder` validates configuration and assembles a `Client`.
//!
//! Every request follows the same fixed order: quota ([`RateGate`]),
//! network ([`Transport`]), status triage, and finally JSON parsing.
#![allow(clippy::module_name_repetitions)]

mod classify;

use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use typed_builder::TypedBuilder;

use crate::{
    ClientConfig, ConfigError, DomainError, Reply, Result,
    ratelimit::{RateGate, RateLimitConfig},
    resource::{ProjectResource, TaskResource},
    transport::{OutboundRequest, ReqwestTransport, Transport, TransportResponse},
};
use classify::classify;

/// Default user agent, `vikunja-lib/<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("vikunja-lib/", env!("CARGO_PKG_VERSION"));

/// Builder for [`Client`].
///
/// ```no_run
/// use vikunja_lib::ClientBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let client = ClientBuilder::builder()
///     .api_url("https://tasks.example.org")
///     .token("my-token")
///     .build()
///     .client()?;
/// let projects = client.projects().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(TypedBuilder, Debug)]
#[builder(builder_method(doc = "
Create a builder for building `ClientBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `ClientBuilder`.
"))]
pub struct ClientBuilder {
    /// Base URL of the Vikunja instance.
    ///
    /// `/api/v1` is appended unless already present.
    #[builder(setter(into))]
    api_url: String,

    /// API token sent as `Authorization: Bearer <token>`.
    #[builder(setter(into))]
    token: SecretString,

    /// Maximum number of requests per time window.
    ///
    /// Defaults to 500 requests per minute.
    #[builder(default)]
    rate_limit: RateLimitConfig,

    /// Custom transport used to send requests.
    ///
    /// When absent, a [`ReqwestTransport`] is created.
    #[builder(default, setter(strip_option))]
    transport: Option<Arc<dyn Transport>>,

    /// User-agent of the default transport.
    #[builder(default = String::from(DEFAULT_USER_AGENT), setter(into))]
    user_agent: String,
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The API URL is not a valid http(s) URL.
    /// - The token is empty.
    /// - The rate limit has a zero quota or window.
    /// - The default transport cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> std::result::Result<Client, ConfigError> {
        let Self {
            api_url,
            token,
            rate_limit,
            transport,
            user_agent,
        } = self;

        let config = ClientConfig::new(&api_url, token, rate_limit)?;
        let gate = RateGate::from_config(config.rate_limit())?;
        let transport = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&user_agent)?),
        };

        Ok(Client {
            config,
            gate,
            transport,
        })
    }
}

/// Sends requests to the Vikunja API and returns typed results.
///
/// A single `Client` may serve many concurrent requests; they share its
/// [`RateGate`]. The client is not `Clone`; each instance owns
/// its configuration and quota. Share it by reference or through an `Arc`.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    gate: RateGate,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// The validated configuration
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the API token; subsequent requests use the new one
    pub fn set_token(&mut self, token: impl Into<SecretString>) {
        self.config.set_token(token.into());
    }

    /// The quota shared by all requests of this client
    #[must_use]
    pub const fn rate_gate(&self) -> &RateGate {
        &self.gate
    }

    /// Access the project endpoints
    #[must_use]
    pub const fn projects(&self) -> ProjectResource<'_> {
        ProjectResource::new(self)
    }

    /// Access the task endpoints
    #[must_use]
    pub const fn tasks(&self) -> TaskResource<'_> {
        TaskResource::new(self)
    }

    /// `GET` `path` and deserialize the response
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// `PUT` `body` to `path` and deserialize the response
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// `POST` `body` to `path` and deserialize the response
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `DELETE` `path`, discarding any response body
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request_value::<()>(Method::DELETE, path, None)
            .await
            .map(drop)
    }

    /// Send a request and convert the JSON response into `T`.
    ///
    /// A 204 response is presented as JSON `null`, so it converts into `()`
    /// or `Option<T>`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the request fails for any reason; see
    /// [`Client::request_value`]. A response that is valid JSON but does not
    /// fit `T` is an [`ErrorKind::InvalidResponse`](crate::ErrorKind).
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_value(method, path, body).await?.deserialize()
    }

    /// Send a request and return the untyped outcome.
    ///
    /// This method:
    /// 1. Waits for the rate gate to admit the request
    /// 2. Joins `path` onto the API URL
    /// 3. Adds bearer authorization and a JSON content type, serializing `body`
    /// 4. Sends the request through the transport
    /// 5. Classifies the response
    ///
    /// # Errors
    ///
    /// - [`Network`](crate::ErrorKind::Network) if no response was received
    /// - [`InvalidResponse`](crate::ErrorKind::InvalidResponse) if the body of
    ///   a success response is unreadable or not JSON
    /// - [`Validation`](crate::ErrorKind::Validation) if the path or body
    ///   cannot be turned into a request
    /// - any kind produced by classifying a non-success status
    pub async fn request_value<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Reply>
    where
        B: Serialize + ?Sized,
    {
        self.gate.acquire().await;

        let url = self.config.endpoint(path).map_err(|e| {
            DomainError::validation(format!("Cannot build request URL for `{path}`: {e}"))
        })?;
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| DomainError::validation(format!("Cannot serialize request body: {e}")))?;
        let request = OutboundRequest {
            method,
            url,
            headers: self.headers()?,
            body,
        };

        log::debug!("{} {}", request.method, request.url);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| DomainError::network(e.to_string()))?;
        log::debug!("Received HTTP {}", response.status);

        into_reply(response)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.config.token().expose_secret()))
                .map_err(|_| {
                    DomainError::validation("API token contains characters not allowed in a header")
                })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}

/// Triage a response by status: no-content, success with JSON, or error.
///
/// A body that failed to arrive makes a success response invalid; error
/// responses are then classified by status alone.
fn into_reply(response: TransportResponse) -> Result<Reply> {
    let TransportResponse { status, body } = response;

    if status == StatusCode::NO_CONTENT {
        return Ok(Reply::NoContent);
    }

    if (200..299).contains(&status.as_u16()) {
        let body = body.map_err(|e| DomainError::invalid_response(e.to_string()))?;
        return serde_json::from_slice(&body)
            .map(Reply::Json)
            .map_err(|_| DomainError::invalid_response("Invalid JSON response"));
    }

    let body = body.unwrap_or_else(|e| {
        log::debug!("Ignoring unreadable body of HTTP {status}: {e}");
        Vec::new()
    });
    Err(classify(status, &body))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use test_utils::{
        api_path, mock_client, mock_error_server, mock_server, truncated_body_server,
    };
    use tokio::time::Instant;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::ClientBuilder;
    use crate::transport::{OutboundRequest, Transport, TransportError, TransportResponse};
    use crate::{ErrorKind, RateLimitConfig, Reply};

    /// Records requests and answers them with a canned response
    #[derive(Debug, Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<OutboundRequest>>,
        status: Option<StatusCode>,
        body: Vec<u8>,
        unreadable: bool,
    }

    impl RecordingTransport {
        fn answering(status: StatusCode, body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::default(),
                status: Some(status),
                body: body.to_vec(),
                unreadable: false,
            })
        }

        fn cut_off(status: StatusCode) -> Arc<Self> {
            Arc::new(Self {
                status: Some(status),
                unreadable: true,
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn last(&self) -> OutboundRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(
            &self,
            request: OutboundRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            match self.status {
                Some(status) if self.unreadable => Ok(TransportResponse::unreadable(
                    status,
                    TransportError::new("connection reset"),
                )),
                Some(status) => Ok(TransportResponse::new(status, self.body.clone())),
                None => Err(TransportError::new("connection refused")),
            }
        }
    }

    fn client_with(transport: Arc<RecordingTransport>) -> super::Client {
        throttled_client_with(transport, RateLimitConfig::default())
    }

    fn throttled_client_with(
        transport: Arc<RecordingTransport>,
        rate_limit: RateLimitConfig,
    ) -> super::Client {
        ClientBuilder::builder()
            .api_url("http://vikunja:3456/")
            .token("test-token")
            .rate_limit(rate_limit)
            .transport(transport)
            .build()
            .client()
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = RecordingTransport::answering(StatusCode::OK, b"{}");
        let client = client_with(transport.clone());

        let _: Value = client
            .post("projects/1", &json!({"title": "t"}))
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "http://vikunja:3456/api/v1/projects/1");
        assert_eq!(request.headers["authorization"], "Bearer test-token");
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.body.unwrap(), br#"{"title":"t"}"#);
    }

    #[tokio::test]
    async fn test_get_has_no_body() {
        let transport = RecordingTransport::answering(StatusCode::OK, b"[]");
        let client = client_with(transport.clone());

        let _: Vec<Value> = client.get("/tasks/all").await.unwrap();

        assert!(transport.last().body.is_none());
    }

    #[tokio::test]
    async fn test_token_rotation() {
        let transport = RecordingTransport::answering(StatusCode::OK, b"{}");
        let mut client = client_with(transport.clone());

        client.set_token("rotated");
        let _: Value = client.get("/user").await.unwrap();

        assert_eq!(transport.last().headers["authorization"], "Bearer rotated");
        assert_eq!(client.config().api_url(), "http://vikunja:3456/api/v1");
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let client = client_with(RecordingTransport::failing());

        let err = client.get::<Value>("/projects").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.code(), 0);
    }

    #[tokio::test]
    async fn test_no_content_is_never_parsed() {
        let transport = RecordingTransport::answering(StatusCode::NO_CONTENT, b"garbage{");
        let client = client_with(transport);

        let reply = client
            .request_value::<()>(Method::GET, "/x", None)
            .await
            .unwrap();
        assert_eq!(reply, Reply::NoContent);
        client.delete("/tasks/1").await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_json_on_success() {
        let transport = RecordingTransport::answering(StatusCode::OK, b"not json{");
        let client = client_with(transport);

        let err = client.get::<Value>("/projects").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert_eq!(err.code(), 400);
    }

    #[rstest]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Server, "Internal Server Error")]
    #[case(StatusCode::NOT_FOUND, ErrorKind::NotFound, "Not Found")]
    #[case(StatusCode::REQUEST_TIMEOUT, ErrorKind::Timeout, "Request timeout")]
    #[tokio::test]
    async fn test_unreadable_error_body_keeps_status(
        #[case] status: StatusCode,
        #[case] kind: ErrorKind,
        #[case] message: &str,
    ) {
        let client = client_with(RecordingTransport::cut_off(status));

        let err = client.get::<Value>("/projects").await.unwrap_err();

        assert_eq!(err.kind(), kind);
        assert_eq!(err.code(), u32::from(status.as_u16()));
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_invalid() {
        let client = client_with(RecordingTransport::cut_off(StatusCode::OK));

        let err = client.get::<Value>("/projects").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert_eq!(err.code(), 400);
    }

    #[tokio::test]
    async fn test_unreadable_no_content_is_ignored() {
        let client = client_with(RecordingTransport::cut_off(StatusCode::NO_CONTENT));
        client.delete("/tasks/1").await.unwrap();
    }

    #[tokio::test]
    async fn test_truncated_error_body_over_http() {
        let base_url = truncated_body_server!("404 Not Found");
        let client = ClientBuilder::builder()
            .api_url(base_url)
            .token("test-token")
            .build()
            .client()
            .unwrap();

        let err = client.get::<Value>("/tasks/9").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), 404);
    }

    #[tokio::test]
    async fn test_created_status_is_success() {
        let transport = RecordingTransport::answering(StatusCode::CREATED, br#"{"id": 7}"#);
        let client = client_with(transport);

        let value: Value = client.put("/projects", &json!({})).await.unwrap();
        assert_eq!(value, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_redirect_status_is_classified() {
        let transport = RecordingTransport::answering(StatusCode::FOUND, b"");
        let client = client_with(transport);

        let err = client.get::<Value>("/projects").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.code(), 302);
    }

    #[tokio::test]
    async fn test_wiremock_headers_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api_path!("/projects")))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"title": "Inbox"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client!(mock_server);
        let value: Value = client
            .put("/projects", &json!({"title": "Inbox"}))
            .await
            .unwrap();

        assert_eq!(value, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_vikunja_not_found_code() {
        let mock_server = mock_error_server!(StatusCode::NOT_FOUND, 3002, "task gone");
        let client = mock_client!(mock_server);

        let err = client.get::<Value>("/tasks/9").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "task gone");
        assert_eq!(err.code(), 3002);
    }

    #[tokio::test]
    async fn test_unparseable_server_error() {
        let mock_server = mock_server!(
            StatusCode::INTERNAL_SERVER_ERROR,
            set_body_string("Invalid JSON but HTTP 500")
        );
        let client = mock_client!(mock_server);

        let err = client.delete("/tasks/9").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.code(), 500);
    }

    #[tokio::test]
    async fn test_remote_timeout() {
        let mock_server = mock_server!(StatusCode::REQUEST_TIMEOUT);
        let client = mock_client!(mock_server);

        let err = client.get::<Value>("/tasks/9").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.message(), "Request timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_requests() {
        let start = Instant::now();
        let transport = RecordingTransport::answering(StatusCode::OK, b"{}");
        let client = throttled_client_with(
            transport.clone(),
            RateLimitConfig::from_millis(Some(2), Some(100)),
        );

        for _ in 0..2 {
            let _: Value = client.get("/info").await.unwrap();
        }
        let first_two = start.elapsed();
        let _: Value = client.get("/info").await.unwrap();
        let third = start.elapsed();

        assert!(first_two < Duration::from_millis(100), "{first_two:?}");
        assert!(third >= Duration::from_millis(100), "{third:?}");
        assert_eq!(transport.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_quota() {
        let start = Instant::now();
        let transport = RecordingTransport::answering(StatusCode::OK, b"[]");
        let client = throttled_client_with(
            transport.clone(),
            RateLimitConfig::from_millis(Some(2), Some(100)),
        );

        let results = futures::future::join_all(
            (0..5).map(|_| client.get::<Vec<Value>>("/tasks/all")),
        )
        .await;

        assert!(results.iter().all(Result::is_ok));
        // Five requests at two per window need three windows
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
        assert_eq!(transport.requests.lock().unwrap().len(), 5);
    }
}
