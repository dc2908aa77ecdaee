//! `test-utils` is used for testing in both `vikunja-lib` and `vikunja`.
//! This crate does not depend on `vikunja-lib` or `vikunja`, else we would get dependency cycles.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

/// Create a mock web server, which responds with a predefined status to
/// requests of any method and path
#[macro_export]
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new(http::StatusCode::from($status));
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::any()).respond_with(template).mount(&mock_server).await;
        mock_server
    }};
}

/// Build a response template carrying a Vikunja error body,
/// e.g. `{"code": 3001, "message": "The project does not exist"}`
#[macro_export]
macro_rules! vikunja_error {
    ($status:expr, $code:expr, $message:expr $(,)?) => {
        wiremock::ResponseTemplate::new(http::StatusCode::from($status))
            .set_body_json(serde_json::json!({ "code": $code, "message": $message }))
    };
}

/// Create a mock web server answering every request with a Vikunja error body
#[macro_export]
macro_rules! mock_error_server {
    ($status:expr, $code:expr, $message:expr $(,)?) => {{
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::any())
            .respond_with($crate::vikunja_error!($status, $code, $message))
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// Build a client pointed at a mock server, applying extra builder calls.
///
/// Expects `ClientBuilder` to be in scope.
#[macro_export]
macro_rules! mock_client {
    ($mock_server:expr $(, $func:ident ($($arg:expr),*))* $(,)?) => {
        ClientBuilder::builder()
            .api_url($mock_server.uri())
            .token("test-token")
            $(.$func($($arg),*))*
            .build()
            .client()
            .unwrap()
    };
}

/// The path prefix every request of a client ends up under
#[macro_export]
macro_rules! api_path {
    ($path:expr) => {
        format!("/api/v1{}", $path)
    };
}

/// Gets the "main" binary name (e.g. `vikunja`)
#[macro_export]
macro_rules! main_command {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!()
    };
}

/// Create a mock web server answering every request with a JSON body
#[macro_export]
macro_rules! mock_json_server {
    ($status:expr, $body:expr $(,)?) => {
        $crate::mock_server!($status, set_body_json($body))
    };
}

/// Start a raw TCP server answering a single request with `status` and a
/// body shorter than its `Content-Length`, then closing the connection.
/// Returns the base URL.
#[macro_export]
macro_rules! truncated_body_server {
    ($status_line:expr) => {{
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 100\r\n\r\nshort",
                $status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{address}")
    }};
}
