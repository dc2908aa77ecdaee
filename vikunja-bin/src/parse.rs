use anyhow::{Context, Result, anyhow};
use http::Method;
use serde_json::Value;

/// Parse an HTTP method, ignoring case
pub(crate) fn parse_method(method: &str) -> Result<Method> {
    let upper = method.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(anyhow!("HTTP method must not be empty"));
    }
    Method::from_bytes(upper.as_bytes()).with_context(|| format!("Invalid HTTP method `{method}`"))
}

/// Parse a JSON request body given on the command line
pub(crate) fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).context("Request body must be valid JSON")
}
