use anyhow::Result;
use http::Method;
use log::debug;
use serde_json::Value;
use std::io::Write;
use vikunja_lib::{Client, Reply};

use crate::formatters::write_json;

/// Send an arbitrary request. A no-content reply prints nothing.
pub(crate) async fn request(
    client: &Client,
    method: Method,
    path: &str,
    body: Option<&Value>,
    writer: &mut dyn Write,
) -> Result<()> {
    match client.request_value(method, path, body).await? {
        Reply::NoContent => {
            debug!("No content");
            Ok(())
        }
        Reply::Json(value) => write_json(writer, &value),
    }
}
