pub(crate) mod request;
pub(crate) mod resource;

use anyhow::Result;
use std::io::Write;
use vikunja_lib::Client;

use crate::options::{Command, OutputFormat};

/// Run `command` against the API, writing results to `writer` in `format`.
/// Raw requests always print JSON.
///
/// Failed requests surface as a [`vikunja_lib::DomainError`] inside the
/// returned error.
pub(crate) async fn execute(
    client: &Client,
    command: &Command,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Projects(action) => resource::projects(client, *action, format, writer).await,
        Command::Tasks(action) => resource::tasks(client, *action, format, writer).await,
        Command::Request { method, path, body } => {
            request::request(client, method.clone(), path, body.as_ref(), writer).await
        }
    }
}
