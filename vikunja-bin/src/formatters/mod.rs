pub(crate) mod color;
pub(crate) mod log;
pub(crate) mod markdown;

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use vikunja_lib::DomainError;

use self::color::error_style;

/// Write `value` as pretty-printed JSON followed by a newline
pub(crate) fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Write rendered markdown followed by a newline
pub(crate) fn write_markdown(writer: &mut dyn Write, markdown: &str) -> Result<()> {
    writeln!(writer, "{markdown}")?;
    Ok(())
}

/// One line describing a failed request: `[<Kind> <code>] <message>`
pub(crate) fn format_domain_error(error: &DomainError) -> String {
    format!(
        "{} {}",
        error_style().apply_to(format!("[{} {}]", error.kind(), error.code())),
        error.message()
    )
}
