//! Turning non-success responses into a [`DomainError`].
//!
//! The service multiplexes many fine-grained application error codes
//! (`3001` project not found, `3004` missing permission, ...) onto a handful
//! of HTTP statuses. Whenever the body carries a code in the application
//! range it decides the error kind and becomes the error's `code`; the HTTP
//! status is the fallback.

use http::StatusCode;

use crate::{DomainError, ErrorKind, RawErrorBody};

/// Codes at or above this value are application error codes
pub(crate) const APPLICATION_CODE_FLOOR: u32 = 3000;

/// Map an application error code to its kind
pub(crate) const fn application_kind(code: u32) -> ErrorKind {
    match code {
        3001 | 3002 => ErrorKind::NotFound,
        3004 => ErrorKind::Auth,
        _ => ErrorKind::Validation,
    }
}

/// Map a bare HTTP status to its kind
pub(crate) const fn status_kind(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        400 => ErrorKind::Validation,
        401 | 403 => ErrorKind::Auth,
        404 => ErrorKind::NotFound,
        408 => ErrorKind::Timeout,
        _ => ErrorKind::Server,
    }
}

/// Classify a response that was neither 204 nor a success.
///
/// Never fails: malformed or absent bodies degrade to classification by
/// HTTP status alone.
pub(crate) fn classify(status: StatusCode, body: &[u8]) -> DomainError {
    let status_text = status.canonical_reason().filter(|reason| !reason.is_empty());
    let text = String::from_utf8_lossy(body);

    let message = if text.trim().is_empty() {
        None
    } else {
        match RawErrorBody::parse(&text) {
            None => Some(text.into_owned()),
            Some(RawErrorBody {
                code: Some(code),
                message,
            }) if code >= APPLICATION_CODE_FLOOR => {
                let kind = application_kind(code);
                log::trace!("Application error code {code} on HTTP {status} classified as {kind}");
                let message = message
                    .or_else(|| status_text.map(str::to_owned))
                    .unwrap_or_else(|| kind.default_message().to_owned());
                return DomainError::new(kind, code, message);
            }
            Some(raw) => raw.message,
        }
    };

    let kind = status_kind(status);
    log::trace!("HTTP {status} classified as {kind}");
    let message = match kind {
        ErrorKind::Timeout => kind.default_message().to_owned(),
        _ => message
            .or_else(|| status_text.map(str::to_owned))
            .unwrap_or_else(|| kind.default_message().to_owned()),
    };
    DomainError::new(kind, u32::from(status.as_u16()), message)
}
