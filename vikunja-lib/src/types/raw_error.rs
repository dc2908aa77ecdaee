use serde_json::Value;

/// The loosely typed error payload the service may attach to a non-2xx
/// response, e.g. `{"code": 3001, "message": "The project does not exist"}`.
///
/// Fields of the wrong type are treated as absent rather than failing the
/// whole parse, so a body like `{"code": "oops", "message": "m"}` still
/// yields its message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawErrorBody {
    /// A positive numeric error code, if present
    pub code: Option<u32>,
    /// A non-empty message, if present
    pub message: Option<String>,
}

impl RawErrorBody {
    /// Parse a response body. Returns `None` if `text` is not JSON at all.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str::<Value>(text)
            .ok()
            .map(|value| Self::from_value(&value))
    }

    /// Extract the known fields from an already parsed JSON value.
    /// Anything other than an object yields an empty body.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let code = value
            .get("code")
            .and_then(integral)
            .filter(|code| *code > 0)
            .and_then(|code| u32::try_from(code).ok());
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_owned);
        Self { code, message }
    }
}

/// A non-negative whole number, whether written as `3001` or `3001.0`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn integral(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
