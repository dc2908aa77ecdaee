use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{DomainError, Result};

/// The successful outcome of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// HTTP 204; the body was not read as JSON
    NoContent,
    /// Any other success status with a parsed JSON body
    Json(Value),
}

impl Reply {
    /// Whether the server answered with 204
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// The JSON value of the reply; no-content becomes `null`
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::NoContent => Value::Null,
            Self::Json(value) => value,
        }
    }

    /// Convert the reply into the caller's requested type.
    ///
    /// No-content is presented as `null`, so `()` and `Option<T>` accept it.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidResponse`](crate::ErrorKind) error if
    /// the JSON does not have the shape of `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        let no_content = self.is_no_content();
        serde_json::from_value(self.into_value()).map_err(|e| {
            if no_content {
                DomainError::invalid_response(format!(
                    "Expected a response body but got no content: {e}"
                ))
            } else {
                DomainError::invalid_response(format!("Unexpected response shape: {e}"))
            }
        })
    }
}
