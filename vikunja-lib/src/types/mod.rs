#![allow(unreachable_pub)]

mod error;
mod raw_error;
mod reply;

pub use error::{ConfigError, DomainError, ErrorKind};
pub use raw_error::RawErrorBody;
pub use reply::Reply;

/// The vikunja-lib `Result` type
pub type Result<T> = std::result::Result<T, crate::DomainError>;
