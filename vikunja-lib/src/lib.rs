//! `vikunja-lib` is a rate-limited client for the Vikunja task API.
//! Listing projects:
//! ```no_run
//! use vikunja_lib::ClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let client = ClientBuilder::builder()
//!       .api_url("https://tasks.example.org")
//!       .token("my-token")
//!       .build()
//!       .client()?;
//!   for project in client.projects().list().await? {
//!       println!("{} {}", project.id, project.title);
//!   }
//!   Ok(())
//! }
//! ```
//!
//! Endpoints without a typed wrapper can be reached through the generic
//! request methods. Every failure is a [`DomainError`] carrying one of the
//! [`ErrorKind`]s, so callers can branch on the kind instead of status codes:
//!
//! ```no_run
//! use serde_json::Value;
//! use vikunja_lib::{ClientBuilder, ErrorKind, RateLimitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let client = ClientBuilder::builder()
//!       .api_url("https://tasks.example.org/api/v1")
//!       .token("my-token")
//!       .rate_limit(RateLimitConfig::from_millis(Some(10), Some(1000)))
//!       .build()
//!       .client()?;
//!   match client.get::<Value>("/labels/7").await {
//!       Ok(label) => println!("{label}"),
//!       Err(e) if e.kind() == ErrorKind::NotFound => println!("no such label"),
//!       Err(e) => return Err(e.into()),
//!   }
//!   Ok(())
//! }
//! ```
// #![deny(missing_docs)]

mod client;
mod config;
mod types;

pub mod ratelimit;
pub mod resource;
pub mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_USER_AGENT};
pub use config::{API_PATH, ClientConfig, normalize_base_url};
pub use ratelimit::{RateGate, RateLimitConfig};
pub use types::*;
