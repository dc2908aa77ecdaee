//! Client-side request throttling.
//!
//! Every request a [`Client`](crate::Client) sends first passes through a
//! [`RateGate`], a fixed-window counter that suspends callers once the
//! configured quota for the current window is used up.
//!
//! - [`RateLimitConfig`]: Quota and window length, with serde support
//! - [`RateGate`]: The shared counter enforcing the quota

mod config;
mod gate;

pub use config::{DEFAULT_MAX_REQUESTS, DEFAULT_TIME_WINDOW, RateLimitConfig};
pub use gate::RateGate;
