use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

use crate::ConfigError;
use crate::ratelimit::RateLimitConfig;

/// Book-keeping for the active window
#[derive(Debug)]
struct WindowState {
    /// Requests admitted in the active window
    count: u32,
    /// When the active window began
    start: Instant,
}

impl WindowState {
    fn reset(&mut self, now: Instant) {
        self.count = 0;
        self.start = now;
    }
}

/// A fixed-window request counter.
///
/// At most `max_requests` callers are admitted per window of length
/// `window`. Callers arriving after the quota is exhausted are suspended
/// until the window ends and are then admitted into a fresh window.
///
/// The whole check-and-increment sequence, including the suspension, runs
/// while holding a fair (FIFO) async mutex. Waiters are therefore admitted
/// in arrival order and concurrent callers can never jointly exceed the
/// quota.
#[derive(Debug)]
pub struct RateGate {
    max_requests: NonZeroU32,
    window: Duration,
    state: Mutex<WindowState>,
}

impl RateGate {
    /// Create a gate admitting `max_requests` per `window`
    #[must_use]
    pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(WindowState {
                count: 0,
                start: Instant::now(),
            }),
        }
    }

    /// Create a gate from user configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if the quota or the window
    /// is zero; such a gate could never admit a request.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, ConfigError> {
        let (max_requests, window) = config.validate()?;
        Ok(Self::new(max_requests, window))
    }

    /// Wait until the caller may issue exactly one request.
    ///
    /// Returns immediately while the active window has quota left.
    /// Otherwise sleeps for the remainder of the window, then opens a new
    /// window with this caller as its first request.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        if now.saturating_duration_since(state.start) >= self.window {
            state.reset(now);
        }

        if state.count < self.max_requests.get() {
            state.count += 1;
            return;
        }

        let wait = (state.start + self.window).saturating_duration_since(now);
        log::debug!(
            "Rate limit of {} requests per {}ms reached, waiting {}ms",
            self.max_requests,
            self.window.as_millis(),
            wait.as_millis()
        );
        sleep(wait).await;

        state.reset(Instant::now());
        state.count = 1;
    }

    /// Number of requests admitted in the active window
    pub async fn window_count(&self) -> u32 {
        self.state.lock().await.count
    }

    /// Maximum number of requests per window
    #[must_use]
    pub const fn max_requests(&self) -> NonZeroU32 {
        self.max_requests
    }

    /// Length of a window
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}
