//! Per-client fixed-window request limits.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Entries beyond this count trigger a sweep of expired windows.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    count: u32,
}

/// Allows at most `max_requests` per `window` for each client key.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Counts one request for `key`.
    ///
    /// Returns the time left in the current window when the limit is already
    /// reached.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut entries = self.entries.lock();

        if entries.len() > PRUNE_THRESHOLD {
            let window = self.window;
            entries.retain(|_, w| now.duration_since(w.start) < window);
        }

        let entry = entries.entry(key.to_string()).or_insert(Window {
            start: now,
            count: 0,
        });

        let elapsed = now.duration_since(entry.start);
        if elapsed >= self.window {
            entry.start = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            return Err(self.window.saturating_sub(now.duration_since(entry.start)));
        }

        entry.count += 1;
        Ok(())
    }
}

/// Limits for each rate-limited route.
#[derive(Debug)]
pub struct RateLimits {
    pub login: FixedWindowLimiter,
    pub check: FixedWindowLimiter,
    pub group: FixedWindowLimiter,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            login: FixedWindowLimiter::per_minute(5),
            check: FixedWindowLimiter::per_minute(10),
            group: FixedWindowLimiter::per_minute(5),
        }
    }
}
