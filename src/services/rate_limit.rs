use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client key
///
/// Owned by the caller; nothing expires on its own. The map is bounded, the
/// least recently seen key is dropped when it is full, and `evict_expired`
/// sweeps finished windows on demand.
#[derive(Debug)]
pub struct RateLimiter {
    windows: LruCache<String, Window>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window` for up to `capacity` keys
    pub fn new(limit: u32, window: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            windows: LruCache::new(capacity),
            limit,
            window,
        }
    }

    /// Count a request for `key` at `now`
    ///
    /// The first request opens a window. Requests after the window has run
    /// out open a fresh one. Within a window every request is counted and
    /// those beyond the limit are refused.
    pub fn check(&mut self, key: &str, now: Instant) -> RateDecision {
        if let Some(window) = self.windows.get_mut(key) {
            let elapsed = now.saturating_duration_since(window.started);
            if elapsed <= self.window {
                window.count = window.count.saturating_add(1);
                return if window.count > self.limit {
                    RateDecision::Limited {
                        retry_after: self.window - elapsed,
                    }
                } else {
                    RateDecision::Allowed {
                        remaining: self.limit - window.count,
                    }
                };
            }
        }

        self.windows.put(
            key.to_string(),
            Window {
                started: now,
                count: 1,
            },
        );
        RateDecision::Allowed {
            remaining: self.limit.saturating_sub(1),
        }
    }

    /// Drop every window that has run out, returning how many were removed
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .windows
            .iter()
            .filter(|(_, w)| now.saturating_duration_since(w.started) > self.window)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.windows.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
