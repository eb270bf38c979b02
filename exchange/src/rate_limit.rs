//! Sliding-window throttle for outbound calls.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use log::warn;

use crate::error::{ExchangeError, Result};

/// Caps calls to `max_calls` within any trailing `window`.
///
/// Calls over the cap are not queued or rejected; [`acquire`](Self::acquire)
/// sleeps in place until the oldest call in the window ages out.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_calls: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl SlidingWindowLimiter {
    /// `max_calls` per second.
    pub fn per_second(max_calls: usize) -> Result<Self> {
        Self::new(max_calls, Duration::from_secs(1))
    }

    pub fn new(max_calls: usize, window: Duration) -> Result<Self> {
        if max_calls == 0 {
            return Err(ExchangeError::InvalidArgument(
                "rate limit must allow at least one call".into(),
            ));
        }
        if window.is_zero() {
            return Err(ExchangeError::InvalidArgument(
                "rate limit window must be non-zero".into(),
            ));
        }
        Ok(Self {
            max_calls,
            window,
            calls: VecDeque::with_capacity(max_calls),
        })
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Calls still inside the window as of `now`.
    fn expire(&mut self, now: Instant) {
        while let Some(&oldest) = self.calls.front() {
            if now.duration_since(oldest) >= self.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Wait until a call is allowed, then record it. Returns the time waited.
    pub fn acquire(&mut self) -> Duration {
        let start = Instant::now();
        let mut now = start;
        self.expire(now);

        while self.calls.len() >= self.max_calls {
            let Some(&oldest) = self.calls.front() else {
                break;
            };
            let wait = self.window.saturating_sub(now.duration_since(oldest));
            if now == start {
                warn!(
                    "Rate limit ({} per {:?}) reached, waiting {wait:?}",
                    self.max_calls, self.window
                );
            }
            thread::sleep(wait);
            now = Instant::now();
            self.expire(now);
        }

        self.calls.push_back(now);
        now.duration_since(start)
    }
}
