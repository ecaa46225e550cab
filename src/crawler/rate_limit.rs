//! Politeness limiter shared by concurrent fetch workers
//!
//! With one worker the controller simply sleeps between fetches. With several,
//! each worker reserves the next free request slot here before claiming a URL,
//! so fetch starts stay at least `interval` apart across the whole pool.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Longest spacing the limiter will enforce
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Hands out request slots spaced `interval` apart
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter; intervals above [`MAX_INTERVAL`] are clamped to it
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.min(MAX_INTERVAL),
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserves the next slot and returns how long to wait for it
    ///
    /// The first reservation is immediate; each later one is `interval` after
    /// the previous reservation, or now if that moment has already passed.
    pub fn reserve(&self) -> Duration {
        self.reserve_at(Instant::now())
    }

    fn reserve_at(&self, now: Instant) -> Duration {
        let mut next_slot = self
            .next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let slot = match *next_slot {
            Some(t) if t > now => t,
            _ => now,
        };
        *next_slot = Some(slot.checked_add(self.interval).unwrap_or(slot));

        slot - now
    }

    /// Waits until this caller's reserved slot arrives
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let wait = self.reserve();
        if !wait.is_zero() {
            tracing::trace!("Rate limiter: waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
