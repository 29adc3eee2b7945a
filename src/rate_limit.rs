//! Session-scoped rate limiter for outbound translation calls.
//!
//! Sliding-window variant of a token bucket: up to `capacity` permits in any
//! trailing `window` interval, tracked via the timestamps of recent permits.
//! `allow()` is non-blocking check-and-record with no queue; a denied
//! caller surfaces the denial to the user instead of waiting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter.
///
/// Not safe for concurrent callers on its own; the pipeline keeps it behind
/// a mutex.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    timestamps: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter permitting `capacity` calls per `window`.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            capacity,
            window,
            timestamps: VecDeque::with_capacity(capacity),
        }
    }

    /// Check-and-record: returns true and records the call if the window has
    /// room, false otherwise.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    // Decision logic with the clock factored out, so tests are deterministic.
    fn allow_at(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() < self.capacity {
            self.timestamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// Number of calls currently recorded inside the window.
    pub fn in_flight(&self) -> usize {
        self.timestamps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn limiter(capacity: usize, window_secs: u64) -> RateLimiter {
        RateLimiter::new(capacity, Duration::from_secs(window_secs))
    }

    #[test]
    fn test_permits_up_to_capacity() {
        let mut limiter = limiter(3, 60);
        let now = Instant::now();

        assert!(limiter.allow_at(now));
        assert!(limiter.allow_at(now));
        assert!(limiter.allow_at(now));
        assert!(!limiter.allow_at(now));
    }

    #[test]
    fn test_denial_does_not_consume_a_slot() {
        let mut limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.allow_at(now));
        assert!(!limiter.allow_at(now));
        assert_eq!(limiter.in_flight(), 1);
    }

    #[test]
    fn test_window_expiry_frees_slots() {
        let mut limiter = limiter(2, 60);
        let start = Instant::now();

        assert!(limiter.allow_at(start));
        assert!(limiter.allow_at(start));
        assert!(!limiter.allow_at(start + Duration::from_secs(30)));

        // 61s later the first two permits have aged out
        assert!(limiter.allow_at(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_boundary_timestamp_still_counts() {
        // A permit exactly `window` old is not yet expired (strictly-older
        // pruning), so the slot is still occupied.
        let mut limiter = limiter(1, 60);
        let start = Instant::now();

        assert!(limiter.allow_at(start));
        assert!(!limiter.allow_at(start + Duration::from_secs(60)));
        assert!(limiter.allow_at(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_zero_capacity_denies_everything() {
        let mut limiter = limiter(0, 60);
        assert!(!limiter.allow_at(Instant::now()));
    }

    proptest! {
        /// No sequence of calls yields more than `capacity` permits within
        /// any sliding window.
        #[test]
        fn prop_never_exceeds_capacity_in_window(
            capacity in 1usize..10,
            offsets_ms in proptest::collection::vec(0u64..5_000, 1..100),
        ) {
            let window = Duration::from_millis(1_000);
            let mut limiter = RateLimiter::new(capacity, window);
            let start = Instant::now();

            let mut times: Vec<u64> = offsets_ms;
            times.sort_unstable();

            let mut granted: Vec<u64> = Vec::new();
            for t in times {
                if limiter.allow_at(start + Duration::from_millis(t)) {
                    granted.push(t);
                }
            }

            // Count permits inside every trailing window ending at a grant
            for (i, &t) in granted.iter().enumerate() {
                let in_window = granted[..=i]
                    .iter()
                    .filter(|&&g| t - g <= 1_000)
                    .count();
                prop_assert!(in_window <= capacity);
            }
        }
    }
}
