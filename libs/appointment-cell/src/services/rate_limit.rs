use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use shared_config::ClinicConfig;

/// Sliding-window limit on booking attempts, keyed by the requester's phone
/// number. Stale entries are evicted on every check, so the map only ever
/// holds attempts inside the current window.
pub struct BookingRateLimiter {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl BookingRateLimiter {
    pub fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window: Duration::seconds(window_secs as i64),
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ClinicConfig) -> Self {
        Self::new(config.booking_rate_limit, config.booking_rate_window_secs)
    }

    /// Returns `false` when the key has exhausted its attempts inside the
    /// window. A successful check records the attempt.
    pub fn check_and_record(&self, key: &str, now: DateTime<Utc>) -> bool {
        let cutoff = now - self.window;
        let mut attempts = self.attempts.lock().unwrap();

        attempts.retain(|_, stamps| {
            stamps.retain(|stamp| *stamp > cutoff);
            !stamps.is_empty()
        });

        let entry = attempts.entry(key.to_string()).or_default();
        if entry.len() as u32 >= self.max_attempts {
            debug!("Rate limit hit for {}", key);
            return false;
        }

        entry.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, minute, 0).unwrap()
    }

    #[test]
    fn blocks_after_the_configured_number_of_attempts() {
        let limiter = BookingRateLimiter::new(3, 3600);
        assert!(limiter.check_and_record("0917", at(0)));
        assert!(limiter.check_and_record("0917", at(1)));
        assert!(limiter.check_and_record("0917", at(2)));
        assert!(!limiter.check_and_record("0917", at(3)));
    }

    #[test]
    fn keys_are_limited_independently() {
        let limiter = BookingRateLimiter::new(1, 3600);
        assert!(limiter.check_and_record("0917", at(0)));
        assert!(limiter.check_and_record("0918", at(0)));
        assert!(!limiter.check_and_record("0917", at(1)));
    }

    #[test]
    fn attempts_expire_once_the_window_slides_past_them() {
        let limiter = BookingRateLimiter::new(1, 3600);
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        assert!(limiter.check_and_record("0917", start));
        assert!(!limiter.check_and_record("0917", start + Duration::minutes(30)));
        assert!(limiter.check_and_record("0917", start + Duration::minutes(61)));
    }
}
