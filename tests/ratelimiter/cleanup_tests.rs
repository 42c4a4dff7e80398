// tests/ratelimiter/cleanup_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use sliding_limiter::{SlidingLimiter, SlidingLimiterConfig};
    use std::time::Duration;

    fn limiter(window_ms: u64, quota: u32, clock: TestClock) -> SlidingLimiter<String, TestClock> {
        let config = SlidingLimiterConfig::new(Duration::from_millis(window_ms), quota);
        SlidingLimiter::with_config(config, clock).unwrap()
    }

    #[test]
    fn cleanup_removes_idle_clients() {
        let clock = TestClock::new(0);
        let limiter = limiter(1000, 1, clock.clone());

        assert!(limiter.allow_request("client1".to_string()).unwrap()); // t=0
        clock.set_ms(5000);
        assert!(limiter.allow_request("client2".to_string()).unwrap()); // t=5000
        clock.set_ms(10_000);
        assert!(limiter.allow_request("client3".to_string()).unwrap()); // t=10000

        assert_eq!(limiter.tracked_keys(), 3);

        // at t=12000 keep clients active within the last 4500ms
        clock.set_ms(12_000);
        let removed = limiter.cleanup_idle_keys(Duration::from_millis(4500)).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.in_window("client3"), 1);
        assert_eq!(limiter.in_window("client1"), 0);
    }

    #[test]
    fn cleanup_never_drops_keys_inside_the_window() {
        let clock = TestClock::new(0);
        let limiter = limiter(5000, 1, clock.clone());

        assert!(limiter.allow_request("a".to_string()).unwrap());
        clock.set_ms(3000);

        // max_idle below the window is raised to the window
        assert_eq!(limiter.cleanup_idle_keys(Duration::ZERO).unwrap(), 0);
        assert!(!limiter.allow_request("a".to_string()).unwrap());

        clock.set_ms(5001);
        assert_eq!(limiter.cleanup_idle_keys(Duration::ZERO).unwrap(), 1);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn cleanup_measures_idleness_from_newest_entry() {
        let clock = TestClock::new(0);
        let limiter = limiter(1000, 1, clock.clone());

        assert!(limiter.allow_request("a".to_string()).unwrap());
        clock.set_ms(2000);
        assert!(limiter.allow_request("a".to_string()).unwrap());
        assert_eq!(limiter.in_window("a"), 1);

        // the t=0 admission is long gone, but t=2000 keeps the key alive
        clock.set_ms(2900);
        assert_eq!(limiter.cleanup_idle_keys(Duration::from_millis(1000)).unwrap(), 0);

        clock.set_ms(3001);
        assert_eq!(limiter.cleanup_idle_keys(Duration::from_millis(1000)).unwrap(), 1);
    }

    #[test]
    fn cleanup_handles_empty_state() {
        let clock = TestClock::new(0);
        let limiter = limiter(1000, 1, clock);

        assert_eq!(limiter.cleanup_idle_keys(Duration::from_secs(1)).unwrap(), 0);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn cleanup_preserves_recent_clients() {
        let clock = TestClock::new(100_000);
        let limiter = limiter(100, 1, clock.clone());

        for i in 0..5 {
            assert!(limiter.allow_request(format!("client{}", i)).unwrap());
            clock.advance_ms(10);
        }

        let removed = limiter.cleanup_idle_keys(Duration::from_secs(1)).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(limiter.tracked_keys(), 5);
    }

    #[test]
    fn removed_key_starts_with_fresh_quota() {
        let clock = TestClock::new(0);
        let limiter = limiter(1000, 2, clock.clone());

        assert!(limiter.allow_request("a".to_string()).unwrap());
        assert!(limiter.allow_request("a".to_string()).unwrap());

        clock.set_ms(60_000);
        assert_eq!(limiter.cleanup_idle_keys(Duration::from_secs(30)).unwrap(), 1);

        assert!(limiter.allow_request("a".to_string()).unwrap());
        assert_eq!(limiter.in_window("a"), 1);
    }
}
