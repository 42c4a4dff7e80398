// src/sliding_limiter.rs

// sliding-limiter: A rate limiter based on the sliding window log algorithm.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::SlidingLimiterConfig;
use crate::errors::SlidingLimiterError;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Admission timestamps for a single key, oldest first.
#[derive(Debug, Default)]
struct TimestampLog {
    stamps: VecDeque<u64>,
}

impl TimestampLog {
    // drop every entry strictly older than the window; age == window is kept
    fn prune(&mut self, now_nanos: u64, window_nanos: u64) {
        while let Some(&oldest) = self.stamps.front() {
            if now_nanos.saturating_sub(oldest) > window_nanos {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    // a caller may read the clock before a competitor yet lock after it
    fn record(&mut self, now_nanos: u64) {
        let stamp = self.newest().map_or(now_nanos, |newest| newest.max(now_nanos));
        self.stamps.push_back(stamp);
    }

    fn oldest(&self) -> Option<u64> {
        self.stamps.front().copied()
    }

    fn newest(&self) -> Option<u64> {
        self.stamps.back().copied()
    }

    fn len(&self) -> usize {
        self.stamps.len()
    }
}

/// The main SlidingLimiter model.
/// T is the type used to identify clients (e.g., String, u64, etc.).
/// C is the clock type, defaulting to MonotonicClock.
///
/// Each key maps to its own mutex-guarded timestamp log. The map is only used
/// to find (or atomically create) a key's log; the decision itself runs under
/// that key's lock, so keys never block each other.
#[derive(Debug)]
pub struct SlidingLimiter<T, C = MonotonicClock>
where
    T: Hash + Eq + Clone,
    C: Clock,
{
    window: Duration,
    window_nanos: u64,
    quota: u32,
    logs: DashMap<T, Arc<Mutex<TimestampLog>>>,
    clock: C,
}

impl<T> SlidingLimiter<T, MonotonicClock>
where
    T: Hash + Eq + Clone,
{
    /// Create a limiter admitting at most `quota` requests per key in any
    /// trailing `window`, using the default monotonic clock.
    pub fn new(window: Duration, quota: u32) -> Result<Self, SlidingLimiterError> {
        Self::with_config(SlidingLimiterConfig::new(window, quota), MonotonicClock::new())
    }
}

// methods for the SlidingLimiter type
impl<T, C> SlidingLimiter<T, C>
where
    T: Hash + Eq + Clone,
    C: Clock,
{
    /// Create a limiter from a config object and a clock.
    /// Fails fast on a zero window or a zero quota.
    pub fn with_config(
        config: SlidingLimiterConfig,
        clock: C,
    ) -> Result<Self, SlidingLimiterError> {
        config.validate()?;

        let window_nanos = u64::try_from(config.window.as_nanos()).unwrap_or(u64::MAX);
        debug!(
            window_ms = config.window.as_millis() as u64,
            quota = config.quota,
            "sliding limiter created"
        );

        Ok(Self {
            window: config.window,
            window_nanos,
            quota: config.quota,
            logs: DashMap::new(),
            clock,
        })
    }

    // accessor method to return the window duration
    pub fn window(&self) -> Duration {
        self.window
    }

    // accessor method to return the quota
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Number of keys currently holding a log.
    pub fn tracked_keys(&self) -> usize {
        self.logs.len()
    }

    /// Number of timestamps currently recorded for `key`, without pruning.
    /// Unknown keys report zero.
    pub fn in_window<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.logs
            .get(key)
            .map(|entry| entry.value().lock().len())
            .unwrap_or(0)
    }

    /// Decide whether a request for `client_id` is admitted right now.
    ///
    /// Returns `Ok(true)` and records the request when the key has fewer than
    /// `quota` admissions in the trailing window, `Ok(false)` otherwise. A
    /// rejection never records anything.
    pub fn allow_request(&self, client_id: T) -> Result<bool, SlidingLimiterError> {
        self.check_request(client_id).map(|decision| decision.allowed)
    }

    /// Same decision as [`allow_request`](Self::allow_request), with metadata
    /// suitable for rate-limit response headers.
    pub fn check_request(
        &self,
        client_id: T,
    ) -> Result<SlidingLimiterDecision, SlidingLimiterError> {
        // read the clock first so a failed read leaves no trace in the map
        let current_time_nanos = self.clock.now()?;
        let log = self.log_for(client_id);

        let mut log = log.lock();
        log.prune(current_time_nanos, self.window_nanos);

        let allowed = log.len() < self.quota as usize;
        if allowed {
            log.record(current_time_nanos);
        }

        // the log is never empty here: it was just appended to, or it is full
        let oldest = log.oldest().unwrap_or(current_time_nanos);
        let reset_time_nanos = oldest.saturating_add(self.window_nanos).saturating_add(1);
        let remaining = (self.quota as usize).saturating_sub(log.len()) as u32;
        drop(log);

        trace!(allowed, remaining, "request decision");

        let retry_after = if allowed {
            None
        } else {
            Some(Duration::from_nanos(
                reset_time_nanos.saturating_sub(current_time_nanos),
            ))
        };

        Ok(SlidingLimiterDecision {
            allowed,
            remaining,
            retry_after,
            reset_time_nanos,
        })
    }

    // look up the key's log, inserting an empty one atomically if absent
    fn log_for(&self, client_id: T) -> Arc<Mutex<TimestampLog>> {
        if let Some(entry) = self.logs.get(&client_id) {
            return Arc::clone(entry.value());
        }
        Arc::clone(self.logs.entry(client_id).or_default().value())
    }

    /// Remove keys that have been idle for longer than `max_idle`.
    ///
    /// A key is idle when its newest admission is older than both `max_idle`
    /// and the window, so removing it can never hand a key a fresh quota while
    /// it still has admissions in the window. Keys whose log is held by an
    /// in-flight request are skipped. Returns the number of keys removed.
    pub fn cleanup_idle_keys(&self, max_idle: Duration) -> Result<usize, SlidingLimiterError> {
        let current_time_nanos = self.clock.now()?;
        let threshold_nanos =
            u64::try_from(max_idle.max(self.window).as_nanos()).unwrap_or(u64::MAX);

        let mut removed = 0;
        self.logs.retain(|_, log| {
            // the shard is write-locked, so no caller can clone this Arc now
            if Arc::strong_count(log) > 1 {
                return true;
            }
            let keep = match log.lock().newest() {
                Some(newest) => current_time_nanos.saturating_sub(newest) <= threshold_nanos,
                None => false,
            };
            if !keep {
                removed += 1;
            }
            keep
        });

        debug!(removed, remaining = self.logs.len(), "idle key cleanup");
        Ok(removed)
    }
}

/// Result of a rate limiting decision with metadata for HTTP responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingLimiterDecision {
    /// Whether the request should be allowed
    pub allowed: bool,
    /// Admissions still available in the current window after this decision
    pub remaining: u32,
    /// Time until the oldest admission leaves the window (when denied)
    pub retry_after: Option<Duration>,
    /// Clock reading at which the oldest admission in the window expires
    pub reset_time_nanos: u64,
}
