// src/lib.rs

//! # Sliding Limiter
//!
//! A per-key rate limiter based on the sliding window log algorithm.
//!
//! Every key owns a log of admission timestamps guarded by its own lock, so
//! callers for the same key serialize while callers for different keys never
//! contend.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::time::Duration;
//! use sliding_limiter::{MonotonicClock, SlidingLimiter, SlidingLimiterConfig};
//!
//! let config = SlidingLimiterConfig::new(Duration::from_secs(5), 3);
//! let limiter = SlidingLimiter::with_config(config, MonotonicClock::new()).unwrap();
//!
//! let decision = limiter.check_request("user_123").unwrap();
//! if decision.allowed {
//!     println!("Request allowed, {} left in window", decision.remaining);
//! } else {
//!     println!("Rate limited - retry after {:?}",
//!              decision.retry_after.unwrap_or_default());
//! }
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod sliding_limiter;

// public API exports
pub use clock::{Clock, ClockError, MonotonicClock, SystemClock};
pub use config::SlidingLimiterConfig;
pub use errors::SlidingLimiterError;
pub use sliding_limiter::{SlidingLimiter, SlidingLimiterDecision};
