// src/errors.rs

// error handling for the sliding limiter type

// dependencies
use crate::clock::ClockError;

/// Error type for SlidingLimiter configuration and runtime issues.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SlidingLimiterError {
    /// The window duration was zero.
    #[error("Window duration must be positive")]
    InvalidWindow,
    /// The quota was zero.
    #[error("Quota must be positive")]
    InvalidQuota,
    /// The clock could not be read, so no safe decision can be made.
    #[error("Clock error occurred: {0}")]
    ClockError(#[from] ClockError),
}
